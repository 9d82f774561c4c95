use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::category::{classify, Classification};
use crate::config::{CampaignSettings, EmailStyle};
use crate::error::Result;
use crate::intel::IntelligenceGenerator;
use crate::mailer::{Mailer, OutgoingMessage};
use crate::models::{
    BusinessProspect, CampaignRecord, Intelligence, LandingPage, PersonalizedCopy, SkipNotice,
};
use crate::personalize::{derive_copy, format_dollars, landing_page, landing_url, slug};
use crate::templates::{self, Fields, RenderedEmail};

/// One successfully staged prospect.
#[derive(Debug, Clone)]
pub struct CampaignEntry {
    pub record: CampaignRecord,
    pub slug: String,
    pub landing_page: LandingPage,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub entries: Vec<CampaignEntry>,
    pub skipped: Vec<SkipNotice>,
}

pub struct Campaign<'a, R = StdRng> {
    settings: &'a CampaignSettings,
    intel: IntelligenceGenerator<R>,
    mailer: &'a dyn Mailer,
}

impl<'a, R: Rng> Campaign<'a, R> {
    pub fn new(
        settings: &'a CampaignSettings,
        intel: IntelligenceGenerator<R>,
        mailer: &'a dyn Mailer,
    ) -> Self {
        Self {
            settings,
            intel,
            mailer,
        }
    }

    /// Processes prospects in order. A failing prospect is logged and
    /// reported as skipped; the rest of the batch still runs.
    pub async fn run(&mut self, prospects: &[BusinessProspect]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for prospect in prospects {
            match self.process(prospect).await {
                Ok(entry) => {
                    info!(business = %prospect.name, draft_id = %entry.record.draft_id, "campaign created");
                    outcome.entries.push(entry);
                }
                Err(err) => {
                    warn!(business = %prospect.name, category = %prospect.category, error = %err, "prospect skipped");
                    outcome.skipped.push(SkipNotice {
                        business_name: prospect.name.clone(),
                        category: prospect.category.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        outcome
    }

    pub async fn process(&mut self, prospect: &BusinessProspect) -> Result<CampaignEntry> {
        let classification = classify(&prospect.category)?;
        if let Classification::Keyword(kind) = classification {
            debug!(category = %prospect.category, %kind, "category matched by keyword");
        }
        let business_type = classification.business_type();

        let intelligence = self
            .intel
            .generate(&prospect.name, business_type, &prospect.location);
        if intelligence.website_analysis.is_unknown() {
            debug!(business = %prospect.name, "no website facts, using unknown setup");
        }

        let copy = derive_copy(&intelligence);
        let url = landing_url(&self.settings.base_url, &prospect.name);
        let email = self.compose(&intelligence, &copy, &url)?;

        let message = OutgoingMessage::new(vec![prospect.email.clone()], email.subject, email.body);
        let draft_id = self.mailer.create_draft(&message).await?;

        let landing_page = landing_page(&intelligence);
        Ok(CampaignEntry {
            record: CampaignRecord {
                business_name: prospect.name.clone(),
                email: prospect.email.clone(),
                intelligence,
                personalized_copy: copy,
                landing_url: url,
                draft_id,
                subject: message.subject,
                email_body: message.body,
            },
            slug: slug(&prospect.name),
            landing_page,
        })
    }

    fn compose(
        &self,
        intelligence: &Intelligence,
        copy: &PersonalizedCopy,
        url: &str,
    ) -> Result<RenderedEmail> {
        let mut fields = Fields::new();
        fields.insert("business_name", intelligence.business_name.clone());
        self.settings.sender.fill(&mut fields);

        match self.settings.style {
            EmailStyle::Pitch => {
                fields.insert("subject_line", copy.subject_line.clone());
                fields.insert("personalized_opening", copy.personalized_opening.clone());
                fields.insert("revenue_hook", copy.revenue_hook.clone());
                fields.insert("landing_url", url.to_string());
                fields.insert(
                    "monthly_revenue",
                    format_dollars(intelligence.revenue_projections.monthly_revenue),
                );
                templates::render(&templates::PITCH, &fields)
            }
            EmailStyle::Classic => {
                let template = templates::lookup(intelligence.business_type.key())?;
                templates::render(template, &fields)
            }
        }
    }
}
