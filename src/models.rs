use serde::{Deserialize, Serialize};

use crate::category::BusinessType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProspect {
    pub name: String,
    pub category: String,
    pub location: String,
    pub email: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewsAnalysis {
    pub curiosity_mentions: usize,
    pub sample_quotes: Vec<String>,
    pub total_reviews_analyzed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteAnalysis {
    pub has_open_kitchen: bool,
    pub operating_hours: String,
    pub specialty_process: String,
    pub location_type: String,
    pub foot_traffic: String,
}

impl WebsiteAnalysis {
    pub const UNKNOWN: &'static str = "Unknown";

    /// Sentinel for businesses we hold no website facts about.
    pub fn unknown() -> Self {
        Self {
            has_open_kitchen: false,
            operating_hours: Self::UNKNOWN.to_string(),
            specialty_process: Self::UNKNOWN.to_string(),
            location_type: Self::UNKNOWN.to_string(),
            foot_traffic: Self::UNKNOWN.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDemand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_searches: Option<u32>,
    pub local_interest_score: u32,
    pub competitor_gap: bool,
    pub demographic_match: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueProjection {
    pub hourly_rate: u32,
    pub daily_sessions: u32,
    pub weekly_sessions: u32,
    pub monthly_sessions: u32,
    pub monthly_revenue: u64,
    pub annual_revenue: u64,
    pub observers_per_session: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intelligence {
    pub business_name: String,
    pub business_type: BusinessType,
    pub location: String,
    pub reviews_analysis: ReviewsAnalysis,
    pub website_analysis: WebsiteAnalysis,
    pub location_demand: LocationDemand,
    pub revenue_projections: RevenueProjection,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedCopy {
    pub subject_line: String,
    pub personalized_opening: String,
    pub revenue_hook: String,
    pub social_proof: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub business_name: String,
    pub email: String,
    pub intelligence: Intelligence,
    pub personalized_copy: PersonalizedCopy,
    pub landing_url: String,
    pub draft_id: String,
    pub subject: String,
    pub email_body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupAnalysis {
    pub has_open_kitchen: bool,
    pub operating_hours: String,
    pub specialty_process: String,
    pub foot_traffic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandProof {
    pub monthly_searches: u32,
    pub curiosity_mentions: usize,
    pub interest_score: u32,
    pub sample_quotes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueCalculator {
    pub hourly_rate: u32,
    pub daily_sessions: u32,
    pub weekly_sessions: u32,
    pub monthly_revenue: u64,
    pub annual_revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    pub hero_title: String,
    pub setup_analysis: SetupAnalysis,
    pub demand_proof: DemandProof,
    pub revenue_calculator: RevenueCalculator,
    pub cta_text: String,
}

/// A prospect left out of a batch, with the reason it failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipNotice {
    pub business_name: String,
    pub category: String,
    pub reason: String,
}
