use crate::category::BusinessType;
use crate::models::{
    DemandProof, Intelligence, LandingPage, PersonalizedCopy, RevenueCalculator, SetupAnalysis,
};

pub const DEFAULT_MONTHLY_SEARCHES: u32 = 50;

/// Formats whole dollars with thousands separators, e.g. `$7,740`.
pub fn format_dollars(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

/// URL/file slug for a business name: `Salt & Straw` becomes `salt-and-straw`.
pub fn slug(business_name: &str) -> String {
    business_name
        .to_lowercase()
        .replace(' ', "-")
        .replace('&', "and")
}

pub fn landing_url(base_url: &str, business_name: &str) -> String {
    format!(
        "{}/{}-preview",
        base_url.trim_end_matches('/'),
        slug(business_name)
    )
}

fn subject_line(business_type: BusinessType, business_name: &str, monthly: &str) -> String {
    match business_type {
        BusinessType::CoffeeRoaster => {
            format!("{business_name}: Turn roasting curiosity into {monthly}/month")
        }
        BusinessType::Bakery => {
            format!("{business_name}: Your baking process could earn {monthly}/month")
        }
        BusinessType::ChocolateMaker => {
            format!("{business_name}: Bean-to-bar watchers = {monthly}/month revenue")
        }
        BusinessType::Brewery => {
            format!("{business_name}: Brewing observers could add {monthly}/month")
        }
        BusinessType::Florist => {
            format!("{business_name}: Arrangement watchers = {monthly}/month opportunity")
        }
        BusinessType::TeaShop => {
            format!("{business_name}: Tea ceremony curiosity = {monthly}/month")
        }
    }
}

pub fn derive_copy(intelligence: &Intelligence) -> PersonalizedCopy {
    let name = &intelligence.business_name;
    let reviews = &intelligence.reviews_analysis;
    let monthly = format_dollars(intelligence.revenue_projections.monthly_revenue);
    let searches = intelligence
        .location_demand
        .monthly_searches
        .unwrap_or(DEFAULT_MONTHLY_SEARCHES);

    let personalized_opening = if reviews.curiosity_mentions > 0 {
        let mut opening = format!(
            "Your reviews mention curiosity about your process {} times. ",
            reviews.curiosity_mentions
        );
        if let Some(quote) = reviews.sample_quotes.first() {
            opening.push_str(&format!("Recent quote: \"{quote}\""));
        }
        opening
    } else {
        format!(
            "People are naturally curious about {} processes.",
            intelligence.business_type.label()
        )
    };

    PersonalizedCopy {
        subject_line: subject_line(intelligence.business_type, name, &monthly),
        personalized_opening,
        revenue_hook: format!(
            "Based on {searches} monthly local searches, you could earn {monthly}/month"
        ),
        social_proof: format!("Similar businesses in your area earn {monthly}/month on average"),
    }
}

pub fn landing_page(intelligence: &Intelligence) -> LandingPage {
    let name = &intelligence.business_name;
    let revenue = &intelligence.revenue_projections;
    let website = &intelligence.website_analysis;
    let demand = &intelligence.location_demand;
    let reviews = &intelligence.reviews_analysis;
    let monthly = format_dollars(revenue.monthly_revenue);

    LandingPage {
        hero_title: format!("{name}: Your process could earn {monthly}/month"),
        setup_analysis: SetupAnalysis {
            has_open_kitchen: website.has_open_kitchen,
            operating_hours: website.operating_hours.clone(),
            specialty_process: website.specialty_process.clone(),
            foot_traffic: website.foot_traffic.clone(),
        },
        demand_proof: DemandProof {
            monthly_searches: demand.monthly_searches.unwrap_or(0),
            curiosity_mentions: reviews.curiosity_mentions,
            interest_score: demand.local_interest_score,
            sample_quotes: reviews.sample_quotes.clone(),
        },
        revenue_calculator: RevenueCalculator {
            hourly_rate: revenue.hourly_rate,
            daily_sessions: revenue.daily_sessions,
            weekly_sessions: revenue.weekly_sessions,
            monthly_revenue: revenue.monthly_revenue,
            annual_revenue: revenue.annual_revenue,
        },
        cta_text: format!("Join {name} in earning {monthly}/month"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::intel::derive_revenue;
    use crate::models::{LocationDemand, ReviewsAnalysis, WebsiteAnalysis};

    pub(crate) fn sample_intelligence() -> Intelligence {
        Intelligence {
            business_name: "Dandelion Chocolate".to_string(),
            business_type: BusinessType::ChocolateMaker,
            location: "San Francisco, CA".to_string(),
            reviews_analysis: ReviewsAnalysis {
                curiosity_mentions: 3,
                sample_quotes: vec![
                    "want to see chocolate making".to_string(),
                    "fascinated by bean to bar".to_string(),
                ],
                total_reviews_analyzed: 212,
            },
            website_analysis: WebsiteAnalysis::unknown(),
            location_demand: LocationDemand {
                monthly_searches: Some(180),
                local_interest_score: 95,
                competitor_gap: true,
                demographic_match: 88,
            },
            revenue_projections: derive_revenue(BusinessType::ChocolateMaker, 95, true),
            generated_at: "2026-01-05 09:30:00".to_string(),
        }
    }

    #[test]
    fn dollars_get_thousands_separators() {
        assert_eq!(format_dollars(0), "$0");
        assert_eq!(format_dollars(999), "$999");
        assert_eq!(format_dollars(7740), "$7,740");
        assert_eq!(format_dollars(92880), "$92,880");
        assert_eq!(format_dollars(1234567), "$1,234,567");
    }

    #[test]
    fn slug_and_landing_url() {
        assert_eq!(slug("Salt & Straw"), "salt-and-straw");
        assert_eq!(
            landing_url("https://outbound.com/", "Blue Bottle Coffee"),
            "https://outbound.com/blue-bottle-coffee-preview"
        );
    }

    #[test]
    fn copy_cites_mentions_and_first_quote() {
        let copy = derive_copy(&sample_intelligence());
        assert_eq!(
            copy.subject_line,
            "Dandelion Chocolate: Bean-to-bar watchers = $7,740/month revenue"
        );
        assert_eq!(
            copy.personalized_opening,
            "Your reviews mention curiosity about your process 3 times. Recent quote: \"want to see chocolate making\""
        );
        assert_eq!(
            copy.revenue_hook,
            "Based on 180 monthly local searches, you could earn $7,740/month"
        );
        assert_eq!(
            copy.social_proof,
            "Similar businesses in your area earn $7,740/month on average"
        );
    }

    #[test]
    fn copy_falls_back_without_mentions_or_searches() {
        let mut intelligence = sample_intelligence();
        intelligence.business_type = BusinessType::TeaShop;
        intelligence.reviews_analysis.curiosity_mentions = 0;
        intelligence.location_demand.monthly_searches = None;

        let copy = derive_copy(&intelligence);
        assert_eq!(
            copy.personalized_opening,
            "People are naturally curious about tea shop processes."
        );
        assert!(copy.revenue_hook.starts_with("Based on 50 monthly local searches"));
    }

    #[test]
    fn landing_page_json_is_byte_stable() {
        let intelligence = sample_intelligence();
        let first = serde_json::to_string_pretty(&landing_page(&intelligence)).unwrap();
        let second = serde_json::to_string_pretty(&landing_page(&intelligence)).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(
            "{\n  \"hero_title\": \"Dandelion Chocolate: Your process could earn $7,740/month\","
        ));
        assert!(first.contains("\"cta_text\": \"Join Dandelion Chocolate in earning $7,740/month\""));
    }
}
