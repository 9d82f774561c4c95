use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::category::BusinessType;
use crate::models::{
    Intelligence, LocationDemand, ReviewsAnalysis, RevenueProjection, WebsiteAnalysis,
};

pub const HIGH_DEMAND_PREMIUM: u32 = 10;
pub const HIGH_DEMAND_THRESHOLD: u32 = 80;
pub const WORKING_DAYS_PER_WEEK: u32 = 5;
pub const WEEKS_PER_MONTH: f64 = 4.3;
pub const OBSERVERS_PER_SESSION: u32 = 2;
pub const MAX_INTEREST_SCORE: u32 = 95;
pub const MAX_SAMPLE_QUOTES: usize = 3;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl BusinessType {
    /// Base price per observation hour before any demand premium.
    pub fn hourly_rate(self) -> u32 {
        match self {
            BusinessType::CoffeeRoaster => 40,
            BusinessType::Bakery => 45,
            BusinessType::ChocolateMaker => 50,
            BusinessType::Brewery => 45,
            BusinessType::Florist => 40,
            BusinessType::TeaShop => 40,
        }
    }

    /// Relative popularity of watching this kind of work.
    pub fn demand_multiplier(self) -> f64 {
        match self {
            BusinessType::CoffeeRoaster => 1.3,
            BusinessType::Bakery => 1.2,
            BusinessType::ChocolateMaker => 1.5,
            BusinessType::Brewery => 1.4,
            BusinessType::Florist => 0.9,
            BusinessType::TeaShop => 0.8,
        }
    }

    fn curiosity_quotes(self) -> &'static [&'static str] {
        match self {
            BusinessType::CoffeeRoaster => &[
                "wish I could watch the roasting",
                "love seeing the process",
                "fascinating to see how they roast",
            ],
            BusinessType::Bakery => &[
                "want to see how they make bread",
                "watched through window",
                "love the baking process",
            ],
            BusinessType::Florist => &[
                "amazing to watch arrangements",
                "beautiful process",
                "love seeing flowers arranged",
            ],
            BusinessType::Brewery => &[
                "wish we could see brewing",
                "fascinating process",
                "want behind scenes tour",
            ],
            BusinessType::TeaShop => &[
                "love watching tea ceremony",
                "beautiful preparation",
                "meditative process",
            ],
            BusinessType::ChocolateMaker => &[
                "want to see chocolate making",
                "fascinated by bean to bar",
                "love watching tempering",
            ],
        }
    }
}

/// Revenue projection. Reported monthly sessions are truncated, revenue is
/// computed from the untruncated value.
pub fn derive_revenue(
    business_type: BusinessType,
    location_interest_score: u32,
    has_open_kitchen: bool,
) -> RevenueProjection {
    let mut hourly_rate = business_type.hourly_rate();
    if location_interest_score > HIGH_DEMAND_THRESHOLD {
        hourly_rate += HIGH_DEMAND_PREMIUM;
    }

    let daily_sessions = if has_open_kitchen { 3 } else { 2 };
    let weekly_sessions = daily_sessions * WORKING_DAYS_PER_WEEK;
    let monthly_sessions = weekly_sessions as f64 * WEEKS_PER_MONTH;

    let monthly_revenue =
        (monthly_sessions * hourly_rate as f64 * OBSERVERS_PER_SESSION as f64) as u64;

    RevenueProjection {
        hourly_rate,
        daily_sessions,
        weekly_sessions,
        monthly_sessions: monthly_sessions as u32,
        monthly_revenue,
        annual_revenue: monthly_revenue * 12,
        observers_per_session: OBSERVERS_PER_SESSION,
    }
}

/// Market buckets recognised by substring match on the location string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationTier {
    SanFrancisco,
    NewYork,
    LosAngeles,
    Other,
}

impl LocationTier {
    pub fn of(location: &str) -> Self {
        let location = location.to_lowercase();
        let mentions = |needles: &[&str]| needles.iter().any(|n| location.contains(n));

        if mentions(&["san francisco", "sf"]) {
            LocationTier::SanFrancisco
        } else if mentions(&["new york", "brooklyn"]) {
            LocationTier::NewYork
        } else if mentions(&["los angeles"]) {
            LocationTier::LosAngeles
        } else {
            LocationTier::Other
        }
    }

    /// Inclusive range of simulated monthly searches before the type multiplier.
    pub fn search_range(self) -> (u32, u32) {
        match self {
            LocationTier::SanFrancisco => (80, 150),
            LocationTier::NewYork => (100, 180),
            LocationTier::LosAngeles => (60, 120),
            LocationTier::Other => (30, 80),
        }
    }
}

pub fn derive_location_demand<R: Rng + ?Sized>(
    location: &str,
    business_type: BusinessType,
    rng: &mut R,
) -> LocationDemand {
    let (low, high) = LocationTier::of(location).search_range();
    let base_demand = rng.gen_range(low..=high);
    let adjusted = (base_demand as f64 * business_type.demand_multiplier()) as u32;

    LocationDemand {
        monthly_searches: Some(adjusted),
        local_interest_score: adjusted.min(MAX_INTEREST_SCORE),
        competitor_gap: rng.gen_bool(0.5),
        demographic_match: rng.gen_range(75..=95),
    }
}

pub fn derive_reviews<R: Rng + ?Sized>(business_type: BusinessType, rng: &mut R) -> ReviewsAnalysis {
    let quotes = business_type.curiosity_quotes();

    ReviewsAnalysis {
        curiosity_mentions: quotes.len(),
        sample_quotes: quotes
            .iter()
            .take(MAX_SAMPLE_QUOTES)
            .map(|quote| quote.to_string())
            .collect(),
        total_reviews_analyzed: rng.gen_range(150..=400),
    }
}

/// Businesses we hold canned website facts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownBusiness {
    Dandelion,
    Tartine,
    BlueBottle,
}

impl KnownBusiness {
    pub fn identify(business_name: &str) -> Option<Self> {
        let name = business_name.to_lowercase();
        if name.contains("dandelion") {
            Some(KnownBusiness::Dandelion)
        } else if name.contains("tartine") {
            Some(KnownBusiness::Tartine)
        } else if name.contains("blue bottle") {
            Some(KnownBusiness::BlueBottle)
        } else {
            None
        }
    }

    fn website(self) -> WebsiteAnalysis {
        let (operating_hours, specialty_process, location_type, foot_traffic) = match self {
            KnownBusiness::Dandelion => (
                "Tue-Fri 2-4 PM roasting",
                "Bean-to-bar chocolate making",
                "Factory storefront",
                "High (Valencia Street)",
            ),
            KnownBusiness::Tartine => (
                "Early morning baking",
                "Artisan bread making",
                "Open kitchen bakery",
                "Very high",
            ),
            KnownBusiness::BlueBottle => (
                "Morning roasting",
                "Single-origin coffee roasting",
                "Roastery cafe",
                "High",
            ),
        };

        WebsiteAnalysis {
            has_open_kitchen: true,
            operating_hours: operating_hours.to_string(),
            specialty_process: specialty_process.to_string(),
            location_type: location_type.to_string(),
            foot_traffic: foot_traffic.to_string(),
        }
    }
}

pub fn derive_website(business_name: &str) -> WebsiteAnalysis {
    KnownBusiness::identify(business_name)
        .map(KnownBusiness::website)
        .unwrap_or_else(WebsiteAnalysis::unknown)
}

/// Assembles intelligence records from an injected random source.
pub struct IntelligenceGenerator<R = StdRng> {
    rng: R,
}

impl IntelligenceGenerator<StdRng> {
    /// Seeded generators are reproducible; `None` draws from OS entropy.
    pub fn with_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> IntelligenceGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate(
        &mut self,
        business_name: &str,
        business_type: BusinessType,
        location: &str,
    ) -> Intelligence {
        debug!(business = business_name, kind = %business_type, "generating intelligence");

        let reviews_analysis = derive_reviews(business_type, &mut self.rng);
        let website_analysis = derive_website(business_name);
        let location_demand = derive_location_demand(location, business_type, &mut self.rng);
        let revenue_projections = derive_revenue(
            business_type,
            location_demand.local_interest_score,
            website_analysis.has_open_kitchen,
        );

        Intelligence {
            business_name: business_name.to_string(),
            business_type,
            location: location.to_string(),
            reviews_analysis,
            website_analysis,
            location_demand,
            revenue_projections,
            generated_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
