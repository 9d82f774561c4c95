use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{OutreachError, Result};

/// The kinds of craft business the campaign targets. Drives template choice,
/// pricing and demand simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    CoffeeRoaster,
    Bakery,
    Florist,
    Brewery,
    TeaShop,
    ChocolateMaker,
}

impl BusinessType {
    pub const ALL: [BusinessType; 6] = [
        BusinessType::CoffeeRoaster,
        BusinessType::Bakery,
        BusinessType::Florist,
        BusinessType::Brewery,
        BusinessType::TeaShop,
        BusinessType::ChocolateMaker,
    ];

    pub fn key(self) -> &'static str {
        match self {
            BusinessType::CoffeeRoaster => "coffee_roaster",
            BusinessType::Bakery => "bakery",
            BusinessType::Florist => "florist",
            BusinessType::Brewery => "brewery",
            BusinessType::TeaShop => "tea_shop",
            BusinessType::ChocolateMaker => "chocolate_maker",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Human-readable form of the key, e.g. "chocolate maker".
    pub fn label(self) -> String {
        self.key().replace('_', " ")
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Category names used by the prospect lists.
const EXACT_CATEGORIES: [(&str, BusinessType); 6] = [
    ("coffee_roasters", BusinessType::CoffeeRoaster),
    ("boutique_bakeries", BusinessType::Bakery),
    ("flower_studios", BusinessType::Florist),
    ("craft_breweries", BusinessType::Brewery),
    ("specialty_tea", BusinessType::TeaShop),
    ("chocolate_makers", BusinessType::ChocolateMaker),
];

/// Fallback keywords, checked in order after the exact table misses.
const CATEGORY_KEYWORDS: [(&str, BusinessType); 8] = [
    ("coffee", BusinessType::CoffeeRoaster),
    ("bakery", BusinessType::Bakery),
    ("baking", BusinessType::Bakery),
    ("flower", BusinessType::Florist),
    ("florist", BusinessType::Florist),
    ("brew", BusinessType::Brewery),
    ("tea", BusinessType::TeaShop),
    ("chocolate", BusinessType::ChocolateMaker),
];

/// How a category string was resolved to a business type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Exact(BusinessType),
    Keyword(BusinessType),
}

impl Classification {
    pub fn business_type(self) -> BusinessType {
        match self {
            Classification::Exact(kind) | Classification::Keyword(kind) => kind,
        }
    }
}

pub fn classify(category: &str) -> Result<Classification> {
    let normalized = category.trim().to_lowercase();

    if let Some(kind) = BusinessType::from_key(&normalized) {
        return Ok(Classification::Exact(kind));
    }

    if let Some((_, kind)) = EXACT_CATEGORIES
        .iter()
        .find(|(name, _)| *name == normalized)
    {
        return Ok(Classification::Exact(*kind));
    }

    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword))
        .map(|(_, kind)| Classification::Keyword(*kind))
        .ok_or_else(|| OutreachError::UnrecognizedCategory(category.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_categories_resolve() {
        assert_eq!(
            classify("boutique_bakeries").unwrap(),
            Classification::Exact(BusinessType::Bakery)
        );
        assert_eq!(
            classify("specialty_tea").unwrap(),
            Classification::Exact(BusinessType::TeaShop)
        );
        assert_eq!(
            classify("chocolate_maker").unwrap(),
            Classification::Exact(BusinessType::ChocolateMaker)
        );
    }

    #[test]
    fn keywords_are_the_fallback() {
        assert_eq!(
            classify("Coffee Shops").unwrap(),
            Classification::Keyword(BusinessType::CoffeeRoaster)
        );
        assert_eq!(
            classify("home_baking").unwrap(),
            Classification::Keyword(BusinessType::Bakery)
        );
        assert_eq!(
            classify("microbrewers").unwrap(),
            Classification::Keyword(BusinessType::Brewery)
        );
    }

    #[test]
    fn unmatched_category_is_an_error() {
        let err = classify("pottery_studios").unwrap_err();
        assert!(matches!(err, OutreachError::UnrecognizedCategory(name) if name == "pottery_studios"));
    }

    #[test]
    fn keys_round_trip_through_from_key() {
        for kind in BusinessType::ALL {
            assert_eq!(BusinessType::from_key(kind.key()), Some(kind));
        }
        assert_eq!(BusinessType::ChocolateMaker.label(), "chocolate maker");
    }
}
