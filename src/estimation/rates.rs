//! Construction rate table
//!
//! Per-m² unit costs (FCFA) and construction duration ranges (months) keyed by
//! project category and finish tier. The table is read-only process-wide data.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use FinishTier::{Economical, Premium, Standard};
use ProjectCategory::{ApartmentBuilding, Duplex, EconomicalHouse, LuxuryVilla, StandardVilla};

/// Unit cost applied when a (category, tier) pair has no entry.
pub const DEFAULT_UNIT_COST: i64 = 300_000;

/// Duration range applied when a (category, tier) pair has no entry.
pub const DEFAULT_DURATION: DurationRange = DurationRange::new(8, 12);

/// Locations offered by the simulator form.
pub const LOCATIONS: [&str; 5] = [
    "Abidjan - Centre",
    "Abidjan - Périphérie",
    "Yamoussoukro",
    "Bouaké",
    "Autres villes",
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Building archetype being estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[serde(rename = "Maison économique")]
    EconomicalHouse,
    #[serde(rename = "Villa standard")]
    StandardVilla,
    #[serde(rename = "Villa de luxe")]
    LuxuryVilla,
    #[serde(rename = "Duplex")]
    Duplex,
    #[serde(rename = "Immeuble")]
    ApartmentBuilding,
}

impl ProjectCategory {
    pub const ALL: [Self; 5] = [
        Self::EconomicalHouse,
        Self::StandardVilla,
        Self::LuxuryVilla,
        Self::Duplex,
        Self::ApartmentBuilding,
    ];

    /// Label shown to users and stored in `simulations.project_type`
    pub fn label(&self) -> &'static str {
        match self {
            Self::EconomicalHouse => "Maison économique",
            Self::StandardVilla => "Villa standard",
            Self::LuxuryVilla => "Villa de luxe",
            Self::Duplex => "Duplex",
            Self::ApartmentBuilding => "Immeuble",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::EconomicalHouse => "maison_economique",
            Self::StandardVilla => "villa_standard",
            Self::LuxuryVilla => "villa_de_luxe",
            Self::Duplex => "duplex",
            Self::ApartmentBuilding => "immeuble",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = fold_key(s);
        Self::ALL
            .into_iter()
            .find(|c| fold_key(c.label()) == key || fold_key(c.slug()) == key)
            .ok_or_else(|| UnknownVariant {
                kind: "project category",
                value: s.to_string(),
            })
    }
}

/// Finishing quality level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinishTier {
    #[serde(rename = "Économique")]
    Economical,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Premium")]
    Premium,
}

impl FinishTier {
    pub const ALL: [Self; 3] = [Self::Economical, Self::Standard, Self::Premium];

    /// Label shown to users and stored in `simulations.quality_level`
    pub fn label(&self) -> &'static str {
        match self {
            Self::Economical => "Économique",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Economical => "economique",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for FinishTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FinishTier {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = fold_key(s);
        Self::ALL
            .into_iter()
            .find(|t| fold_key(t.label()) == key || fold_key(t.slug()) == key)
            .ok_or_else(|| UnknownVariant {
                kind: "finish tier",
                value: s.to_string(),
            })
    }
}

/// Lowercase, strip French accents and collapse separators so that
/// "Maison économique", "maison_economique" and "MAISON  ECONOMIQUE" compare equal.
fn fold_key(s: &str) -> String {
    let folded: String = s
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            '_' | '-' => ' ',
            other => other,
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Construction duration in whole months, `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: u32,
    pub max: u32,
}

impl DurationRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// One tariff row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateEntry {
    pub category: ProjectCategory,
    pub tier: FinishTier,
    /// FCFA per m²
    pub unit_cost: i64,
    pub duration: DurationRange,
}

const fn rate(
    category: ProjectCategory,
    tier: FinishTier,
    unit_cost: i64,
    min_months: u32,
    max_months: u32,
) -> RateEntry {
    RateEntry {
        category,
        tier,
        unit_cost,
        duration: DurationRange::new(min_months, max_months),
    }
}

static STANDARD_RATES: [RateEntry; 15] = [
    rate(EconomicalHouse, Economical, 180_000, 4, 5),
    rate(EconomicalHouse, Standard, 220_000, 5, 6),
    rate(EconomicalHouse, Premium, 280_000, 6, 8),
    rate(StandardVilla, Economical, 250_000, 6, 8),
    rate(StandardVilla, Standard, 320_000, 8, 10),
    rate(StandardVilla, Premium, 450_000, 10, 12),
    rate(LuxuryVilla, Economical, 400_000, 10, 12),
    rate(LuxuryVilla, Standard, 550_000, 12, 16),
    rate(LuxuryVilla, Premium, 800_000, 14, 20),
    rate(Duplex, Economical, 280_000, 8, 10),
    rate(Duplex, Standard, 380_000, 10, 12),
    rate(Duplex, Premium, 520_000, 12, 14),
    rate(ApartmentBuilding, Economical, 200_000, 12, 18),
    rate(ApartmentBuilding, Standard, 280_000, 18, 24),
    rate(ApartmentBuilding, Premium, 400_000, 20, 30),
];

static STANDARD_TABLE: RateTable = RateTable {
    entries: Cow::Borrowed(&STANDARD_RATES),
};

/// Lookup table from (category, tier) to tariff.
///
/// Missing pairs never fail: they resolve to [`DEFAULT_UNIT_COST`] and
/// [`DEFAULT_DURATION`] and log a warning so operators can fill the gap.
#[derive(Debug, Clone)]
pub struct RateTable {
    entries: Cow<'static, [RateEntry]>,
}

impl RateTable {
    /// The tariff grid served to users
    pub fn standard() -> &'static RateTable {
        &STANDARD_TABLE
    }

    pub fn from_entries(entries: Vec<RateEntry>) -> Self {
        Self {
            entries: Cow::Owned(entries),
        }
    }

    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    pub fn entry(&self, category: ProjectCategory, tier: FinishTier) -> Option<&RateEntry> {
        self.entries
            .iter()
            .find(|e| e.category == category && e.tier == tier)
    }

    pub fn lookup_unit_cost(&self, category: ProjectCategory, tier: FinishTier) -> i64 {
        match self.entry(category, tier) {
            Some(entry) => entry.unit_cost,
            None => {
                report_gap(category, tier);
                DEFAULT_UNIT_COST
            }
        }
    }

    pub fn lookup_duration_range(
        &self,
        category: ProjectCategory,
        tier: FinishTier,
    ) -> DurationRange {
        match self.entry(category, tier) {
            Some(entry) => entry.duration,
            None => {
                report_gap(category, tier);
                DEFAULT_DURATION
            }
        }
    }
}

fn report_gap(category: ProjectCategory, tier: FinishTier) {
    tracing::warn!(
        category = %category,
        tier = %tier,
        "No rate entry for category/tier, using default tariff"
    );
}

/// Unit cost from the standard table
pub fn lookup_unit_cost(category: ProjectCategory, tier: FinishTier) -> i64 {
    RateTable::standard().lookup_unit_cost(category, tier)
}

/// Duration range from the standard table
pub fn lookup_duration_range(category: ProjectCategory, tier: FinishTier) -> DurationRange {
    RateTable::standard().lookup_duration_range(category, tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_offered_pair_has_a_positive_tariff() {
        for category in ProjectCategory::ALL {
            for tier in FinishTier::ALL {
                let entry = RateTable::standard()
                    .entry(category, tier)
                    .unwrap_or_else(|| panic!("missing {category} / {tier}"));
                assert!(entry.unit_cost > 0);
                assert!(entry.duration.min > 0);
                assert!(entry.duration.min <= entry.duration.max);
            }
        }
    }

    #[test]
    fn known_tariffs() {
        assert_eq!(lookup_unit_cost(StandardVilla, Standard), 320_000);
        assert_eq!(lookup_duration_range(StandardVilla, Standard), DurationRange::new(8, 10));
        assert_eq!(lookup_unit_cost(EconomicalHouse, Economical), 180_000);
        assert_eq!(lookup_duration_range(EconomicalHouse, Economical), DurationRange::new(4, 5));
        assert_eq!(lookup_unit_cost(LuxuryVilla, Premium), 800_000);
        assert_eq!(lookup_duration_range(ApartmentBuilding, Premium), DurationRange::new(20, 30));
    }

    #[test]
    fn missing_pair_falls_back_to_defaults() {
        let table = RateTable::from_entries(vec![rate(Duplex, Standard, 380_000, 10, 12)]);

        assert_eq!(table.lookup_unit_cost(Duplex, Standard), 380_000);
        assert_eq!(table.lookup_unit_cost(Duplex, Premium), DEFAULT_UNIT_COST);
        assert_eq!(table.lookup_duration_range(LuxuryVilla, Economical), DEFAULT_DURATION);
    }

    #[test]
    fn parses_labels_and_slugs() {
        assert_eq!("Villa standard".parse::<ProjectCategory>(), Ok(StandardVilla));
        assert_eq!("maison_economique".parse::<ProjectCategory>(), Ok(EconomicalHouse));
        assert_eq!("  VILLA DE LUXE ".parse::<ProjectCategory>(), Ok(LuxuryVilla));
        assert_eq!("Économique".parse::<FinishTier>(), Ok(Economical));
        assert_eq!("economique".parse::<FinishTier>(), Ok(Economical));
        assert_eq!("premium".parse::<FinishTier>(), Ok(Premium));
    }

    #[test]
    fn rejects_values_outside_the_enumeration() {
        let err = "Château".parse::<ProjectCategory>().unwrap_err();
        assert_eq!(err.kind, "project category");
        assert!("Luxe".parse::<FinishTier>().is_err());
        assert!("".parse::<FinishTier>().is_err());
    }

    #[test]
    fn labels_round_trip_through_serde() {
        let json = serde_json::to_string(&EconomicalHouse).unwrap();
        assert_eq!(json, "\"Maison économique\"");
        let tier: FinishTier = serde_json::from_str("\"Économique\"").unwrap();
        assert_eq!(tier, Economical);
    }
}
