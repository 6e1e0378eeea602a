//! Budget and duration estimation
//!
//! Pure arithmetic over the rate table. Area bounds are enforced by the
//! submission recorder, not here.

use serde::{Deserialize, Serialize};

use super::rates::{DurationRange, FinishTier, ProjectCategory, RateTable};

/// What the user wants to build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSpecification {
    pub category: ProjectCategory,
    /// Floor area in m²
    pub area: f64,
    pub location: String,
    pub tier: FinishTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EstimationResult {
    /// FCFA per m² used for the estimate
    pub unit_cost: i64,
    /// `round(area * unit_cost)`, FCFA
    pub estimated_budget: i64,
    pub construction_duration: DurationRange,
}

impl EstimationResult {
    /// Months recorded as `estimated_construction_months` (upper bound of the range)
    pub fn duration_months(&self) -> u32 {
        self.construction_duration.max
    }
}

/// Estimate against the standard tariff grid
pub fn estimate(spec: &ProjectSpecification) -> EstimationResult {
    estimate_with(RateTable::standard(), spec)
}

pub fn estimate_with(table: &RateTable, spec: &ProjectSpecification) -> EstimationResult {
    let unit_cost = table.lookup_unit_cost(spec.category, spec.tier);
    let construction_duration = table.lookup_duration_range(spec.category, spec.tier);

    EstimationResult {
        unit_cost,
        estimated_budget: (spec.area * unit_cost as f64).round() as i64,
        construction_duration,
    }
}
