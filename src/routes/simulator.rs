//! Simulator routes
//!
//! Reference data for the simulator form and stateless estimates.
//! Nothing here touches storage.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::{EstimateRequest, EstimateResponse};
use crate::error::{ApiError, ApiResult};
use crate::estimation::rates::{RateEntry, DEFAULT_DURATION, DEFAULT_UNIT_COST, LOCATIONS};
use crate::estimation::{
    estimate, financing, DurationRange, FinishTier, ProjectCategory, RateTable, SimulatorVariant,
};

#[derive(Debug, Serialize)]
pub struct CatalogOption {
    pub value: &'static str,
    pub slug: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FallbackRate {
    pub unit_cost: i64,
    pub duration: DurationRange,
}

#[derive(Debug, Serialize)]
pub struct FinancingDefaults {
    pub annual_rate_percent: f64,
    pub duration_months: u32,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub variant: SimulatorVariant,
    pub categories: Vec<CatalogOption>,
    pub tiers: Vec<CatalogOption>,
    pub locations: &'static [&'static str],
    pub rates: &'static [RateEntry],
    pub fallback: FallbackRate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financing: Option<FinancingDefaults>,
}

/// GET /simulator/catalog
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> DataResponse<CatalogResponse> {
    let settings = &state.settings;

    DataResponse::new(CatalogResponse {
        variant: settings.simulator_variant,
        categories: ProjectCategory::ALL
            .iter()
            .map(|c| CatalogOption {
                value: c.label(),
                slug: c.slug(),
            })
            .collect(),
        tiers: FinishTier::ALL
            .iter()
            .map(|t| CatalogOption {
                value: t.label(),
                slug: t.slug(),
            })
            .collect(),
        locations: &LOCATIONS,
        rates: RateTable::standard().entries(),
        fallback: FallbackRate {
            unit_cost: DEFAULT_UNIT_COST,
            duration: DEFAULT_DURATION,
        },
        financing: settings
            .simulator_variant
            .offers_financing()
            .then(|| FinancingDefaults {
                annual_rate_percent: settings.default_interest_rate,
                duration_months: settings.default_loan_duration_months,
            }),
    })
}

/// POST /simulator/estimate
///
/// In the financing variant a loan quote is always attached, using the
/// configured defaults for any term the caller left out. Unreadable bodies
/// are a 400 here, like any other estimate input problem.
pub async fn compute_estimate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> ApiResult<DataResponse<EstimateResponse>> {
    let Json(req) = payload.map_err(ApiError::bad_request)?;
    let spec = req.to_specification().map_err(ApiError::bad_request)?;
    let result = estimate(&spec);

    let settings = &state.settings;
    let loan = if settings.simulator_variant.offers_financing() {
        let terms = req
            .loan
            .clone()
            .unwrap_or_default()
            .to_terms(
                settings.default_loan_duration_months,
                settings.default_interest_rate,
            )
            .map_err(ApiError::bad_request)?;
        Some(financing::quote(&terms, result.estimated_budget))
    } else {
        None
    };

    tracing::debug!(
        category = spec.category.slug(),
        tier = spec.tier.slug(),
        area = spec.area,
        budget = result.estimated_budget,
        "Estimate computed"
    );

    Ok(DataResponse::new(EstimateResponse::new(spec, result, loan)))
}
