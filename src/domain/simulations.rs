use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self, ValidationErrors};
use crate::estimation::financing::{
    LoanQuote, LoanTerms, MAX_ANNUAL_RATE_PERCENT, MAX_LOAN_MONTHS, MIN_LOAN_MONTHS,
};
use crate::estimation::{
    DurationRange, EstimationResult, FinishTier, ProjectCategory, ProjectSpecification,
    SimulatorVariant,
};

pub const MIN_SURFACE_AREA: i64 = 10;
pub const MAX_SURFACE_AREA: i64 = 10_000;
pub const MAX_AMOUNT: f64 = 100_000_000_000.0;
pub const MAX_CONSTRUCTION_MONTHS: i64 = 120;

/// Status given to freshly recorded simulations
pub const STATUS_PENDING: &str = "pending";

/// Persisted simulation row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub project_type: String,
    pub surface_area: i32,
    pub location: String,
    pub quality_level: String,
    pub estimated_budget: Option<f64>,
    pub estimated_construction_months: Option<i32>,
    pub loan_amount: Option<f64>,
    pub loan_duration_months: Option<i32>,
    pub monthly_payment: Option<f64>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated simulation ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewSimulation {
    pub project_type: ProjectCategory,
    pub surface_area: i32,
    pub location: String,
    pub quality_level: FinishTier,
    pub estimated_budget: Option<f64>,
    pub estimated_construction_months: Option<i32>,
    pub loan_amount: Option<f64>,
    pub loan_duration_months: Option<i32>,
    pub monthly_payment: Option<f64>,
    pub lead_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

/// Request DTO for recording a simulation ("be contacted")
///
/// Every field defaults so that missing values surface as field errors
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitSimulationRequest {
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub surface_area: Option<f64>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub quality_level: String,
    #[serde(default)]
    pub estimated_budget: Option<f64>,
    #[serde(default)]
    pub estimated_construction_months: Option<f64>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub loan_duration_months: Option<f64>,
    #[serde(default)]
    pub monthly_payment: Option<f64>,
    #[serde(default)]
    pub lead_id: Option<Uuid>,
}

impl SubmitSimulationRequest {
    pub fn validate(&self, variant: SimulatorVariant) -> Result<NewSimulation, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let project_type = validation::text(
            &mut errors,
            "project_type",
            &self.project_type,
            1,
            100,
            "Type de projet requis",
        )
        .and_then(|raw| match raw.parse::<ProjectCategory>() {
            Ok(category) => Some(category),
            Err(_) => {
                errors.push("project_type", "Type de projet inconnu");
                None
            }
        });

        let surface_area = match self.surface_area {
            Some(area) => validation::integer(
                &mut errors,
                "surface_area",
                area,
                MIN_SURFACE_AREA,
                MAX_SURFACE_AREA,
                "Surface minimum 10m²",
                "Surface maximum 10000m²",
            ),
            None => {
                errors.push("surface_area", "Surface requise");
                None
            }
        };

        let location = validation::text(
            &mut errors,
            "location",
            &self.location,
            1,
            200,
            "Localisation requise",
        );

        let quality_level = validation::text(
            &mut errors,
            "quality_level",
            &self.quality_level,
            1,
            100,
            "Niveau de qualité requis",
        )
        .and_then(|raw| match raw.parse::<FinishTier>() {
            Ok(tier) => Some(tier),
            Err(_) => {
                errors.push("quality_level", "Niveau de qualité inconnu");
                None
            }
        });

        let estimated_budget = self
            .estimated_budget
            .and_then(|v| validation::number(&mut errors, "estimated_budget", v, 0.0, MAX_AMOUNT));

        let estimated_construction_months = self.estimated_construction_months.and_then(|v| {
            validation::integer(
                &mut errors,
                "estimated_construction_months",
                v,
                1,
                MAX_CONSTRUCTION_MONTHS,
                "Durée minimum 1 mois",
                "Durée maximum 120 mois",
            )
        });

        let loan_fields = [
            ("loan_amount", self.loan_amount.is_some()),
            ("loan_duration_months", self.loan_duration_months.is_some()),
            ("monthly_payment", self.monthly_payment.is_some()),
        ];
        if !variant.offers_financing() {
            for (field, present) in loan_fields {
                if present {
                    errors.push(field, "Financement non disponible");
                }
            }
        }

        let loan_amount = self
            .loan_amount
            .filter(|_| variant.offers_financing())
            .and_then(|v| validation::number(&mut errors, "loan_amount", v, 0.0, MAX_AMOUNT));

        let loan_duration_months = self
            .loan_duration_months
            .filter(|_| variant.offers_financing())
            .and_then(|v| {
                validation::integer(
                    &mut errors,
                    "loan_duration_months",
                    v,
                    MIN_LOAN_MONTHS as i64,
                    MAX_LOAN_MONTHS as i64,
                    "Durée du prêt minimum 1 mois",
                    "Durée du prêt maximum 600 mois",
                )
            });

        let monthly_payment = self
            .monthly_payment
            .filter(|_| variant.offers_financing())
            .and_then(|v| validation::number(&mut errors, "monthly_payment", v, 0.0, MAX_AMOUNT));

        match (project_type, surface_area, location, quality_level) {
            (Some(project_type), Some(surface_area), Some(location), Some(quality_level))
                if errors.is_empty() =>
            {
                Ok(NewSimulation {
                    project_type,
                    surface_area: surface_area as i32,
                    location,
                    quality_level,
                    estimated_budget,
                    estimated_construction_months: estimated_construction_months.map(|m| m as i32),
                    loan_amount,
                    loan_duration_months: loan_duration_months.map(|m| m as i32),
                    monthly_payment,
                    lead_id: self.lead_id,
                    client_id: None,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Loan parameters supplied with an estimate; missing values use configured defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanRequest {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub duration_months: Option<f64>,
    #[serde(default)]
    pub annual_rate_percent: Option<f64>,
}

impl LoanRequest {
    pub fn to_terms(
        &self,
        default_months: u32,
        default_rate_percent: f64,
    ) -> Result<LoanTerms, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let amount = self
            .amount
            .and_then(|v| validation::number(&mut errors, "loan.amount", v, 0.0, MAX_AMOUNT));

        let duration_months = validation::integer(
            &mut errors,
            "loan.duration_months",
            self.duration_months.unwrap_or(default_months as f64),
            MIN_LOAN_MONTHS as i64,
            MAX_LOAN_MONTHS as i64,
            "Durée du prêt minimum 1 mois",
            "Durée du prêt maximum 600 mois",
        );

        let annual_rate_percent = validation::number(
            &mut errors,
            "loan.annual_rate_percent",
            self.annual_rate_percent.unwrap_or(default_rate_percent),
            0.0,
            MAX_ANNUAL_RATE_PERCENT,
        );

        match (duration_months, annual_rate_percent) {
            (Some(months), Some(rate)) if errors.is_empty() => Ok(LoanTerms {
                amount,
                duration_months: months as u32,
                annual_rate_percent: rate,
            }),
            _ => Err(errors),
        }
    }
}

/// Request DTO for computing an estimate (nothing is persisted)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub surface_area: Option<f64>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub quality_level: String,
    #[serde(default)]
    pub loan: Option<LoanRequest>,
}

impl EstimateRequest {
    /// Enumeration membership and a usable area; range bounds are left to submission.
    pub fn to_specification(&self) -> Result<ProjectSpecification, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let category = match self.project_type.parse::<ProjectCategory>() {
            Ok(c) => Some(c),
            Err(_) if self.project_type.trim().is_empty() => {
                errors.push("project_type", "Type de projet requis");
                None
            }
            Err(_) => {
                errors.push("project_type", "Type de projet inconnu");
                None
            }
        };

        let tier = match self.quality_level.parse::<FinishTier>() {
            Ok(t) => Some(t),
            Err(_) if self.quality_level.trim().is_empty() => {
                errors.push("quality_level", "Niveau de qualité requis");
                None
            }
            Err(_) => {
                errors.push("quality_level", "Niveau de qualité inconnu");
                None
            }
        };

        let area = match self.surface_area {
            Some(a) if a.is_finite() && a > 0.0 => Some(a),
            Some(_) => {
                errors.push("surface_area", "Surface invalide");
                None
            }
            None => {
                errors.push("surface_area", "Surface requise");
                None
            }
        };

        match (category, tier, area) {
            (Some(category), Some(tier), Some(area)) => Ok(ProjectSpecification {
                category,
                area,
                location: self.location.trim().to_string(),
                tier,
            }),
            _ => Err(errors),
        }
    }
}

/// Response DTO for an estimate
#[derive(Debug, Clone, Serialize)]
pub struct EstimateResponse {
    pub project_type: ProjectCategory,
    pub quality_level: FinishTier,
    pub surface_area: f64,
    pub location: String,
    pub unit_cost: i64,
    pub estimated_budget: i64,
    pub construction_duration: DurationRange,
    pub estimated_construction_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan: Option<LoanQuote>,
}

impl EstimateResponse {
    pub fn new(spec: ProjectSpecification, result: EstimationResult, loan: Option<LoanQuote>) -> Self {
        Self {
            project_type: spec.category,
            quality_level: spec.tier,
            surface_area: spec.area,
            location: spec.location,
            unit_cost: result.unit_cost,
            estimated_budget: result.estimated_budget,
            construction_duration: result.construction_duration,
            estimated_construction_months: result.duration_months(),
            loan,
        }
    }
}

/// Response DTO for a recorded simulation
#[derive(Debug, Clone, Serialize)]
pub struct SimulationCreated {
    pub id: Uuid,
    pub status: &'static str,
    pub message: &'static str,
}

impl SimulationCreated {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            status: STATUS_PENDING,
            message: "Notre équipe vous contactera bientôt pour discuter de votre projet.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SubmitSimulationRequest {
        SubmitSimulationRequest {
            project_type: "Villa standard".into(),
            surface_area: Some(150.0),
            location: "Abidjan - Centre".into(),
            quality_level: "Standard".into(),
            estimated_budget: Some(48_000_000.0),
            estimated_construction_months: Some(10.0),
            loan_amount: Some(48_000_000.0),
            loan_duration_months: Some(180.0),
            monthly_payment: Some(444_972.0),
            lead_id: None,
        }
    }

    #[test]
    fn accepts_a_complete_submission() {
        let sim = valid_request()
            .validate(SimulatorVariant::WithFinancing)
            .unwrap();

        assert_eq!(sim.project_type, ProjectCategory::StandardVilla);
        assert_eq!(sim.quality_level, FinishTier::Standard);
        assert_eq!(sim.surface_area, 150);
        assert_eq!(sim.estimated_construction_months, Some(10));
        assert_eq!(sim.loan_duration_months, Some(180));
    }

    #[test]
    fn area_bounds() {
        let variant = SimulatorVariant::WithFinancing;

        let below = SubmitSimulationRequest {
            surface_area: Some(5.0),
            ..valid_request()
        };
        let errors = below.validate(variant).unwrap_err();
        assert!(errors.has_field("surface_area"));
        assert_eq!(errors.to_string(), "Surface minimum 10m²");

        let upper = SubmitSimulationRequest {
            surface_area: Some(10_000.0),
            ..valid_request()
        };
        assert!(upper.validate(variant).is_ok());

        let above = SubmitSimulationRequest {
            surface_area: Some(10_001.0),
            ..valid_request()
        };
        assert_eq!(
            above.validate(variant).unwrap_err().to_string(),
            "Surface maximum 10000m²"
        );

        let fractional = SubmitSimulationRequest {
            surface_area: Some(150.5),
            ..valid_request()
        };
        assert!(fractional.validate(variant).unwrap_err().has_field("surface_area"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let req = SubmitSimulationRequest {
            project_type: "Château".into(),
            ..valid_request()
        };
        let errors = req.validate(SimulatorVariant::WithFinancing).unwrap_err();
        assert!(errors.has_field("project_type"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn reports_one_message_per_invalid_field() {
        let req = SubmitSimulationRequest {
            project_type: String::new(),
            surface_area: None,
            location: "   ".into(),
            quality_level: "Luxe".into(),
            estimated_budget: Some(-1.0),
            estimated_construction_months: Some(121.0),
            ..Default::default()
        };
        let errors = req.validate(SimulatorVariant::WithFinancing).unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "project_type",
                "surface_area",
                "location",
                "quality_level",
                "estimated_budget",
                "estimated_construction_months",
            ]
        );
    }

    #[test]
    fn loan_field_bounds() {
        let req = SubmitSimulationRequest {
            loan_amount: Some(MAX_AMOUNT + 1.0),
            loan_duration_months: Some(601.0),
            monthly_payment: Some(-5.0),
            ..valid_request()
        };
        let errors = req.validate(SimulatorVariant::WithFinancing).unwrap_err();
        assert!(errors.has_field("loan_amount"));
        assert!(errors.has_field("loan_duration_months"));
        assert!(errors.has_field("monthly_payment"));
    }

    #[test]
    fn basic_variant_refuses_loan_fields() {
        let errors = valid_request()
            .validate(SimulatorVariant::Basic)
            .unwrap_err();
        assert_eq!(errors.len(), 3);

        let without_loan = SubmitSimulationRequest {
            loan_amount: None,
            loan_duration_months: None,
            monthly_payment: None,
            ..valid_request()
        };
        assert!(without_loan.validate(SimulatorVariant::Basic).is_ok());
    }

    #[test]
    fn estimate_request_is_permissive_on_area_range() {
        let req = EstimateRequest {
            project_type: "duplex".into(),
            surface_area: Some(5.0),
            quality_level: "premium".into(),
            ..Default::default()
        };
        let spec = req.to_specification().unwrap();
        assert_eq!(spec.category, ProjectCategory::Duplex);
        assert_eq!(spec.area, 5.0);

        let bad = EstimateRequest {
            project_type: "Tour".into(),
            surface_area: Some(-3.0),
            quality_level: String::new(),
            ..Default::default()
        };
        let errors = bad.to_specification().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn loan_request_defaults() {
        let terms = LoanRequest::default().to_terms(180, 7.5).unwrap();
        assert_eq!(terms.amount, None);
        assert_eq!(terms.duration_months, 180);
        assert_eq!(terms.annual_rate_percent, 7.5);

        let bad = LoanRequest {
            duration_months: Some(0.0),
            ..Default::default()
        };
        assert!(bad.to_terms(180, 7.5).unwrap_err().has_field("loan.duration_months"));
    }
}
