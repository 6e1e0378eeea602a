//! Construction projects
//!
//! `Project` is a client's own build followed from the client area;
//! `PortfolioProject` is a finished reference shown publicly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client project with construction, expert and escrow follow-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub project_type: String,
    pub surface_area: i32,
    pub location: String,
    pub quality_level: String,
    pub estimated_budget: Option<f64>,
    pub construction_status: Option<String>,
    /// Percent complete, 0..=100
    pub construction_progress: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub estimated_completion_date: Option<NaiveDate>,
    pub actual_completion_date: Option<NaiveDate>,
    pub expert_validation_status: Option<String>,
    pub expert_validation_date: Option<NaiveDate>,
    pub escrow_account_status: Option<String>,
    pub escrow_amount: Option<f64>,
    pub escrow_bank: Option<String>,
    pub keys_delivered_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Showcase entry from `portfolio_projects`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioProject {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub project_type: String,
    pub location: String,
    pub surface_area: Option<i32>,
    pub duration_months: Option<i32>,
    pub budget_range: Option<String>,
    pub completion_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `?project_type=Villa` on the public portfolio; absent or `Tous` lists everything
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioFilter {
    #[serde(default)]
    pub project_type: Option<String>,
}

impl PortfolioFilter {
    pub fn project_type(&self) -> Option<&str> {
        self.project_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != "Tous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portfolio_filter_ignores_blank_and_all() {
        let filter = |v: Option<&str>| PortfolioFilter {
            project_type: v.map(str::to_string),
        };

        assert_eq!(filter(None).project_type(), None);
        assert_eq!(filter(Some("  ")).project_type(), None);
        assert_eq!(filter(Some("Tous")).project_type(), None);
        assert_eq!(filter(Some(" Duplex ")).project_type(), Some("Duplex"));
    }
}
