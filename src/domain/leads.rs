use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self, ValidationErrors};

pub const DEFAULT_COUNTRY: &str = "Côte d'Ivoire";
pub const SOURCE_ASSISTANT: &str = "virtual_assistant";
pub const SOURCE_WEBSITE: &str = "website";

/// Cities a lead may be located in
pub const REGIONS: [&str; 11] = [
    "Abidjan",
    "Yamoussoukro",
    "Bouaké",
    "San-Pédro",
    "Daloa",
    "Korhogo",
    "Man",
    "Gagnoa",
    "Abengourou",
    "Divo",
    "Autre ville",
];

/// Lead entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub region: String,
    pub country: String,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub region: String,
    pub country: String,
    pub source: Option<String>,
}

/// Request DTO for capturing a lead
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLeadRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub source: Option<String>,
}

pub(crate) fn check_first_name(errors: &mut ValidationErrors, value: &str) -> Option<String> {
    validation::text(errors, "first_name", value, 1, 100, "Prénom requis")
}

pub(crate) fn check_last_name(errors: &mut ValidationErrors, value: &str) -> Option<String> {
    validation::text(errors, "last_name", value, 1, 100, "Nom requis")
}

pub(crate) fn check_phone(errors: &mut ValidationErrors, value: &str) -> Option<String> {
    validation::text(errors, "phone", value, 8, 20, "Numéro de téléphone invalide")
}

/// One of [`REGIONS`], matched exactly after trimming
pub(crate) fn check_region(errors: &mut ValidationErrors, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push("region", "Région requise");
        return None;
    }

    match REGIONS.iter().find(|r| **r == trimmed) {
        Some(region) => Some(region.to_string()),
        None => {
            errors.push("region", "Veuillez choisir une région");
            None
        }
    }
}

impl CreateLeadRequest {
    pub fn validate(&self) -> Result<NewLead, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let first_name = check_first_name(&mut errors, &self.first_name);
        let last_name = check_last_name(&mut errors, &self.last_name);
        let email = validation::email(&mut errors, "email", &self.email);
        let phone = check_phone(&mut errors, &self.phone);
        let region = check_region(&mut errors, &self.region);
        let source = self
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.chars().take(50).collect::<String>())
            .unwrap_or_else(|| SOURCE_WEBSITE.to_string());

        match (first_name, last_name, email, phone, region) {
            (Some(first_name), Some(last_name), Some(email), Some(phone), Some(region)) => {
                Ok(NewLead {
                    first_name,
                    last_name,
                    email,
                    phone,
                    region,
                    country: DEFAULT_COUNTRY.to_string(),
                    source: Some(source),
                })
            }
            _ => Err(errors),
        }
    }
}
