use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self, ValidationErrors};

pub const STATUS_NEW: &str = "new";

/// Contact request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

/// Request DTO for the contact form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl CreateContactRequest {
    pub fn validate(&self) -> Result<NewContactRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = validation::text(
            &mut errors,
            "name",
            &self.name,
            2,
            100,
            "Le nom doit contenir au moins 2 caractères",
        );
        let email = validation::email(&mut errors, "email", &self.email);
        let phone = validation::text(
            &mut errors,
            "phone",
            &self.phone,
            8,
            20,
            "Numéro de téléphone invalide",
        );
        let subject = validation::text(
            &mut errors,
            "subject",
            &self.subject,
            3,
            200,
            "Le sujet doit contenir au moins 3 caractères",
        );
        let message = validation::text(
            &mut errors,
            "message",
            &self.message,
            10,
            2000,
            "Le message doit contenir au moins 10 caractères",
        );

        match (name, email, phone, subject, message) {
            (Some(name), Some(email), Some(phone), Some(subject), Some(message)) => {
                Ok(NewContactRequest {
                    name,
                    email,
                    phone,
                    subject,
                    message,
                })
            }
            _ => Err(errors),
        }
    }
}
