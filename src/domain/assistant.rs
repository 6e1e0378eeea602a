//! Virtual assistant lead wizard
//!
//! A linear state machine: each accepted answer moves to the next step, a
//! rejected answer keeps the current step. Reaching `Complete` yields a lead.

use serde::{Deserialize, Serialize};

use super::leads::{self, CreateLeadRequest, NewLead, REGIONS, SOURCE_ASSISTANT};
use super::validation::{self, FieldError, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantStep {
    Welcome,
    FirstName,
    LastName,
    Email,
    Phone,
    Region,
    Complete,
}

const TRANSITIONS: [(AssistantStep, AssistantStep); 6] = [
    (AssistantStep::Welcome, AssistantStep::FirstName),
    (AssistantStep::FirstName, AssistantStep::LastName),
    (AssistantStep::LastName, AssistantStep::Email),
    (AssistantStep::Email, AssistantStep::Phone),
    (AssistantStep::Phone, AssistantStep::Region),
    (AssistantStep::Region, AssistantStep::Complete),
];

impl AssistantStep {
    /// Next step, `None` once complete
    pub fn next(self) -> Option<Self> {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
    }
}

/// Answers collected so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadDraft {
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
}

impl LeadDraft {
    /// Validate the whole draft as an assistant-sourced lead
    pub fn into_lead(self) -> Result<NewLead, ValidationErrors> {
        CreateLeadRequest {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            region: self.region,
            source: Some(SOURCE_ASSISTANT.to_string()),
        }
        .validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [&'static str]>,
}

impl Prompt {
    fn text(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            placeholder: None,
            options: None,
        }
    }

    fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

/// Canned text shown for a step
pub fn prompt(step: AssistantStep, draft: &LeadDraft) -> Prompt {
    match step {
        AssistantStep::Welcome => Prompt::text(
            "Bienvenue chez PBH.M.S ! 👋",
            "Je suis votre assistant virtuel. Je suis là pour vous aider à démarrer votre projet \
             de construction. Puis-je vous poser quelques questions rapides ?",
        ),
        AssistantStep::FirstName => {
            Prompt::text("Ravi de vous rencontrer !", "Quel est votre prénom ?")
                .with_placeholder("Votre prénom")
        }
        AssistantStep::LastName => Prompt::text(
            format!("Enchanté {} !", draft.first_name),
            "Et votre nom de famille ?",
        )
        .with_placeholder("Votre nom"),
        AssistantStep::Email => Prompt::text("Parfait !", "Quelle est votre adresse email ?")
            .with_placeholder("votre@email.com"),
        AssistantStep::Phone => Prompt::text(
            "Super !",
            "Votre numéro de téléphone (WhatsApp de préférence) ?",
        )
        .with_placeholder("+225 XX XX XX XX XX"),
        AssistantStep::Region => Prompt {
            options: Some(&REGIONS),
            ..Prompt::text(
                "Dernière question !",
                "Dans quelle région/ville souhaitez-vous construire ?",
            )
        },
        AssistantStep::Complete => Prompt::text(
            "Merci beaucoup ! ✨",
            format!(
                "{}, vos informations ont été enregistrées. Notre équipe vous contactera très \
                 bientôt pour discuter de votre projet.",
                draft.first_name
            ),
        ),
    }
}

/// Apply the answer for `step` to `draft` and return the step to show next.
///
/// `Welcome` ignores the input; `Complete` is terminal and returns itself.
pub fn advance(
    step: AssistantStep,
    draft: &mut LeadDraft,
    input: Option<&str>,
) -> Result<AssistantStep, FieldError> {
    let answer = input.unwrap_or_default();
    let mut errors = ValidationErrors::new();

    match step {
        AssistantStep::Welcome | AssistantStep::Complete => {}
        AssistantStep::FirstName => {
            if let Some(v) = leads::check_first_name(&mut errors, answer) {
                draft.first_name = v;
            }
        }
        AssistantStep::LastName => {
            if let Some(v) = leads::check_last_name(&mut errors, answer) {
                draft.last_name = v;
            }
        }
        AssistantStep::Email => {
            if let Some(v) = validation::email(&mut errors, "email", answer) {
                draft.email = v;
            }
        }
        AssistantStep::Phone => {
            if let Some(v) = leads::check_phone(&mut errors, answer) {
                draft.phone = v;
            }
        }
        AssistantStep::Region => {
            if let Some(v) = leads::check_region(&mut errors, answer) {
                draft.region = v;
            }
        }
    }

    match errors.into_vec().into_iter().next() {
        Some(err) => Err(err),
        None => Ok(step.next().unwrap_or(step)),
    }
}
