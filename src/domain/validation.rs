//! Field-level validation
//!
//! Every failing field contributes one message; callers show them verbatim.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Ordered collection of field errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(err: FieldError) -> Self {
        Self(vec![err])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Required text with a character budget. Returns the trimmed value when valid.
pub fn text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min_chars: usize,
    max_chars: usize,
    too_short: &str,
) -> Option<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();

    if len < min_chars.max(1) {
        errors.push(field, too_short);
        None
    } else if len > max_chars {
        errors.push(field, format!("{max_chars} caractères maximum"));
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Whole number within `[min, max]`
pub fn integer(
    errors: &mut ValidationErrors,
    field: &str,
    value: f64,
    min: i64,
    max: i64,
    below: &str,
    above: &str,
) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        errors.push(field, "Nombre entier attendu");
        None
    } else if value < min as f64 {
        errors.push(field, below);
        None
    } else if value > max as f64 {
        errors.push(field, above);
        None
    } else {
        Some(value as i64)
    }
}

/// Finite number within `[min, max]`
pub fn number(errors: &mut ValidationErrors, field: &str, value: f64, min: f64, max: f64) -> Option<f64> {
    if !value.is_finite() {
        errors.push(field, "Nombre invalide");
        None
    } else if value < min {
        errors.push(field, format!("Doit être supérieur ou égal à {min}"));
        None
    } else if value > max {
        errors.push(field, format!("Doit être inférieur ou égal à {max}"));
        None
    } else {
        Some(value)
    }
}

/// Loose shape check: `local@domain.tld`, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

/// Email address of at most 255 characters
pub fn email(errors: &mut ValidationErrors, field: &str, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if !is_valid_email(trimmed) {
        errors.push(field, "Email invalide");
        None
    } else if trimmed.chars().count() > 255 {
        errors.push(field, "255 caractères maximum");
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
