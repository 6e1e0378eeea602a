use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Claims;

/// Application roles stored in `user_roles`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    Admin,
    User,
    Client,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Client => "client",
        }
    }
}

/// Authenticated caller, built from verified claims
///
/// Names come from the sign-up metadata and stand in for a missing `profiles` row.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Result<Self, &'static str> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token")?;

        let metadata = claims.user_metadata.clone().unwrap_or_default();

        Ok(Self {
            user_id,
            email: claims.email.clone(),
            first_name: metadata.first_name,
            last_name: metadata.last_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::UserMetadata;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            aud: "authenticated".into(),
            iss: None,
            exp: 0,
            iat: None,
            email: Some("client@example.ci".into()),
            role: Some("authenticated".into()),
            user_metadata: None,
        }
    }

    #[test]
    fn builds_context_from_uuid_subject() {
        let id = Uuid::new_v4();
        let ctx = AuthContext::from_claims(&claims(&id.to_string())).unwrap();
        assert_eq!(ctx.user_id, id);
        assert_eq!(ctx.email.as_deref(), Some("client@example.ci"));
    }

    #[test]
    fn names_come_from_signup_metadata() {
        let mut with_names = claims(&Uuid::new_v4().to_string());
        with_names.user_metadata = Some(UserMetadata {
            first_name: Some("Awa".into()),
            last_name: Some("Koné".into()),
        });

        let ctx = AuthContext::from_claims(&with_names).unwrap();
        assert_eq!(ctx.first_name.as_deref(), Some("Awa"));
        assert_eq!(ctx.last_name.as_deref(), Some("Koné"));
    }

    #[test]
    fn rejects_non_uuid_subject() {
        assert!(AuthContext::from_claims(&claims("service")).is_err());
    }
}
