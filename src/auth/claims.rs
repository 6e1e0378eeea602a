use serde::{Deserialize, Serialize};

/// JWT claims issued by Supabase Auth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    pub aud: String,

    #[serde(default)]
    pub iss: Option<String>,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    #[serde(default)]
    pub iat: Option<i64>,

    #[serde(default)]
    pub email: Option<String>,

    /// Postgres role the token maps to (`authenticated`, `anon`, ...)
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserMetadata {
    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}
