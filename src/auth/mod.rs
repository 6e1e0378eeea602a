pub mod claims;
pub mod context;
pub mod jwks;
pub mod middleware;
pub mod verifier;

pub use claims::Claims;
pub use context::{AppRole, AuthContext};
pub use jwks::JwksCache;
pub use middleware::{MaybeAuth, RequireAdmin, RequireAuth};
pub use verifier::TokenVerifier;
