//! Session/identity gate
//!
//! Login is delegated to an external OIDC provider; the gateway holds only
//! process-local sessions keyed by opaque bearer tokens.

pub mod oidc;
pub mod session;

pub use oidc::{decode_identity, IdentityClaims, OidcClient, OidcConfig, TokenSet};
pub use session::{extract_bearer_token, Session, SessionStore};
