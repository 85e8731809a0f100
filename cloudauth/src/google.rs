//! Google OAuth2 jwt-bearer.

pub use cloudauth_google::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Result};

/// Create a jwt-bearer provider from the process environment.
///
/// The key file is read from `GOOGLE_APPLICATION_CREDENTIALS` and the
/// scopes from `GOOGLE_SCOPES`.
#[cfg(feature = "default-context")]
pub async fn default_provider() -> Result<GcpJwtBearerProvider> {
    GcpJwtBearerProvider::from_env(default_context(), Config::new()).await
}
