//! Azure AD client-credentials.

pub use cloudauth_azure::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Result};

/// Create a client-credentials provider from the process environment.
///
/// Reads `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET` and the
/// optional `AZURE_RESOURCE` and `AZURE_AUTHORITY_HOST`.
#[cfg(feature = "default-context")]
pub fn default_provider() -> Result<AzureClientCredentialsProvider> {
    AzureClientCredentialsProvider::from_env(default_context(), Config::new())
}
