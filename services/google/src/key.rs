use std::fmt::{self, Debug};

use cloudauth_core::utils::Redact;
use cloudauth_core::{Error, Result};

/// ServiceAccountKey is the JSON key file downloaded for a service account.
///
/// Only the fields needed for the jwt-bearer grant are kept; everything
/// else in the file is ignored.
#[derive(Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceAccountKey {
    /// The client email of the service account, used as `iss`.
    pub client_email: String,
    /// PEM encoded RSA private key.
    pub private_key: String,
    /// Id of the private key, emitted as the JWT `kid`.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// Token endpoint recorded in the key file.
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &Redact::from(&self.private_key_id))
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Create a key from its parts.
    pub fn new(client_email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.into(),
            private_key_id: None,
            token_uri: None,
        }
    }

    /// Set the private key id.
    pub fn with_private_key_id(mut self, id: impl Into<String>) -> Self {
        self.private_key_id = Some(id.into());
        self
    }

    /// Parse a key from the content of a key file.
    pub fn from_slice(bs: &[u8]) -> Result<Self> {
        let key: Self = serde_json::from_slice(bs).map_err(|e| {
            Error::config_invalid("service account key is not valid json").with_source(e)
        })?;
        key.validate()?;
        Ok(key)
    }

    /// Check that the fields used for signing are present.
    pub fn validate(&self) -> Result<()> {
        if self.client_email.trim().is_empty() {
            return Err(Error::config_invalid(
                "service account key has an empty client_email",
            ));
        }
        if self.private_key.trim().is_empty() {
            return Err(Error::config_invalid(
                "service account key has an empty private_key",
            ));
        }
        Ok(())
    }
}
