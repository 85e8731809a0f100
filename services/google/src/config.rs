use cloudauth_core::Context;

use crate::constants::{GOOGLE_APPLICATION_CREDENTIALS, GOOGLE_SCOPES};
use crate::ServiceAccountKey;

/// Config carries all the configuration for the Google jwt-bearer flow.
///
/// Exactly one of `service_account_key` and `service_account_file` must be
/// set by the time the provider is built.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Service account key already loaded in memory.
    pub service_account_key: Option<ServiceAccountKey>,
    /// `service_account_file` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`GOOGLE_APPLICATION_CREDENTIALS`], only when no key is set
    pub service_account_file: Option<String>,
    /// `scopes` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`GOOGLE_SCOPES`], comma or space separated
    /// - `https://www.googleapis.com/auth/cloud-platform` otherwise
    pub scopes: Option<Vec<String>>,
}

impl Config {
    /// Create a new config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service account key.
    pub fn with_service_account_key(mut self, key: ServiceAccountKey) -> Self {
        self.service_account_key = Some(key);
        self
    }

    /// Set the path of a service account key file.
    pub fn with_service_account_file(mut self, path: impl Into<String>) -> Self {
        self.service_account_file = Some(path.into());
        self
    }

    /// Set the OAuth2 scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Fill the unset fields from environment variables.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if self.service_account_key.is_none() && self.service_account_file.is_none() {
            self.service_account_file = envs
                .get(GOOGLE_APPLICATION_CREDENTIALS)
                .filter(|v| !v.is_empty())
                .cloned();
        }
        if self.scopes.is_none() {
            self.scopes = envs
                .get(GOOGLE_SCOPES)
                .map(|v| parse_scopes(v))
                .filter(|v| !v.is_empty());
        }
        self
    }
}

fn parse_scopes(v: &str) -> Vec<String> {
    v.split([',', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
