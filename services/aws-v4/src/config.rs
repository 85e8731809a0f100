use cloudauth_core::{Context, Error, Result};

use crate::constants::*;
use crate::Credential;

/// Config carries the settings used to build an [`AwsSigV4Provider`](crate::AwsSigV4Provider).
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SESSION_TOKEN`]
    pub session_token: Option<String>,
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`], then [`AWS_DEFAULT_REGION`]
    /// - `us-east-1` otherwise
    pub region: Option<String>,
    /// `service` defaults to `s3`.
    pub service: Option<String>,
}

impl Config {
    /// Create a new config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the access key id.
    pub fn with_access_key_id(mut self, v: impl Into<String>) -> Self {
        self.access_key_id = Some(v.into());
        self
    }

    /// Set the secret access key.
    pub fn with_secret_access_key(mut self, v: impl Into<String>) -> Self {
        self.secret_access_key = Some(v.into());
        self
    }

    /// Set the session token.
    pub fn with_session_token(mut self, v: impl Into<String>) -> Self {
        self.session_token = Some(v.into());
        self
    }

    /// Set the region.
    pub fn with_region(mut self, v: impl Into<String>) -> Self {
        self.region = Some(v.into());
        self
    }

    /// Set the service.
    pub fn with_service(mut self, v: impl Into<String>) -> Self {
        self.service = Some(v.into());
        self
    }

    /// Fill the unset fields from environment variables.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();
        let get = |k: &str| envs.get(k).filter(|v| !v.is_empty()).cloned();

        if self.access_key_id.is_none() {
            self.access_key_id = get(AWS_ACCESS_KEY_ID);
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = get(AWS_SECRET_ACCESS_KEY);
        }
        if self.session_token.is_none() {
            self.session_token = get(AWS_SESSION_TOKEN);
        }
        if self.region.is_none() {
            self.region = get(AWS_REGION).or_else(|| get(AWS_DEFAULT_REGION));
        }
        self
    }

    /// Turn the config into a credential, failing if keys are missing.
    pub fn into_credential(self) -> Result<Credential> {
        let access_key_id = self
            .access_key_id
            .ok_or_else(|| Error::config_invalid("access_key_id is required"))?;
        let secret_access_key = self
            .secret_access_key
            .ok_or_else(|| Error::config_invalid("secret_access_key is required"))?;

        let cred = Credential {
            access_key_id,
            secret_access_key,
            session_token: self.session_token,
            region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            service: self.service.unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
        };
        cred.validate()?;
        Ok(cred)
    }
}
