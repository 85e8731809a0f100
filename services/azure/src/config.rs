use std::fmt::{Debug, Formatter};

use cloudauth_core::utils::Redact;
use cloudauth_core::{Context, Error, Result};

use crate::constants::*;

/// Config carries the client-credentials settings for Azure AD.
#[derive(Clone, Default)]
pub struct Config {
    /// `tenant_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_TENANT_ID`]
    pub tenant_id: Option<String>,
    /// `client_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_ID`]
    pub client_id: Option<String>,
    /// `client_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_SECRET`]
    pub client_secret: Option<String>,
    /// `resource` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_RESOURCE`]
    /// - `https://management.azure.com/` otherwise
    pub resource: Option<String>,
    /// `authority_host` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_AUTHORITY_HOST`]
    /// - `https://login.microsoftonline.com` otherwise
    pub authority_host: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .field("resource", &self.resource)
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

impl Config {
    /// Create a new config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tenant id.
    pub fn with_tenant_id(mut self, v: impl Into<String>) -> Self {
        self.tenant_id = Some(v.into());
        self
    }

    /// Set the client (application) id.
    pub fn with_client_id(mut self, v: impl Into<String>) -> Self {
        self.client_id = Some(v.into());
        self
    }

    /// Set the client secret.
    pub fn with_client_secret(mut self, v: impl Into<String>) -> Self {
        self.client_secret = Some(v.into());
        self
    }

    /// Set the resource the token is requested for.
    pub fn with_resource(mut self, v: impl Into<String>) -> Self {
        self.resource = Some(v.into());
        self
    }

    /// Set the authority host, for sovereign clouds.
    pub fn with_authority_host(mut self, v: impl Into<String>) -> Self {
        self.authority_host = Some(v.into());
        self
    }

    /// Fill the unset fields from environment variables.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();
        let get = |k: &str| envs.get(k).filter(|v| !v.is_empty()).cloned();

        if self.tenant_id.is_none() {
            self.tenant_id = get(AZURE_TENANT_ID);
        }
        if self.client_id.is_none() {
            self.client_id = get(AZURE_CLIENT_ID);
        }
        if self.client_secret.is_none() {
            self.client_secret = get(AZURE_CLIENT_SECRET);
        }
        if self.resource.is_none() {
            self.resource = get(AZURE_RESOURCE);
        }
        if self.authority_host.is_none() {
            self.authority_host = get(AZURE_AUTHORITY_HOST);
        }
        self
    }

    /// Check the required fields and apply defaults.
    pub(crate) fn resolve(self) -> Result<ResolvedConfig> {
        fn required(name: &str, v: Option<String>) -> Result<String> {
            match v {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(Error::config_invalid(format!("{name} is required"))),
            }
        }

        let cfg = ResolvedConfig {
            tenant_id: required("tenant_id", self.tenant_id)?,
            client_id: required("client_id", self.client_id)?,
            client_secret: required("client_secret", self.client_secret)?,
            resource: self
                .resource
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_RESOURCE.to_string()),
            authority_host: self
                .authority_host
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string()),
        };

        let url = cfg.token_url();
        match url.parse::<http::Uri>() {
            Ok(uri) if uri.scheme().is_some() && uri.authority().is_some() => Ok(cfg),
            _ => Err(Error::config_invalid(format!(
                "authority_host does not form a valid token url: {url}"
            ))),
        }
    }
}

/// Config after validation, every field present.
#[derive(Clone)]
pub(crate) struct ResolvedConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub resource: String,
    pub authority_host: String,
}

impl Debug for ResolvedConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .field("resource", &self.resource)
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

impl ResolvedConfig {
    /// `{authority_host}/{tenant_id}/oauth2/token`
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudauth_core::{ErrorKind, StaticEnv};
    use std::collections::HashMap;

    #[test]
    fn test_from_env_and_defaults() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (AZURE_TENANT_ID.to_string(), "tenant".to_string()),
                (AZURE_CLIENT_ID.to_string(), "client".to_string()),
                (AZURE_CLIENT_SECRET.to_string(), "secret".to_string()),
            ]),
        });

        let cfg = Config::new().from_env(&ctx).resolve().unwrap();
        assert_eq!(cfg.resource, "https://management.azure.com/");
        assert_eq!(
            cfg.token_url(),
            "https://login.microsoftonline.com/tenant/oauth2/token"
        );
    }

    #[test]
    fn test_authority_host_override() {
        let cfg = Config::new()
            .with_tenant_id("tenant")
            .with_client_id("client")
            .with_client_secret("secret")
            .with_authority_host("https://login.chinacloudapi.cn/")
            .resolve()
            .unwrap();
        assert_eq!(
            cfg.token_url(),
            "https://login.chinacloudapi.cn/tenant/oauth2/token"
        );
    }

    #[test]
    fn test_missing_fields() {
        for cfg in [
            Config::new().with_client_id("c").with_client_secret("s"),
            Config::new().with_tenant_id("t").with_client_secret("s"),
            Config::new().with_tenant_id("t").with_client_id("c"),
            Config::new()
                .with_tenant_id(" ")
                .with_client_id("c")
                .with_client_secret("s"),
            Config::new()
                .with_tenant_id("t")
                .with_client_id("c")
                .with_client_secret("s")
                .with_authority_host("login.microsoftonline.com"),
        ] {
            let err = cfg.resolve().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cfg = Config::new().with_client_secret("super-secret-value");
        assert!(!format!("{cfg:?}").contains("super-secret-value"));
    }
}
