use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use cloudauth_core::{
    AuthProvider, AuthRequest, Context, Error, OAuthTokenResponse, Result, TokenCache,
};
use http::header::CONTENT_TYPE;
use log::{debug, error};

use crate::constants::{DEFAULT_SCOPE, GRANT_TYPE_JWT_BEARER, TOKEN_URI};
use crate::{Claims, Config, JsonWebTokenSigner, ServiceAccountKey, SignJwt};

/// GcpJwtBearerProvider authenticates with a Google OAuth2 access token.
///
/// A JWT assertion signed with the service account key is exchanged at
/// the Google token endpoint, and the resulting token is cached until it
/// gets within the refresh buffer of its expiry.
///
/// Reference: <https://developers.google.com/identity/protocols/oauth2/service-account#httprest>
#[derive(Debug)]
pub struct GcpJwtBearerProvider {
    ctx: Context,
    key: ServiceAccountKey,
    scopes: Vec<String>,
    signer: Arc<dyn SignJwt>,
    cache: TokenCache,
}

impl GcpJwtBearerProvider {
    /// Create a provider that signs with [`JsonWebTokenSigner`].
    pub async fn new(ctx: Context, config: Config) -> Result<Self> {
        Self::with_signer(ctx, config, JsonWebTokenSigner).await
    }

    /// Create a provider from a config, filling unset fields from env.
    pub async fn from_env(ctx: Context, config: Config) -> Result<Self> {
        let config = config.from_env(&ctx);
        Self::new(ctx, config).await
    }

    /// Create a provider with a custom signing backend.
    ///
    /// The key is loaded and checked here, so a bad key fails with
    /// `ConfigInvalid` before any request is made.
    pub async fn with_signer(ctx: Context, config: Config, signer: impl SignJwt) -> Result<Self> {
        let key = match (config.service_account_key, config.service_account_file) {
            (Some(key), None) => {
                key.validate()?;
                key
            }
            (None, Some(path)) => {
                debug!("loading service account key from {path}");
                let content = ctx.file_read(&path).await.map_err(|e| {
                    Error::config_invalid(format!(
                        "failed to read service account file {path}"
                    ))
                    .with_source(e)
                })?;
                ServiceAccountKey::from_slice(&content)?
            }
            (Some(_), Some(_)) => {
                return Err(Error::config_invalid(
                    "service_account_key and service_account_file are mutually exclusive",
                ))
            }
            (None, None) => {
                return Err(Error::config_invalid(
                    "either service_account_key or service_account_file must be provided",
                ))
            }
        };

        signer.validate_key(&key).map_err(|e| {
            Error::config_invalid(format!(
                "service account key of {} can not be used for signing",
                key.client_email
            ))
            .with_source(e)
        })?;

        if let Some(token_uri) = key.token_uri.as_deref().filter(|v| *v != TOKEN_URI) {
            debug!("service account key names token_uri {token_uri}, using {TOKEN_URI}");
        }

        let scopes = config
            .scopes
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_SCOPE.to_string()]);

        Ok(Self {
            ctx,
            key,
            scopes,
            signer: Arc::new(signer),
            cache: TokenCache::new(),
        })
    }

    /// Replace the refresh buffer of the token cache.
    pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
        self.cache = TokenCache::with_buffer(buffer);
        self
    }

    /// The service account email.
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// The scopes requested for every token.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Return a valid access token, exchanging a new one if needed.
    pub async fn access_token(&self) -> Result<String> {
        self.cache.get(&self.ctx, || self.exchange_token()).await
    }

    /// Drop the cached token so the next call asks Google again.
    pub async fn invalidate(&self) {
        self.cache.invalidate().await
    }

    async fn exchange_token(&self) -> Result<OAuthTokenResponse> {
        let scope = self.scopes.join(" ");
        debug!("exchanging service account assertion for token with scope: {scope}");

        let claims = Claims::new(&self.key, &self.scopes, self.ctx.now());
        let assertion = self.signer.sign(&claims, &self.key)?;

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", GRANT_TYPE_JWT_BEARER)
            .append_pair("assertion", &assertion)
            .finish();

        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(TOKEN_URI)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Bytes::from(body))
            .map_err(|e| Error::unexpected("failed to build token request").with_source(e))?;

        let resp = self.ctx.http_send(req).await.map_err(|e| {
            error!("google token request failed: {e}");
            Error::token_acquisition(format!("failed to send token request to {TOKEN_URI}"))
                .with_source(e)
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = String::from_utf8_lossy(resp.body());
            error!("google token request failed with status {status}: {body}");
            return Err(Error::token_acquisition(format!(
                "google token request failed with status {status}: {body}"
            )));
        }

        OAuthTokenResponse::from_slice(resp.body())
    }
}

#[async_trait]
impl AuthProvider for GcpJwtBearerProvider {
    async fn produce_headers(&self, req: &AuthRequest<'_>) -> Result<HashMap<String, String>> {
        let token = self.access_token().await?;
        debug!("generated gcp auth headers for {} {}", req.method(), req.url());

        Ok(HashMap::from([(
            "Authorization".to_string(),
            format!("Bearer {token}"),
        )]))
    }
}
