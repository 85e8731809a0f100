use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use cloudauth_core::{
    AuthProvider, AuthRequest, Context, Error, OAuthTokenResponse, Result, TokenCache,
};
use http::header::CONTENT_TYPE;
use log::{debug, error};

use crate::config::ResolvedConfig;
use crate::constants::GRANT_TYPE_CLIENT_CREDENTIALS;
use crate::Config;

/// AzureClientCredentialsProvider authenticates with an Azure AD bearer token.
///
/// The token comes from the OAuth2 client-credentials grant and is cached
/// until it gets within the refresh buffer of its expiry.
///
/// Reference: <https://learn.microsoft.com/en-us/entra/identity-platform/v2-oauth2-client-creds-grant-flow>
#[derive(Debug)]
pub struct AzureClientCredentialsProvider {
    ctx: Context,
    config: ResolvedConfig,
    cache: TokenCache,
}

impl AzureClientCredentialsProvider {
    /// Create a provider from an explicit config.
    ///
    /// Fails with `ConfigInvalid` if tenant id, client id or client secret
    /// is missing. No request is sent until the first token is needed.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        Ok(Self {
            ctx,
            config: config.resolve()?,
            cache: TokenCache::new(),
        })
    }

    /// Create a provider from a config, filling unset fields from env.
    pub fn from_env(ctx: Context, config: Config) -> Result<Self> {
        let config = config.from_env(&ctx);
        Self::new(ctx, config)
    }

    /// Replace the refresh buffer of the token cache.
    pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
        self.cache = TokenCache::with_buffer(buffer);
        self
    }

    /// Return a valid access token, exchanging a new one if needed.
    pub async fn access_token(&self) -> Result<String> {
        self.cache.get(&self.ctx, || self.exchange_token()).await
    }

    /// Drop the cached token so the next call asks Azure AD again.
    pub async fn invalidate(&self) {
        self.cache.invalidate().await
    }

    async fn exchange_token(&self) -> Result<OAuthTokenResponse> {
        let url = self.config.token_url();
        debug!("requesting azure access token from {url}");

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS)
            .append_pair("client_id", &self.config.client_id)
            .append_pair("client_secret", &self.config.client_secret)
            .append_pair("resource", &self.config.resource)
            .finish();

        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Bytes::from(body))
            .map_err(|e| {
                Error::unexpected(format!("failed to build token request for {url}"))
                    .with_source(e)
            })?;

        let resp = self.ctx.http_send(req).await.map_err(|e| {
            error!("azure token request to {url} failed: {e}");
            Error::token_acquisition(format!("failed to send token request to {url}"))
                .with_source(e)
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = String::from_utf8_lossy(resp.body());
            error!("azure token request failed with status {status}: {body}");
            return Err(Error::token_acquisition(format!(
                "azure token request failed with status {status}: {body}"
            )));
        }

        OAuthTokenResponse::from_slice(resp.body())
    }
}

#[async_trait]
impl AuthProvider for AzureClientCredentialsProvider {
    async fn produce_headers(&self, req: &AuthRequest<'_>) -> Result<HashMap<String, String>> {
        let token = self.access_token().await?;
        debug!(
            "generated azure auth headers for {} {}",
            req.method(),
            req.url()
        );

        Ok(HashMap::from([(
            "Authorization".to_string(),
            format!("Bearer {token}"),
        )]))
    }
}
