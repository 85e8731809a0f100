//! Bearer token caching shared by the OAuth2 providers.

use std::fmt::{self, Debug};
use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::time::{add_duration, sub_duration, DateTime};
use crate::utils::Redact;
use crate::{Context, Error, ErrorKind, Result};

/// Tokens are refreshed this long before they actually expire.
pub const DEFAULT_TOKEN_BUFFER: Duration = Duration::from_secs(60);

/// OAuthTokenResponse is the body returned by an OAuth2 token endpoint.
///
/// Both Azure AD and Google answer with at least these two fields; any
/// other shape is a token acquisition failure.
#[derive(Clone, Deserialize)]
pub struct OAuthTokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// Lifetime of the token in seconds.
    pub expires_in: u64,
}

impl Debug for OAuthTokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokenResponse")
            .field("access_token", &Redact::from(&self.access_token))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl OAuthTokenResponse {
    /// Parse a token endpoint body.
    pub fn from_slice(bs: &[u8]) -> Result<Self> {
        let resp: Self = serde_json::from_slice(bs).map_err(|e| {
            Error::token_acquisition("token response is not a valid oauth2 token body")
                .with_source(e)
        })?;
        if resp.access_token.is_empty() {
            return Err(Error::token_acquisition(
                "token response carries an empty access_token",
            ));
        }
        Ok(resp)
    }
}

/// TokenCacheEntry is a bearer token together with its absolute expiry.
#[derive(Clone)]
pub struct TokenCacheEntry {
    token: String,
    expires_at: DateTime,
}

impl Debug for TokenCacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCacheEntry")
            .field("token", &Redact::from(&self.token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl TokenCacheEntry {
    /// Build an entry from a token response received at `now`.
    pub fn from_response(resp: OAuthTokenResponse, now: DateTime) -> Self {
        Self {
            token: resp.access_token,
            expires_at: add_duration(now, Duration::from_secs(resp.expires_in)),
        }
    }

    /// The bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Instant after which the token is rejected by the server.
    pub fn expires_at(&self) -> DateTime {
        self.expires_at
    }

    /// Check whether the token can still be handed out at `now`.
    pub fn is_fresh(&self, now: DateTime, buffer: Duration) -> bool {
        now < sub_duration(self.expires_at, buffer)
    }
}

/// TokenCache holds at most one bearer token for a single provider instance.
///
/// Lookups and refreshes run under one async mutex, so concurrent callers
/// that miss the cache wait for the in-flight exchange and then reuse its
/// token instead of starting their own.
pub struct TokenCache {
    entry: Mutex<Option<TokenCacheEntry>>,
    buffer: Duration,
}

impl Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCache {
    /// Create an empty cache with the default 60s buffer.
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_TOKEN_BUFFER)
    }

    /// Create an empty cache with a custom buffer.
    pub fn with_buffer(buffer: Duration) -> Self {
        Self {
            entry: Mutex::new(None),
            buffer,
        }
    }

    /// Return a usable token, calling `refresh` only if the cached one is
    /// missing or inside the buffer.
    ///
    /// A failed refresh leaves the previous entry in place and is reported
    /// as [`ErrorKind::TokenAcquisition`].
    pub async fn get<F, Fut>(&self, ctx: &Context, refresh: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<OAuthTokenResponse>>,
    {
        let mut entry = self.entry.lock().await;

        let now = ctx.now();
        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(now, self.buffer) {
                debug!("reuse cached token expiring at {}", cached.expires_at);
                return Ok(cached.token.clone());
            }
            debug!("cached token expiring at {} needs refresh", cached.expires_at);
        }

        info!("acquiring new access token");
        let resp = refresh().await.map_err(|err| {
            if err.kind() == ErrorKind::TokenAcquisition {
                err
            } else {
                Error::token_acquisition(format!("refresh token failed: {}", err.message()))
                    .with_source(err)
            }
        })?;

        let fresh = TokenCacheEntry::from_response(resp, now);
        info!("acquired access token expiring at {}", fresh.expires_at);
        let token = fresh.token.clone();
        *entry = Some(fresh);
        Ok(token)
    }

    /// Drop the cached token so the next call refreshes.
    pub async fn invalidate(&self) {
        *self.entry.lock().await = None;
    }

    /// Snapshot of the cached entry, if any.
    pub async fn entry(&self) -> Option<TokenCacheEntry> {
        self.entry.lock().await.clone()
    }
}
