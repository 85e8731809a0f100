use std::collections::HashMap;

use async_trait::async_trait;
use cloudauth_core::hash::{hex_hmac_sha256, hmac_sha256};
use cloudauth_core::time::{format_date, format_iso8601, DateTime};
use cloudauth_core::{AuthProvider, AuthRequest, Context, Error, Result};
use http::Method;
use log::debug;

use crate::canonical::*;
use crate::constants::*;
use crate::{Config, Credential};

/// AwsSigV4Provider signs requests with AWS Signature Version 4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_aws-signing.html)
///
/// Signing is a pure computation over the request and the current time;
/// the provider holds no mutable state and can be shared freely.
#[derive(Debug, Clone)]
pub struct AwsSigV4Provider {
    ctx: Context,
    credential: Credential,
}

impl AwsSigV4Provider {
    /// Create a new provider, validating the credential.
    pub fn new(ctx: Context, credential: Credential) -> Result<Self> {
        credential.validate()?;
        Ok(Self { ctx, credential })
    }

    /// Create a provider from a [`Config`], filling unset fields from env.
    pub fn from_config(ctx: Context, config: Config) -> Result<Self> {
        let credential = config.from_env(&ctx).into_credential()?;
        Self::new(ctx, credential)
    }

    /// The credential this provider signs with.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Sign the request at the context's current time.
    pub fn sign_headers(&self, req: &AuthRequest<'_>) -> Result<HashMap<String, String>> {
        self.sign_headers_at(req, self.ctx.now())
    }

    /// Sign the request as if it were sent at `now`.
    ///
    /// Returns `Authorization`, `X-Amz-Date` and, with a session token,
    /// `X-Amz-Security-Token`.
    pub fn sign_headers_at(
        &self,
        req: &AuthRequest<'_>,
        now: DateTime,
    ) -> Result<HashMap<String, String>> {
        let cred = &self.credential;

        let method = Method::from_bytes(req.method().to_ascii_uppercase().as_bytes())
            .map_err(|e| {
                Error::request_invalid(format!("invalid http method: {:?}", req.method()))
                    .with_source(e)
            })?;
        let uri = req.uri()?;

        let amz_date = format_iso8601(now);

        // Headers we set ourselves replace whatever the caller passed.
        let reserved = |k: &str| {
            k.eq_ignore_ascii_case(AUTHORIZATION)
                || k.eq_ignore_ascii_case(X_AMZ_DATE)
                || k.eq_ignore_ascii_case(X_AMZ_SECURITY_TOKEN)
        };
        let mut injected = vec![(X_AMZ_DATE, amz_date.as_str())];
        if let Some(token) = &cred.session_token {
            injected.push((X_AMZ_SECURITY_TOKEN, token.as_str()));
        }
        // Sorted so that case-variant duplicates merge in a stable order.
        let mut caller_headers: Vec<(&str, &str)> =
            req.headers().filter(|&(k, _)| !reserved(k)).collect();
        caller_headers.sort_unstable();
        let headers = normalize_headers(caller_headers.into_iter().chain(injected))?;

        let url_query: Vec<(String, String)> = uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        let query = canonical_query_string(
            url_query
                .iter()
                .chain(req.query())
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        let creq = canonical_request(
            method.as_str(),
            &canonical_uri(uri.path())?,
            &query,
            &headers,
            &payload_hash(&req.body())?,
        );
        // Never log the canonical request itself, it holds the session token.
        debug!(
            "calculated canonical request for {method} {} with signed headers: {}",
            uri.path(),
            signed_headers(&headers)
        );

        let scope = credential_scope(now, &cred.region, &cred.service);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(now, &scope, &creq);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            derive_signing_key(&cred.secret_access_key, now, &cred.region, &cred.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
            cred.access_key_id,
            signed_headers(&headers),
        );

        let mut out = HashMap::with_capacity(3);
        out.insert(AUTHORIZATION.to_string(), authorization);
        out.insert(X_AMZ_DATE.to_string(), amz_date);
        if let Some(token) = &cred.session_token {
            out.insert(X_AMZ_SECURITY_TOKEN.to_string(), token.clone());
        }
        Ok(out)
    }
}

#[async_trait]
impl AuthProvider for AwsSigV4Provider {
    async fn produce_headers(&self, req: &AuthRequest<'_>) -> Result<HashMap<String, String>> {
        self.sign_headers(req)
    }
}

/// Derive the SigV4 signing key for one day, region and service.
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub fn derive_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), SCOPE_TERMINATOR.as_bytes())
}
