use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::TimeZone;
use cloudauth_azure::{AzureClientCredentialsProvider, Config};
use cloudauth_core::time::FixedClock;
use cloudauth_core::{AuthProvider, AuthRequest, Context, Error, ErrorKind, HttpSend, OsEnv};
use cloudauth_http_send_reqwest::ReqwestHttpSend;
use http::StatusCode;
use log::warn;
use pretty_assertions::assert_eq;

/// HttpSend that records every request and answers with canned responses.
#[derive(Debug, Clone, Default)]
struct MockHttpSend {
    responses: Arc<Mutex<VecDeque<Result<(StatusCode, String), String>>>>,
    requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl MockHttpSend {
    fn respond(&self, status: StatusCode, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok((status, body.to_string())));
        self
    }

    fn fail(&self, reason: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
        self
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, idx: usize) -> (String, String, HashMap<String, String>) {
        let requests = self.requests.lock().unwrap();
        let req = &requests[idx];
        let form = form_urlencoded::parse(req.body())
            .into_owned()
            .collect::<HashMap<_, _>>();
        (req.method().to_string(), req.uri().to_string(), form)
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(
        &self,
        req: http::Request<Bytes>,
    ) -> cloudauth_core::Result<http::Response<Bytes>> {
        self.requests.lock().unwrap().push(req);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok((status, body))) => Ok(http::Response::builder()
                .status(status)
                .body(Bytes::from(body))
                .unwrap()),
            Some(Err(reason)) => Err(Error::unexpected(reason)),
            None => Err(Error::unexpected("no response configured")),
        }
    }
}

fn setup() -> (MockHttpSend, FixedClock, AzureClientCredentialsProvider) {
    let _ = env_logger::builder().is_test(true).try_init();

    let http = MockHttpSend::default();
    let clock = FixedClock::new(chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    let ctx = Context::new()
        .with_http_send(http.clone())
        .with_clock(clock.clone());
    let provider = AzureClientCredentialsProvider::new(
        ctx,
        Config::new()
            .with_tenant_id("my-tenant")
            .with_client_id("my-client")
            .with_client_secret("my-secret"),
    )
    .expect("config must be valid");
    (http, clock, provider)
}

#[tokio::test]
async fn test_token_request_shape() {
    let (http, _, provider) = setup();
    http.respond(StatusCode::OK, r#"{"access_token":"abc","expires_in":3600}"#);

    let headers = provider
        .produce_headers(&AuthRequest::new(
            "GET",
            "https://management.azure.com/subscriptions",
        ))
        .await
        .unwrap();
    assert_eq!(
        headers,
        HashMap::from([("Authorization".to_string(), "Bearer abc".to_string())])
    );

    let (method, uri, form) = http.request(0);
    assert_eq!(method, "POST");
    assert_eq!(uri, "https://login.microsoftonline.com/my-tenant/oauth2/token");
    assert_eq!(
        form,
        HashMap::from([
            ("grant_type".to_string(), "client_credentials".to_string()),
            ("client_id".to_string(), "my-client".to_string()),
            ("client_secret".to_string(), "my-secret".to_string()),
            ("resource".to_string(), "https://management.azure.com/".to_string()),
        ])
    );
}

#[tokio::test]
async fn test_token_is_cached_until_buffer() {
    let (http, clock, provider) = setup();
    http.respond(StatusCode::OK, r#"{"access_token":"abc","expires_in":3600}"#)
        .respond(StatusCode::OK, r#"{"access_token":"def","expires_in":3600}"#);

    let req = AuthRequest::new("GET", "https://management.azure.com/");
    for _ in 0..4 {
        let headers = provider.produce_headers(&req).await.unwrap();
        assert_eq!(headers["Authorization"], "Bearer abc");
        clock.advance(Duration::from_secs(1000));
    }
    // 4000s elapsed, past expiry.
    assert_eq!(http.calls(), 1);

    let headers = provider.produce_headers(&req).await.unwrap();
    assert_eq!(headers["Authorization"], "Bearer def");
    assert_eq!(http.calls(), 2);
}

#[tokio::test]
async fn test_no_exchange_within_3000s() {
    let (http, clock, provider) = setup();
    http.respond(StatusCode::OK, r#"{"access_token":"abc","expires_in":3600}"#);

    assert_eq!(provider.access_token().await.unwrap(), "abc");
    clock.advance(Duration::from_secs(3000));
    assert_eq!(provider.access_token().await.unwrap(), "abc");
    assert_eq!(http.calls(), 1);
}

#[tokio::test]
async fn test_non_success_status() {
    let (http, _, provider) = setup();
    http.respond(
        StatusCode::UNAUTHORIZED,
        r#"{"error":"invalid_client","error_description":"AADSTS7000215"}"#,
    );

    let err = provider.access_token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TokenAcquisition);
    assert!(err.message().contains("401"), "{err}");
    assert!(err.message().contains("invalid_client"), "{err}");
}

#[tokio::test]
async fn test_failures_are_retried_on_next_call() {
    let (http, _, provider) = setup();
    http.fail("connection reset")
        .respond(StatusCode::OK, r#"{"token_type":"Bearer"}"#)
        .respond(StatusCode::OK, r#"{"access_token":"abc","expires_in":3600}"#);

    let err = provider.access_token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TokenAcquisition);
    let err = provider.access_token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TokenAcquisition);

    assert_eq!(provider.access_token().await.unwrap(), "abc");
    assert_eq!(http.calls(), 3);
}

#[tokio::test]
async fn test_invalidate() {
    let (http, _, provider) = setup();
    http.respond(StatusCode::OK, r#"{"access_token":"abc","expires_in":3600}"#)
        .respond(StatusCode::OK, r#"{"access_token":"def","expires_in":3600}"#);

    assert_eq!(provider.access_token().await.unwrap(), "abc");
    provider.invalidate().await;
    assert_eq!(provider.access_token().await.unwrap(), "def");
}

#[tokio::test]
async fn test_concurrent_callers_share_one_exchange() {
    let (http, _, provider) = setup();
    http.respond(StatusCode::OK, r#"{"access_token":"abc","expires_in":3600}"#);
    let provider = Arc::new(provider);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let provider = provider.clone();
        handles.push(tokio::spawn(async move {
            provider
                .produce_headers(&AuthRequest::new("GET", "https://management.azure.com/"))
                .await
        }));
    }
    for h in handles {
        assert_eq!(h.await.unwrap().unwrap()["Authorization"], "Bearer abc");
    }
    assert_eq!(http.calls(), 1);
}

#[test]
fn test_missing_config() {
    let err = AzureClientCredentialsProvider::new(
        Context::new(),
        Config::new().with_tenant_id("t").with_client_id("c"),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

/// Fetches a real token; only runs when `CLOUDAUTH_AZURE_TEST=on`.
#[tokio::test]
async fn test_live_token() {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("CLOUDAUTH_AZURE_TEST").as_deref() != Ok("on") {
        warn!("CLOUDAUTH_AZURE_TEST is not set, skipped");
        return;
    }

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());
    let provider = AzureClientCredentialsProvider::from_env(ctx, Config::new())
        .expect("AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET must be set");
    let token = provider.access_token().await.expect("token must be acquired");
    assert!(!token.is_empty());
}
