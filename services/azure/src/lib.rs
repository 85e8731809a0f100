//! Azure AD client-credentials authentication for cloudauth.
//!
//! [`AzureClientCredentialsProvider`] exchanges a client id and secret for
//! a bearer token, caches it, and emits `Authorization: Bearer <token>`.
//!
//! ## Example
//!
//! ```no_run
//! use cloudauth_azure::{AzureClientCredentialsProvider, Config};
//! use cloudauth_core::{AuthProvider, AuthRequest, Context, OsEnv};
//! use cloudauth_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> cloudauth_core::Result<()> {
//! let ctx = Context::new()
//!     .with_env(OsEnv)
//!     .with_http_send(ReqwestHttpSend::default());
//! let provider = AzureClientCredentialsProvider::from_env(ctx, Config::new())?;
//!
//! let headers = provider
//!     .produce_headers(&AuthRequest::new(
//!         "GET",
//!         "https://management.azure.com/subscriptions?api-version=2020-01-01",
//!     ))
//!     .await?;
//! assert!(headers["Authorization"].starts_with("Bearer "));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
pub use config::Config;

mod constants;

mod provide_token;
pub use provide_token::AzureClientCredentialsProvider;
