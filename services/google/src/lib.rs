//! Google OAuth2 jwt-bearer authentication for cloudauth.
//!
//! [`GcpJwtBearerProvider`] signs an assertion with a service account key,
//! exchanges it for an access token, caches the token, and emits
//! `Authorization: Bearer <token>`.
//!
//! ## Example
//!
//! ```no_run
//! use cloudauth_core::{AuthProvider, AuthRequest, Context, OsEnv};
//! use cloudauth_file_read_tokio::TokioFileRead;
//! use cloudauth_google::{Config, GcpJwtBearerProvider};
//! use cloudauth_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> cloudauth_core::Result<()> {
//! let ctx = Context::new()
//!     .with_env(OsEnv)
//!     .with_file_read(TokioFileRead)
//!     .with_http_send(ReqwestHttpSend::default());
//! let provider = GcpJwtBearerProvider::from_env(ctx, Config::new()).await?;
//!
//! let headers = provider
//!     .produce_headers(&AuthRequest::new(
//!         "GET",
//!         "https://storage.googleapis.com/storage/v1/b?project=demo",
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

mod key;
pub use key::ServiceAccountKey;

mod jwt;
pub use jwt::{Claims, JsonWebTokenSigner, RsaJwtSigner, SignJwt};

mod provide_token;
pub use provide_token::GcpJwtBearerProvider;
