//! AWS Signature Version 4 for cloudauth.
//!
//! [`AwsSigV4Provider`] turns a request into the `Authorization` and
//! `X-Amz-Date` headers AWS expects, plus `X-Amz-Security-Token` when the
//! credential is temporary.
//!
//! ## Example
//!
//! ```no_run
//! use cloudauth_aws_v4::{AwsSigV4Provider, Config};
//! use cloudauth_core::{AuthProvider, AuthRequest, Context, OsEnv};
//!
//! # async fn example() -> cloudauth_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let provider = AwsSigV4Provider::from_config(ctx, Config::new().with_service("s3"))?;
//!
//! let headers = provider
//!     .produce_headers(&AuthRequest::new("GET", "https://s3.us-east-1.amazonaws.com/"))
//!     .await?;
//! assert!(headers.contains_key("Authorization"));
//! # Ok(())
//! # }
//! ```
//!
//! The canonicalization steps are exposed as free functions in [`canonical`]
//! so they can be tested and reused on their own.

#![warn(missing_docs)]

pub mod canonical;

mod config;
pub use config::Config;

mod constants;
pub use constants::{AUTHORIZATION, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN};

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::{derive_signing_key, AwsSigV4Provider};
