//! Core components for authenticating cloud API requests.
//!
//! This crate provides the foundational types and traits shared by the
//! AWS, Azure and Google providers of the cloudauth workspace.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending,
//!   environment access and the clock
//! - **AuthProvider**: The one trait every provider implements; it turns the facts of a
//!   request into the headers that authenticate it
//! - **TokenCache**: Bearer token caching with a refresh buffer, shared by the OAuth2 providers
//!
//! ## Example
//!
//! ```no_run
//! use cloudauth_core::{AuthProvider, AuthRequest, Context, Result};
//! use async_trait::async_trait;
//! use std::collections::HashMap;
//!
//! // A provider that always sends the same api key.
//! #[derive(Debug)]
//! struct ApiKeyProvider {
//!     key: String,
//! }
//!
//! #[async_trait]
//! impl AuthProvider for ApiKeyProvider {
//!     async fn produce_headers(&self, _req: &AuthRequest<'_>) -> Result<HashMap<String, String>> {
//!         Ok(HashMap::from([("x-api-key".to_string(), self.key.clone())]))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let provider = ApiKeyProvider { key: "secret".to_string() };
//! let headers = provider
//!     .produce_headers(&AuthRequest::new("GET", "https://example.com/"))
//!     .await?;
//! assert_eq!(headers["x-api-key"], "secret");
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting and the injectable [`time::Clock`]
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::AuthProvider;
mod request;
pub use request::{AuthRequest, Body};
mod token_cache;
pub use token_cache::{OAuthTokenResponse, TokenCache, TokenCacheEntry, DEFAULT_TOKEN_BUFFER};
