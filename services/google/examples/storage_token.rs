//! Produce the bearer header for a Cloud Storage call.
//!
//! ```shell
//! GOOGLE_APPLICATION_CREDENTIALS=/path/to/key.json cargo run --example storage_token
//! ```
//!
//! Set `CLOUDAUTH_RSA_SIGNER=on` to sign the assertion with the `rsa` backend.

use std::env;

use cloudauth_core::{AuthProvider, AuthRequest, Context, OsEnv, Result};
use cloudauth_file_read_tokio::TokioFileRead;
use cloudauth_google::{Config, GcpJwtBearerProvider, RsaJwtSigner};
use cloudauth_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();
    let _ = dotenv::dotenv();

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default());
    let config = Config::new()
        .with_scopes(["https://www.googleapis.com/auth/devstorage.read_only"])
        .from_env(&ctx);

    let provider = if env::var("CLOUDAUTH_RSA_SIGNER").as_deref() == Ok("on") {
        GcpJwtBearerProvider::with_signer(ctx, config, RsaJwtSigner).await?
    } else {
        GcpJwtBearerProvider::new(ctx, config).await?
    };
    println!("service account: {}", provider.client_email());

    let url = "https://storage.googleapis.com/storage/v1/b?project=demo";
    let headers = provider
        .produce_headers(&AuthRequest::new("GET", url))
        .await?;

    let token = &headers["Authorization"]["Bearer ".len()..];
    println!("GET {url}");
    println!("Authorization: Bearer {}...", &token[..token.len().min(8)]);
    Ok(())
}
