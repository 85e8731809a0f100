//! Produce the bearer header for an Azure Resource Manager call.
//!
//! ```shell
//! AZURE_TENANT_ID=... AZURE_CLIENT_ID=... AZURE_CLIENT_SECRET=... cargo run --example arm_token
//! ```

use cloudauth_azure::{AzureClientCredentialsProvider, Config};
use cloudauth_core::{AuthProvider, AuthRequest, Context, OsEnv, Result};
use cloudauth_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();
    let _ = dotenv::dotenv();

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());
    let provider = AzureClientCredentialsProvider::from_env(ctx, Config::new())?;

    let url = "https://management.azure.com/subscriptions?api-version=2020-01-01";
    let headers = provider
        .produce_headers(&AuthRequest::new("GET", url))
        .await?;

    // The second call is served from the cache.
    provider
        .produce_headers(&AuthRequest::new("GET", url))
        .await?;

    let token = &headers["Authorization"]["Bearer ".len()..];
    println!("GET {url}");
    println!("Authorization: Bearer {}...", &token[..token.len().min(8)]);
    Ok(())
}
