use anyhow::Result;
use bytes::Bytes;
use cloudauth_core::Context;
use cloudauth_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Token exchanges inherit the client's timeout.
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent("cloudauth-example/0.1")
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let req = http::Request::builder()
        .method("GET")
        .uri("https://login.microsoftonline.com/common/v2.0/.well-known/openid-configuration")
        .body(Bytes::new())?;

    let resp = ctx.http_send(req).await?;
    println!("Response status: {}", resp.status());
    println!("Body length: {} bytes", resp.body().len());
    Ok(())
}
