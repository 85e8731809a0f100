//! Sign a ListBuckets call with the credentials from the environment.
//!
//! ```shell
//! AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=... cargo run --example s3_sign
//! ```

use std::collections::HashMap;

use cloudauth_aws_v4::{AwsSigV4Provider, Config};
use cloudauth_core::{AuthProvider, AuthRequest, Context, OsEnv, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();
    let _ = dotenv::dotenv();

    let ctx = Context::new().with_env(OsEnv);
    let provider = AwsSigV4Provider::from_config(ctx, Config::new().with_service("s3"))?;

    let host = format!("s3.{}.amazonaws.com", provider.credential().region);
    let url = format!("https://{host}/");
    let headers = HashMap::from([("Host".to_string(), host)]);

    let signed = provider
        .produce_headers(&AuthRequest::new("GET", &url).with_headers(&headers))
        .await?;

    println!("GET {url}");
    let mut names: Vec<_> = signed.keys().collect();
    names.sort();
    for name in names {
        if name == "X-Amz-Security-Token" {
            println!("{name}: <redacted>");
        } else {
            println!("{name}: {}", signed[name]);
        }
    }
    Ok(())
}
