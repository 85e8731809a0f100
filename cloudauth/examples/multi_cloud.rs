//! Authenticate the same kind of call against every configured cloud.
//!
//! Providers whose credentials are missing from the environment are skipped.

use std::collections::HashMap;
use std::sync::Arc;

use cloudauth::{AuthProvider, AuthRequest, Result};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut providers: Vec<(&str, &str, Arc<dyn AuthProvider>)> = Vec::new();

    match cloudauth::aws::default_provider("s3") {
        Ok(p) => {
            let url = "https://s3.us-east-1.amazonaws.com/";
            providers.push(("aws", url, Arc::new(p)));
        }
        Err(err) => println!("aws skipped: {err}"),
    }
    match cloudauth::azure::default_provider() {
        Ok(p) => {
            let url = "https://management.azure.com/subscriptions?api-version=2020-01-01";
            providers.push(("azure", url, Arc::new(p)));
        }
        Err(err) => println!("azure skipped: {err}"),
    }
    match cloudauth::google::default_provider().await {
        Ok(p) => {
            let url = "https://storage.googleapis.com/storage/v1/b?project=demo";
            providers.push(("google", url, Arc::new(p)));
        }
        Err(err) => println!("google skipped: {err}"),
    }

    let headers = HashMap::from([("Accept".to_string(), "application/json".to_string())]);
    for (name, url, provider) in providers {
        let req = AuthRequest::new("GET", url).with_headers(&headers);
        match provider.produce_headers(&req).await {
            Ok(out) => {
                let mut names: Vec<_> = out.keys().collect();
                names.sort();
                println!("{name}: GET {url} with {names:?}");
            }
            Err(err) => println!("{name}: {err}"),
        }
    }
    Ok(())
}
