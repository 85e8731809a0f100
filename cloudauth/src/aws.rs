//! AWS Signature Version 4.

pub use cloudauth_aws_v4::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Result};

/// Create a SigV4 provider for `service` from the process environment.
///
/// Keys are read from `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY`,
/// the region from `AWS_REGION` or `AWS_DEFAULT_REGION`.
///
/// ```no_run
/// # fn example() -> cloudauth::Result<()> {
/// let provider = cloudauth::aws::default_provider("s3")?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_provider(service: &str) -> Result<AwsSigV4Provider> {
    AwsSigV4Provider::from_config(default_context(), Config::new().with_service(service))
}
