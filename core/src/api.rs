use crate::{AuthRequest, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// AuthProvider is the trait the http client uses to authenticate requests.
///
/// Every cloud provider implements it, so a client can hold any of them
/// behind `Arc<dyn AuthProvider>`.
#[async_trait::async_trait]
pub trait AuthProvider: Debug + Send + Sync + 'static {
    /// Produce the headers that authenticate this request.
    ///
    /// The returned map is freshly allocated and owned by the caller, who
    /// merges it into the outgoing request. Implementations must return
    /// either a complete header set or an error, never a partial one.
    async fn produce_headers(&self, req: &AuthRequest<'_>) -> Result<HashMap<String, String>>;
}

#[async_trait::async_trait]
impl<T: AuthProvider + ?Sized> AuthProvider for Arc<T> {
    async fn produce_headers(&self, req: &AuthRequest<'_>) -> Result<HashMap<String, String>> {
        self.as_ref().produce_headers(req).await
    }
}

#[async_trait::async_trait]
impl<T: AuthProvider + ?Sized> AuthProvider for Box<T> {
    async fn produce_headers(&self, req: &AuthRequest<'_>) -> Result<HashMap<String, String>> {
        self.as_ref().produce_headers(req).await
    }
}
