use cloudauth_core::{Context, OsEnv};
use cloudauth_file_read_tokio::TokioFileRead;
use cloudauth_http_send_reqwest::ReqwestHttpSend;

/// Create a [`Context`] wired to the real world.
///
/// - files are read with `tokio::fs`
/// - token requests go through a default `reqwest::Client`
/// - environment variables come from the process
/// - time comes from the system clock
///
/// Use [`Context::with_http_send`] afterwards to bring a client with your own
/// timeouts.
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}
