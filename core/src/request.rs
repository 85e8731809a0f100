use std::borrow::Cow;
use std::collections::HashMap;

use http::Uri;

use crate::{Error, Result};

/// Body of the outgoing request, as far as authentication is concerned.
///
/// Only AWS SigV4 looks at the body (to hash it); bearer-token providers
/// ignore it.
#[derive(Debug, Clone, Copy, Default)]
pub enum Body<'a> {
    /// No body at all.
    #[default]
    Empty,
    /// Raw bytes sent as-is.
    Raw(&'a [u8]),
    /// A JSON document the transport will serialize.
    Json(&'a serde_json::Value),
}

impl<'a> Body<'a> {
    /// Bytes that will go on the wire for this body.
    ///
    /// JSON bodies are serialized compactly with `serde_json`, which is what
    /// the transport is expected to send.
    pub fn to_bytes(&self) -> Result<Cow<'a, [u8]>> {
        match self {
            Body::Empty => Ok(Cow::Borrowed(&[])),
            Body::Raw(bs) => Ok(Cow::Borrowed(bs)),
            Body::Json(v) => serde_json::to_vec(v)
                .map(Cow::Owned)
                .map_err(|e| Error::request_invalid("failed to serialize json body").with_source(e)),
        }
    }
}

/// AuthRequest carries the facts of an outgoing request.
///
/// Everything is borrowed from the caller: providers read it and never
/// mutate or retain it.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequest<'a> {
    method: &'a str,
    url: &'a str,
    headers: Option<&'a HashMap<String, String>>,
    query: &'a [(String, String)],
    body: Body<'a>,
}

impl<'a> AuthRequest<'a> {
    /// Create a request with no headers, no query parameters and no body.
    pub fn new(method: &'a str, url: &'a str) -> Self {
        Self {
            method,
            url,
            headers: None,
            query: &[],
            body: Body::Empty,
        }
    }

    /// Set the caller's headers.
    pub fn with_headers(mut self, headers: &'a HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Set the caller's query parameters.
    ///
    /// Parameters are kept as a list so duplicate keys survive.
    pub fn with_query(mut self, query: &'a [(String, String)]) -> Self {
        self.query = query;
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: Body<'a>) -> Self {
        self.body = body;
        self
    }

    /// HTTP method as given by the caller.
    pub fn method(&self) -> &'a str {
        self.method
    }

    /// Request url as given by the caller.
    pub fn url(&self) -> &'a str {
        self.url
    }

    /// Iterate over the caller's headers.
    pub fn headers(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.headers
            .into_iter()
            .flat_map(|h| h.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Query parameters passed next to the url.
    pub fn query(&self) -> &'a [(String, String)] {
        self.query
    }

    /// Request body.
    pub fn body(&self) -> Body<'a> {
        self.body
    }

    /// Parse the url, which must be absolute.
    pub fn uri(&self) -> Result<Uri> {
        let uri: Uri = self.url.parse()?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::request_invalid(format!(
                "url must be absolute: {}",
                self.url
            )));
        }
        Ok(uri)
    }
}
