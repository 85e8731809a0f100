//! Canonical request construction for AWS SigV4.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)
//!
//! Every function here is pure: it reads its inputs and returns a new value.

use std::fmt::Write;

use cloudauth_core::hash::hex_sha256;
use cloudauth_core::time::{format_date, format_iso8601, DateTime};
use cloudauth_core::{Body, Error, Result};
use http::{HeaderName, HeaderValue};
use percent_encoding::{percent_decode_str, utf8_percent_encode};

use crate::constants::{ALGORITHM, AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, SCOPE_TERMINATOR};

/// Header list after normalization: lowercase names, trimmed values,
/// unique names, sorted by name.
pub type CanonicalHeaders = Vec<(String, String)>;

/// Canonical URI of a request path.
///
/// The path is decoded first so that already-encoded input is not encoded
/// twice. An empty path becomes `/`.
pub fn canonical_uri(path: &str) -> Result<String> {
    if path.is_empty() {
        return Ok("/".to_string());
    }
    if !path.starts_with('/') {
        return Err(Error::request_invalid(format!(
            "path must start with '/': {path}"
        )));
    }

    let decoded = percent_decode_str(path).decode_utf8().map_err(|e| {
        Error::request_invalid(format!("path is not valid utf-8 once decoded: {path}"))
            .with_source(e)
    })?;
    Ok(utf8_percent_encode(&decoded, &AWS_URI_ENCODE_SET).to_string())
}

/// Canonical query string.
///
/// Keys and values are encoded with the unreserved set, then pairs are
/// sorted by encoded key. The sort is stable, so duplicate keys keep the
/// order they were given in.
pub fn canonical_query_string<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut pairs: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
    pairs.sort_by(|(a, _), (b, _)| a.cmp(b));

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Normalize headers for signing.
///
/// Names are lowercased and values trimmed. Names that differ only in case
/// are merged into one entry with their values joined by `,`, in the order
/// given. Names or values that are not valid in HTTP fail with
/// `RequestInvalid`.
pub fn normalize_headers<'a>(
    headers: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<CanonicalHeaders> {
    let mut normalized: CanonicalHeaders = Vec::new();

    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::request_invalid(format!("invalid header name: {name:?}")).with_source(e)
        })?;
        let value = value.trim();
        HeaderValue::from_str(value).map_err(|e| {
            Error::request_invalid(format!("invalid value for header {name}")).with_source(e)
        })?;

        // HeaderName is always lowercase.
        let name = name.as_str();
        match normalized.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(value);
            }
            None => normalized.push((name.to_string(), value.to_string())),
        }
    }

    normalized.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(normalized)
}

/// Canonical headers block: `name:value\n` for every header.
pub fn canonical_headers(headers: &CanonicalHeaders) -> String {
    headers.iter().fold(String::new(), |mut f, (k, v)| {
        let _ = writeln!(f, "{k}:{v}");
        f
    })
}

/// Signed headers list: header names joined by `;`.
pub fn signed_headers(headers: &CanonicalHeaders) -> String {
    headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";")
}

/// Lowercase hex SHA-256 of the bytes the body puts on the wire.
pub fn payload_hash(body: &Body<'_>) -> Result<String> {
    Ok(hex_sha256(&body.to_bytes()?))
}

/// Canonical request string.
///
/// ```text
/// GET
/// /test.txt
///
/// host:examplebucket.s3.amazonaws.com
/// x-amz-date:20130524T000000Z
///
/// host;x-amz-date
/// e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// ```
pub fn canonical_request(
    method: &str,
    canonical_uri: &str,
    canonical_query: &str,
    headers: &CanonicalHeaders,
    payload_hash: &str,
) -> String {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);
    f.push_str(method);
    f.push('\n');
    f.push_str(canonical_uri);
    f.push('\n');
    f.push_str(canonical_query);
    f.push('\n');
    f.push_str(&canonical_headers(headers));
    f.push('\n');
    f.push_str(&signed_headers(headers));
    f.push('\n');
    f.push_str(payload_hash);
    f
}

/// Credential scope: `20130524/us-east-1/s3/aws4_request`.
pub fn credential_scope(time: DateTime, region: &str, service: &str) -> String {
    format!(
        "{}/{region}/{service}/{SCOPE_TERMINATOR}",
        format_date(time)
    )
}

/// String to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20130524T000000Z
/// 20130524/us-east-1/s3/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(time: DateTime, scope: &str, canonical_request: &str) -> String {
    format!(
        "{ALGORITHM}\n{}\n{scope}\n{}",
        format_iso8601(time),
        hex_sha256(canonical_request.as_bytes())
    )
}
