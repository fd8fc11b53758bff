//! AWS Signature Version 4 request signing.
//!
//! Implements the subset of the SigV4 process needed for JSON service
//! endpoints: canonical request construction, signing-key derivation and
//! the `Authorization` header. Path segments are URI-encoded a second
//! time in the canonical form, as required for every service except S3.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use sha2::{Digest, Sha256};
use url::Url;

use crate::credentials::Credentials;
use crate::error::{BedrockError, Result};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const SHORT_DATE_FORMAT: &str = "%Y%m%d";

/// Everything one signature depends on besides the request itself.
pub struct SigningParams<'a> {
    pub credentials: &'a Credentials,
    pub region: &'a str,
    pub service: &'a str,
    pub timestamp: DateTime<Utc>,
}

/// Signs a request in place.
///
/// Sets `x-amz-date` (and `x-amz-security-token` when the credentials
/// carry one), then computes and appends `authorization`. `headers` must
/// already contain every other header the signature should cover,
/// `content-type` in particular; `host` is derived from `url` and signed
/// implicitly.
pub fn sign_request(
    method: &str,
    url: &Url,
    headers: &mut HeaderMap,
    payload: &[u8],
    params: &SigningParams<'_>,
) -> Result<()> {
    let amz_date = params.timestamp.format(AMZ_DATE_FORMAT).to_string();
    headers.insert("x-amz-date", header_value("x-amz-date", &amz_date)?);
    if let Some(token) = params.credentials.session_token.as_deref() {
        headers.insert("x-amz-security-token", header_value("x-amz-security-token", token)?);
    }

    let signed_headers = signed_header_list(headers);
    let canonical = canonical_request(method, url, headers, &signed_headers, payload);
    let to_sign = string_to_sign(&canonical, params, &amz_date);
    let authorization = format!(
        "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
        params.credentials.access_key_id,
        credential_scope(params),
        signed_headers.join(";"),
        signature(&to_sign, params),
    );
    headers.insert(AUTHORIZATION, header_value("authorization", &authorization)?);
    Ok(())
}

/// Canonical request string: method, canonical URI, canonical query,
/// canonical headers, signed-header list and the payload hash, one per
/// line.
pub fn canonical_request(
    method: &str,
    url: &Url,
    headers: &HeaderMap,
    signed_headers: &[String],
    payload: &[u8],
) -> String {
    let mut out = String::new();
    out.push_str(method);
    out.push('\n');
    out.push_str(&canonical_uri(url.path()));
    out.push('\n');
    out.push_str(&canonical_query(url));
    out.push('\n');
    for name in signed_headers {
        let value = if name == "host" {
            host_value(url)
        } else {
            headers
                .get(name.as_str())
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        out.push_str(name);
        out.push(':');
        out.push_str(&value);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&signed_headers.join(";"));
    out.push('\n');
    out.push_str(&hex::encode(Sha256::digest(payload)));
    out
}

/// String-to-sign: algorithm, request timestamp, credential scope and the
/// canonical request hash.
pub fn string_to_sign(
    canonical_request: &str,
    params: &SigningParams<'_>,
    amz_date: &str,
) -> String {
    format!(
        "{ALGORITHM}\n{amz_date}\n{}\n{}",
        credential_scope(params),
        hex::encode(Sha256::digest(canonical_request.as_bytes())),
    )
}

/// Final signature over the string-to-sign, as lowercase hex.
pub fn signature(string_to_sign: &str, params: &SigningParams<'_>) -> String {
    let secret = format!("AWS4{}", params.credentials.secret_access_key);
    let date = params.timestamp.format(SHORT_DATE_FORMAT).to_string();
    let key = hmac_sha256(secret.as_bytes(), date.as_bytes());
    let key = hmac_sha256(&key, params.region.as_bytes());
    let key = hmac_sha256(&key, params.service.as_bytes());
    let key = hmac_sha256(&key, b"aws4_request");
    hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()))
}

/// Percent-encodes every byte outside the RFC 3986 unreserved set.
pub(crate) fn uri_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn credential_scope(params: &SigningParams<'_>) -> String {
    format!(
        "{}/{}/{}/aws4_request",
        params.timestamp.format(SHORT_DATE_FORMAT),
        params.region,
        params.service,
    )
}

// The wire path is already percent-encoded once; re-encoding each segment
// yields the double encoding the canonical form requires.
fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| (uri_encode(&name), uri_encode(&value)))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

// Lowercased header names plus the implicit host header, sorted.
fn signed_header_list(headers: &HeaderMap) -> Vec<String> {
    let mut names: Vec<String> = headers.keys().map(|name| name.as_str().to_string()).collect();
    names.push("host".to_string());
    names.sort();
    names.dedup();
    names
}

fn host_value(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| BedrockError::InvalidHeader { name })
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|byte| format!("{byte:02x}")).collect()
    }
}
