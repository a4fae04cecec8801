//! API-key credentials and HMAC request signing.
//!
//! Every call is authenticated with two headers:
//! - `X-API-KEY`: the API key identifier
//! - `X-API-SIGN`: lowercase hex HMAC-SHA256 of the exact request body, keyed by the secret

use hmac::{Hmac, Mac as _};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use sha2::Sha256;

use crate::Result;
use crate::error::Error;

pub const API_KEY: &str = "X-API-KEY";
pub const API_SIGN: &str = "X-API-SIGN";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

type HmacSha256 = Hmac<Sha256>;

/// API key pair issued by the exchange. Immutable once built.
#[derive(Clone, Debug)]
pub struct Credentials {
    key: String,
    secret: SecretString,
}

impl Credentials {
    /// Fails with [`crate::error::Kind::Credentials`] when either half is empty, or when the key
    /// cannot be carried in an HTTP header.
    pub fn new<K: Into<String>>(key: K, secret: SecretString) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::credentials("API key is missing"));
        }
        if secret.expose_secret().trim().is_empty() {
            return Err(Error::credentials("API secret is missing"));
        }
        if HeaderValue::from_str(&key).is_err() {
            return Err(Error::credentials(
                "API key contains characters not allowed in a header",
            ));
        }

        Ok(Self { key, secret })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Lowercase hex HMAC-SHA256 of `body` keyed by the secret.
    pub fn sign(&self, body: &[u8]) -> Result<String> {
        hmac_hex(self.secret.expose_secret().as_bytes(), body)
    }
}

pub(crate) fn hmac_hex(secret: &[u8], message: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| Error::credentials(format!("unusable HMAC key: {e}")))?;
    mac.update(message);

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Headers for a signed call whose body is exactly `body`.
pub fn create_headers(credentials: &Credentials, body: &[u8]) -> Result<HeaderMap> {
    let signature = credentials.sign(body)?;

    let mut map = HeaderMap::new();
    map.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    map.insert(API_KEY, HeaderValue::from_str(credentials.key())?);
    map.insert(API_SIGN, HeaderValue::from_str(&signature)?);

    Ok(map)
}
