use std::str::FromStr as _;

use rust_decimal::Decimal;
use secrecy::SecretString;
use url::Url;

use crate::Result;
use crate::auth::Credentials;
use crate::error::Error;
use crate::types::Affiliate;

/// Production API root.
pub const DEFAULT_HOST: &str = "https://ff.io/api/v2/";

/// Raw values typically passed from app-level config or environment.
#[derive(Clone, Debug)]
pub struct RawConfig {
    pub api_key: String,
    pub api_secret: SecretString,
    pub refcode: Option<String>,
    pub afftax: Option<String>,
}

/// Client configuration. Only [`Config::new`] and [`Config::from_raw`] build one, so the
/// host is always a base URL ending in `/`.
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) host: Url,
    pub(crate) credentials: Credentials,
    pub(crate) affiliate: Option<Affiliate>,
}

impl Config {
    pub fn from_raw(host: &str, raw: RawConfig) -> Result<Self> {
        let host = Url::parse(host)?;
        let credentials = Credentials::new(raw.api_key, raw.api_secret)?;

        let afftax = raw
            .afftax
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Decimal::from_str(s)
                    .map_err(|e| Error::validation(format!("invalid afftax `{s}`: {e}")))
            })
            .transpose()?;

        let affiliate = match raw.refcode.filter(|r| !r.trim().is_empty()) {
            Some(refcode) => {
                let affiliate = Affiliate::new(refcode);
                Some(match afftax {
                    Some(afftax) => affiliate.with_afftax(afftax),
                    None => affiliate,
                })
            }
            None if afftax.is_some() => {
                return Err(Error::validation("afftax requires a refcode"));
            }
            None => None,
        };

        Self::new(host, credentials, affiliate)
    }

    pub fn new(host: Url, credentials: Credentials, affiliate: Option<Affiliate>) -> Result<Self> {
        if host.cannot_be_a_base() {
            return Err(Error::validation(format!(
                "host `{host}` cannot be used as a base URL"
            )));
        }

        Ok(Self {
            host: with_trailing_slash(host),
            credentials,
            affiliate,
        })
    }

    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn affiliate(&self) -> Option<&Affiliate> {
        self.affiliate.as_ref()
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut host: Url) -> Url {
    if !host.path().ends_with('/') {
        let path = format!("{}/", host.path());
        host.set_path(&path);
    }
    host
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::Kind;

    fn raw(refcode: Option<&str>, afftax: Option<&str>) -> RawConfig {
        RawConfig {
            api_key: "key".to_owned(),
            api_secret: SecretString::from("secret".to_owned()),
            refcode: refcode.map(str::to_owned),
            afftax: afftax.map(str::to_owned),
        }
    }

    #[test]
    fn from_raw_should_keep_api_prefix() {
        let config = Config::from_raw("https://ff.io/api/v2", raw(None, None)).expect("config");

        assert_eq!(config.host.as_str(), "https://ff.io/api/v2/");
        assert_eq!(
            config.host.join("price").expect("join").as_str(),
            "https://ff.io/api/v2/price"
        );
        assert!(config.affiliate.is_none());
    }

    #[test]
    fn from_raw_should_parse_affiliate() {
        let config =
            Config::from_raw(DEFAULT_HOST, raw(Some("ref42"), Some(" 0.5 "))).expect("config");

        assert_eq!(
            config.affiliate,
            Some(Affiliate::new("ref42").with_afftax(dec!(0.5)))
        );
    }

    #[test]
    fn from_raw_should_reject_bad_input() {
        let cases = [
            ("not a url", raw(None, None), Kind::Validation),
            (DEFAULT_HOST, raw(Some("ref"), Some("lots")), Kind::Validation),
            (DEFAULT_HOST, raw(None, Some("0.5")), Kind::Validation),
            ("mailto:dev@example.com", raw(None, None), Kind::Validation),
        ];

        for (host, raw, kind) in cases {
            let err = Config::from_raw(host, raw).expect_err(host);
            assert_eq!(err.kind(), kind, "host `{host}`");
        }
    }

    #[test]
    fn from_raw_should_reject_empty_secret() {
        let mut raw = raw(None, None);
        raw.api_secret = SecretString::from(String::new());

        let err = Config::from_raw(DEFAULT_HOST, raw).expect_err("empty secret");

        assert_eq!(err.kind(), Kind::Credentials);
    }
}
