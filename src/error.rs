use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use reqwest::{Method, StatusCode};

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// The API key or secret was missing or unusable
    Credentials,
    /// Request inputs were rejected before anything was sent
    Validation,
    /// The response envelope reported a failure
    Api,
    /// Network failure, or a non-2xx response without a readable envelope
    Transport,
    /// Payload or response data did not have the expected shape
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn credentials<S: Into<String>>(reason: S) -> Self {
        Self::with_source(
            Kind::Credentials,
            Credentials {
                reason: reason.into(),
            },
        )
    }

    pub fn validation<S: Into<String>>(reason: S) -> Self {
        Self::with_source(
            Kind::Validation,
            Validation {
                reason: reason.into(),
            },
        )
    }

    pub fn api<S: Into<String>>(code: i64, msg: S) -> Self {
        Self::with_source(
            Kind::Api,
            Api {
                code,
                msg: msg.into(),
            },
        )
    }

    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        Self::with_source(
            Kind::Transport,
            Status {
                status_code,
                method,
                path,
                message: message.into(),
            },
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Raised at construction when a credential is missing or cannot be sent as a header.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub reason: String,
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid credentials: {}", self.reason)
    }
}

impl StdError for Credentials {}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid argument: {}", self.reason)
    }
}

impl StdError for Validation {}

/// Failure reported inside the `{code, msg, data}` envelope.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Api {
    pub code: i64,
    pub msg: String,
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api error {}: {}", self.code, self.msg)
    }
}

impl StdError for Api {}

/// Non-2xx response whose body was not a parsable envelope.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.message
        )
    }
}

impl StdError for Status {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::with_source(Kind::Transport, e)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_should_downcast() {
        let err = Error::api(1, "Invalid signature");

        assert_eq!(err.kind(), Kind::Api);
        assert_eq!(
            err.downcast_ref::<Api>(),
            Some(&Api {
                code: 1,
                msg: "Invalid signature".to_owned()
            })
        );
        assert_eq!(err.to_string(), "Api: api error 1: Invalid signature");
    }

    #[test]
    fn status_error_should_be_transport() {
        let err = Error::status(
            StatusCode::BAD_GATEWAY,
            Method::POST,
            "/price".to_owned(),
            "upstream down",
        );

        assert_eq!(err.kind(), Kind::Transport);
        assert!(
            err.to_string().contains("502"),
            "status code should be rendered: {err}"
        );
        assert!(err.downcast_ref::<Validation>().is_none(), "wrong source type");
    }
}
