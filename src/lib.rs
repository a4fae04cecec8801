//! Signed client for the FixedFloat exchange REST API.
//!
//! Every call is a `POST` whose JSON body is signed with HMAC-SHA256 and whose response
//! arrives wrapped in a `{code, msg, data}` envelope. [`Client`] hides both: it prunes
//! empty fields, signs the exact bytes it sends and hands back `data`, or an
//! [`error::Error`] describing what went wrong.
//!
//! ```rust,no_run
//! use fixedfloat_client_sdk::Client;
//! use fixedfloat_client_sdk::types::PriceRequest;
//!
//! # async fn run() -> fixedfloat_client_sdk::Result<()> {
//! let client = Client::new("api-key", "api-secret", None)?;
//! let request = PriceRequest::builder()
//!     .from("0.1 ETH".parse()?)
//!     .to("BTC".parse()?)
//!     .build();
//! let quote = client.price(&request).await?;
//! # let _ = quote;
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Request};
use serde::de::DeserializeOwned;

pub use client::Client;
pub use config::{Config, RawConfig};

use crate::error::{Error, Kind};
use crate::types::Envelope;

pub type Result<T> = std::result::Result<T, Error>;

/// Executes a signed request and unwraps its envelope.
///
/// The envelope decides success even on non-2xx responses. A body that is not an envelope
/// is a transport failure.
async fn request<Response: DeserializeOwned>(
    client: &ReqwestClient,
    mut request: Request,
    headers: HeaderMap,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    request.headers_mut().extend(headers);

    let response = client.execute(request).await?;
    let status_code = response.status();
    let bytes = response.bytes().await?;

    let envelope = match serde_json::from_slice::<Envelope>(&bytes) {
        Ok(envelope) => envelope,
        Err(e) if status_code.is_success() => {
            #[cfg(feature = "tracing")]
            tracing::warn!(%method, path = %path, error = %e, "response body is not an envelope");

            return Err(Error::with_source(Kind::Transport, e));
        }
        Err(_) => {
            let message = String::from_utf8_lossy(&bytes).into_owned();

            #[cfg(feature = "tracing")]
            tracing::warn!(
                status = %status_code,
                %method,
                path = %path,
                message = %message,
                "request failed"
            );

            return Err(Error::status(status_code, method, path, message));
        }
    };

    pipeline::validate(envelope)
}
