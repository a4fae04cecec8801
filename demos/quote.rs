//! Quotes an exchange and optionally looks up an existing order.
//!
//! ```sh
//! FF_API_KEY=... FF_API_SECRET=... RUST_LOG=debug \
//!     cargo run --example quote --features tracing -- "0.1 ETH" BTC
//! ```
//!
//! Set `FF_ORDER_ID` and `FF_ORDER_TOKEN` to also fetch an order.

use std::env;

use anyhow::Context as _;
use fixedfloat_client_sdk::types::{OrderRequest, PriceRequest};
use fixedfloat_client_sdk::{Client, Config, RawConfig};
use secrecy::SecretString;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let from = args.next().unwrap_or_else(|| "0.1 ETH".to_owned());
    let to = args.next().unwrap_or_else(|| "BTC".to_owned());

    let raw = RawConfig {
        api_key: env::var("FF_API_KEY").context("FF_API_KEY is not set")?,
        api_secret: SecretString::from(
            env::var("FF_API_SECRET").context("FF_API_SECRET is not set")?,
        ),
        refcode: env::var("FF_REFCODE").ok(),
        afftax: env::var("FF_AFFTAX").ok(),
    };
    let host = env::var("FF_HOST").unwrap_or_else(|_| "https://ff.io/api/v2/".to_owned());
    let client = Client::with_config(Config::from_raw(&host, raw)?)?;

    let request = PriceRequest::builder()
        .from(from.parse()?)
        .to(to.parse()?)
        .build();
    let price = client.price(&request).await?;
    info!(
        from = %price.from.code,
        to = %price.to.code,
        send = ?price.from.amount,
        receive = ?price.to.amount,
        errors = ?price.errors,
        "quote"
    );

    if let (Ok(id), Ok(token)) = (env::var("FF_ORDER_ID"), env::var("FF_ORDER_TOKEN")) {
        let order = client
            .order(&OrderRequest::builder().id(id).token(token).build())
            .await?;
        info!(id = %order.id, status = order.status.description(), "order");
    }

    Ok(())
}
