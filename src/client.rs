use reqwest::Client as ReqwestClient;
use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use url::Url;

use crate::Result;
use crate::auth::Credentials;
use crate::config::{Config, DEFAULT_HOST};
use crate::pipeline::{self, SignedRequest};
use crate::types::{
    Affiliate, CreateOrderRequest, Currency, EmergencyRequest, Order, OrderRequest, Price,
    PriceRequest, QrCode, SetEmailRequest,
};

const CURRENCIES: &str = "ccies";
const PRICE: &str = "price";
const CREATE: &str = "create";
const ORDER: &str = "order";
const EMERGENCY: &str = "emergency";
const SET_EMAIL: &str = "setEmail";
const QR: &str = "qr";

/// Signed client for the exchange REST API.
///
/// Holds only immutable state, so one instance can serve concurrent calls. Each method
/// issues exactly one `POST`; nothing is retried.
#[derive(Clone, Debug)]
pub struct Client {
    host: Url,
    credentials: Credentials,
    affiliate: Option<Affiliate>,
    client: ReqwestClient,
}

impl Client {
    /// Creates a client against the production host.
    pub fn new(api_key: &str, api_secret: &str, affiliate: Option<Affiliate>) -> Result<Self> {
        let credentials = Credentials::new(api_key, SecretString::from(api_secret.to_owned()))?;
        let config = Config::new(Url::parse(DEFAULT_HOST)?, credentials, affiliate)?;

        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_config_and_client(config, ReqwestClient::new())
    }

    /// Uses a caller-built HTTP client, e.g. one with timeouts or a proxy configured.
    pub fn with_config_and_client(config: Config, client: ReqwestClient) -> Result<Self> {
        let Config {
            host,
            credentials,
            affiliate,
        } = config;

        Ok(Self {
            host,
            credentials,
            affiliate,
            client,
        })
    }

    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    #[must_use]
    pub fn affiliate(&self) -> Option<&Affiliate> {
        self.affiliate.as_ref()
    }

    /// All currencies with their deposit/payout availability.
    pub async fn currencies(&self) -> Result<Vec<Currency>> {
        self.call(CURRENCIES, &Map::new()).await
    }

    /// Quotes an exchange. Exactly one side needs an amount; the source side wins if both do.
    pub async fn price(&self, request: &PriceRequest) -> Result<Price> {
        let payload = request.payload(self.affiliate.as_ref())?;
        self.call(PRICE, &payload).await
    }

    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order> {
        let payload = request.payload(self.affiliate.as_ref())?;
        self.call(CREATE, &payload).await
    }

    pub async fn order(&self, request: &OrderRequest) -> Result<Order> {
        self.call(ORDER, request).await
    }

    /// Chooses between continuing and refunding an order in emergency state.
    pub async fn set_emergency(&self, request: &EmergencyRequest) -> Result<bool> {
        self.call(EMERGENCY, request).await
    }

    /// Subscribes an email address to status notifications for an order.
    pub async fn set_email(&self, request: &SetEmailRequest) -> Result<bool> {
        self.call(SET_EMAIL, request).await
    }

    pub async fn qr_codes(&self, request: &OrderRequest) -> Result<Vec<QrCode>> {
        self.call(QR, request).await
    }

    /// Signs `payload`, posts it to `path` and returns the envelope's `data` as `D`.
    ///
    /// With `D = serde_json::Value` the data is returned untouched.
    pub async fn call<P, D>(&self, path: &'static str, payload: &P) -> Result<D>
    where
        P: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        let signed = self.sign(path, payload)?;
        self.send(signed).await
    }

    pub fn sign<P: Serialize + ?Sized>(
        &self,
        path: &'static str,
        payload: &P,
    ) -> Result<SignedRequest> {
        pipeline::build_and_sign(&self.credentials, path, payload)
    }

    pub async fn send<D: DeserializeOwned>(&self, signed: SignedRequest) -> Result<D> {
        let SignedRequest {
            path,
            body,
            headers,
        } = signed;

        #[cfg(feature = "tracing")]
        tracing::debug!(path, bytes = body.len(), "sending signed request");

        let request = self
            .client
            .request(Method::POST, self.host.join(path)?)
            .body(body)
            .build()?;

        crate::request(&self.client, request, headers).await
    }
}
