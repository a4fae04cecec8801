use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_with::{TimestampSeconds, serde_as};

/// Outer `{code, msg, data}` wrapper present on every response.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Envelope {
    pub code: i64,
    pub msg: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub const OK: &'static str = "OK";

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == 0 && self.msg == Self::OK
    }
}

/// Entry of `POST ccies`.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Currency {
    pub code: String,
    pub coin: Option<String>,
    pub network: Option<String>,
    pub name: Option<String>,
    /// Accepted as a deposit currency
    #[serde(default, deserialize_with = "flag")]
    pub recv: bool,
    /// Available as a payout currency
    #[serde(default, deserialize_with = "flag")]
    pub send: bool,
    /// Name of the memo/destination tag field, if the network needs one
    pub tag: Option<String>,
    pub logo: Option<String>,
    pub color: Option<String>,
    pub priority: Option<i64>,
}

/// Result of `POST price`.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Price {
    pub from: PriceLeg,
    pub to: PriceLeg,
    /// Conditions that would block an order at this quote, e.g. `LIMIT_MIN`
    #[serde(default)]
    pub errors: Vec<String>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PriceLeg {
    pub code: String,
    pub coin: Option<String>,
    pub network: Option<String>,
    pub amount: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub precision: Option<u32>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub usd: Option<Decimal>,
    pub btc: Option<Decimal>,
}

/// Lifecycle state of an order.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    New,
    Pending,
    Exchange,
    Withdraw,
    Done,
    Expired,
    Emergency,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            OrderStatus::New => "Waiting for deposit",
            OrderStatus::Pending => "Deposit received, waiting for confirmations",
            OrderStatus::Exchange => "Deposit confirmed, exchange in progress",
            OrderStatus::Withdraw => "Sending funds to the destination address",
            OrderStatus::Done => "Order completed",
            OrderStatus::Expired => "Order expired",
            OrderStatus::Emergency => "Emergency, a decision is required",
            OrderStatus::Unknown => "Unknown status",
        }
    }

    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, OrderStatus::Done | OrderStatus::Expired)
    }
}

/// Result of `POST create` and `POST order`.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    #[serde(rename = "type")]
    pub order_type: Option<String>,
    pub email: Option<String>,
    pub status: OrderStatus,
    pub time: Option<OrderTime>,
    pub from: OrderLeg,
    pub to: OrderLeg,
    pub back: Option<OrderLeg>,
    pub emergency: Option<Emergency>,
    /// Security token needed for follow-up calls on this order
    pub token: Option<String>,
}

#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct OrderTime {
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    pub reg: Option<DateTime<Utc>>,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    pub start: Option<DateTime<Utc>>,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    pub finish: Option<DateTime<Utc>>,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    pub update: Option<DateTime<Utc>>,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    pub expiration: Option<DateTime<Utc>>,
    /// Seconds until expiration
    pub left: Option<i64>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLeg {
    pub code: Option<String>,
    pub coin: Option<String>,
    pub network: Option<String>,
    pub name: Option<String>,
    pub alias: Option<String>,
    pub amount: Option<Decimal>,
    pub address: Option<String>,
    pub tag: Option<String>,
    pub address_mix: Option<String>,
    pub req_confirmations: Option<u32>,
    pub max_confirmations: Option<u32>,
    pub tx: Option<Transaction>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Option<String>,
    pub amount: Option<Decimal>,
    pub fee: Option<Decimal>,
    pub ccyfee: Option<String>,
    pub time_reg: Option<i64>,
    pub time_block: Option<i64>,
    pub confirmations: Option<u32>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Emergency {
    /// Reasons the order stopped, e.g. `EXPIRED`, `LESS`, `MORE`, `LIMIT`
    #[serde(default)]
    pub status: Vec<String>,
    /// `NONE`, `EXCHANGE` or `REFUND`
    pub choice: Option<String>,
    pub repeat: Option<String>,
}

/// Deposit QR code from `POST qr`; `src` is a data URI.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct QrCode {
    pub title: String,
    pub src: String,
    #[serde(default, deserialize_with = "flag")]
    pub checked: bool,
}

/// Accepts `true`/`false` as well as `1`/`0`.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_i64().is_some_and(|n| n != 0)),
        Value::Null => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean flag, got {other}"
        ))),
    }
}
