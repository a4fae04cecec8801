use bon::Builder;
use rust_decimal::Decimal;
use serde::Serialize;
use strum_macros::Display;

use crate::Result;
use crate::error::Error;
use crate::types::{Amount, CurrencyAmount, Direction, resolve_amount};

/// Rate type of an exchange.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderType {
    Fixed,
    #[default]
    Float,
}

/// Resolution for an order in emergency state.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum EmergencyChoice {
    /// Continue the exchange at the current market rate
    Exchange,
    /// Send the deposit back to a refund address
    Refund,
}

/// Referral program parameters, attached to quotes and new orders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Affiliate {
    pub refcode: String,
    pub afftax: Option<Decimal>,
}

impl Affiliate {
    #[must_use]
    pub fn new<S: Into<String>>(refcode: S) -> Self {
        Self {
            refcode: refcode.into(),
            afftax: None,
        }
    }

    #[must_use]
    pub fn with_afftax(mut self, afftax: Decimal) -> Self {
        self.afftax = Some(afftax);
        self
    }
}

/// Input for `POST price`.
#[derive(Clone, Debug, Builder)]
pub struct PriceRequest {
    pub from: CurrencyAmount,
    pub to: CurrencyAmount,
    #[builder(default)]
    pub order_type: OrderType,
}

impl PriceRequest {
    pub(crate) fn payload<'req>(
        &'req self,
        affiliate: Option<&'req Affiliate>,
    ) -> Result<QuotePayload<'req>> {
        QuotePayload::new(self.order_type, &self.from, &self.to, affiliate)
    }
}

/// Input for `POST create`.
///
/// A destination tag can be passed in `tag`, or appended to `to_address` as
/// `address:tag`; the latter is interpreted by the exchange, not by this crate.
#[derive(Clone, Debug, Builder)]
pub struct CreateOrderRequest {
    pub from: CurrencyAmount,
    pub to: CurrencyAmount,
    #[builder(into)]
    pub to_address: String,
    #[builder(default)]
    pub order_type: OrderType,
    #[builder(into)]
    pub tag: Option<String>,
}

impl CreateOrderRequest {
    pub(crate) fn payload<'req>(
        &'req self,
        affiliate: Option<&'req Affiliate>,
    ) -> Result<QuotePayload<'req>> {
        let mut payload = QuotePayload::new(self.order_type, &self.from, &self.to, affiliate)?;
        payload.to_address = Some(&self.to_address);
        payload.tag = self.tag.as_deref();
        Ok(payload)
    }
}

/// Order id and the security token returned when the order was created.
#[derive(Clone, Debug, Builder, Serialize)]
pub struct OrderRequest {
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub token: String,
}

/// Input for `POST emergency`.
///
/// The exchange rejects `Refund` without an `address`; that rule is not checked locally.
#[derive(Clone, Debug, Builder, Serialize)]
pub struct EmergencyRequest {
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub token: String,
    pub choice: EmergencyChoice,
    #[builder(into)]
    pub address: Option<String>,
}

/// Input for `POST setEmail`.
#[derive(Clone, Debug, Builder, Serialize)]
pub struct SetEmailRequest {
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub token: String,
    #[builder(into)]
    pub email: String,
}

/// Wire body shared by `price` and `create`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuotePayload<'req> {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub from_ccy: &'req str,
    pub to_ccy: &'req str,
    pub direction: Direction,
    pub amount: &'req Amount,
    pub to_address: Option<&'req str>,
    pub tag: Option<&'req str>,
    pub refcode: Option<&'req str>,
    pub afftax: Option<Decimal>,
}

impl<'req> QuotePayload<'req> {
    fn new(
        order_type: OrderType,
        from: &'req CurrencyAmount,
        to: &'req CurrencyAmount,
        affiliate: Option<&'req Affiliate>,
    ) -> Result<Self> {
        let (direction, amount) = resolve_amount(from, to).ok_or_else(|| {
            Error::validation(format!(
                "an amount is required on one side of {from} -> {to}"
            ))
        })?;

        Ok(Self {
            order_type,
            from_ccy: &from.code,
            to_ccy: &to.code,
            direction,
            amount,
            to_address: None,
            tag: None,
            refcode: affiliate.map(|a| a.refcode.as_str()),
            afftax: affiliate.and_then(|a| a.afftax),
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::error::Kind;

    fn price(from: &str, to: &str) -> PriceRequest {
        PriceRequest::builder()
            .from(from.parse().expect("valid from"))
            .to(to.parse().expect("valid to"))
            .build()
    }

    #[test]
    fn price_payload_should_take_amount_from_source() {
        let request = price("0.1 ETH", "BTC");

        let payload = serde_json::to_value(request.payload(None).expect("payload")).expect("json");

        assert_eq!(
            payload,
            json!({
                "type": "float",
                "fromCcy": "ETH",
                "toCcy": "BTC",
                "direction": "from",
                "amount": "0.1",
                "toAddress": null,
                "tag": null,
                "refcode": null,
                "afftax": null
            })
        );
    }

    #[test]
    fn price_payload_should_take_amount_from_destination() {
        let request = price("ETH", "0.1 BTC");

        let payload = request.payload(None).expect("payload");

        assert_eq!(payload.direction, Direction::To);
        assert_eq!(payload.amount.as_str(), "0.1");
        assert_eq!(payload.from_ccy, "ETH");
        assert_eq!(payload.to_ccy, "BTC");
    }

    #[test]
    fn price_payload_without_amount_should_fail() {
        let err = price("ETH", "BTC")
            .payload(None)
            .expect_err("no amount on either side");

        assert_eq!(err.kind(), Kind::Validation);
    }

    #[test]
    fn create_payload_should_carry_address_tag_and_affiliate() {
        let affiliate = Affiliate::new("ref42").with_afftax(dec!(0.5));
        let request = CreateOrderRequest::builder()
            .from("ETH".parse().expect("valid from"))
            .to("100 XRP".parse().expect("valid to"))
            .to_address("rExampleAddress")
            .tag("123456")
            .order_type(OrderType::Fixed)
            .build();

        let payload = request.payload(Some(&affiliate)).expect("payload");

        assert_eq!(payload.order_type, OrderType::Fixed);
        assert_eq!(payload.direction, Direction::To);
        assert_eq!(payload.to_address, Some("rExampleAddress"));
        assert_eq!(payload.tag, Some("123456"));
        assert_eq!(payload.refcode, Some("ref42"));
        assert_eq!(payload.afftax, Some(dec!(0.5)));
    }

    #[test]
    fn emergency_should_serialize_choice_uppercase() {
        let request = EmergencyRequest::builder()
            .id("ABC123")
            .token("tok")
            .choice(EmergencyChoice::Refund)
            .address("bc1qrefund")
            .build();

        assert_eq!(
            serde_json::to_value(&request).expect("json"),
            json!({"id": "ABC123", "token": "tok", "choice": "REFUND", "address": "bc1qrefund"})
        );
        assert_eq!(EmergencyChoice::Exchange.to_string(), "EXCHANGE");
    }
}
