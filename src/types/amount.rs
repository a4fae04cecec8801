use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use strum_macros::Display;

use crate::Result;
use crate::error::Error;

/// A positive amount, kept exactly as it was written.
///
/// The text is what gets signed and sent. It must already be in canonical decimal form,
/// so inputs the decimal parser would rewrite (`+5`, `1_000`, `.5`, more than 28
/// fractional digits) are rejected instead of silently changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Amount {
    text: String,
    value: Decimal,
}

impl Amount {
    pub fn parse(text: &str) -> Result<Amount> {
        let value = Decimal::from_str(text)
            .map_err(|e| Error::validation(format!("invalid amount `{text}`: {e}")))?;

        if value.to_string() != text {
            return Err(Error::validation(format!(
                "amount `{text}` is not a plain decimal number"
            )));
        }
        if value <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "amount `{text}` must be greater than zero"
            )));
        }

        Ok(Self {
            text: text.to_owned(),
            value,
        })
    }

    pub fn from_decimal(value: Decimal) -> Result<Amount> {
        Self::parse(&value.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn value(&self) -> Decimal {
        self.value
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// Currency code with an optional amount, as typed by a user: `"0.1 ETH"` or `"ETH"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyAmount {
    pub code: String,
    pub amount: Option<Amount>,
}

impl CurrencyAmount {
    #[must_use]
    pub fn new<S: Into<String>>(code: S, amount: Option<Amount>) -> Self {
        Self {
            code: code.into(),
            amount,
        }
    }

    /// Parses `"<amount> <CODE>"` or `"<CODE>"`. The amount, when present, precedes the
    /// code and is separated from it by the first space.
    pub fn parse(value: &str) -> Result<CurrencyAmount> {
        let value = value.trim();

        let (amount, code) = match value.split_once(' ') {
            Some((amount, code)) => (Some(Amount::parse(amount)?), code.trim()),
            None => (None, value),
        };

        if code.is_empty() {
            return Err(Error::validation(format!(
                "missing currency code in `{value}`"
            )));
        }

        Ok(Self::new(code, amount))
    }
}

impl FromStr for CurrencyAmount {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CurrencyAmount::parse(s)
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.amount {
            Some(amount) => write!(f, "{amount} {}", self.code),
            None => f.write_str(&self.code),
        }
    }
}

/// Which side of the pair the user-specified amount belongs to.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    From,
    To,
}

/// Picks the side carrying the amount. The source side wins when both carry one.
#[must_use]
pub fn resolve_amount<'req>(
    from: &'req CurrencyAmount,
    to: &'req CurrencyAmount,
) -> Option<(Direction, &'req Amount)> {
    from.amount
        .as_ref()
        .map(|amount| (Direction::From, amount))
        .or_else(|| to.amount.as_ref().map(|amount| (Direction::To, amount)))
}
