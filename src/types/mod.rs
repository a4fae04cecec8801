mod amount;
mod request;
mod response;

pub use amount::{Amount, CurrencyAmount, Direction, resolve_amount};
pub use request::{
    Affiliate, CreateOrderRequest, EmergencyChoice, EmergencyRequest, OrderRequest, OrderType,
    PriceRequest, SetEmailRequest,
};
pub use response::{
    Currency, Emergency, Envelope, Order, OrderLeg, OrderStatus, OrderTime, Price, PriceLeg,
    QrCode, Transaction,
};
