//! Sign-then-send and validate-then-return, as two pure stages.
//!
//! [`build_and_sign`] turns a payload into the exact bytes that go on the wire plus the
//! headers authenticating them. [`validate`] turns a response [`Envelope`] into its `data`
//! or an [`Kind::Api`] error. [`crate::Client`] composes both around one HTTP call.

use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Result;
use crate::auth::{self, Credentials};
use crate::error::{Error, Kind};
use crate::types::Envelope;

/// A request body and the headers that sign it.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct SignedRequest {
    pub path: &'static str,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

/// Drops `null` and empty-string fields, so the signed and transmitted field sets match.
#[must_use]
pub fn prune_empty(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .filter(|(_, value)| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
        .collect()
}

/// Serializes `payload` as a JSON object, prunes empty fields and signs the resulting bytes.
pub fn build_and_sign<P: Serialize + ?Sized>(
    credentials: &Credentials,
    path: &'static str,
    payload: &P,
) -> Result<SignedRequest> {
    let fields = match serde_json::to_value(payload)? {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        other => {
            return Err(Error::validation(format!(
                "request body for `{path}` must be a JSON object, got {other}"
            )));
        }
    };

    let body = serde_json::to_vec(&prune_empty(fields))?;
    let headers = auth::create_headers(credentials, &body)?;

    Ok(SignedRequest {
        path,
        body,
        headers,
    })
}

/// Returns the envelope's `data` decoded as `D`, or the failure it reports.
pub fn validate<D: DeserializeOwned>(envelope: Envelope) -> Result<D> {
    if !envelope.is_success() {
        #[cfg(feature = "tracing")]
        tracing::warn!(code = envelope.code, msg = %envelope.msg, "API returned an error envelope");

        return Err(Error::api(envelope.code, envelope.msg));
    }

    decode(envelope.data)
}

#[cfg(not(feature = "tracing"))]
fn decode<D: DeserializeOwned>(data: Value) -> Result<D> {
    serde_json::from_value(data).map_err(|e| Error::with_source(Kind::Internal, e))
}

#[cfg(feature = "tracing")]
fn decode<D: DeserializeOwned>(data: Value) -> Result<D> {
    let mut ignored = Vec::new();
    let decoded = {
        let mut record = |path: serde_ignored::Path<'_>| ignored.push(path.to_string());
        let deserializer = serde_ignored::Deserializer::new(data, &mut record);
        serde_path_to_error::deserialize(deserializer)
    };

    let decoded = decoded.map_err(|e| {
        tracing::error!(path = %e.path(), "response data did not match the expected shape");
        Error::with_source(Kind::Internal, e)
    })?;

    if !ignored.is_empty() {
        tracing::debug!(fields = ?ignored, "ignored unknown response fields");
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;
    use crate::error::Api;

    fn credentials() -> Credentials {
        Credentials::new("key", SecretString::from("secret".to_owned())).expect("credentials")
    }

    fn envelope(value: Value) -> Envelope {
        serde_json::from_value(value).expect("envelope")
    }

    #[test]
    fn prune_empty_should_drop_null_and_empty_strings() {
        let fields = json!({
            "id": "ABC",
            "tag": "",
            "address": null,
            "afftax": 0,
            "flag": false,
            "nested": {}
        });
        let Value::Object(fields) = fields else {
            unreachable!("literal is an object")
        };

        let pruned = prune_empty(fields);

        assert_eq!(
            Value::Object(pruned),
            json!({"id": "ABC", "afftax": 0, "flag": false, "nested": {}})
        );
    }

    #[test]
    fn build_and_sign_should_sign_transmitted_bytes() {
        let creds = credentials();
        let payload = json!({"id": "ABC", "token": "tok", "address": null, "email": ""});

        let signed = build_and_sign(&creds, "order", &payload).expect("signed");

        assert_eq!(signed.body, br#"{"id":"ABC","token":"tok"}"#);
        assert_eq!(
            signed.headers[auth::API_SIGN],
            creds.sign(&signed.body).expect("signature").as_str()
        );
    }

    #[test]
    fn build_and_sign_should_send_empty_object_without_fields() {
        let signed = build_and_sign(&credentials(), "ccies", &Map::new()).expect("signed");

        assert_eq!(signed.body, b"{}");
    }

    #[test]
    fn build_and_sign_should_reject_non_objects() {
        let err = build_and_sign(&credentials(), "ccies", &json!([1, 2])).expect_err("array");

        assert_eq!(err.kind(), Kind::Validation);
    }

    #[test]
    fn validate_should_return_data_unchanged() {
        let data = json!({"from": {"code": "ETH"}, "extra": [1, 2, 3]});

        let returned: Value =
            validate(envelope(json!({"code": 0, "msg": "OK", "data": data.clone()})))
                .expect("success");

        assert_eq!(returned, data);
    }

    #[test]
    fn validate_should_surface_api_errors() {
        let err = validate::<Value>(envelope(
            json!({"code": 1, "msg": "Invalid signature", "data": {}}),
        ))
        .expect_err("failing envelope");

        assert_eq!(err.kind(), Kind::Api);
        let api = err.downcast_ref::<Api>().expect("api source");
        assert_eq!(api.code, 1);
        assert_eq!(api.msg, "Invalid signature");
    }

    #[test]
    fn validate_should_reject_zero_code_with_other_message() {
        let err = validate::<Value>(envelope(json!({"code": 0, "msg": "Busy", "data": null})))
            .expect_err("msg must be OK");

        assert_eq!(err.kind(), Kind::Api);
    }

    #[test]
    fn validate_should_report_shape_mismatch() {
        let err = validate::<bool>(envelope(json!({"code": 0, "msg": "OK", "data": {"a": 1}})))
            .expect_err("object is not a bool");

        assert_eq!(err.kind(), Kind::Internal);
    }

    #[cfg(feature = "tracing")]
    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Leg {
        code: String,
        amount: Option<String>,
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn decode_should_tolerate_unknown_fields() {
        let leg: Leg = validate(envelope(json!({
            "code": 0,
            "msg": "OK",
            "data": {"code": "ETH", "amount": "0.1", "network": "ETH", "extra": {"a": 1}}
        })))
        .expect("unknown fields are ignored");

        assert_eq!(
            leg,
            Leg {
                code: "ETH".to_owned(),
                amount: Some("0.1".to_owned())
            }
        );
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn decode_should_name_mismatched_path() {
        let err = validate::<Leg>(envelope(json!({
            "code": 0,
            "msg": "OK",
            "data": {"code": 5, "amount": null}
        })))
        .expect_err("code must be a string");

        assert_eq!(err.kind(), Kind::Internal);
        assert!(
            err.to_string().contains("code"),
            "error should name the failing field: {err}"
        );
    }
}
