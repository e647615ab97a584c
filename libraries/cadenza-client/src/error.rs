//! Mapping of HTTP and envelope failures onto `CatalogError`.

use cadenza_core::CatalogError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{ApiEnvelope, CODE_SUCCESS, CODE_UNAUTHORIZED};

/// Classify a transport-level reqwest failure.
pub(crate) fn transport_error(e: reqwest::Error) -> CatalogError {
    if e.is_decode() {
        CatalogError::Decode(e.to_string())
    } else {
        CatalogError::Network(e.to_string())
    }
}

/// Turn an HTTP status and raw body into the envelope's payload.
///
/// HTTP 401 and envelope code 401 both mean the login is gone. Any other
/// non-200 code is a rejection carrying the server's message.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<T, CatalogError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(CatalogError::AuthExpired);
    }

    let envelope: ApiEnvelope<Value> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            return Err(CatalogError::Decode(format!("Malformed envelope: {}", e)));
        }
        Err(_) => {
            return Err(CatalogError::rejected(
                i32::from(status.as_u16()),
                status_message(status, body),
            ));
        }
    };

    match envelope.code {
        CODE_SUCCESS => {
            let data = envelope.data.unwrap_or(Value::Null);
            serde_json::from_value(data)
                .map_err(|e| CatalogError::Decode(format!("Unexpected payload: {}", e)))
        }
        CODE_UNAUTHORIZED => Err(CatalogError::AuthExpired),
        code => Err(CatalogError::rejected(
            code,
            envelope.message.unwrap_or_default(),
        )),
    }
}

fn status_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string()
    } else {
        body.to_string()
    }
}
