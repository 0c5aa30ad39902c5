// Wire Payloads
// Text encodings of the public key and ciphertext, and the JSON documents carrying them

use serde::{Deserialize, Serialize};

use crate::error::{RsaError, RsaResult};
use crate::rsa::{integer_to_decimal_string, parse_decimal_string, RsaBigInt, RsaPublicKey};

/// Separator between the modulus and exponent in the public key payload
pub const KEY_DELIMITER: char = '+';

/// Serialize a public key as `"<n>+<e>"`
pub fn encode_public_key(key: &RsaPublicKey) -> String {
    format!(
        "{}{}{}",
        integer_to_decimal_string(&key.n),
        KEY_DELIMITER,
        integer_to_decimal_string(&key.e)
    )
}

/// Parse a `"<n>+<e>"` payload into a public key
pub fn parse_public_key(payload: &str) -> RsaResult<RsaPublicKey> {
    let mut fields = payload.split(KEY_DELIMITER);

    let (n, e) = match (fields.next(), fields.next(), fields.next()) {
        (Some(n), Some(e), None) => (n, e),
        (_, None, _) => {
            return Err(RsaError::Protocol(format!(
                "public key is missing the '{KEY_DELIMITER}' delimiter"
            )))
        }
        _ => {
            return Err(RsaError::Protocol(
                "public key must have exactly two fields".to_string(),
            ))
        }
    };

    let n = parse_decimal_string(n)
        .map_err(|e| RsaError::Protocol(format!("bad modulus field: {e}")))?;
    let e = parse_decimal_string(e)
        .map_err(|e| RsaError::Protocol(format!("bad exponent field: {e}")))?;

    Ok(RsaPublicKey::new(n, e))
}

pub fn encode_ciphertext(ciphertext: &RsaBigInt) -> String {
    integer_to_decimal_string(ciphertext)
}

/// Parse a ciphertext payload; a malformed numeral is a protocol violation
pub fn parse_ciphertext(payload: &str) -> RsaResult<RsaBigInt> {
    parse_decimal_string(payload)
        .map_err(|e| RsaError::Protocol(format!("bad ciphertext: {e}")))
}

/// Request document sent by the initiator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyExchangeRequest {
    #[serde(default)]
    pub public_key: String,
}

impl KeyExchangeRequest {
    pub fn new(public_key: &RsaPublicKey) -> Self {
        Self {
            public_key: encode_public_key(public_key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    /// The request was well-formed but its payload could not be processed
    Unprocessable,
}

/// Response document returned by the responder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyExchangeResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KeyExchangeResponse {
    pub fn ok(encrypted_message: String) -> Self {
        Self {
            status: ResponseStatus::Ok,
            encrypted_message: Some(encrypted_message),
            error: None,
        }
    }

    pub fn unprocessable(reason: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Unprocessable,
            encrypted_message: None,
            error: Some(reason.into()),
        }
    }
}
