// Message Codec
// Byte <-> integer conversion (big-endian, unpadded) and the base-10 wire form

use num_traits::Zero;

use super::bigint::RsaBigInt;
use crate::error::{RsaError, RsaResult};

/// Interpret bytes as a big-endian unsigned integer; empty input is zero
pub fn bytes_to_integer(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Minimal big-endian encoding; zero encodes as an empty sequence
pub fn integer_to_bytes(value: &RsaBigInt) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    value.to_bytes_be()
}

pub fn integer_to_decimal_string(value: &RsaBigInt) -> String {
    value.to_str_radix(10)
}

/// Parse a non-negative base-10 numeral
/// Signs, whitespace and digit separators are rejected
pub fn parse_decimal_string(text: &str) -> RsaResult<RsaBigInt> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RsaError::Parse(text.to_string()));
    }

    RsaBigInt::parse_bytes(text.as_bytes(), 10).ok_or_else(|| RsaError::Parse(text.to_string()))
}
