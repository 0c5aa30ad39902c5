// Responder Role
// Encrypts a message against a received public key and returns the ciphertext

use crate::error::{RsaError, RsaResult};
use crate::rsa::{bytes_to_integer, encrypt_integer};
use crate::util::truncate;

use super::wire::{encode_ciphertext, parse_public_key, KeyExchangeRequest, KeyExchangeResponse};

/// Largest modulus or exponent accepted from a peer
pub const DEFAULT_MAX_KEY_BITS: u64 = 16384;

/// Holds the message sent to every initiator unless a call supplies its own
#[derive(Debug, Clone)]
pub struct Responder {
    message: Vec<u8>,
    max_key_bits: u64,
}

impl Responder {
    pub fn new(message: impl Into<Vec<u8>>) -> Self {
        Self {
            message: message.into(),
            max_key_bits: DEFAULT_MAX_KEY_BITS,
        }
    }

    pub fn with_max_key_bits(mut self, bits: u64) -> Self {
        self.max_key_bits = bits;
        self
    }

    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Encrypt the configured message for a `"<n>+<e>"` public key payload
    pub fn respond(&self, public_key_payload: &str) -> RsaResult<String> {
        self.respond_with(public_key_payload, &self.message)
    }

    /// Encrypt `message` for a `"<n>+<e>"` public key payload
    pub fn respond_with(&self, public_key_payload: &str, message: &[u8]) -> RsaResult<String> {
        tracing::info!(
            public_key = truncate(public_key_payload, 4),
            "public key from initiator"
        );

        // Step 1: Split and parse the public key
        let public_key = parse_public_key(public_key_payload)?;

        // Exponentiation cost grows with both fields, so oversized keys are refused
        let key_bits = public_key.n.bits().max(public_key.e.bits());
        if key_bits > self.max_key_bits {
            return Err(RsaError::Protocol(format!(
                "public key of {} bits exceeds the {} bit limit",
                key_bits, self.max_key_bits
            )));
        }

        // Step 2: Encode the message as an integer
        let message_int = bytes_to_integer(message);

        // Step 3: c = m^e mod n
        let cipher_int = encrypt_integer(&message_int, &public_key)?;

        // Step 4: Decimal wire form
        let ciphertext = encode_ciphertext(&cipher_int);
        tracing::info!(
            encrypted_message = truncate(&ciphertext, 4),
            "sending encrypted message"
        );

        Ok(ciphertext)
    }

    /// Answer a request document, mapping malformed payloads to a rejection
    pub fn handle(&self, request: &KeyExchangeRequest) -> KeyExchangeResponse {
        match self.respond(&request.public_key) {
            Ok(ciphertext) => KeyExchangeResponse::ok(ciphertext),
            Err(e) => {
                if e.is_client_error() {
                    tracing::warn!(error = %e, "rejecting key exchange request");
                } else {
                    tracing::error!(error = %e, "failed to encrypt message");
                }
                KeyExchangeResponse::unprocessable(e.to_string())
            }
        }
    }
}
