// RSA Encryption Implementation
// Textbook RSA: cipher = msg^e mod n, no padding and no chunking

use super::bigint::{modexp, RsaBigInt};
use super::codec::bytes_to_integer;
use super::keygen::RsaPublicKey;
use crate::error::RsaResult;

/// Encrypt a message integer with the public key
/// Values not strictly below n do not survive a round trip
pub fn encrypt_integer(message: &RsaBigInt, public_key: &RsaPublicKey) -> RsaResult<RsaBigInt> {
    if message >= &public_key.n {
        tracing::warn!(
            modulus_bits = public_key.n.bits(),
            message_bits = message.bits(),
            "message does not fit below the modulus and will not decrypt to itself"
        );
    }

    // Compute c = m^e mod n
    modexp(message, &public_key.e, &public_key.n)
}

/// Encrypt bytes using RSA public key
/// Returns the ciphertext integer
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> RsaResult<RsaBigInt> {
    encrypt_integer(&bytes_to_integer(plaintext), public_key)
}

/// Encrypt a string using RSA public key
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> RsaResult<RsaBigInt> {
    encrypt_bytes(plaintext.as_bytes(), public_key)
}
