// RSA Decryption Implementation
// Textbook RSA: msg = cipher^d mod n

use super::bigint::{modexp, RsaBigInt};
use super::codec::integer_to_bytes;
use super::keygen::RsaPrivateKey;
use crate::error::RsaResult;

/// Decrypt a ciphertext integer with the private key
pub fn decrypt_integer(ciphertext: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaResult<RsaBigInt> {
    modexp(ciphertext, &private_key.d, &private_key.public.n)
}

/// Decrypt a ciphertext integer and recover the message bytes
pub fn decrypt_bytes(ciphertext: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaResult<Vec<u8>> {
    let m = decrypt_integer(ciphertext, private_key)?;
    Ok(integer_to_bytes(&m))
}

/// Decrypt ciphertext to a string, replacing invalid UTF-8
pub fn decrypt_to_string(ciphertext: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaResult<String> {
    let plaintext = decrypt_bytes(ciphertext, private_key)?;
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}
