// RSA Module - Main module file
// Exports the textbook RSA engine

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;

pub use bigint::{modexp, RsaBigInt};
pub use codec::{
    bytes_to_integer, integer_to_bytes, integer_to_decimal_string, parse_decimal_string,
};
pub use decrypt::{decrypt_bytes, decrypt_integer, decrypt_to_string};
pub use encrypt::{encrypt_bytes, encrypt_integer, encrypt_string};
pub use keygen::{
    generate_key_pair, generate_key_pair_with_rng, key_pair_from_primes, RsaPrivateKey,
    RsaPublicKey, MIN_KEY_BITS, PUBLIC_EXPONENT,
};
