//! Textbook (unpadded) RSA key exchange.
//!
//! An [`Initiator`](protocol::Initiator) generates a key pair and publishes the
//! public half as `"<n>+<e>"`. A [`Responder`](protocol::Responder) encrypts a
//! message against it with `m^e mod n` and returns the decimal ciphertext,
//! which the initiator decrypts with `c^d mod n`.
//!
//! There is no padding and no chunking: a message whose big-endian integer is
//! not below the modulus does not survive the round trip. This is a
//! demonstration, not a usable cryptosystem.

pub mod config;
pub mod error;
pub mod protocol;
pub mod rsa;
pub mod transport;
pub mod util;

pub use config::SessionConfig;
pub use error::{RsaError, RsaResult};
