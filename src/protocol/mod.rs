// Protocol Module
// The two roles of the key exchange and their wire payloads

pub mod initiator;
pub mod responder;
pub mod wire;

pub use initiator::Initiator;
pub use responder::{Responder, DEFAULT_MAX_KEY_BITS};
pub use wire::{
    encode_ciphertext, encode_public_key, parse_ciphertext, parse_public_key, KeyExchangeRequest,
    KeyExchangeResponse, ResponseStatus,
};
