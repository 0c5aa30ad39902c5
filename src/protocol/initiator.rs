// Initiator Role
// Generates a key pair, publishes the public half and decrypts the reply

use crate::error::{RsaError, RsaResult};
use crate::rsa::{decrypt_bytes, generate_key_pair, RsaPrivateKey, RsaPublicKey};
use crate::transport::{Transport, TransportError};
use crate::util::{render_message, truncate, Pacing};

use super::wire::{
    encode_public_key, parse_ciphertext, KeyExchangeRequest, KeyExchangeResponse, ResponseStatus,
};

/// Owns the session key pair; the private half never leaves this type
#[derive(Debug, Clone)]
pub struct Initiator {
    key: RsaPrivateKey,
}

impl Initiator {
    /// Create an initiator with a fresh key pair of `key_bits` bits
    pub fn generate(key_bits: u32) -> RsaResult<Self> {
        tracing::info!(bits = key_bits, "generating private key");
        Ok(Self::from_key(generate_key_pair(key_bits)?))
    }

    pub fn from_key(key: RsaPrivateKey) -> Self {
        Self { key }
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        self.key.public_key()
    }

    /// The `"<n>+<e>"` payload handed to the transport
    pub fn public_key_payload(&self) -> String {
        encode_public_key(self.public_key())
    }

    pub fn request(&self) -> KeyExchangeRequest {
        KeyExchangeRequest::new(self.public_key())
    }

    /// Parse a decimal ciphertext payload and decrypt it to message bytes
    pub fn recover(&self, ciphertext_payload: &str) -> RsaResult<Vec<u8>> {
        let ciphertext = parse_ciphertext(ciphertext_payload)?;
        decrypt_bytes(&ciphertext, &self.key)
    }

    /// Decrypt the ciphertext carried by an accepted response
    pub fn recover_response(&self, response: &KeyExchangeResponse) -> RsaResult<Vec<u8>> {
        match (&response.status, &response.encrypted_message) {
            (ResponseStatus::Ok, Some(ciphertext)) => self.recover(ciphertext),
            (ResponseStatus::Ok, None) => Err(RsaError::Protocol(
                "response carries no encrypted message".to_string(),
            )),
            (ResponseStatus::Unprocessable, _) => Err(RsaError::Protocol(format!(
                "responder rejected the request: {}",
                response.error.as_deref().unwrap_or("no reason given")
            ))),
        }
    }

    /// Run one full exchange over `transport` and return the recovered message
    pub async fn run<T: Transport>(
        &self,
        transport: &mut T,
        pacing: &Pacing,
    ) -> Result<Vec<u8>, TransportError> {
        let request = self.request();
        tracing::info!(
            public_key = truncate(&request.public_key, 2),
            "sending public key to responder"
        );

        let response = transport.exchange(&request).await?;
        if response.status != ResponseStatus::Ok {
            return Err(TransportError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "no reason given".to_string()),
            ));
        }

        if let Some(ciphertext) = &response.encrypted_message {
            tracing::info!(
                encrypted_message = truncate(ciphertext, 2),
                "received message from responder"
            );
        }
        pacing.pause().await;

        tracing::info!("decrypting message");
        let message = self.recover_response(&response)?;
        tracing::info!(message = %render_message(&message), "decrypted message");

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Responder;
    use crate::rsa::bigint::from_u64;

    fn toy_initiator() -> Initiator {
        Initiator::from_key(RsaPrivateKey {
            public: RsaPublicKey::new(from_u64(3233), from_u64(17)),
            d: from_u64(2753),
            primes: [from_u64(61), from_u64(53)],
        })
    }

    #[test]
    fn test_public_key_payload() {
        assert_eq!(toy_initiator().public_key_payload(), "3233+17");
    }

    #[test]
    fn test_recover() {
        assert_eq!(toy_initiator().recover("2790").unwrap(), b"A");
    }

    #[test]
    fn test_recover_rejects_bad_ciphertext() {
        let initiator = toy_initiator();
        assert!(matches!(initiator.recover("27x0"), Err(RsaError::Protocol(_))));
        assert!(matches!(initiator.recover(""), Err(RsaError::Protocol(_))));
    }

    #[test]
    fn test_recover_response_status() {
        let initiator = toy_initiator();
        let rejected = KeyExchangeResponse::unprocessable("bad key");
        assert!(matches!(
            initiator.recover_response(&rejected),
            Err(RsaError::Protocol(_))
        ));

        let accepted = KeyExchangeResponse::ok("2790".to_string());
        assert_eq!(initiator.recover_response(&accepted).unwrap(), b"A");
    }

    struct RejectingTransport;

    #[async_trait::async_trait]
    impl Transport for RejectingTransport {
        async fn exchange(
            &mut self,
            _request: &KeyExchangeRequest,
        ) -> Result<KeyExchangeResponse, TransportError> {
            Ok(KeyExchangeResponse::unprocessable("bad key"))
        }
    }

    #[tokio::test]
    async fn test_run_surfaces_rejection() {
        let result = toy_initiator()
            .run(&mut RejectingTransport, &Pacing::disabled())
            .await;
        assert!(matches!(result, Err(TransportError::Rejected(reason)) if reason == "bad key"));
    }

    #[test]
    fn test_end_to_end_64_bit() {
        let initiator = Initiator::generate(64).unwrap();
        let responder = Responder::new("hi");

        let ciphertext = responder.respond(&initiator.public_key_payload()).unwrap();
        let recovered = initiator.recover(&ciphertext).unwrap();

        assert_eq!(recovered, b"hi");
    }
}
