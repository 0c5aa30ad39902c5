// Session Configuration
// Settings shared by the responder server, the initiator client and the in-process demo

use std::time::Duration;

use crate::rsa::MIN_KEY_BITS;
use crate::util::Pacing;

/// Message the responder encrypts when none is supplied
pub const DEFAULT_MESSAGE: &str = "Hello from the other side!";

/// Configuration for one key exchange session
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Modulus size of the initiator's key pair
    pub key_bits: u32,
    /// Message the responder encrypts
    pub message: Vec<u8>,
    pub pacing: Pacing,
    pub bind_address: String,
    pub server_address: String,
    /// Per-connection read/write timeout
    pub io_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key_bits: 1024,
            message: DEFAULT_MESSAGE.as_bytes().to_vec(),
            pacing: Pacing::new(Duration::from_secs(2)),
            bind_address: "0.0.0.0:8080".to_string(),
            server_address: "127.0.0.1:8080".to_string(),
            io_timeout: Duration::from_secs(15),
        }
    }
}

impl SessionConfig {
    pub fn with_key_bits(mut self, bits: u32) -> Self {
        self.key_bits = bits;
        self
    }

    pub fn with_message(mut self, message: impl Into<Vec<u8>>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = address.into();
        self
    }

    pub fn with_server_address(mut self, address: impl Into<String>) -> Self {
        self.server_address = address.into();
        self
    }

    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Check settings that would otherwise fail deep inside a session
    pub fn validate(&self) -> Result<(), String> {
        if self.key_bits < MIN_KEY_BITS || self.key_bits % 2 != 0 {
            return Err(format!(
                "key size must be even and at least {} bits, got {}",
                MIN_KEY_BITS, self.key_bits
            ));
        }
        if self.io_timeout.is_zero() {
            return Err("I/O timeout must be non-zero".to_string());
        }
        Ok(())
    }
}
