// Transport Module
// Moves the key exchange documents between the initiator and the responder

pub mod loopback;
pub mod tcp;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::RsaError;
use crate::protocol::{KeyExchangeRequest, KeyExchangeResponse};

pub use loopback::LoopbackTransport;
pub use tcp::{TcpServer, TcpTransport, MAX_FRAME_SIZE};

/// Errors raised while moving documents between the roles
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame of {size} bytes exceeds the {max} byte limit")]
    FrameTooLarge { size: usize, max: usize },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The responder answered with a non-ok status
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Rsa(#[from] RsaError),
}

/// One request/response round trip carrying a public key out and a ciphertext back
#[async_trait]
pub trait Transport: Send {
    async fn exchange(
        &mut self,
        request: &KeyExchangeRequest,
    ) -> Result<KeyExchangeResponse, TransportError>;
}
