// Loopback Transport
// Delivers requests straight to an in-process responder

use async_trait::async_trait;

use super::{Transport, TransportError};
use crate::protocol::{KeyExchangeRequest, KeyExchangeResponse, Responder};
use crate::util::Pacing;

/// In-process transport used by the demo and by tests
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    responder: Responder,
    pacing: Pacing,
}

impl LoopbackTransport {
    pub fn new(responder: Responder) -> Self {
        Self {
            responder,
            pacing: Pacing::disabled(),
        }
    }

    /// Pause before and after the responder runs, as a remote peer would
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn exchange(
        &mut self,
        request: &KeyExchangeRequest,
    ) -> Result<KeyExchangeResponse, TransportError> {
        tracing::info!("responder received request");
        self.pacing.pause().await;
        let response = self.responder.handle(request);
        self.pacing.pause().await;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Initiator, ResponseStatus};

    #[tokio::test]
    async fn test_loopback_round_trip() {
        let initiator = Initiator::generate(256).unwrap();
        let mut transport = LoopbackTransport::new(Responder::new("Hello from the other side!"));

        let message = initiator
            .run(&mut transport, &Pacing::disabled())
            .await
            .unwrap();

        assert_eq!(message, b"Hello from the other side!");
    }

    #[tokio::test]
    async fn test_loopback_malformed_request() {
        let mut transport = LoopbackTransport::new(Responder::new("hi"));
        let response = transport
            .exchange(&KeyExchangeRequest {
                public_key: "123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.status, ResponseStatus::Unprocessable);
    }
}
