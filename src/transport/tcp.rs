// TCP Transport
// Length-prefixed JSON frames: [u32 big-endian length] + [JSON body]

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::{Transport, TransportError};
use crate::protocol::{KeyExchangeRequest, KeyExchangeResponse, Responder};
use crate::util::Pacing;

/// Upper bound on a single JSON document
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(15);

/// Serialize `value` and write it as one frame
pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(value)?;
    if body.len() > MAX_FRAME_SIZE {
        return Err(TransportError::FrameTooLarge {
            size: body.len(),
            max: MAX_FRAME_SIZE,
        });
    }

    writer.write_u32(body.len() as u32).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame body without decoding it
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let size = reader.read_u32().await? as usize;
    if size > MAX_FRAME_SIZE {
        return Err(TransportError::FrameTooLarge {
            size,
            max: MAX_FRAME_SIZE,
        });
    }

    let mut body = vec![0u8; size];
    reader.read_exact(&mut body).await?;
    Ok(body)
}

async fn with_timeout<F, T>(limit: Duration, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| TransportError::Timeout(limit))?
}

/// Responder side: answers one key exchange per connection
pub struct TcpServer {
    listener: TcpListener,
    responder: Responder,
    pacing: Pacing,
    io_timeout: Duration,
}

impl TcpServer {
    pub async fn bind(address: &str, responder: Responder) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(address).await?;
        Ok(Self {
            listener,
            responder,
            pacing: Pacing::disabled(),
            io_timeout: DEFAULT_IO_TIMEOUT,
        })
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the listener fails
    pub async fn run(self) -> Result<(), TransportError> {
        tracing::info!(
            message_bytes = self.responder.message().len(),
            pacing_ms = self.pacing.delay().as_millis() as u64,
            timeout_secs = self.io_timeout.as_secs(),
            "responder ready"
        );

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            let responder = self.responder.clone();
            let pacing = self.pacing;
            let io_timeout = self.io_timeout;

            tokio::spawn(async move {
                if let Err(e) = serve_connection(stream, responder, pacing, io_timeout).await {
                    tracing::warn!(%peer, error = %e, "connection failed");
                }
            });
        }
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    responder: Responder,
    pacing: Pacing,
    io_timeout: Duration,
) -> Result<(), TransportError> {
    let body = with_timeout(io_timeout, read_frame(&mut stream)).await?;
    tracing::info!("received request");

    pacing.pause().await;

    let response = match serde_json::from_slice::<KeyExchangeRequest>(&body) {
        // Exponentiation is CPU-bound and sized by the peer
        Ok(request) => tokio::task::spawn_blocking(move || responder.handle(&request))
            .await
            .map_err(|e| TransportError::Io(std::io::Error::other(e)))?,
        Err(e) => {
            tracing::warn!(error = %e, "undecodable request document");
            KeyExchangeResponse::unprocessable(format!("invalid request document: {e}"))
        }
    };

    pacing.pause().await;

    with_timeout(io_timeout, write_frame(&mut stream, &response)).await
}

/// Initiator side: one connection per exchange
#[derive(Debug, Clone)]
pub struct TcpTransport {
    address: String,
    io_timeout: Duration,
}

impl TcpTransport {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }

    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn exchange(
        &mut self,
        request: &KeyExchangeRequest,
    ) -> Result<KeyExchangeResponse, TransportError> {
        let connect = async {
            TcpStream::connect(&self.address)
                .await
                .map_err(TransportError::from)
        };
        let mut stream = with_timeout(self.io_timeout, connect).await?;
        tracing::debug!(address = %self.address, "connected to responder");

        with_timeout(self.io_timeout, write_frame(&mut stream, request)).await?;

        // The responder may pause while encrypting, so the wait covers both legs
        let body = with_timeout(self.io_timeout, read_frame(&mut stream)).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ResponseStatus;

    #[tokio::test]
    async fn test_frame_round_trip() {
        let (mut client, mut server) = tokio::io::duplex(4096);
        let request = KeyExchangeRequest {
            public_key: "3233+17".to_string(),
        };

        write_frame(&mut client, &request).await.unwrap();
        let body = read_frame(&mut server).await.unwrap();
        let decoded: KeyExchangeRequest = serde_json::from_slice(&body).unwrap();

        assert_eq!(decoded, request);
    }

    #[tokio::test]
    async fn test_read_frame_rejects_oversized_length() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_u32(MAX_FRAME_SIZE as u32 + 1).await.unwrap();

        let result = read_frame(&mut server).await;
        assert!(matches!(result, Err(TransportError::FrameTooLarge { .. })));
    }

    #[tokio::test]
    async fn test_read_frame_truncated_body() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_u32(10).await.unwrap();
        client.write_all(b"{}").await.unwrap();
        drop(client);

        assert!(matches!(
            read_frame(&mut server).await,
            Err(TransportError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_server_rejects_undecodable_document() {
        let server = TcpServer::bind("127.0.0.1:0", Responder::new("hi"))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_u32(8).await.unwrap();
        stream.write_all(b"not json").await.unwrap();

        let body = read_frame(&mut stream).await.unwrap();
        let response: KeyExchangeResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.status, ResponseStatus::Unprocessable);
    }

    #[tokio::test]
    async fn test_client_times_out_on_silent_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without answering
        let _holder = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let mut transport =
            TcpTransport::new(addr.to_string()).with_io_timeout(Duration::from_millis(100));
        let result = transport
            .exchange(&KeyExchangeRequest {
                public_key: "3233+17".to_string(),
            })
            .await;

        assert!(matches!(result, Err(TransportError::Timeout(_))));
    }
}
