use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use textbook_rsa::config::{SessionConfig, DEFAULT_MESSAGE};
use textbook_rsa::protocol::{Initiator, Responder};
use textbook_rsa::transport::{LoopbackTransport, TcpServer, TcpTransport};
use textbook_rsa::util::Pacing;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Textbook RSA key exchange demo
#[derive(Parser, Debug)]
#[command(name = "textbook-rsa")]
#[command(about = "Unpadded RSA key exchange between an initiator and a responder")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Pause between protocol steps in milliseconds (0 disables)
    #[arg(long, default_value = "2000", global = true)]
    pace_ms: u64,

    /// Read/write timeout in seconds
    #[arg(long, default_value = "15", global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the responder over TCP
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = "0.0.0.0:8080")]
        bind: String,

        /// Message encrypted for every initiator
        #[arg(short, long, default_value = DEFAULT_MESSAGE)]
        message: String,
    },
    /// Run the initiator against a TCP responder
    Request {
        /// Responder address
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        server: String,

        /// Modulus size in bits
        #[arg(short, long, default_value = "1024")]
        bits: u32,
    },
    /// Run both roles in this process
    Demo {
        /// Modulus size in bits
        #[arg(short, long, default_value = "1024")]
        bits: u32,

        /// Message the responder encrypts
        #[arg(short, long, default_value = DEFAULT_MESSAGE)]
        message: String,
    },
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        let base = SessionConfig::default()
            .with_pacing(Pacing::from_millis(self.pace_ms))
            .with_io_timeout(std::time::Duration::from_secs(self.timeout_secs));

        match &self.command {
            Command::Serve { bind, message } => {
                base.with_bind_address(bind).with_message(message.as_bytes())
            }
            Command::Request { server, bits } => {
                base.with_server_address(server).with_key_bits(*bits)
            }
            Command::Demo { bits, message } => {
                base.with_key_bits(*bits).with_message(message.as_bytes())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = args.session_config();
    if let Err(reason) = config.validate() {
        bail!("invalid configuration: {reason}");
    }

    match args.command {
        Command::Serve { .. } => serve(&config).await,
        Command::Request { .. } => request(&config).await,
        Command::Demo { .. } => demo(&config).await,
    }
}

async fn serve(config: &SessionConfig) -> Result<()> {
    let server = TcpServer::bind(&config.bind_address, Responder::new(config.message.clone()))
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?
        .with_pacing(config.pacing)
        .with_io_timeout(config.io_timeout);

    tracing::info!("Starting responder, listening on {}", server.local_addr()?);
    server.run().await?;
    Ok(())
}

async fn request(config: &SessionConfig) -> Result<()> {
    let initiator = Initiator::generate(config.key_bits).context("failed to create private key")?;
    let mut transport =
        TcpTransport::new(config.server_address.clone()).with_io_timeout(config.io_timeout);

    initiator
        .run(&mut transport, &config.pacing)
        .await
        .context("key exchange failed")?;
    Ok(())
}

async fn demo(config: &SessionConfig) -> Result<()> {
    let initiator = Initiator::generate(config.key_bits).context("failed to create private key")?;
    let mut transport =
        LoopbackTransport::new(Responder::new(config.message.clone())).with_pacing(config.pacing);

    let recovered = initiator
        .run(&mut transport, &config.pacing)
        .await
        .context("key exchange failed")?;

    if recovered != config.message {
        tracing::warn!("recovered message differs; it may not fit below the modulus");
    }
    Ok(())
}
