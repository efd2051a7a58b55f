//! Lantern chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin lantern-server
//! cargo run --bin lantern-server -- --host 127.0.0.1 --port 3000
//! PORT=3000 cargo run --bin lantern-server
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use lantern_server::{
    config::ServerConfig,
    domain::{RateLimitPolicy, palette},
    ui::Server,
};
use lantern_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "lantern-server")]
#[command(about = "In-memory chat relay over HTTP and Server-Sent Events", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "LANTERN_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Seconds an uploaded image stays retrievable
    #[arg(long, env = "LANTERN_BLOB_TTL_SECS", default_value = "60")]
    blob_ttl_secs: u64,

    /// Seconds between sweeps of expired images
    #[arg(long, env = "LANTERN_SWEEP_INTERVAL_SECS", default_value = "30")]
    sweep_interval_secs: u64,

    /// Rate limiter window in milliseconds
    #[arg(long, env = "LANTERN_RATE_WINDOW_MS", default_value = "2000")]
    rate_window_ms: u32,

    /// Fast messages within the window before a sender is throttled
    #[arg(long, env = "LANTERN_RATE_THRESHOLD", default_value = "5")]
    rate_threshold: u32,

    /// Per-stream outbound queue capacity
    #[arg(long, env = "LANTERN_QUEUE_CAPACITY", default_value = "64")]
    queue_capacity: usize,

    /// Maximum request body size for image uploads, in bytes
    #[arg(long, env = "LANTERN_MAX_UPLOAD_BYTES", default_value = "10485760")]
    max_upload_bytes: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LANTERN_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            blob_ttl: Duration::from_secs(self.blob_ttl_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs.max(1)),
            rate_limit: RateLimitPolicy::new(i64::from(self.rate_window_ms), self.rate_threshold),
            queue_capacity: self.queue_capacity,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let named_colors = palette::preload();
    tracing::debug!("Loaded {} named colors", named_colors);

    let server = Server::new(args.server_config(), Arc::new(SystemClock));
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
