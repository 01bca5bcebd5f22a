//! Room session synchronization server for collaborative code editing.
//!
//! Receives room events from clients and rebroadcasts resulting state to
//! every other connected client of the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin terakoya-server
//! ```

use clap::Parser;

use terakoya_server::ui::{ServerConfig, run};
use terakoya_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "terakoya-server", about = "Terakoya collaboration server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };
    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
