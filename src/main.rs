//! Process bootstrap: configuration, logging, storage client, server.
//!
//! Run locally without AWS:
//!   STORE_BACKEND=memory RUST_LOG=info cargo run
//!
//! Try:
//!   curl -X POST http://localhost:3000/content \
//!        -H 'x-authorizer-claims: {"sub":"abc-123"}' \
//!        -d '{"content":"hello"}'
//!   curl http://localhost:3000/content -H 'x-authorizer-claims: {"sub":"abc-123"}'

use std::process::ExitCode;
use std::sync::Arc;

use cram_store::{Backend, Config, ContentGateway, ContentHandler, DynamoStore, MemoryStore, PartitionStore, Server};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let store: Arc<dyn PartitionStore> = match &config.backend {
        Backend::DynamoDb { table_name, endpoint } => {
            Arc::new(DynamoStore::connect(table_name.as_str(), endpoint.as_deref()).await)
        }
        Backend::Memory => {
            warn!("using in-memory store, content is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let handler = ContentHandler::new(ContentGateway::new(store));

    match Server::bind(config.bind_addr).serve(handler).await {
        Ok(()) => {
            info!("bye");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
