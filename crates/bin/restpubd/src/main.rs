//! # restpubd — restpub demo daemon
//!
//! Composition root that wires a demo collection into the REST bridge and
//! starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialise tracing
//! - Construct the in-memory demo collection and its read function
//! - Publish the collection through a [`Publisher`] instance
//! - Build the axum router and serve
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no bridge logic belongs here.

mod config;

use std::sync::Arc;

use restpub_adapter_http_axum::router;
use restpub_adapter_http_axum::state::AppState;
use restpub_adapter_memory::MemoryCollection;
use restpub_app::publisher::{PublishConfig, Publisher};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Demo collection: every caller sees every note. Real deployments hang
    // their own collections and read functions off the same publisher.
    let notes = Arc::new(MemoryCollection::new("notes"));
    let read = MemoryCollection::read_all(&notes);

    let publisher = Arc::new(Publisher::new());
    publisher.publish(
        PublishConfig::collection(notes)
            .with_read(read)
            .with_api_prefix(config.api.prefix.clone()),
    )?;

    let app = router::build(AppState::new(publisher));

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "restpubd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
