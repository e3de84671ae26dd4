//! Bookstack - Book Catalog Server
//!
//! Serves the book catalog REST API.
//! Build: `cargo build --release --bin server`
//!
//! Environment variables:
//! - `BOOKSTACK_PORT` - Server port (default: 8080)

use std::sync::Arc;

use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = bookstack::init_logging();

    info!("Starting Bookstack server");

    if let Some(dir) = bookstack::log_dir() {
        info!("Log files saved to: {}", dir.display());
    }

    let port: u16 = std::env::var("BOOKSTACK_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let state = Arc::new(bookstack::AppState::new());
    info!("Catalog seeded with {} books", state.store.list().len());

    bookstack::web::start_server(state, port)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}
