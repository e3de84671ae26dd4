//! Bookstack
//!
//! A small book-catalog REST service plus the components of its integration
//! test harness: a WebDriver-backed browser driver pool, a properties-file
//! configuration reader, an HTTP API client, and a SQL query helper.

pub mod client;
pub mod config;
pub mod db;
pub mod driver;
pub mod store;
pub mod web;

use std::path::PathBuf;
use std::sync::Arc;

use store::{BookStore, InMemoryBookStore};

/// Application state shared across the web layer.
pub struct AppState {
    /// Catalog storage; injected so a real backing store can be substituted.
    pub store: Arc<dyn BookStore>,
}

impl AppState {
    /// State over the seeded in-memory store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryBookStore::seeded()))
    }

    /// State over a caller-supplied store.
    pub fn with_store(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Get log directory path (shared across modules)
pub fn log_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("bookstack").join("logs"))
}

/// Initialize logging with a console layer and a daily rolling file layer.
pub fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false);

    if let Some(log_dir) = log_dir() {
        let _ = std::fs::create_dir_all(&log_dir);
        let file_appender = tracing_appender::rolling::daily(&log_dir, "bookstack.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(non_blocking);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();

        None
    }
}
