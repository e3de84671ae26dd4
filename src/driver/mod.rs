//! Browser driver pool (test harness)
//!
//! Supplies owned WebDriver sessions to test workers. Which browser gets
//! launched is decided once, at configuration-load time, by resolving the
//! configured selector string into a declarative [`BrowserRecipe`]; workers
//! then allocate and release handles explicitly instead of sharing a
//! thread-local slot.

mod pool;
mod recipes;

pub use pool::{DriverHandle, DriverPool};
pub use recipes::{BrowserKind, BrowserRecipe, BROWSER_ENV};

use thirtyfour::error::WebDriverError;
use thiserror::Error;

use crate::config::ConfigError;

/// Driver-related errors
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("unsupported browser selector: {0}")]
    UnsupportedBrowser(String),

    #[error("{browser} is not supported on this operating system")]
    UnsupportedEnvironment { browser: String },

    #[error("invalid WebDriver endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("WebDriver session error: {0}")]
    Session(#[from] WebDriverError),
}
