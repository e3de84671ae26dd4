//! Driver pool
//!
//! Hands out owned browser sessions. Every worker allocates its own handle
//! and releases it with an explicit `close()`; handles are never shared
//! between workers and never stored in thread-local state, so a child task
//! can only get a session by asking the pool itself.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use thirtyfour::WebDriver;
use tracing::{info, warn};

use super::{BrowserRecipe, DriverError};
use crate::config::Settings;

/// Allocates browser sessions from one resolved recipe.
pub struct DriverPool {
    recipe: BrowserRecipe,
    /// Handles allocated and not yet closed.
    active: Arc<AtomicUsize>,
    /// Sequential handle naming (worker-1, worker-2, ...).
    next_worker: AtomicU32,
}

impl DriverPool {
    /// Pool over an already-resolved recipe.
    pub fn new(recipe: BrowserRecipe) -> Self {
        Self {
            recipe,
            active: Arc::new(AtomicUsize::new(0)),
            next_worker: AtomicU32::new(1),
        }
    }

    /// Resolve the configured selector and build the pool. A bad selector,
    /// missing option list, or unsupported host OS fails here, before any
    /// test runs.
    pub fn from_settings(settings: &Settings) -> Result<Self, DriverError> {
        let recipe = BrowserRecipe::resolve(settings)?;
        info!(
            "Driver pool ready: {} via {}",
            recipe.selector, recipe.webdriver_url
        );
        Ok(Self::new(recipe))
    }

    /// The recipe every allocation uses.
    pub fn recipe(&self) -> &BrowserRecipe {
        &self.recipe
    }

    /// Open a new browser session and hand it to the caller. Each call
    /// yields a distinct session; allocating again after a close is fine.
    pub async fn allocate(&self) -> Result<DriverHandle, DriverError> {
        let caps = self.recipe.capabilities()?;
        let driver = WebDriver::new(&self.recipe.webdriver_url, caps).await?;

        let id = format!("worker-{}", self.next_worker.fetch_add(1, Ordering::Relaxed));
        self.active.fetch_add(1, Ordering::Relaxed);
        info!("Allocated driver handle {} ({})", id, self.recipe.selector);

        Ok(DriverHandle {
            id,
            driver: Some(driver),
            active: self.active.clone(),
        })
    }

    /// Number of handles currently allocated and not closed.
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }
}

/// An owned browser session.
///
/// Lifecycle: active from `allocate()` until `close()`, which consumes the
/// handle and quits the browser. Dropping an un-closed handle releases the
/// pool slot but leaks the browser process, so it logs loudly.
pub struct DriverHandle {
    id: String,
    // Some until close() consumes the handle.
    driver: Option<WebDriver>,
    active: Arc<AtomicUsize>,
}

impl DriverHandle {
    /// Display id of this handle.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The underlying WebDriver session.
    pub fn driver(&self) -> &WebDriver {
        self.driver.as_ref().expect("driver handle already closed")
    }

    /// Quit the browser and release the handle. Must be called by the owner;
    /// this is the only clean exit from the session.
    pub async fn close(mut self) -> Result<(), DriverError> {
        if let Some(driver) = self.driver.take() {
            self.active.fetch_sub(1, Ordering::Relaxed);
            driver.quit().await?;
            info!("Driver handle {} closed", self.id);
        }
        Ok(())
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        if self.driver.take().is_some() {
            self.active.fetch_sub(1, Ordering::Relaxed);
            warn!(
                "Driver handle {} dropped without close(); browser session leaked",
                self.id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::BrowserKind;

    #[test]
    fn pool_holds_the_resolved_recipe() {
        let settings = Settings::parse("");
        let recipe = BrowserRecipe::for_selector("chrome-headless", &settings).unwrap();
        let pool = DriverPool::new(recipe);

        assert_eq!(pool.recipe().browser, BrowserKind::Chrome);
        assert!(pool.recipe().headless);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn bad_selectors_fail_before_any_allocation() {
        let settings = Settings::parse("");
        assert!(matches!(
            BrowserRecipe::for_selector("lynx", &settings),
            Err(DriverError::UnsupportedBrowser(_))
        ));
    }
}
