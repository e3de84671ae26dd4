//! Live browser session tests.
//!
//! These need a running chromedriver on localhost:9515 (or a
//! `webdriverUrl` pointing elsewhere), so they are ignored by default:
//! `cargo test -- --ignored`

use bookstack::config::Settings;
use bookstack::driver::{BrowserRecipe, DriverPool};

fn headless_pool() -> DriverPool {
    let settings = Settings::parse("");
    let recipe = BrowserRecipe::for_selector("chrome-headless", &settings).unwrap();
    DriverPool::new(recipe)
}

#[tokio::test]
#[ignore]
async fn concurrent_allocations_get_distinct_handles() {
    let pool = headless_pool();

    let (a, b) = tokio::join!(pool.allocate(), pool.allocate());
    let a = a.unwrap();
    let b = b.unwrap();

    assert_ne!(a.id(), b.id());
    assert_eq!(pool.active_count(), 2);

    // Closing one handle must not affect the other.
    a.close().await.unwrap();
    assert_eq!(pool.active_count(), 1);

    b.driver().goto("about:blank").await.unwrap();
    b.close().await.unwrap();
    assert_eq!(pool.active_count(), 0);
}

#[tokio::test]
#[ignore]
async fn pool_revives_after_close() {
    let pool = headless_pool();

    let first = pool.allocate().await.unwrap();
    first.close().await.unwrap();

    let second = pool.allocate().await.unwrap();
    second.driver().goto("about:blank").await.unwrap();
    second.close().await.unwrap();
}
