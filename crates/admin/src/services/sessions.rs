//! Per-session page browsers.
//!
//! Each browser session (identified by a UUID stored in the session cookie)
//! gets one [`PageBrowser`] per resource. Browsers are kept in a `moka`
//! cache and evicted after 30 minutes without use.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::browser::{Listing, PageBrowser};

/// How long an unused browser is kept.
const BROWSER_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Upper bound on live browsers per resource.
const MAX_BROWSERS: u64 = 10_000;

/// Returned when a session's browser is already loading a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a {0} page load is already in progress")]
pub struct BrowserBusy(pub &'static str);

/// Page browsers for one resource, keyed by session browser key.
#[derive(Clone)]
pub struct BrowserRegistry<R: Listing> {
    cache: Cache<Uuid, Arc<Mutex<PageBrowser<R>>>>,
    page_size: u32,
}

impl<R: Listing> BrowserRegistry<R> {
    /// Create a registry whose browsers request `page_size` records.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_BROWSERS)
            .time_to_idle(BROWSER_IDLE_TIMEOUT)
            .build();

        Self { cache, page_size }
    }

    /// Page size used by every browser in this registry.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Get the browser for `key`, creating it on first use.
    pub async fn get(&self, key: Uuid) -> Arc<Mutex<PageBrowser<R>>> {
        let page_size = self.page_size;
        self.cache
            .get_with(key, async move { Arc::new(Mutex::new(PageBrowser::new(page_size))) })
            .await
    }

    /// Lock the browser for `key` without waiting.
    ///
    /// # Errors
    ///
    /// Returns `BrowserBusy` if another request holds the browser, which
    /// means a navigation for this session is still in flight.
    pub async fn try_lock(&self, key: Uuid) -> Result<OwnedMutexGuard<PageBrowser<R>>, BrowserBusy> {
        self.get(key)
            .await
            .try_lock_owned()
            .map_err(|_| BrowserBusy(R::RESOURCE))
    }
}
