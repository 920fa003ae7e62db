//! Per-category product cache with coalesced fetches.
//!
//! Each [`CategoryKey`] owns one slot holding the last good product list, a
//! status, and at most one in-flight fetch. State transitions happen under a
//! short synchronous lock, never across an `.await`:
//!
//! - starting a fetch marks the category `Loading` before the caller gets a
//!   future back;
//! - the spawned fetch applies its own result, so the transition happens
//!   exactly once no matter how many callers are waiting;
//! - a result is applied only if its generation is still current for the key,
//!   which discards late completions of superseded or cancelled fetches.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use glowcart_core::{CategoryKey, ConfigurationError, FetchCause, Product};
use tokio::sync::oneshot;
use tokio::task::AbortHandle;

use crate::error::CatalogFetchError;

/// Default upper bound on a single category fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub type ProductList = Arc<Vec<Product>>;
pub type FetchResult = Result<ProductList, CatalogFetchError>;

/// A fetch in progress. Clone it freely; every clone resolves to the same
/// result.
pub type PendingFetch = Shared<BoxFuture<'static, FetchResult>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryStatus {
    /// Never fetched, or a first fetch was cancelled.
    Idle,
    Loading,
    Ready,
    Failed(CatalogFetchError),
}

/// Read-only view of one category.
#[derive(Debug, Clone)]
pub struct CategoryFetchState {
    pub key: CategoryKey,
    pub status: CategoryStatus,
    /// Last successfully fetched list, in server order. Kept on failure.
    pub products: ProductList,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CategoryFetchState {
    fn new(key: CategoryKey) -> Self {
        Self {
            key,
            status: CategoryStatus::Idle,
            products: Arc::new(Vec::new()),
            fetched_at: None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.status, CategoryStatus::Loading)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&CatalogFetchError> {
        match &self.status {
            CategoryStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

struct InFlight {
    generation: u64,
    future: PendingFetch,
    abort: AbortHandle,
}

struct Slot {
    state: CategoryFetchState,
    generation: u64,
    in_flight: Option<InFlight>,
    /// Status to fall back to if the in-flight fetch is cancelled.
    status_before: CategoryStatus,
}

impl Slot {
    fn new(key: CategoryKey) -> Self {
        Self {
            state: CategoryFetchState::new(key),
            generation: 0,
            in_flight: None,
            status_before: CategoryStatus::Idle,
        }
    }
}

/// Process-wide product cache, partitioned by category.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ProductCatalogStore {
    slots: Arc<Mutex<HashMap<CategoryKey, Slot>>>,
    fetch_timeout: Duration,
}

impl Default for ProductCatalogStore {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

impl ProductCatalogStore {
    #[must_use]
    pub fn new(fetch_timeout: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            fetch_timeout,
        }
    }

    /// Fetches `key` with `fetch`, joining the in-flight fetch for `key` if
    /// there is one. When joined, `fetch` is never called.
    ///
    /// The category is `Loading` by the time this returns. The fetch runs on
    /// its own task, so it completes and updates the cache even if every
    /// returned future is dropped.
    ///
    /// `fetch` runs after the store lock is released, so it may read the
    /// store. A panic in `fetch` or in its future settles the category as
    /// failed with [`FetchCause::Panicked`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn fetch_category<F, Fut>(&self, key: CategoryKey, fetch: F) -> PendingFetch
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Product>, FetchCause>> + Send + 'static,
    {
        self.start(key, fetch, false)
    }

    /// String-keyed variant of [`Self::fetch_category`] for callers holding a
    /// raw category name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownCategory`] if `name` is not a known
    /// category; nothing is fetched.
    pub fn fetch_category_named<F, Fut>(
        &self,
        name: &str,
        fetch: F,
    ) -> Result<PendingFetch, ConfigurationError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Product>, FetchCause>> + Send + 'static,
    {
        let key = name.parse::<CategoryKey>()?;
        Ok(self.fetch_category(key, fetch))
    }

    /// Starts a new fetch for `key` even if one is in flight. The earlier
    /// fetch still resolves for whoever awaits it, but only this one may
    /// update the cache.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn refresh_category<F, Fut>(&self, key: CategoryKey, fetch: F) -> PendingFetch
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Product>, FetchCause>> + Send + 'static,
    {
        self.start(key, fetch, true)
    }

    /// Abandons the in-flight fetch for `key`, restoring the status it had
    /// before the fetch started. Waiters receive a `Cancelled` error.
    ///
    /// Returns `false` if nothing was in flight.
    pub fn cancel_category(&self, key: CategoryKey) -> bool {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(&key) else {
            return false;
        };
        let Some(in_flight) = slot.in_flight.take() else {
            return false;
        };

        slot.generation += 1;
        in_flight.abort.abort();
        slot.state.status = slot.status_before.clone();
        tracing::debug!(
            category = %key,
            generation = in_flight.generation,
            "category fetch cancelled"
        );
        true
    }

    /// Snapshot of `key`. Categories never fetched read as `Idle` and empty.
    #[must_use]
    pub fn get_category(&self, key: CategoryKey) -> CategoryFetchState {
        self.lock()
            .get(&key)
            .map_or_else(|| CategoryFetchState::new(key), |slot| slot.state.clone())
    }

    /// Categories that have been fetched at least once, in declaration order.
    #[must_use]
    pub fn loaded_categories(&self) -> Vec<CategoryKey> {
        let mut keys: Vec<CategoryKey> = self.lock().keys().copied().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CategoryKey, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start<F, Fut>(&self, key: CategoryKey, fetch: F, supersede: bool) -> PendingFetch
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Product>, FetchCause>> + Send + 'static,
    {
        let (request_tx, request_rx) = oneshot::channel::<Fut>();
        let future = {
            let mut slots = self.lock();
            let slot = slots.entry(key).or_insert_with(|| Slot::new(key));

            if let Some(in_flight) = &slot.in_flight {
                if !supersede {
                    tracing::debug!(
                        category = %key,
                        generation = in_flight.generation,
                        "joining in-flight category fetch"
                    );
                    return in_flight.future.clone();
                }
                tracing::debug!(
                    category = %key,
                    generation = in_flight.generation,
                    "superseding in-flight category fetch"
                );
            } else {
                slot.status_before = slot.state.status.clone();
            }

            slot.generation += 1;
            let generation = slot.generation;
            slot.state.status = CategoryStatus::Loading;
            tracing::debug!(category = %key, generation, "category fetch started");

            // The task waits for the request, so `fetch` can run unlocked.
            let store = self.clone();
            let timeout = self.fetch_timeout;
            let handle = tokio::spawn(async move {
                let result = match request_rx.await {
                    Ok(request) => run_fetch(key, request, timeout).await,
                    Err(_) => Err(CatalogFetchError {
                        key,
                        cause: FetchCause::Panicked("fetch function panicked".to_owned()),
                    }),
                };
                store.settle(key, generation, &result);
                result
            });
            let abort = handle.abort_handle();

            let future = async move {
                match handle.await {
                    Ok(result) => result,
                    Err(err) => {
                        let cause = if err.is_cancelled() {
                            FetchCause::Cancelled
                        } else {
                            FetchCause::Panicked(panic_message(err.into_panic().as_ref()))
                        };
                        Err(CatalogFetchError { key, cause })
                    }
                }
            }
            .boxed()
            .shared();

            slot.in_flight = Some(InFlight {
                generation,
                future: future.clone(),
                abort,
            });
            future
        };

        // A panic here drops `request_tx`; the task then settles as failed.
        let request = fetch();
        if request_tx.send(request).is_err() {
            tracing::debug!(category = %key, "category fetch cancelled before it began");
        }
        future
    }

    fn settle(&self, key: CategoryKey, generation: u64, result: &FetchResult) {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(&key) else {
            return;
        };

        if slot.generation != generation {
            tracing::debug!(
                category = %key,
                generation,
                current = slot.generation,
                "discarding stale category result"
            );
            return;
        }

        slot.in_flight = None;
        match result {
            Ok(products) => {
                tracing::info!(
                    category = %key,
                    count = products.len(),
                    "category products loaded"
                );
                slot.state.products = Arc::clone(products);
                slot.state.status = CategoryStatus::Ready;
                slot.state.fetched_at = Some(Utc::now());
            }
            Err(err) => {
                tracing::warn!(
                    category = %key,
                    error = %err.cause,
                    kept = slot.state.products.len(),
                    "category fetch failed; keeping previous products"
                );
                slot.state.status = CategoryStatus::Failed(err.clone());
            }
        }
    }
}

/// Runs one request under `timeout`, turning a panic into a failure so the
/// category always settles.
async fn run_fetch<Fut>(key: CategoryKey, request: Fut, timeout: Duration) -> FetchResult
where
    Fut: Future<Output = Result<Vec<Product>, FetchCause>>,
{
    let cause = match tokio::time::timeout(timeout, AssertUnwindSafe(request).catch_unwind()).await
    {
        Ok(Ok(Ok(products))) => return Ok(Arc::new(products)),
        Ok(Ok(Err(cause))) => cause,
        Ok(Err(payload)) => FetchCause::Panicked(panic_message(payload.as_ref())),
        Err(_elapsed) => FetchCause::Timeout,
    };
    Err(CatalogFetchError { key, cause })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
