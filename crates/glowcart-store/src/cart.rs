//! Cart contents and the add-to-cart in-flight guard.
//!
//! At most one add-to-cart per product id runs at a time. A second add for
//! the same id while the first is unsettled returns
//! [`AddOutcome::AlreadyInFlight`] immediately; it is neither queued nor
//! merged. The id is released by [`InFlightGuard`]'s `Drop`, so success,
//! failure, and a dropped future all release it.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glowcart_core::pricing::effective_price;
use glowcart_core::{FetchCause, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AddItemCause, AddItemError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Merged into the cart; `quantity` is the entry's new total.
    Added { quantity: u32 },
    /// Another add for this product has not settled yet. Nothing changed.
    AlreadyInFlight,
}

/// Serializable cart contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub entries: Vec<CartEntry>,
}

#[derive(Default)]
struct CartInner {
    /// Insertion-ordered, unique by product id.
    entries: Vec<CartEntry>,
    in_flight: HashSet<u64>,
}

impl CartInner {
    fn position(&self, product_id: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.product.id == product_id)
    }

    fn merge(&mut self, product: Product, quantity: u32) -> u32 {
        match self.position(product.id) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.quantity = entry.quantity.saturating_add(quantity);
                entry.quantity
            }
            None => {
                self.entries.push(CartEntry { product, quantity });
                quantity
            }
        }
    }
}

/// Releases a product id from the in-flight set when dropped.
struct InFlightGuard {
    inner: Arc<Mutex<CartInner>>,
    product_id: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.inner).in_flight.remove(&self.product_id);
    }
}

fn lock(inner: &Mutex<CartInner>) -> MutexGuard<'_, CartInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cart state shared by every consumer. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct CartStore {
    inner: Arc<Mutex<CartInner>>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of `product`, merging with an existing entry.
    ///
    /// The product is marked in flight before this returns and released when
    /// the returned future settles or is dropped.
    ///
    /// # Errors
    ///
    /// [`AddItemError`] with [`AddItemCause::InvalidQuantity`] for a zero
    /// quantity or [`AddItemCause::InvalidProduct`] for product id `0`.
    pub fn add_item(
        &self,
        product: Product,
        quantity: u32,
    ) -> impl Future<Output = Result<AddOutcome, AddItemError>> + Send + 'static {
        self.add_item_with(product, quantity, || async { Ok(()) })
    }

    /// Like [`Self::add_item`], but awaits `sync` (e.g. a remote cart call)
    /// while the product is in flight and merges only if it succeeds.
    ///
    /// # Errors
    ///
    /// As [`Self::add_item`], plus [`AddItemCause::Sync`] if `sync` fails; the
    /// cart is left unchanged in that case.
    pub fn add_item_with<F, Fut>(
        &self,
        product: Product,
        quantity: u32,
        sync: F,
    ) -> impl Future<Output = Result<AddOutcome, AddItemError>> + Send + 'static
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), FetchCause>> + Send,
    {
        let begun = self.begin_add(product.id, quantity);
        let inner = Arc::clone(&self.inner);

        async move {
            let Some(guard) = begun? else {
                return Ok(AddOutcome::AlreadyInFlight);
            };

            if let Err(cause) = sync().await {
                tracing::warn!(product_id = product.id, error = %cause, "add-to-cart sync failed");
                drop(guard);
                return Err(AddItemError {
                    product_id: product.id,
                    cause: AddItemCause::Sync(cause),
                });
            }

            let product_id = product.id;
            let total = lock(&inner).merge(product, quantity);
            drop(guard);
            tracing::debug!(product_id, quantity, total, "added to cart");
            Ok(AddOutcome::Added { quantity: total })
        }
    }

    /// Validates input and claims the in-flight slot for `product_id`.
    ///
    /// `Ok(None)` means another add already holds it.
    fn begin_add(
        &self,
        product_id: u64,
        quantity: u32,
    ) -> Result<Option<InFlightGuard>, AddItemError> {
        if product_id == 0 {
            return Err(AddItemError {
                product_id,
                cause: AddItemCause::InvalidProduct,
            });
        }
        if quantity == 0 {
            return Err(AddItemError {
                product_id,
                cause: AddItemCause::InvalidQuantity,
            });
        }

        if !lock(&self.inner).in_flight.insert(product_id) {
            tracing::debug!(product_id, "add-to-cart already in flight; ignoring");
            return Ok(None);
        }

        Ok(Some(InFlightGuard {
            inner: Arc::clone(&self.inner),
            product_id,
        }))
    }

    #[must_use]
    pub fn is_adding_item(&self, product_id: u64) -> bool {
        lock(&self.inner).in_flight.contains(&product_id)
    }

    /// Removes the entry for `product_id`. Returns `false` if it was absent.
    pub fn remove_item(&self, product_id: u64) -> bool {
        let mut inner = lock(&self.inner);
        match inner.position(product_id) {
            Some(idx) => {
                inner.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Sets the quantity of an existing entry. Zero or negative removes it; an
    /// absent id is ignored.
    pub fn set_quantity(&self, product_id: u64, quantity: i64) {
        let mut inner = lock(&self.inner);
        let Some(idx) = inner.position(product_id) else {
            return;
        };
        if quantity <= 0 {
            inner.entries.remove(idx);
            return;
        }
        inner.entries[idx].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    }

    pub fn clear(&self) {
        lock(&self.inner).entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> Vec<CartEntry> {
        lock(&self.inner).entries.clone()
    }

    #[must_use]
    pub fn quantity_of(&self, product_id: u64) -> Option<u32> {
        let inner = lock(&self.inner);
        inner
            .position(product_id)
            .map(|idx| inner.entries[idx].quantity)
    }

    #[must_use]
    pub fn contains(&self, product_id: u64) -> bool {
        lock(&self.inner).position(product_id).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.inner).entries.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        lock(&self.inner)
            .entries
            .iter()
            .map(|e| u64::from(e.quantity))
            .sum()
    }

    /// Sum of effective unit price times quantity, rounded to two places.
    ///
    /// `None` if the total does not fit in a [`Decimal`].
    #[must_use]
    pub fn total_price(&self) -> Option<Decimal> {
        let total = lock(&self.inner)
            .entries
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| {
                effective_price(&e.product)
                    .checked_mul(Decimal::from(e.quantity))
                    .and_then(|line| acc.checked_add(line))
            });
        if total.is_none() {
            tracing::warn!("cart total overflowed");
        }
        total.map(|t| t.round_dp(2))
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            entries: self.entries(),
        }
    }

    /// Replaces the cart contents with `snapshot`. Zero-quantity entries are
    /// dropped and duplicate ids merged, so a hand-edited file cannot break
    /// the cart's invariants. In-flight adds are unaffected.
    pub fn restore(&self, snapshot: CartSnapshot) {
        let mut restored = CartInner::default();
        for entry in snapshot.entries {
            if entry.quantity == 0 || entry.product.id == 0 {
                continue;
            }
            restored.merge(entry.product, entry.quantity);
        }
        lock(&self.inner).entries = restored.entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, price: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Product {id}"),
            "price": price,
            "regular_price": price,
            "sale_price": ""
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_and_not_marked_in_flight() {
        let cart = CartStore::new();
        let err = cart.add_item(product(1, "10"), 0).await.unwrap_err();
        assert_eq!(err.cause, AddItemCause::InvalidQuantity);
        assert!(!cart.is_adding_item(1));
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn product_id_zero_is_rejected() {
        let cart = CartStore::new();
        let err = cart.add_item(product(0, "10"), 1).await.unwrap_err();
        assert_eq!(err.cause, AddItemCause::InvalidProduct);
    }

    #[test]
    fn dropping_unpolled_add_releases_guard() {
        let cart = CartStore::new();
        let pending = cart.add_item(product(4, "10"), 1);
        assert!(cart.is_adding_item(4));
        drop(pending);
        assert!(!cart.is_adding_item(4));
        assert!(!cart.contains(4));
    }

    #[tokio::test]
    async fn totals_use_effective_price() {
        let cart = CartStore::new();
        let mut discounted = product(2, "300.00");
        discounted.regular_price = "400.00".into();
        discounted.sale_price = "300.00".into();

        cart.add_item(product(1, "1,000.50"), 2).await.unwrap();
        cart.add_item(discounted, 3).await.unwrap();

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), Some(Decimal::new(290_100, 2)));
    }

    #[test]
    fn overflowing_total_is_none() {
        let cart = CartStore::new();
        cart.restore(CartSnapshot {
            entries: vec![CartEntry {
                product: product(1, "100000000000000000000"),
                quantity: 1,
            }],
        });
        cart.set_quantity(1, 1_000_000_000);

        assert_eq!(cart.total_items(), 1_000_000_000);
        assert_eq!(cart.total_price(), None);
    }

    #[test]
    fn set_quantity_updates_existing_entry_only() {
        let cart = CartStore::new();
        cart.restore(CartSnapshot {
            entries: vec![CartEntry {
                product: product(1, "10"),
                quantity: 1,
            }],
        });
        cart.set_quantity(1, 4);
        cart.set_quantity(99, 4);
        assert_eq!(cart.quantity_of(1), Some(4));
        assert!(!cart.contains(99));
    }

    #[test]
    fn restore_drops_zero_and_merges_duplicates() {
        let cart = CartStore::new();
        cart.restore(CartSnapshot {
            entries: vec![
                CartEntry {
                    product: product(1, "10"),
                    quantity: 2,
                },
                CartEntry {
                    product: product(2, "10"),
                    quantity: 0,
                },
                CartEntry {
                    product: product(1, "10"),
                    quantity: 3,
                },
            ],
        });
        let entries = cart.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 5);
    }

    #[test]
    fn remove_item_reports_presence() {
        let cart = CartStore::new();
        cart.restore(CartSnapshot {
            entries: vec![CartEntry {
                product: product(3, "10"),
                quantity: 1,
            }],
        });
        assert!(cart.remove_item(3));
        assert!(!cart.remove_item(3));
    }
}
