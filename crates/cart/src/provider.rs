//! Bounded-scope access to a shared cart.
//!
//! A [`CartProvider`] owns the store for the lifetime of a component tree
//! (typically the whole app session). Components receive a cloneable
//! [`CartContext`] instead of the store itself; once the provider is
//! dropped, every context access fails fast with [`CartAccessError`] rather
//! than silently operating on a cart nobody owns.

use std::sync::{Arc, Weak};

use pocket_market_core::{Cart, Product, ProductId};
use tokio::sync::watch;

use crate::error::{CartAccessError, StoreError};
use crate::store::CartStore;

/// Owns a [`CartStore`] for a bounded scope and hands out contexts.
pub struct CartProvider {
    store: Arc<CartStore>,
}

impl CartProvider {
    /// Wrap a store, taking ownership of its scope.
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Create a context valid for as long as this provider lives.
    #[must_use]
    pub fn context(&self) -> CartContext {
        CartContext {
            store: Arc::downgrade(&self.store),
        }
    }

    /// Direct access to the owned store.
    ///
    /// Cloning the returned store yields a handle that keeps the cart alive
    /// past this provider's lifetime and is not subject to the scope check.
    /// Contexts from [`context`](Self::context) stay bound to the provider
    /// regardless of any such clones; hand UI components a context, not a
    /// store.
    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.store
    }
}

/// Capability handle exposing the cart to UI components.
///
/// Cheap to clone and hand down a component tree. Every method checks the
/// provider scope first and returns [`CartAccessError`] synchronously when
/// the provider is gone.
#[derive(Clone)]
pub struct CartContext {
    store: Weak<CartStore>,
}

impl CartContext {
    fn store(&self) -> Result<Arc<CartStore>, CartAccessError> {
        self.store.upgrade().ok_or(CartAccessError)
    }

    /// Snapshot of the current collection.
    ///
    /// # Errors
    ///
    /// Returns [`CartAccessError`] outside the provider scope.
    pub fn products(&self) -> Result<Cart, CartAccessError> {
        Ok(self.store()?.products())
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartAccessError`] outside the provider scope.
    pub fn add_to_cart(&self, product: Product) -> Result<(), CartAccessError> {
        self.store()?.add_to_cart(product);
        Ok(())
    }

    /// Increment the quantity of the item with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`CartAccessError`] outside the provider scope.
    pub fn increment(&self, id: &ProductId) -> Result<(), CartAccessError> {
        self.store()?.increment(id);
        Ok(())
    }

    /// Decrement the quantity of the item with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`CartAccessError`] outside the provider scope.
    pub fn decrement(&self, id: &ProductId) -> Result<(), CartAccessError> {
        self.store()?.decrement(id);
        Ok(())
    }

    /// Subscribe to collection changes.
    ///
    /// The receiver stays usable after the provider is dropped; it simply
    /// stops receiving changes.
    ///
    /// # Errors
    ///
    /// Returns [`CartAccessError`] outside the provider scope.
    pub fn subscribe(&self) -> Result<watch::Receiver<Cart>, CartAccessError> {
        Ok(self.store()?.subscribe())
    }

    /// Wait for persistence to catch up with the current state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfScope`] outside the provider scope, or the
    /// store's own flush errors.
    pub async fn flush(&self) -> Result<(), StoreError> {
        self.store()?.flush().await
    }
}
