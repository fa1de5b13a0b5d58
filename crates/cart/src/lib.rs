//! Pocket Market Cart - client-side cart state container.
//!
//! Holds the cart collection in memory, notifies UI observers on every
//! mutation, and keeps a single blob in local key-value storage eventually
//! consistent with memory through a per-store single-writer queue.
//!
//! # Modules
//!
//! - [`store`] - [`CartStore`], the injected service object owning the cart
//! - [`provider`] - [`CartProvider`] / [`CartContext`], bounded-scope access
//!   for UI components
//! - [`storage`] - the [`CartStorage`] key-value port and its backends
//! - [`error`] - error types
//!
//! # Example
//!
//! ```rust,ignore
//! let storage = FileStorage::new(data_dir);
//! let store = CartStore::open(storage).await?;
//! let provider = CartProvider::new(store);
//!
//! let cart = provider.context();
//! cart.add_to_cart(product)?;
//! cart.increment(&product_id)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod provider;
pub mod storage;
pub mod store;

pub use error::{CartAccessError, StorageError, StoreError};
pub use provider::{CartContext, CartProvider};
pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::{CART_STORAGE_KEY, CartStore};
