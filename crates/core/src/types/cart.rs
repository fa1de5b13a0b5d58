//! Cart collection types and their mutation semantics.
//!
//! The collection logic lives here, separate from storage and notification,
//! so the quantity rules can be tested without an async runtime.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// Catalog data for a product as the UI hands it to the cart.
///
/// Carries no quantity on purpose: the cart owns quantities, and callers
/// cannot seed an item with anything other than 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque unique identifier, used as the dedup key.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display image reference.
    pub image_url: String,
    /// Unit price.
    pub price: Decimal,
}

/// One distinct product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Opaque unique identifier, used as the dedup key.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display image reference.
    pub image_url: String,
    /// Unit price.
    pub price: Decimal,
    /// Count in cart. Always >= 1 while the item is present; an item
    /// reaching 0 is removed from the collection, never retained.
    pub quantity: u32,
}

impl CartItem {
    /// Line total for this item (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<Product> for CartItem {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }
}

/// An ordered sequence of [`CartItem`], unique by id.
///
/// Serializes transparently as a plain list of item records, which is the
/// shape of the persisted blob. Insertion order is an implementation detail;
/// consumers must not rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items in the cart.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Look up an item by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Total unit count across all items (cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` across all items.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Add a product to the cart.
    ///
    /// If an item with the same id already exists, its quantity is
    /// incremented by 1 and the incoming product's other fields are
    /// discarded. Otherwise the product is appended with quantity 1.
    pub fn add(&mut self, product: Product) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem::from(product));
        }
    }

    /// Increment the quantity of the item with the given id by 1.
    ///
    /// Returns `true` if an item matched. An unmatched id leaves the
    /// collection unchanged.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        self.items
            .iter_mut()
            .find(|item| item.id == *id)
            .map(|item| item.quantity = item.quantity.saturating_add(1))
            .is_some()
    }

    /// Decrement the quantity of the item with the given id by 1, removing
    /// any item whose quantity reaches 0.
    ///
    /// Returns `true` if an item matched. An unmatched id leaves the
    /// collection unchanged.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        let matched = self
            .items
            .iter_mut()
            .find(|item| item.id == *id)
            .map(|item| item.quantity = item.quantity.saturating_sub(1))
            .is_some();
        self.items.retain(|item| item.quantity > 0);
        matched
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<T: IntoIterator<Item = CartItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
