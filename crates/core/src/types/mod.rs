//! Core types for Pocket Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;

pub use cart::{Cart, CartItem, Product};
pub use id::*;
