//! Pocket Market Core - Shared types library.
//!
//! This crate provides the domain types used across all Pocket Market
//! components:
//! - `cart` - Client-side cart store and local persistence
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no async
//! runtime. This keeps it lightweight and allows it to be used anywhere,
//! including inside UI layers that never touch persistence.
//!
//! # Modules
//!
//! - [`types`] - Product and cart types plus the newtype ID macro

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
