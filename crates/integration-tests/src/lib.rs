//! Integration tests for Pocket Market.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-market-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end cart behavior through the provider API
//! - `persistence` - File-backed hydration and write-back

use rust_decimal::Decimal;

use pocket_market_core::{Product, ProductId};

/// Build a catalog product for tests.
#[must_use]
pub fn product(id: &str, price_cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        image_url: format!("https://img.example/{id}.png"),
        price: Decimal::new(price_cents, 2),
    }
}

/// Install a test subscriber so `RUST_LOG` controls test logging.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
