//! End-to-end cart behavior through the provider API.
//!
//! These follow the user-visible sequences a shopping UI drives: adding
//! products, adjusting quantities from the cart screen, and reading the
//! collection back for display.

use pocket_market_cart::{CartProvider, CartStore, MemoryStorage};
use pocket_market_core::ProductId;
use pocket_market_integration_tests::{init_tracing, product};

async fn new_provider() -> CartProvider {
    init_tracing();
    let store = CartStore::open(MemoryStorage::new())
        .await
        .expect("open store");
    CartProvider::new(store)
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[tokio::test]
async fn test_first_add_creates_single_entry() {
    let provider = new_provider().await;
    let cart = provider.context();

    cart.add_to_cart(product("p1", 1999)).expect("in scope");

    let products = cart.products().expect("in scope");
    assert_eq!(products.len(), 1);
    assert_eq!(
        products.get(&ProductId::new("p1")).map(|i| i.quantity),
        Some(1)
    );
}

#[tokio::test]
async fn test_repeat_add_bumps_quantity() {
    let provider = new_provider().await;
    let cart = provider.context();

    cart.add_to_cart(product("p1", 1999)).expect("in scope");
    cart.add_to_cart(product("p1", 1999)).expect("in scope");

    let products = cart.products().expect("in scope");
    assert_eq!(products.len(), 1);
    assert_eq!(
        products.get(&ProductId::new("p1")).map(|i| i.quantity),
        Some(2)
    );
}

#[tokio::test]
async fn test_decrement_from_two_keeps_item() {
    let provider = new_provider().await;
    let cart = provider.context();

    cart.add_to_cart(product("p1", 1999)).expect("in scope");
    cart.add_to_cart(product("p1", 1999)).expect("in scope");
    cart.decrement(&ProductId::new("p1")).expect("in scope");

    let products = cart.products().expect("in scope");
    assert_eq!(
        products.get(&ProductId::new("p1")).map(|i| i.quantity),
        Some(1)
    );
}

#[tokio::test]
async fn test_decrement_from_one_empties_cart() {
    let provider = new_provider().await;
    let cart = provider.context();

    cart.add_to_cart(product("p1", 1999)).expect("in scope");
    cart.decrement(&ProductId::new("p1")).expect("in scope");

    assert!(cart.products().expect("in scope").is_empty());
}

// =============================================================================
// Collection Properties
// =============================================================================

#[tokio::test]
async fn test_distinct_ids_one_entry_each() {
    let provider = new_provider().await;
    let cart = provider.context();

    for id in ["p1", "p2", "p3"] {
        cart.add_to_cart(product(id, 500)).expect("in scope");
    }

    let products = cart.products().expect("in scope");
    assert_eq!(products.len(), 3);
    for id in ["p1", "p2", "p3"] {
        assert_eq!(products.get(&ProductId::new(id)).map(|i| i.quantity), Some(1));
    }
}

#[tokio::test]
async fn test_increment_leaves_other_items_alone() {
    let provider = new_provider().await;
    let cart = provider.context();

    cart.add_to_cart(product("p1", 500)).expect("in scope");
    cart.add_to_cart(product("p2", 500)).expect("in scope");
    cart.increment(&ProductId::new("p1")).expect("in scope");

    let products = cart.products().expect("in scope");
    assert_eq!(products.get(&ProductId::new("p1")).map(|i| i.quantity), Some(2));
    assert_eq!(products.get(&ProductId::new("p2")).map(|i| i.quantity), Some(1));
}

#[tokio::test]
async fn test_increment_absent_id_leaves_contents_unchanged() {
    let provider = new_provider().await;
    let cart = provider.context();

    cart.add_to_cart(product("p1", 500)).expect("in scope");
    let before = cart.products().expect("in scope");

    cart.increment(&ProductId::new("missing")).expect("in scope");
    assert_eq!(cart.products().expect("in scope"), before);
}

#[tokio::test]
async fn test_subscriber_driven_badge_count() {
    let provider = new_provider().await;
    let cart = provider.context();
    let mut changes = cart.subscribe().expect("in scope");

    cart.add_to_cart(product("p1", 500)).expect("in scope");
    cart.add_to_cart(product("p1", 500)).expect("in scope");
    cart.add_to_cart(product("p2", 500)).expect("in scope");

    changes.changed().await.expect("notified");
    assert_eq!(changes.borrow_and_update().total_quantity(), 3);
}

// =============================================================================
// Provider Scope
// =============================================================================

#[tokio::test]
async fn test_access_outside_provider_scope_fails_fast() {
    let provider = new_provider().await;
    let cart = provider.context();
    drop(provider);

    let err = cart.products().expect_err("provider is gone");
    assert_eq!(
        err.to_string(),
        "cart context used outside its CartProvider scope"
    );

    // Every repeated access fails the same way.
    for _ in 0..3 {
        assert!(cart.add_to_cart(product("p1", 500)).is_err());
    }
}
