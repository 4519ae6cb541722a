//! Order engine test suite
//!
//! Runs against an in-memory SurrealDB through the real repositories.

use std::sync::Arc;

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

use crate::auth::CurrentUser;
use crate::db::models::{
    Category, Order, PaymentConfirmation, PaymentMethod, Product, Role, ShippingAddress, User,
};
use crate::db::repository::{ProductRepository, UserRepository};
use crate::orders::engine::{CreateOrderRequest, OrderEngine, OrderItemInput};
use crate::orders::error::OrderError;
use crate::orders::pricing::TrustClientPricing;

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("failed to open mem db");
    db.use_ns("marketplace")
        .use_db("marketplace")
        .await
        .expect("failed to select namespace");
    crate::db::define_schema(&db).await.expect("failed to define schema");
    db
}

fn engine(db: &Surreal<Db>) -> OrderEngine {
    OrderEngine::new(db.clone(), Arc::new(TrustClientPricing))
}

async fn seed_user(db: &Surreal<Db>, name: &str, email: &str, role: Role) -> (User, CurrentUser) {
    let now = Utc::now();
    let user = UserRepository::new(db.clone())
        .create(User {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role,
            is_active: true,
            is_verified: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("failed to seed user");
    let current = CurrentUser::from_user(&user);
    (user, current)
}

async fn seed_product(db: &Surreal<Db>, seller: &User, name: &str, stock: i64) -> Product {
    let now = Utc::now();
    ProductRepository::new(db.clone())
        .create(Product {
            id: None,
            name: name.to_string(),
            description: format!("{name} description"),
            category: Category::PortServices,
            price: 250.0,
            currency: "INR".to_string(),
            images: vec![format!("/images/{name}.jpg")],
            seller: seller.id.clone().expect("seeded user has id"),
            stock,
            is_active: true,
            is_verified: true,
            tags: vec![],
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("failed to seed product")
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Asha Nair".to_string(),
        address: "12 Dock Road".to_string(),
        city: "Kochi".to_string(),
        postal_code: "682001".to_string(),
        country: "India".to_string(),
        port: "Cochin".to_string(),
    }
}

fn request_for(lines: &[(&Product, i64)]) -> CreateOrderRequest {
    CreateOrderRequest {
        items: lines
            .iter()
            .map(|(product, quantity)| OrderItemInput {
                product: product.id.as_ref().expect("product id").to_string(),
                quantity: *quantity,
            })
            .collect(),
        shipping_address: address(),
        payment_method: PaymentMethod::Card,
        items_price: 500.0,
        tax_price: 90.0,
        shipping_price: 40.0,
        total_price: 630.0,
    }
}

async fn stock_of(db: &Surreal<Db>, product: &Product) -> i64 {
    ProductRepository::new(db.clone())
        .find_by_id(&product.id.as_ref().expect("product id").to_string())
        .await
        .expect("lookup failed")
        .expect("product exists")
        .stock
}

fn confirmation() -> PaymentConfirmation {
    PaymentConfirmation {
        id: "PAYID-12345".to_string(),
        status: "COMPLETED".to_string(),
        update_time: "2026-08-07T10:00:00Z".to_string(),
        payer_email: "buyer@example.com".to_string(),
    }
}

fn order_id(order: &Order) -> String {
    order.id.as_ref().expect("order id").to_string()
}

// ── Creation ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_order_snapshots_lines_and_decrements_stock() {
    let db = test_db().await;
    let (seller, _) = seed_user(&db, "Seller", "seller@example.com", Role::Seller).await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;
    let product = seed_product(&db, &seller, "Crane slot", 10).await;

    let order = engine(&db)
        .create(&buyer, request_for(&[(&product, 2)]))
        .await
        .expect("creation failed");

    assert_eq!(order.buyer.to_string(), buyer.id);
    assert_eq!(order.seller, seller.id.clone().unwrap());
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].name, "Crane slot");
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[0].price, 250.0);
    assert!(!order.is_paid);
    assert!(!order.is_delivered);
    assert_eq!(order.total_price, 630.0);

    assert_eq!(stock_of(&db, &product).await, 8);
}

#[tokio::test]
async fn insufficient_stock_aborts_before_any_mutation() {
    let db = test_db().await;
    let (seller, _) = seed_user(&db, "Seller", "seller@example.com", Role::Seller).await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;
    let plenty = seed_product(&db, &seller, "Berth booking", 10).await;
    let scarce = seed_product(&db, &seller, "Pilot service", 10).await;

    let err = engine(&db)
        .create(&buyer, request_for(&[(&plenty, 3), (&scarce, 15)]))
        .await
        .expect_err("creation should fail");

    assert_eq!(
        err.to_string(),
        "Insufficient stock for Pilot service. Available: 10, Requested: 15"
    );
    // The line that had enough stock must be untouched too
    assert_eq!(stock_of(&db, &plenty).await, 10);
    assert_eq!(stock_of(&db, &scarce).await, 10);
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let db = test_db().await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;

    let req = CreateOrderRequest {
        items: vec![],
        shipping_address: address(),
        payment_method: PaymentMethod::Upi,
        items_price: 0.0,
        tax_price: 0.0,
        shipping_price: 0.0,
        total_price: 0.0,
    };

    let err = engine(&db).create(&buyer, req).await.expect_err("must fail");
    assert!(matches!(err, OrderError::EmptyOrder));
    assert_eq!(err.to_string(), "No order items");
}

#[tokio::test]
async fn unknown_product_is_named_in_the_error() {
    let db = test_db().await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;

    let req = CreateOrderRequest {
        items: vec![OrderItemInput {
            product: "product:doesnotexist".to_string(),
            quantity: 1,
        }],
        shipping_address: address(),
        payment_method: PaymentMethod::Card,
        items_price: 0.0,
        tax_price: 0.0,
        shipping_price: 0.0,
        total_price: 0.0,
    };

    let err = engine(&db).create(&buyer, req).await.expect_err("must fail");
    assert_eq!(err.to_string(), "Product not found: product:doesnotexist");
}

#[tokio::test]
async fn mixed_seller_carts_are_rejected_without_stock_changes() {
    let db = test_db().await;
    let (seller_a, _) = seed_user(&db, "Seller A", "a@example.com", Role::Seller).await;
    let (seller_b, _) = seed_user(&db, "Seller B", "b@example.com", Role::Seller).await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;
    let from_a = seed_product(&db, &seller_a, "Tug assist", 5).await;
    let from_b = seed_product(&db, &seller_b, "Customs filing", 5).await;

    let err = engine(&db)
        .create(&buyer, request_for(&[(&from_a, 1), (&from_b, 1)]))
        .await
        .expect_err("must fail");

    assert!(matches!(err, OrderError::MixedSellers));
    assert_eq!(stock_of(&db, &from_a).await, 5);
    assert_eq!(stock_of(&db, &from_b).await, 5);
}

#[tokio::test]
async fn zero_quantity_is_rejected() {
    let db = test_db().await;
    let (seller, _) = seed_user(&db, "Seller", "seller@example.com", Role::Seller).await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;
    let product = seed_product(&db, &seller, "Container wash", 5).await;

    let err = engine(&db)
        .create(&buyer, request_for(&[(&product, 0)]))
        .await
        .expect_err("must fail");
    assert!(matches!(err, OrderError::InvalidQuantity(_)));
    assert_eq!(stock_of(&db, &product).await, 5);
}

#[tokio::test]
async fn stock_never_goes_negative_across_sequential_orders() {
    let db = test_db().await;
    let (seller, _) = seed_user(&db, "Seller", "seller@example.com", Role::Seller).await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;
    let product = seed_product(&db, &seller, "Last berth", 1).await;

    engine(&db)
        .create(&buyer, request_for(&[(&product, 1)]))
        .await
        .expect("first order fits");

    let err = engine(&db)
        .create(&buyer, request_for(&[(&product, 1)]))
        .await
        .expect_err("second order must fail");

    assert_eq!(
        err.to_string(),
        "Insufficient stock for Last berth. Available: 0, Requested: 1"
    );
    assert_eq!(stock_of(&db, &product).await, 0);
}

// ── Reservation primitives ──────────────────────────────────────────

#[tokio::test]
async fn reserve_stock_is_conditional_and_release_compensates() {
    let db = test_db().await;
    let (seller, _) = seed_user(&db, "Seller", "seller@example.com", Role::Seller).await;
    let product = seed_product(&db, &seller, "Berth booking", 3).await;
    let repo = ProductRepository::new(db.clone());
    let id = product.id.clone().expect("product id");

    // Takes stock while enough is available
    let updated = repo.reserve_stock(&id, 2).await.expect("query ok");
    assert_eq!(updated.expect("reserved").stock, 1);

    // Refuses (no row matched) when the remainder is short, without change
    let refused = repo.reserve_stock(&id, 2).await.expect("query ok");
    assert!(refused.is_none());
    assert_eq!(stock_of(&db, &product).await, 1);

    // Compensating release restores the counted units
    repo.release_stock(&id, 2).await.expect("release ok");
    assert_eq!(stock_of(&db, &product).await, 3);
}

// ── Read & authorization ────────────────────────────────────────────

#[tokio::test]
async fn read_is_gated_by_the_access_policy() {
    let db = test_db().await;
    let (seller, seller_user) = seed_user(&db, "Seller", "seller@example.com", Role::Seller).await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;
    let (_, admin) = seed_user(&db, "Admin", "admin@example.com", Role::Admin).await;
    let (_, stranger) = seed_user(&db, "Stranger", "other@example.com", Role::Buyer).await;
    let product = seed_product(&db, &seller, "Crane slot", 10).await;

    let order = engine(&db)
        .create(&buyer, request_for(&[(&product, 1)]))
        .await
        .expect("creation failed");
    let id = order_id(&order);

    // buyer, seller and admin all see the resolved profiles
    let detail = engine(&db).get(&id, &buyer).await.expect("buyer may read");
    assert_eq!(detail.buyer.email, "buyer@example.com");
    assert_eq!(detail.seller.name, "Seller");

    engine(&db).get(&id, &seller_user).await.expect("seller may read");
    engine(&db).get(&id, &admin).await.expect("admin may read");

    let err = engine(&db).get(&id, &stranger).await.expect_err("stranger may not");
    assert_eq!(err.to_string(), "Not authorized to access this order");

    let missing = engine(&db).get("order:missing", &buyer).await.expect_err("404");
    assert!(matches!(missing, OrderError::NotFound));
}

#[tokio::test]
async fn malformed_order_ids_read_as_not_found() {
    let db = test_db().await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;

    let err = engine(&db)
        .get("not a valid id at all", &buyer)
        .await
        .expect_err("must be not found");
    assert!(matches!(err, OrderError::NotFound));
}

// ── Transitions ─────────────────────────────────────────────────────

#[tokio::test]
async fn pay_stores_the_confirmation_verbatim() {
    let db = test_db().await;
    let (seller, _) = seed_user(&db, "Seller", "seller@example.com", Role::Seller).await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;
    let product = seed_product(&db, &seller, "Crane slot", 10).await;

    let order = engine(&db)
        .create(&buyer, request_for(&[(&product, 1)]))
        .await
        .expect("creation failed");
    let id = order_id(&order);

    let paid = engine(&db).pay(&id, confirmation()).await.expect("pay failed");
    assert!(paid.is_paid);
    assert!(paid.paid_at.is_some());
    let stored = paid.payment_confirmation.expect("confirmation stored");
    assert_eq!(stored.id, "PAYID-12345");
    assert_eq!(stored.status, "COMPLETED");
    assert_eq!(stored.update_time, "2026-08-07T10:00:00Z");
    assert_eq!(stored.payer_email, "buyer@example.com");

    let missing = engine(&db)
        .pay("order:missing", confirmation())
        .await
        .expect_err("404");
    assert!(matches!(missing, OrderError::NotFound));
}

#[tokio::test]
async fn deliver_is_seller_or_admin_only() {
    let db = test_db().await;
    let (seller, seller_user) = seed_user(&db, "Seller", "seller@example.com", Role::Seller).await;
    let (_, other_seller) = seed_user(&db, "Other", "other@example.com", Role::Seller).await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;
    let (_, admin) = seed_user(&db, "Admin", "admin@example.com", Role::Admin).await;
    let product = seed_product(&db, &seller, "Crane slot", 10).await;

    let order = engine(&db)
        .create(&buyer, request_for(&[(&product, 1)]))
        .await
        .expect("creation failed");
    let id = order_id(&order);

    let err = engine(&db).deliver(&id, &buyer).await.expect_err("buyer may not");
    assert_eq!(err.to_string(), "Not authorized to deliver this order");

    let err = engine(&db)
        .deliver(&id, &other_seller)
        .await
        .expect_err("unrelated seller may not");
    assert_eq!(err.to_string(), "Not authorized to deliver this order");

    let delivered = engine(&db).deliver(&id, &seller_user).await.expect("seller may");
    assert!(delivered.is_delivered);
    assert!(delivered.delivered_at.is_some());

    // Admin can re-deliver; the flag never reverts
    let again = engine(&db).deliver(&id, &admin).await.expect("admin may");
    assert!(again.is_delivered);
}

#[tokio::test]
async fn flags_are_monotonic_and_deliver_is_idempotent() {
    let db = test_db().await;
    let (seller, seller_user) = seed_user(&db, "Seller", "seller@example.com", Role::Seller).await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;
    let product = seed_product(&db, &seller, "Crane slot", 10).await;

    let order = engine(&db)
        .create(&buyer, request_for(&[(&product, 1)]))
        .await
        .expect("creation failed");
    let id = order_id(&order);

    let first = engine(&db).deliver(&id, &seller_user).await.expect("deliver");
    let second = engine(&db).deliver(&id, &seller_user).await.expect("re-deliver");
    assert!(first.is_delivered && second.is_delivered);
    assert!(second.delivered_at.expect("stamped") >= first.delivered_at.expect("stamped"));

    let paid = engine(&db).pay(&id, confirmation()).await.expect("pay");
    let repaid = engine(&db).pay(&id, confirmation()).await.expect("re-pay");
    assert!(paid.is_paid && repaid.is_paid);
    assert!(repaid.paid_at.expect("stamped") >= paid.paid_at.expect("stamped"));
}

// ── Listings ────────────────────────────────────────────────────────

#[tokio::test]
async fn listings_are_isolated_per_buyer_and_seller() {
    let db = test_db().await;
    let (seller_a, seller_a_user) = seed_user(&db, "Seller A", "a@example.com", Role::Seller).await;
    let (seller_b, seller_b_user) = seed_user(&db, "Seller B", "b@example.com", Role::Seller).await;
    let (_, buyer_one) = seed_user(&db, "Buyer One", "one@example.com", Role::Buyer).await;
    let (_, buyer_two) = seed_user(&db, "Buyer Two", "two@example.com", Role::Buyer).await;
    let from_a = seed_product(&db, &seller_a, "Tug assist", 10).await;
    let from_b = seed_product(&db, &seller_b, "Customs filing", 10).await;

    let eng = engine(&db);
    eng.create(&buyer_one, request_for(&[(&from_a, 1)])).await.expect("o1");
    eng.create(&buyer_one, request_for(&[(&from_b, 1)])).await.expect("o2");
    eng.create(&buyer_two, request_for(&[(&from_a, 2)])).await.expect("o3");

    let mine = eng.orders_for_buyer(&buyer_one).await.expect("list");
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|o| o.buyer.to_string() == buyer_one.id));

    let sales_a = eng.orders_for_seller(&seller_a_user).await.expect("list");
    assert_eq!(sales_a.len(), 2);
    assert!(sales_a.iter().all(|o| o.seller.to_string() == seller_a_user.id));

    let sales_b = eng.orders_for_seller(&seller_b_user).await.expect("list");
    assert_eq!(sales_b.len(), 1);
}

#[tokio::test]
async fn admin_listing_resolves_narrow_user_refs() {
    let db = test_db().await;
    let (seller, _) = seed_user(&db, "Seller", "seller@example.com", Role::Seller).await;
    let (_, buyer) = seed_user(&db, "Buyer", "buyer@example.com", Role::Buyer).await;
    let product = seed_product(&db, &seller, "Crane slot", 10).await;

    let eng = engine(&db);
    eng.create(&buyer, request_for(&[(&product, 1)])).await.expect("o1");
    eng.create(&buyer, request_for(&[(&product, 1)])).await.expect("o2");

    let all = eng.all_orders().await.expect("list");
    assert_eq!(all.len(), 2);
    for summary in &all {
        assert_eq!(summary.buyer.name, "Buyer");
        assert_eq!(summary.seller.name, "Seller");
        assert!(summary.buyer.id.starts_with("user:"));
    }
}
