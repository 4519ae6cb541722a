//! Order authorization policy
//!
//! Pure decision functions applied uniformly across every order endpoint.
//! Comparison is by stable id (the `"user:xyz"` string form), never by
//! object equality — the storage layer may hand back distinct in-memory
//! representations of the same user.

use crate::auth::CurrentUser;
use crate::db::models::{Order, Role};

/// May `user` read this order? True for the order's buyer, the order's
/// seller, and admins.
pub fn can_access(order: &Order, user: &CurrentUser) -> bool {
    user.role == Role::Admin || is_order_buyer(order, user) || is_order_seller(order, user)
}

/// May `user` mark this order delivered? True for the order's seller and
/// admins.
pub fn can_deliver(order: &Order, user: &CurrentUser) -> bool {
    user.role == Role::Admin || is_order_seller(order, user)
}

fn is_order_buyer(order: &Order, user: &CurrentUser) -> bool {
    order.buyer.to_string() == user.id
}

fn is_order_seller(order: &Order, user: &CurrentUser) -> bool {
    order.seller.to_string() == user.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderStatus, PaymentMethod, ShippingAddress};
    use chrono::Utc;
    use surrealdb::RecordId;

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

    fn order(buyer: &str, seller: &str) -> Order {
        let now = Utc::now();
        Order {
            id: Some(RecordId::from_table_key("order", "o1")),
            buyer: buyer.parse().unwrap(),
            seller: seller.parse().unwrap(),
            items: vec![],
            shipping_address: address(),
            payment_method: PaymentMethod::Card,
            items_price: 100.0,
            tax_price: 18.0,
            shipping_price: 10.0,
            total_price: 128.0,
            currency: "INR".to_string(),
            status: OrderStatus::Pending,
            is_paid: false,
            paid_at: None,
            payment_confirmation: None,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn user(id: &str, role: Role) -> CurrentUser {
        CurrentUser {
            id: id.to_string(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn buyer_can_access_own_order() {
        let order = order("user:buyer1", "user:seller1");
        assert!(can_access(&order, &user("user:buyer1", Role::Buyer)));
    }

    #[test]
    fn seller_can_access_own_order() {
        let order = order("user:buyer1", "user:seller1");
        assert!(can_access(&order, &user("user:seller1", Role::Seller)));
    }

    #[test]
    fn admin_can_access_any_order() {
        let order = order("user:buyer1", "user:seller1");
        assert!(can_access(&order, &user("user:admin1", Role::Admin)));
    }

    #[test]
    fn unrelated_user_cannot_access() {
        let order = order("user:buyer1", "user:seller1");
        assert!(!can_access(&order, &user("user:other", Role::Buyer)));
        assert!(!can_access(&order, &user("user:other", Role::Seller)));
    }

    #[test]
    fn only_seller_and_admin_can_deliver() {
        let order = order("user:buyer1", "user:seller1");
        assert!(can_deliver(&order, &user("user:seller1", Role::Seller)));
        assert!(can_deliver(&order, &user("user:admin1", Role::Admin)));
        // The buyer may read but not deliver
        assert!(!can_deliver(&order, &user("user:buyer1", Role::Buyer)));
        assert!(!can_deliver(&order, &user("user:other", Role::Seller)));
    }
}
