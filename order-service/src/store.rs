// ============================================================================
// Order store
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const VALID_STATUSES: &[&str] = &["pending", "confirmed", "shipped", "delivered", "cancelled"];

#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub product_price: f64,
    pub quantity: i64,
    pub subtotal: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub shipping_address: String,
    pub payment_method: String,
    pub status: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory order storage, single instance, no durability
#[derive(Default)]
pub struct OrderStore {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl OrderStore {
    pub async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }

    /// Fetches an order only if it belongs to the given user.
    pub async fn get_for(&self, user_id: Uuid, id: Uuid) -> Option<Order> {
        self.orders
            .read()
            .await
            .get(&id)
            .filter(|o| o.user_id == user_id)
            .cloned()
    }

    /// All of a user's orders, newest first.
    pub async fn all_for(&self, user_id: Uuid) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    pub async fn update_for<F>(&self, user_id: Uuid, id: Uuid, apply: F) -> Option<Order>
    where
        F: FnOnce(&mut Order),
    {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).filter(|o| o.user_id == user_id)?;
        apply(order);
        order.updated_at = Utc::now();
        Some(order.clone())
    }
}
