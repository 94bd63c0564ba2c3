// ============================================================================
// Cart store
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: String,
    pub product_name: String,
    pub product_price: f64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// In-memory cart storage keyed by owner, single instance, no durability
#[derive(Default)]
pub struct CartStore {
    items: RwLock<Vec<CartItem>>,
}

impl CartStore {
    pub async fn items_for(&self, user_id: Uuid) -> Vec<CartItem> {
        self.items
            .read()
            .await
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Adds a new line or bumps the quantity of an existing one.
    /// Returns (item, merged) where merged is true if the product was
    /// already in the cart.
    pub async fn add(
        &self,
        user_id: Uuid,
        product_id: &str,
        product_name: &str,
        product_price: f64,
        quantity: i64,
    ) -> (CartItem, bool) {
        let mut items = self.items.write().await;

        if let Some(existing) = items
            .iter_mut()
            .find(|i| i.user_id == user_id && i.product_id == product_id)
        {
            existing.quantity += quantity;
            // Name and price refresh in case the catalog changed
            existing.product_name = product_name.to_string();
            existing.product_price = product_price;
            return (existing.clone(), true);
        }

        let item = CartItem {
            id: Uuid::new_v4(),
            user_id,
            product_id: product_id.to_string(),
            product_name: product_name.to_string(),
            product_price,
            quantity,
            created_at: Utc::now(),
        };
        items.push(item.clone());
        (item, false)
    }

    pub async fn set_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i64,
    ) -> Option<CartItem> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id && i.user_id == user_id)?;
        item.quantity = quantity;
        Some(item.clone())
    }

    pub async fn remove(&self, user_id: Uuid, item_id: Uuid) -> Option<CartItem> {
        let mut items = self.items.write().await;
        let pos = items
            .iter()
            .position(|i| i.id == item_id && i.user_id == user_id)?;
        Some(items.remove(pos))
    }

    /// Drops every line owned by the user, returning how many were removed.
    pub async fn clear(&self, user_id: Uuid) -> usize {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|i| i.user_id != user_id);
        before - items.len()
    }

    pub async fn total_quantity(&self, user_id: Uuid) -> i64 {
        self.items
            .read()
            .await
            .iter()
            .filter(|i| i.user_id == user_id)
            .map(|i| i.quantity)
            .sum()
    }
}
