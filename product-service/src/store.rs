// ============================================================================
// Product store
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock_quantity: i64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory product catalog, single instance, no durability
#[derive(Default)]
pub struct ProductStore {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl ProductStore {
    pub async fn insert(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    pub async fn get(&self, id: Uuid) -> Option<Product> {
        self.products.read().await.get(&id).cloned()
    }

    pub async fn all(&self) -> Vec<Product> {
        self.products.read().await.values().cloned().collect()
    }

    pub async fn update<F>(&self, id: Uuid, apply: F) -> Option<Product>
    where
        F: FnOnce(&mut Product),
    {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id)?;
        apply(product);
        product.updated_at = Utc::now();
        Some(product.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<Product> {
        self.products.write().await.remove(&id)
    }
}
