// ============================================================================
// Payment store
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: String,
    pub user_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory payment records, single instance, no durability
#[derive(Default)]
pub struct PaymentStore {
    payments: RwLock<HashMap<Uuid, Payment>>,
}

impl PaymentStore {
    pub async fn insert(&self, payment: Payment) {
        self.payments.write().await.insert(payment.id, payment);
    }

    pub async fn get_for(&self, user_id: Uuid, id: Uuid) -> Option<Payment> {
        self.payments
            .read()
            .await
            .get(&id)
            .filter(|p| p.user_id == user_id)
            .cloned()
    }

    pub async fn find_by_order(&self, order_id: &str) -> Option<Payment> {
        self.payments
            .read()
            .await
            .values()
            .find(|p| p.order_id == order_id)
            .cloned()
    }

    pub async fn find_by_order_for(&self, user_id: Uuid, order_id: &str) -> Option<Payment> {
        self.payments
            .read()
            .await
            .values()
            .find(|p| p.order_id == order_id && p.user_id == user_id)
            .cloned()
    }

    /// All of a user's payments, newest first.
    pub async fn all_for(&self, user_id: Uuid) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .payments
            .read()
            .await
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        payments
    }

    pub async fn update_for<F>(&self, user_id: Uuid, id: Uuid, apply: F) -> Option<Payment>
    where
        F: FnOnce(&mut Payment),
    {
        let mut payments = self.payments.write().await;
        let payment = payments.get_mut(&id).filter(|p| p.user_id == user_id)?;
        apply(payment);
        payment.updated_at = Utc::now();
        Some(payment.clone())
    }
}
