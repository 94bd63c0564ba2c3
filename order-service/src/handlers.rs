// ============================================================================
// Order handlers
// ============================================================================
//
// Orders are created from explicit item lists (the storefront copies the cart
// into the order request). Status transitions are restricted: delivered and
// cancelled orders are terminal, and only pending or confirmed orders can be
// cancelled.
//
// ============================================================================

use crate::store::{Order, OrderItem, OrderStore, VALID_STATUSES};
use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront_auth::{AuthManager, AuthUser};
use storefront_error::{fields::require_str, AppError, AppResult};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<OrderStore>,
    pub auth: Arc<AuthManager>,
}

impl FromRef<AppState> for Arc<AuthManager> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

fn parse_order_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found("Order not found"))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// GET /orders/
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Value>> {
    let mut orders = state.store.all_for(user.user_id).await;

    if let Some(status) = &params.status {
        orders.retain(|o| &o.status == status);
    }

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(10).max(1);
    let total = orders.len();
    let pages = total.div_ceil(per_page);

    let page_items: Vec<Order> = orders
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Ok(Json(json!({
        "orders": page_items,
        "total": total,
        "pages": pages,
        "current_page": page,
        "per_page": per_page,
    })))
}

fn parse_items(raw: &Value) -> AppResult<Vec<OrderItem>> {
    let items = raw
        .as_array()
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::validation("Order must contain at least one item"))?;

    let mut parsed = Vec::with_capacity(items.len());
    for item in items {
        for field in ["product_id", "product_name", "product_price", "quantity"] {
            if item.get(field).is_none() {
                return Err(AppError::validation(format!(
                    "Missing required item field: {}",
                    field
                )));
            }
        }

        let product_id = match &item["product_id"] {
            Value::Number(n) => n.to_string(),
            v => v.as_str().unwrap_or_default().to_string(),
        };
        let product_price = item["product_price"]
            .as_f64()
            .ok_or_else(|| AppError::validation("Missing required item field: product_price"))?;
        let quantity = item["quantity"]
            .as_i64()
            .ok_or_else(|| AppError::validation("Missing required item field: quantity"))?;

        parsed.push(OrderItem {
            product_id,
            product_name: item["product_name"].as_str().unwrap_or_default().to_string(),
            product_price,
            quantity,
            subtotal: product_price * quantity as f64,
        });
    }
    Ok(parsed)
}

/// POST /orders/
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let raw_items = body
        .get("items")
        .ok_or_else(|| AppError::validation("Missing required field: items"))?;
    let shipping_address = require_str(&body, "shipping_address")?.to_string();
    let payment_method = require_str(&body, "payment_method")?.to_string();

    let items = parse_items(raw_items)?;
    let total_amount: f64 = items.iter().map(|i| i.subtotal).sum();

    let now = Utc::now();
    let order = Order {
        id: Uuid::new_v4(),
        user_id: user.user_id,
        items,
        total_amount,
        shipping_address,
        payment_method,
        status: "pending".to_string(),
        payment_status: "pending".to_string(),
        created_at: now,
        updated_at: now,
    };

    state.store.insert(order.clone()).await;
    tracing::info!(order_id = %order.id, user_id = %user.user_id, "Order created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order created successfully",
            "order": order,
        })),
    ))
}

/// GET /orders/{order_id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state
        .store
        .get_for(user.user_id, parse_order_id(&order_id)?)
        .await
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    Ok(Json(order))
}

/// PUT /orders/{order_id}/status
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let new_status = body
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::validation("Status is required"))?;

    if !VALID_STATUSES.contains(&new_status) {
        return Err(AppError::validation(format!(
            "Invalid status. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )));
    }

    let id = parse_order_id(&order_id)?;
    let order = state
        .store
        .get_for(user.user_id, id)
        .await
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    // Terminal states stay terminal
    if order.status == "delivered" || order.status == "cancelled" {
        return Err(AppError::validation(format!(
            "Cannot change status of {} order",
            order.status
        )));
    }

    let order = state
        .store
        .update_for(user.user_id, id, |o| o.status = new_status.to_string())
        .await
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    Ok(Json(json!({
        "message": "Order status updated",
        "order": order,
    })))
}

/// PUT /orders/{order_id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_order_id(&order_id)?;
    let order = state
        .store
        .get_for(user.user_id, id)
        .await
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    if order.status != "pending" && order.status != "confirmed" {
        return Err(AppError::validation(format!(
            "Cannot cancel {} order",
            order.status
        )));
    }

    let order = state
        .store
        .update_for(user.user_id, id, |o| o.status = "cancelled".to_string())
        .await
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    Ok(Json(json!({
        "message": "Order cancelled successfully",
        "order": order,
    })))
}

/// GET /orders/stats
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    let orders = state.store.all_for(user.user_id).await;

    let count_with = |status: &str| orders.iter().filter(|o| o.status == status).count();
    let total_spent: f64 = orders
        .iter()
        .filter(|o| o.status == "delivered")
        .map(|o| o.total_amount)
        .sum();

    Ok(Json(json!({
        "total_orders": orders.len(),
        "pending_orders": count_with("pending"),
        "confirmed_orders": count_with("confirmed"),
        "shipped_orders": count_with("shipped"),
        "delivered_orders": count_with("delivered"),
        "cancelled_orders": count_with("cancelled"),
        "total_spent": total_spent,
    })))
}
