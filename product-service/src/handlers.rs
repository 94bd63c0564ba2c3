// ============================================================================
// Product handlers
// ============================================================================
//
// Catalog CRUD plus filtered listing and sorted search. The service sits
// behind the gateway's /products prefix, which is stripped before forwarding,
// so everything here is mounted at the root.
//
// ============================================================================

use crate::store::{Product, ProductStore};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::sync::Arc;
use storefront_error::{
    fields::{i64_or, require_f64, require_str, str_or},
    AppError, AppResult,
};
use uuid::Uuid;

pub struct AppState {
    pub store: ProductStore,
}

fn parse_id(id: &str) -> AppResult<Uuid> {
    // Unknown and malformed ids are both "not found" to the caller
    Uuid::parse_str(id).map_err(|_| AppError::not_found("Product not found"))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// GET /
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Value>> {
    let mut products = state.store.all().await;

    if let Some(category) = &params.category {
        products.retain(|p| p.category.eq_ignore_ascii_case(category));
    }
    if let Some(search) = &params.search {
        let needle = search.to_lowercase();
        products.retain(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        });
    }
    if let Some(min) = params.min_price {
        products.retain(|p| p.price >= min);
    }
    if let Some(max) = params.max_price {
        products.retain(|p| p.price <= max);
    }

    let total = products.len();
    Ok(Json(json!({
        "products": products,
        "total": total,
    })))
}

/// POST /
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let name = require_str(&body, "name")?.to_string();
    let price = require_f64(&body, "price")?;
    let category = require_str(&body, "category")?.to_string();

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4(),
        name,
        description: str_or(&body, "description", "").to_string(),
        price,
        category,
        stock_quantity: i64_or(&body, "stock_quantity", 0),
        image_url: str_or(&body, "image_url", "").to_string(),
        created_at: now,
        updated_at: now,
    };

    state.store.insert(product.clone()).await;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .store
        .get(parse_id(&id)?)
        .await
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// PUT /{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<Product>> {
    let product = state
        .store
        .update(parse_id(&id)?, |p| {
            if let Some(v) = body.get("name").and_then(Value::as_str) {
                p.name = v.to_string();
            }
            if let Some(v) = body.get("description").and_then(Value::as_str) {
                p.description = v.to_string();
            }
            if let Some(v) = body.get("price").and_then(Value::as_f64) {
                p.price = v;
            }
            if let Some(v) = body.get("category").and_then(Value::as_str) {
                p.category = v.to_string();
            }
            if let Some(v) = body.get("stock_quantity").and_then(Value::as_i64) {
                p.stock_quantity = v;
            }
            if let Some(v) = body.get("image_url").and_then(Value::as_str) {
                p.image_url = v.to_string();
            }
        })
        .await
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(product))
}

/// DELETE /{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let deleted = state
        .store
        .remove(parse_id(&id)?)
        .await
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(json!({
        "message": "Product deleted successfully",
        "deleted_product": deleted,
    })))
}

/// GET /categories
pub async fn categories(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let mut categories: Vec<String> = state
        .store
        .all()
        .await
        .into_iter()
        .map(|p| p.category)
        .filter(|c| !c.is_empty())
        .collect();
    categories.sort();
    categories.dedup();

    Ok(Json(json!({"categories": categories})))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// GET /search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Value>> {
    let mut products = state.store.all().await;

    if !params.q.is_empty() {
        let needle = params.q.to_lowercase();
        products.retain(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        });
    }
    if let Some(category) = &params.category {
        products.retain(|p| p.category.eq_ignore_ascii_case(category));
    }

    let sort_by = params.sort_by.as_deref().unwrap_or("name");
    let descending = params.sort_order.as_deref() == Some("desc");

    products.sort_by(|a, b| {
        let ordering = match sort_by {
            "price" => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            "stock_quantity" => a.stock_quantity.cmp(&b.stock_quantity),
            "created_at" => a.created_at.cmp(&b.created_at),
            "category" => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        };
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    let total = products.len();
    Ok(Json(json!({
        "products": products,
        "total": total,
        "query": params.q,
        "category": params.category,
        "sort_by": sort_by,
        "sort_order": if descending { "desc" } else { "asc" },
    })))
}
