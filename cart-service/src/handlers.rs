// ============================================================================
// Cart handlers
// ============================================================================
//
// Every cart operation is scoped to the authenticated user extracted from the
// bearer token, so one user's lines are invisible to another.
//
// ============================================================================

use crate::store::CartStore;
use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use storefront_auth::{AuthManager, AuthUser};
use storefront_error::{
    fields::{i64_or, require_f64},
    AppError, AppResult,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CartStore>,
    pub auth: Arc<AuthManager>,
}

impl FromRef<AppState> for Arc<AuthManager> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

// Product ids arrive as strings or numbers depending on the client
fn require_product_id(body: &Value) -> AppResult<String> {
    match body.get("product_id") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(AppError::validation("Missing required field: product_id")),
    }
}

fn require_product_name(body: &Value) -> AppResult<String> {
    body.get("product_name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::validation("Missing required field: product_name"))
}

fn parse_item_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found("Cart item not found"))
}

/// GET /cart/
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    let items = state.store.items_for(user.user_id).await;

    let total_amount: f64 = items.iter().map(|i| i.product_price * i.quantity as f64).sum();
    let total_items: i64 = items.iter().map(|i| i.quantity).sum();

    Ok(Json(json!({
        "cart_items": items,
        "total_items": total_items,
        "total_amount": total_amount,
    })))
}

/// POST /cart/add
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let product_id = require_product_id(&body)?;
    let product_name = require_product_name(&body)?;
    let product_price = require_f64(&body, "product_price")?;

    let quantity = i64_or(&body, "quantity", 1);
    if quantity <= 0 {
        return Err(AppError::validation("Quantity must be greater than 0"));
    }

    let (item, merged) = state
        .store
        .add(user.user_id, &product_id, &product_name, product_price, quantity)
        .await;

    if merged {
        Ok((
            StatusCode::OK,
            Json(json!({
                "message": "Item quantity updated in cart",
                "cart_item": item,
            })),
        ))
    } else {
        Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": "Item added to cart",
                "cart_item": item,
            })),
        ))
    }
}

/// PUT /cart/update/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item_id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let quantity = body
        .get("quantity")
        .and_then(Value::as_i64)
        .ok_or_else(|| AppError::validation("Quantity is required"))?;
    if quantity <= 0 {
        return Err(AppError::validation("Quantity must be greater than 0"));
    }

    let item = state
        .store
        .set_quantity(user.user_id, parse_item_id(&item_id)?, quantity)
        .await
        .ok_or_else(|| AppError::not_found("Cart item not found"))?;

    Ok(Json(json!({
        "message": "Cart item updated",
        "cart_item": item,
    })))
}

/// DELETE /cart/remove/{item_id}
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item_id): Path<String>,
) -> AppResult<Json<Value>> {
    let item = state
        .store
        .remove(user.user_id, parse_item_id(&item_id)?)
        .await
        .ok_or_else(|| AppError::not_found("Cart item not found"))?;

    Ok(Json(json!({
        "message": "Item removed from cart",
        "removed_item": item,
    })))
}

/// DELETE /cart/clear
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    let removed = state.store.clear(user.user_id).await;

    Ok(Json(json!({
        "message": format!("Cart cleared. {} items removed.", removed),
    })))
}

/// GET /cart/count
pub async fn count(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    let total_items = state.store.total_quantity(user.user_id).await;
    Ok(Json(json!({"total_items": total_items})))
}

#[cfg(test)]
mod tests {
    use crate::app_with_secret;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use storefront_auth::AuthManager;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn token_for(user: Uuid) -> String {
        AuthManager::new(SECRET, 24)
            .issue_token(user, "user@example.com")
            .unwrap()
    }

    fn request(method: &str, uri: &str, body: Option<Value>, token: &str) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token));
        match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&v).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn laptop() -> Value {
        json!({
            "product_id": "prod-1",
            "product_name": "Laptop",
            "product_price": 1299.99,
            "quantity": 2,
        })
    }

    #[tokio::test]
    async fn add_merges_repeated_products() {
        let app = app_with_secret(SECRET);
        let token = token_for(Uuid::new_v4());

        let (status, body) = read_json(
            app.clone()
                .oneshot(request("POST", "/cart/add", Some(laptop()), &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Item added to cart");

        let (status, body) = read_json(
            app.clone()
                .oneshot(request("POST", "/cart/add", Some(laptop()), &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Item quantity updated in cart");
        assert_eq!(body["cart_item"]["quantity"], 4);

        let (_, body) = read_json(
            app.oneshot(request("GET", "/cart/", None, &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["cart_items"].as_array().unwrap().len(), 1);
        assert_eq!(body["total_items"], 4);
        assert_eq!(body["total_amount"].as_f64().unwrap(), 1299.99 * 4.0);
    }

    #[tokio::test]
    async fn carts_are_isolated_per_user() {
        let app = app_with_secret(SECRET);
        let alice = token_for(Uuid::new_v4());
        let bob = token_for(Uuid::new_v4());

        app.clone()
            .oneshot(request("POST", "/cart/add", Some(laptop()), &alice))
            .await
            .unwrap();

        let (_, body) = read_json(
            app.oneshot(request("GET", "/cart/count", None, &bob))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["total_items"], 0);
    }

    #[tokio::test]
    async fn update_remove_and_clear() {
        let app = app_with_secret(SECRET);
        let token = token_for(Uuid::new_v4());

        let (_, body) = read_json(
            app.clone()
                .oneshot(request("POST", "/cart/add", Some(laptop()), &token))
                .await
                .unwrap(),
        )
        .await;
        let item_id = body["cart_item"]["id"].as_str().unwrap().to_string();

        let (status, body) = read_json(
            app.clone()
                .oneshot(request(
                    "PUT",
                    &format!("/cart/update/{}", item_id),
                    Some(json!({"quantity": 5})),
                    &token,
                ))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cart_item"]["quantity"], 5);

        let (status, _) = read_json(
            app.clone()
                .oneshot(request(
                    "PUT",
                    &format!("/cart/update/{}", item_id),
                    Some(json!({"quantity": 0})),
                    &token,
                ))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = read_json(
            app.clone()
                .oneshot(request(
                    "DELETE",
                    &format!("/cart/remove/{}", item_id),
                    None,
                    &token,
                ))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        app.clone()
            .oneshot(request("POST", "/cart/add", Some(laptop()), &token))
            .await
            .unwrap();

        let (status, body) = read_json(
            app.oneshot(request("DELETE", "/cart/clear", None, &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Cart cleared. 1 items removed.");
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = app_with_secret(SECRET);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/cart/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_field_names_the_field() {
        let app = app_with_secret(SECRET);
        let token = token_for(Uuid::new_v4());

        let (status, body) = read_json(
            app.oneshot(request(
                "POST",
                "/cart/add",
                Some(json!({"product_id": "prod-1", "product_name": "Laptop"})),
                &token,
            ))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("product_price"));
    }
}
