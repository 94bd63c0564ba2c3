// ============================================================================
// Payment handlers
// ============================================================================
//
// Payments run through the simulated processor: the record is created in
// "processing" state, then marked completed or failed from the processor
// outcome. A completed payment blocks any further charge for the same order.
//
// ============================================================================

use crate::processor::{Outcome, PaymentProcessor};
use crate::store::{Payment, PaymentStore};
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
use storefront_error::{
    fields::{require_f64, require_str, str_or},
    AppError, AppResult,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PaymentStore>,
    pub processor: PaymentProcessor,
    pub auth: Arc<AuthManager>,
}

impl FromRef<AppState> for Arc<AuthManager> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

fn parse_payment_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found("Payment not found"))
}

/// POST /payments/
pub async fn process(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let order_id = match body.get("order_id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(AppError::validation("Missing required field: order_id")),
    };
    let amount = require_f64(&body, "amount")?;
    let payment_method = require_str(&body, "payment_method")?.to_string();

    if amount <= 0.0 {
        return Err(AppError::validation("Amount must be greater than 0"));
    }

    if let Some(existing) = state.store.find_by_order(&order_id).await {
        if existing.status == "completed" {
            return Err(AppError::conflict("Payment already completed for this order"));
        }
    }

    let now = Utc::now();
    let mut payment = Payment {
        id: Uuid::new_v4(),
        order_id,
        user_id: user.user_id,
        amount,
        currency: str_or(&body, "currency", "USD").to_string(),
        payment_method,
        status: "processing".to_string(),
        transaction_id: None,
        failure_reason: None,
        created_at: now,
        updated_at: now,
    };
    state.store.insert(payment.clone()).await;

    let outcome = state.processor.process(amount).await;
    let succeeded = matches!(outcome, Outcome::Completed { .. });

    payment = state
        .store
        .update_for(user.user_id, payment.id, |p| match &outcome {
            Outcome::Completed { transaction_id } => {
                p.status = "completed".to_string();
                p.transaction_id = Some(transaction_id.clone());
            }
            Outcome::Failed { reason } => {
                p.status = "failed".to_string();
                p.failure_reason = Some(reason.clone());
            }
        })
        .await
        .ok_or_else(|| AppError::internal("Payment record vanished during processing"))?;

    tracing::info!(payment_id = %payment.id, status = %payment.status, "Payment processed");

    let status = if succeeded {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((
        status,
        Json(json!({
            "message": "Payment processed",
            "payment": payment,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// GET /payments/
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Value>> {
    let mut payments = state.store.all_for(user.user_id).await;

    if let Some(status) = &params.status {
        payments.retain(|p| &p.status == status);
    }

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(10).max(1);
    let total = payments.len();
    let pages = total.div_ceil(per_page);

    let page_items: Vec<Payment> = payments
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Ok(Json(json!({
        "payments": page_items,
        "total": total,
        "pages": pages,
        "current_page": page,
        "per_page": per_page,
    })))
}

/// GET /payments/{payment_id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<String>,
) -> AppResult<Json<Payment>> {
    let payment = state
        .store
        .get_for(user.user_id, parse_payment_id(&payment_id)?)
        .await
        .ok_or_else(|| AppError::not_found("Payment not found"))?;
    Ok(Json(payment))
}

/// GET /payments/order/{order_id}
pub async fn get_by_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<String>,
) -> AppResult<Json<Payment>> {
    let payment = state
        .store
        .find_by_order_for(user.user_id, &order_id)
        .await
        .ok_or_else(|| AppError::not_found("Payment not found for this order"))?;
    Ok(Json(payment))
}

/// POST /payments/{payment_id}/refund
pub async fn refund(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<String>,
    body: Option<Json<Value>>,
) -> AppResult<Json<Value>> {
    let id = parse_payment_id(&payment_id)?;
    let payment = state
        .store
        .get_for(user.user_id, id)
        .await
        .ok_or_else(|| AppError::not_found("Payment not found"))?;

    if payment.status != "completed" {
        return Err(AppError::validation("Only completed payments can be refunded"));
    }

    let refund_amount = body
        .as_ref()
        .and_then(|Json(b)| b.get("amount").and_then(Value::as_f64))
        .unwrap_or(payment.amount);
    if refund_amount > payment.amount {
        return Err(AppError::validation(
            "Refund amount cannot exceed payment amount",
        ));
    }

    // Refunds always clear in the demo processor
    let payment = state
        .store
        .update_for(user.user_id, id, |p| p.status = "refunded".to_string())
        .await
        .ok_or_else(|| AppError::not_found("Payment not found"))?;

    Ok(Json(json!({
        "message": "Payment refunded successfully",
        "payment": payment,
        "refund_amount": refund_amount,
    })))
}

/// GET /payments/methods
pub async fn methods() -> Json<Value> {
    Json(json!({
        "payment_methods": [
            {"id": "credit_card", "name": "Credit Card", "enabled": true},
            {"id": "debit_card", "name": "Debit Card", "enabled": true},
            {"id": "paypal", "name": "PayPal", "enabled": true},
            {"id": "apple_pay", "name": "Apple Pay", "enabled": true},
            {"id": "google_pay", "name": "Google Pay", "enabled": true},
        ]
    }))
}

#[cfg(test)]
mod tests {
    use crate::app_for_tests;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
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

    fn charge(order_id: &str) -> Value {
        json!({
            "order_id": order_id,
            "amount": 199.99,
            "payment_method": "credit_card",
        })
    }

    #[tokio::test]
    async fn successful_payment_completes_with_transaction_id() {
        let app = app_for_tests(SECRET, true);
        let token = token_for(Uuid::new_v4());

        let (status, body) = read_json(
            app.oneshot(request("POST", "/payments/", Some(charge("order-1")), &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Payment processed");
        assert_eq!(body["payment"]["status"], "completed");
        assert!(body["payment"]["transaction_id"]
            .as_str()
            .unwrap()
            .starts_with("TXN_"));
    }

    #[tokio::test]
    async fn failed_payment_returns_400_with_reason() {
        let app = app_for_tests(SECRET, false);
        let token = token_for(Uuid::new_v4());

        let (status, body) = read_json(
            app.oneshot(request("POST", "/payments/", Some(charge("order-1")), &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["payment"]["status"], "failed");
        assert!(body["payment"]["failure_reason"].is_string());
    }

    #[tokio::test]
    async fn completed_order_rejects_a_second_charge() {
        let app = app_for_tests(SECRET, true);
        let token = token_for(Uuid::new_v4());

        app.clone()
            .oneshot(request("POST", "/payments/", Some(charge("order-1")), &token))
            .await
            .unwrap();

        let (status, body) = read_json(
            app.oneshot(request("POST", "/payments/", Some(charge("order-1")), &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Payment already completed for this order");
    }

    #[tokio::test]
    async fn zero_amount_is_rejected() {
        let app = app_for_tests(SECRET, true);
        let token = token_for(Uuid::new_v4());

        let (status, body) = read_json(
            app.oneshot(request(
                "POST",
                "/payments/",
                Some(json!({
                    "order_id": "order-1",
                    "amount": 0,
                    "payment_method": "credit_card",
                })),
                &token,
            ))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Amount must be greater than 0");
    }

    #[tokio::test]
    async fn lookup_by_id_and_by_order() {
        let app = app_for_tests(SECRET, true);
        let token = token_for(Uuid::new_v4());

        let (_, body) = read_json(
            app.clone()
                .oneshot(request("POST", "/payments/", Some(charge("order-7")), &token))
                .await
                .unwrap(),
        )
        .await;
        let id = body["payment"]["id"].as_str().unwrap().to_string();

        let (status, body) = read_json(
            app.clone()
                .oneshot(request("GET", &format!("/payments/{}", id), None, &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["order_id"], "order-7");

        let (status, body) = read_json(
            app.clone()
                .oneshot(request("GET", "/payments/order/order-7", None, &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id);

        // Other users cannot see the payment
        let other = token_for(Uuid::new_v4());
        let (status, _) = read_json(
            app.oneshot(request("GET", &format!("/payments/{}", id), None, &other))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn refund_only_completed_and_never_more_than_charged() {
        let app = app_for_tests(SECRET, true);
        let token = token_for(Uuid::new_v4());

        let (_, body) = read_json(
            app.clone()
                .oneshot(request("POST", "/payments/", Some(charge("order-1")), &token))
                .await
                .unwrap(),
        )
        .await;
        let id = body["payment"]["id"].as_str().unwrap().to_string();

        let (status, body) = read_json(
            app.clone()
                .oneshot(request(
                    "POST",
                    &format!("/payments/{}/refund", id),
                    Some(json!({"amount": 500.0})),
                    &token,
                ))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Refund amount cannot exceed payment amount");

        let (status, body) = read_json(
            app.clone()
                .oneshot(request("POST", &format!("/payments/{}/refund", id), None, &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payment"]["status"], "refunded");
        assert_eq!(body["refund_amount"], 199.99);

        // Refunded is no longer completed
        let (status, _) = read_json(
            app.oneshot(request("POST", &format!("/payments/{}/refund", id), None, &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn history_paginates() {
        let app = app_for_tests(SECRET, true);
        let token = token_for(Uuid::new_v4());

        for i in 0..3 {
            app.clone()
                .oneshot(request(
                    "POST",
                    "/payments/",
                    Some(charge(&format!("order-{}", i))),
                    &token,
                ))
                .await
                .unwrap();
        }

        let (_, body) = read_json(
            app.oneshot(request("GET", "/payments/?per_page=2", None, &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["pages"], 2);
        assert_eq!(body["payments"].as_array().unwrap().len(), 2);
    }
}
