//! Payment-order endpoint.
//!
//! Creates a checkout order against the configured gateway and hands the
//! client everything it needs for the checkout widget. The gateway itself
//! is a black box: one outbound call, one generic failure surface.

use api_types::payment::{OrderCreated, OrderNew};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::users;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ServerError, currency_from_api, map_currency, server::ServerState};

#[derive(Serialize)]
struct GatewayOrderRequest {
    amount: i64,
    currency: String,
    receipt: String,
}

#[derive(Deserialize)]
struct GatewayOrderResponse {
    id: String,
}

pub async fn create_order(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<OrderNew>,
) -> Result<(StatusCode, Json<OrderCreated>), ServerError> {
    if payload.amount_minor <= 0 {
        return Err(ServerError::Generic("amount must be > 0".to_string()));
    }
    let Some(gateway) = state.config.payments.as_ref() else {
        return Err(ServerError::Generic(
            "payment gateway not configured".to_string(),
        ));
    };

    let currency = currency_from_api(payload.currency);
    let request = GatewayOrderRequest {
        amount: payload.amount_minor,
        currency: currency.code().to_string(),
        receipt: format!("fintrack-{}-{}", user.username, Uuid::new_v4()),
    };

    let response = state
        .http
        .post(format!("{}/v1/orders", gateway.base_url.trim_end_matches('/')))
        .basic_auth(&gateway.key_id, Some(&gateway.key_secret))
        .json(&request)
        .send()
        .await
        .map_err(|err| {
            tracing::error!("payment gateway unreachable: {err}");
            ServerError::Generic("payment gateway unavailable".to_string())
        })?;

    if !response.status().is_success() {
        tracing::error!("payment gateway rejected order: {}", response.status());
        return Err(ServerError::Generic(
            "payment gateway rejected the order".to_string(),
        ));
    }

    let order = response
        .json::<GatewayOrderResponse>()
        .await
        .map_err(|err| {
            tracing::error!("payment gateway returned malformed order: {err}");
            ServerError::Generic("payment gateway unavailable".to_string())
        })?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreated {
            order_id: order.id,
            amount_minor: payload.amount_minor,
            currency: map_currency(currency),
            publishable_key: gateway.key_id.clone(),
        }),
    ))
}
