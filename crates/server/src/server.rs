use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use engine::{Engine, users};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{
    budgets, lending, loans, payments, recurring, reports, settings, sheets, statistics,
    subscriptions, transactions,
};

/// Outbound payment gateway credentials.
#[derive(Clone, Debug)]
pub struct PaymentGateway {
    /// Gateway API base, e.g. `https://api.razorpay.com`.
    pub base_url: String,
    /// Key id; doubles as the client-side publishable key.
    pub key_id: String,
    pub key_secret: String,
}

/// Spreadsheet provider authorization endpoint.
#[derive(Clone, Debug)]
pub struct SheetSync {
    /// Where `action: authenticate` redirects the user.
    pub auth_url: String,
}

#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    pub payments: Option<PaymentGateway>,
    pub sheets: Option<SheetSync>,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub config: ServerConfig,
    pub http: reqwest::Client,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<users::Model> = users::Entity::find()
        .filter(users::Column::Username.eq(auth_header.username()))
        .filter(users::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/transactions", post(transactions::create))
        .route("/transactions/list", post(transactions::list))
        .route(
            "/transactions/{id}",
            axum::routing::patch(transactions::update).delete(transactions::delete),
        )
        .route("/budgets", get(budgets::list).post(budgets::upsert))
        .route("/budgets/{id}", axum::routing::delete(budgets::delete))
        .route("/loans", get(loans::list).post(loans::create))
        .route(
            "/loans/{id}",
            axum::routing::patch(loans::update).delete(loans::delete),
        )
        .route(
            "/loans/{id}/payments",
            get(loans::list_payments).post(loans::record_payment),
        )
        .route(
            "/loans/{id}/payments/{payment_id}",
            axum::routing::delete(loans::delete_payment),
        )
        .route("/lending", post(lending::create))
        .route("/lending/list", post(lending::list))
        .route(
            "/lending/{id}",
            axum::routing::patch(lending::update).delete(lending::delete),
        )
        .route("/lending/balances", get(lending::balances))
        .route("/recurring", get(recurring::list).post(recurring::create))
        .route(
            "/recurring/{id}",
            axum::routing::patch(recurring::update).delete(recurring::delete),
        )
        .route("/recurring/due", post(recurring::due_soon))
        .route("/settings", get(settings::get).put(settings::update))
        .route("/subscription", get(subscriptions::get))
        .route("/subscription/trial", post(subscriptions::start_trial))
        .route("/subscription/cancel", post(subscriptions::cancel))
        .route("/stats/summary", post(statistics::summary))
        .route("/stats/budgets", post(statistics::budget_statuses))
        .route("/reports/monthly", post(reports::monthly))
        .route("/payments/order", post(payments::create_order))
        .route("/sheets/sync", post(sheets::dispatch))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection, config: ServerConfig) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, config, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
        config,
        http: reqwest::Client::new(),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
