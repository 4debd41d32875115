//! Transactions API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionList, TransactionListResponse, TransactionNew,
    TransactionStatus as ApiStatus, TransactionKind as ApiKind, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{FixedOffset, Utc};
use engine::users;
use uuid::Uuid;

use crate::{ServerError, map_currency, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Lend => ApiKind::Lend,
        engine::TransactionKind::Borrow => ApiKind::Borrow,
        engine::TransactionKind::Investment => ApiKind::Investment,
        engine::TransactionKind::Emi => ApiKind::Emi,
    }
}

fn kind_from_api(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Expense => engine::TransactionKind::Expense,
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Lend => engine::TransactionKind::Lend,
        ApiKind::Borrow => engine::TransactionKind::Borrow,
        ApiKind::Investment => engine::TransactionKind::Investment,
        ApiKind::Emi => engine::TransactionKind::Emi,
    }
}

fn map_status(status: engine::TransactionStatus) -> ApiStatus {
    match status {
        engine::TransactionStatus::Completed => ApiStatus::Completed,
        engine::TransactionStatus::Pending => ApiStatus::Pending,
    }
}

fn status_from_api(status: ApiStatus) -> engine::TransactionStatus {
    match status {
        ApiStatus::Completed => engine::TransactionStatus::Completed,
        ApiStatus::Pending => engine::TransactionStatus::Pending,
    }
}

fn view(tx: engine::Transaction, utc: FixedOffset) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        occurred_at: tx.occurred_at.with_timezone(&utc),
        amount_minor: tx.amount_minor,
        currency: map_currency(tx.currency),
        category: tx.category,
        note: tx.note,
        status: map_status(tx.status),
    }
}

pub(crate) fn utc_offset() -> Result<FixedOffset, ServerError> {
    FixedOffset::east_opt(0).ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let created = state
        .engine
        .create_transaction(
            &user.username,
            engine::NewTransaction {
                kind: kind_from_api(payload.kind),
                amount_minor: payload.amount_minor,
                category: payload.category,
                occurred_at: payload.occurred_at.with_timezone(&Utc),
                note: payload.note,
                status: payload.status.map(status_from_api).unwrap_or_default(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id: created.id })))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = payload.limit.unwrap_or(50);
    let filter = engine::TransactionListFilter {
        from: payload.from.map(|dt| dt.with_timezone(&Utc)),
        to: payload.to.map(|dt| dt.with_timezone(&Utc)),
        kinds: payload
            .kinds
            .map(|kinds| kinds.into_iter().map(kind_from_api).collect()),
        category: payload.category,
    };

    let (txs, next_cursor) = state
        .engine
        .list_transactions_page(&user.username, limit, payload.cursor.as_deref(), &filter)
        .await?;

    let utc = utc_offset()?;
    Ok(Json(TransactionListResponse {
        transactions: txs.into_iter().map(|tx| view(tx, utc)).collect(),
        next_cursor,
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let patch = engine::TransactionPatch {
        amount_minor: payload.amount_minor,
        category: payload.category,
        note: payload.note,
        status: payload.status.map(status_from_api),
        occurred_at: payload.occurred_at.map(|dt| dt.with_timezone(&Utc)),
    };

    let updated = state
        .engine
        .update_transaction(&user.username, id, patch)
        .await?;

    let utc = utc_offset()?;
    Ok(Json(view(updated, utc)))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
