//! Lending API endpoints

use api_types::lending::{
    LendingBalancesResponse, LendingKind as ApiKind, LendingList, LendingListResponse, LendingNew,
    LendingStatus as ApiStatus, LendingUpdate, LendingView, PersonBalance,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::users;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, transactions::utc_offset};

fn map_kind(kind: engine::LendingKind) -> ApiKind {
    match kind {
        engine::LendingKind::Lent => ApiKind::Lent,
        engine::LendingKind::Borrowed => ApiKind::Borrowed,
        engine::LendingKind::RepaidByThem => ApiKind::RepaidByThem,
        engine::LendingKind::RepaidByMe => ApiKind::RepaidByMe,
    }
}

fn kind_from_api(kind: ApiKind) -> engine::LendingKind {
    match kind {
        ApiKind::Lent => engine::LendingKind::Lent,
        ApiKind::Borrowed => engine::LendingKind::Borrowed,
        ApiKind::RepaidByThem => engine::LendingKind::RepaidByThem,
        ApiKind::RepaidByMe => engine::LendingKind::RepaidByMe,
    }
}

fn map_status(status: engine::LendingStatus) -> ApiStatus {
    match status {
        engine::LendingStatus::Pending => ApiStatus::Pending,
        engine::LendingStatus::Settled => ApiStatus::Settled,
    }
}

fn status_from_api(status: ApiStatus) -> engine::LendingStatus {
    match status {
        ApiStatus::Pending => engine::LendingStatus::Pending,
        ApiStatus::Settled => engine::LendingStatus::Settled,
    }
}

fn view(entry: engine::LendingEntry, utc: chrono::FixedOffset) -> LendingView {
    LendingView {
        id: entry.id,
        kind: map_kind(entry.kind),
        person: entry.person,
        amount_minor: entry.amount_minor,
        occurred_at: entry.occurred_at.with_timezone(&utc),
        status: map_status(entry.status),
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<LendingNew>,
) -> Result<(StatusCode, Json<LendingView>), ServerError> {
    let entry = state
        .engine
        .create_lending(
            &user.username,
            engine::NewLending {
                kind: kind_from_api(payload.kind),
                person: payload.person,
                amount_minor: payload.amount_minor,
                occurred_at: payload.occurred_at.with_timezone(&Utc),
                status: payload.status.map(status_from_api).unwrap_or_default(),
            },
        )
        .await?;

    let utc = utc_offset()?;
    Ok((StatusCode::CREATED, Json(view(entry, utc))))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<LendingList>,
) -> Result<Json<LendingListResponse>, ServerError> {
    let filter = engine::LendingListFilter {
        from: payload.from.map(|dt| dt.with_timezone(&Utc)),
        to: payload.to.map(|dt| dt.with_timezone(&Utc)),
        person: payload.person,
    };
    let entries = state.engine.lending_entries(&user.username, &filter).await?;

    let utc = utc_offset()?;
    Ok(Json(LendingListResponse {
        entries: entries.into_iter().map(|entry| view(entry, utc)).collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LendingUpdate>,
) -> Result<Json<LendingView>, ServerError> {
    let entry = state
        .engine
        .update_lending(
            &user.username,
            id,
            payload.amount_minor,
            payload.status.map(status_from_api),
        )
        .await?;

    let utc = utc_offset()?;
    Ok(Json(view(entry, utc)))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_lending(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn balances(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<LendingBalancesResponse>, ServerError> {
    let balances = state.engine.lending_balances(&user.username).await?;
    Ok(Json(LendingBalancesResponse {
        balances: balances
            .into_iter()
            .map(|balance| PersonBalance {
                person: balance.person,
                net_minor: balance.net_minor,
            })
            .collect(),
    }))
}
