//! Recurring payments API endpoints

use api_types::recurring::{
    DueOccurrence, DueSoonRequest, DueSoonResponse, Frequency as ApiFrequency, RecurringListResponse,
    RecurringNew, RecurringUpdate, RecurringView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::users;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_frequency(frequency: engine::Frequency) -> ApiFrequency {
    match frequency {
        engine::Frequency::Weekly => ApiFrequency::Weekly,
        engine::Frequency::Monthly => ApiFrequency::Monthly,
        engine::Frequency::Quarterly => ApiFrequency::Quarterly,
        engine::Frequency::Yearly => ApiFrequency::Yearly,
    }
}

fn frequency_from_api(frequency: ApiFrequency) -> engine::Frequency {
    match frequency {
        ApiFrequency::Weekly => engine::Frequency::Weekly,
        ApiFrequency::Monthly => engine::Frequency::Monthly,
        ApiFrequency::Quarterly => engine::Frequency::Quarterly,
        ApiFrequency::Yearly => engine::Frequency::Yearly,
    }
}

fn view(payment: engine::RecurringPayment) -> RecurringView {
    RecurringView {
        id: payment.id,
        title: payment.title,
        amount_minor: payment.amount_minor,
        category: payment.category,
        frequency: map_frequency(payment.frequency),
        next_due_date: payment.next_due_date,
        is_active: payment.is_active,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<RecurringListResponse>, ServerError> {
    let payments = state.engine.recurring_payments(&user.username).await?;
    Ok(Json(RecurringListResponse {
        payments: payments.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RecurringNew>,
) -> Result<(StatusCode, Json<RecurringView>), ServerError> {
    let payment = state
        .engine
        .create_recurring(
            &user.username,
            engine::NewRecurring {
                title: payload.title,
                amount_minor: payload.amount_minor,
                category: payload.category,
                frequency: frequency_from_api(payload.frequency),
                next_due_date: payload.next_due_date,
                is_active: payload.is_active.unwrap_or(true),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(view(payment))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecurringUpdate>,
) -> Result<Json<RecurringView>, ServerError> {
    let payment = state
        .engine
        .update_recurring(
            &user.username,
            id,
            engine::RecurringPatch {
                title: payload.title,
                amount_minor: payload.amount_minor,
                category: payload.category,
                frequency: payload.frequency.map(frequency_from_api),
                next_due_date: payload.next_due_date,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(view(payment)))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_recurring(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn due_soon(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DueSoonRequest>,
) -> Result<Json<DueSoonResponse>, ServerError> {
    let today = Utc::now().date_naive();
    let occurrences = state
        .engine
        .recurring_due_within(&user.username, today, payload.within_days)
        .await?;

    Ok(Json(DueSoonResponse {
        occurrences: occurrences
            .into_iter()
            .map(|occurrence| DueOccurrence {
                id: occurrence.id,
                title: occurrence.title,
                amount_minor: occurrence.amount_minor,
                due_on: occurrence.due_on,
            })
            .collect(),
    }))
}
