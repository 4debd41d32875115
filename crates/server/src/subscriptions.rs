//! Subscription API endpoints

use api_types::subscription::{
    Plan as ApiPlan, SubscriptionStatus as ApiStatus, SubscriptionView,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::users;

use crate::{ServerError, server::ServerState, transactions::utc_offset};

fn map_plan(plan: engine::Plan) -> ApiPlan {
    match plan {
        engine::Plan::Free => ApiPlan::Free,
        engine::Plan::Premium => ApiPlan::Premium,
    }
}

fn map_status(status: engine::SubscriptionStatus) -> ApiStatus {
    match status {
        engine::SubscriptionStatus::Active => ApiStatus::Active,
        engine::SubscriptionStatus::Cancelled => ApiStatus::Cancelled,
        engine::SubscriptionStatus::Expired => ApiStatus::Expired,
        engine::SubscriptionStatus::Trial => ApiStatus::Trial,
    }
}

fn view(subscription: engine::Subscription) -> Result<SubscriptionView, ServerError> {
    let utc = utc_offset()?;
    let premium = subscription.premium_at(Utc::now());
    Ok(SubscriptionView {
        plan: map_plan(subscription.plan),
        status: map_status(subscription.status),
        period_start: subscription.period_start.with_timezone(&utc),
        period_end: subscription.period_end.with_timezone(&utc),
        trial_ends_at: subscription.trial_ends_at.map(|dt| dt.with_timezone(&utc)),
        premium,
    })
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SubscriptionView>, ServerError> {
    let subscription = state
        .engine
        .subscription(&user.username)
        .await?
        .ok_or_else(|| {
            ServerError::Engine(engine::EngineError::KeyNotFound("subscription".to_string()))
        })?;
    Ok(Json(view(subscription)?))
}

pub async fn start_trial(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<(StatusCode, Json<SubscriptionView>), ServerError> {
    let subscription = state.engine.start_trial(&user.username, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(view(subscription)?)))
}

pub async fn cancel(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SubscriptionView>, ServerError> {
    let subscription = state.engine.cancel_subscription(&user.username).await?;
    Ok(Json(view(subscription)?))
}
