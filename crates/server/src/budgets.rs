//! Budgets API endpoints

use api_types::budget::{BudgetListResponse, BudgetUpsert, BudgetView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::users;
use uuid::Uuid;

use crate::{ServerError, map_currency, server::ServerState};

fn view(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category: budget.category,
        monthly_limit_minor: budget.monthly_limit_minor,
        currency: map_currency(budget.currency),
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let budgets = state.engine.budgets(&user.username).await?;
    Ok(Json(BudgetListResponse {
        budgets: budgets.into_iter().map(view).collect(),
    }))
}

pub async fn upsert(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetUpsert>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .upsert_budget(&user.username, &payload.category, payload.monthly_limit_minor)
        .await?;
    Ok((StatusCode::CREATED, Json(view(budget))))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
