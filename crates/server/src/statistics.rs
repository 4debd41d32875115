//! Statistics API endpoints

use api_types::stats::{
    BudgetHealth as ApiBudgetHealth, BudgetStatusResponse, BudgetStatusView, CategoryShare,
    HealthLabel as ApiHealthLabel, HealthView, MonthlyFlow, StatsRequest, SummaryResponse,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use engine::analytics;
use engine::users;

use crate::{ServerError, map_currency, server::ServerState};

fn map_health_label(label: analytics::HealthLabel) -> ApiHealthLabel {
    match label {
        analytics::HealthLabel::Excellent => ApiHealthLabel::Excellent,
        analytics::HealthLabel::Good => ApiHealthLabel::Good,
        analytics::HealthLabel::Warning => ApiHealthLabel::Warning,
        analytics::HealthLabel::Critical => ApiHealthLabel::Critical,
    }
}

fn map_budget_health(health: analytics::BudgetHealth) -> ApiBudgetHealth {
    match health {
        analytics::BudgetHealth::OnTrack => ApiBudgetHealth::OnTrack,
        analytics::BudgetHealth::Warning => ApiBudgetHealth::Warning,
        analytics::BudgetHealth::Exceeded => ApiBudgetHealth::Exceeded,
    }
}

/// Handle requests for the window's aggregates.
pub async fn summary(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<StatsRequest>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let from = payload.from.with_timezone(&Utc);
    let to = payload.to.with_timezone(&Utc);

    let summary = state.engine.summary(&user.username, from, to).await?;
    let health = analytics::score_from_totals(&summary.totals);

    Ok(Json(SummaryResponse {
        currency: map_currency(summary.currency),
        total_income_minor: summary.totals.income_minor,
        total_expenses_minor: summary.totals.expenses_minor,
        total_investment_minor: summary.totals.investment_minor,
        total_emi_minor: summary.totals.emi_minor,
        money_lent_minor: summary.totals.lent_minor,
        money_borrowed_minor: summary.totals.borrowed_minor,
        net_savings_minor: summary.net_savings_minor,
        savings_rate: summary.savings_rate,
        categories: summary
            .categories
            .into_iter()
            .map(|share| CategoryShare {
                category: share.category,
                amount_minor: share.amount_minor,
                share: share.share,
            })
            .collect(),
        monthly: summary
            .monthly
            .into_iter()
            .map(|flow| MonthlyFlow {
                year: flow.year,
                month: flow.month,
                income_minor: flow.income_minor,
                expenses_minor: flow.expenses_minor,
                net_minor: flow.net_minor(),
            })
            .collect(),
        health: HealthView {
            score: health.score,
            label: map_health_label(health.label),
        },
    }))
}

/// Handle requests for budget utilization over a window.
pub async fn budget_statuses(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<StatsRequest>,
) -> Result<Json<BudgetStatusResponse>, ServerError> {
    let from = payload.from.with_timezone(&Utc);
    let to = payload.to.with_timezone(&Utc);

    let statuses = state
        .engine
        .budget_statuses(&user.username, from, to)
        .await?;

    Ok(Json(BudgetStatusResponse {
        statuses: statuses
            .into_iter()
            .map(|status| BudgetStatusView {
                category: status.category,
                limit_minor: status.limit_minor,
                spent_minor: status.spent_minor,
                percent_used: status.percent_used,
                remaining_minor: status.remaining_minor,
                status: map_budget_health(status.status),
            })
            .collect(),
    }))
}
