//! Loans API endpoints

use api_types::loan::{
    LoanListResponse, LoanNew, LoanPaymentListResponse, LoanPaymentNew, LoanPaymentView,
    LoanStatus as ApiLoanStatus, LoanUpdate, LoanView,
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

fn map_status(status: engine::LoanStatus) -> ApiLoanStatus {
    match status {
        engine::LoanStatus::Active => ApiLoanStatus::Active,
        engine::LoanStatus::Closed => ApiLoanStatus::Closed,
    }
}

fn status_from_api(status: ApiLoanStatus) -> engine::LoanStatus {
    match status {
        ApiLoanStatus::Active => engine::LoanStatus::Active,
        ApiLoanStatus::Closed => engine::LoanStatus::Closed,
    }
}

fn view(progress: engine::LoanProgress) -> LoanView {
    LoanView {
        id: progress.loan.id,
        name: progress.loan.name,
        principal_minor: progress.loan.principal_minor,
        interest_rate_pct: progress.loan.interest_rate_pct,
        tenure_months: progress.loan.tenure_months,
        monthly_emi_minor: progress.loan.monthly_emi_minor,
        start_date: progress.loan.start_date,
        status: map_status(progress.loan.status),
        paid_minor: progress.paid_minor,
        outstanding_minor: progress.outstanding_minor,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<LoanListResponse>, ServerError> {
    let loans = state.engine.loans(&user.username).await?;
    Ok(Json(LoanListResponse {
        loans: loans.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<LoanNew>,
) -> Result<(StatusCode, Json<LoanView>), ServerError> {
    let loan = state
        .engine
        .create_loan(
            &user.username,
            engine::NewLoan {
                name: payload.name,
                principal_minor: payload.principal_minor,
                interest_rate_pct: payload.interest_rate_pct,
                tenure_months: payload.tenure_months,
                start_date: payload.start_date,
                monthly_emi_minor: payload.monthly_emi_minor,
            },
        )
        .await?;

    let outstanding_minor = loan.principal_minor;
    Ok((
        StatusCode::CREATED,
        Json(view(engine::LoanProgress {
            loan,
            paid_minor: 0,
            outstanding_minor,
        })),
    ))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LoanUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_loan(
            &user.username,
            id,
            payload.name,
            payload.status.map(status_from_api),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_loan(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn record_payment(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LoanPaymentNew>,
) -> Result<(StatusCode, Json<LoanPaymentView>), ServerError> {
    let payment = state
        .engine
        .record_loan_payment(
            &user.username,
            id,
            payload.amount_minor,
            payload.paid_at.with_timezone(&Utc),
            payload.note,
        )
        .await?;

    let utc = utc_offset()?;
    Ok((
        StatusCode::CREATED,
        Json(LoanPaymentView {
            id: payment.id,
            amount_minor: payment.amount_minor,
            paid_at: payment.paid_at.with_timezone(&utc),
            note: payment.note,
        }),
    ))
}

pub async fn delete_payment(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path((loan_id, payment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_loan_payment(&user.username, loan_id, payment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_payments(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoanPaymentListResponse>, ServerError> {
    let payments = state.engine.loan_payments(&user.username, id).await?;
    let utc = utc_offset()?;
    Ok(Json(LoanPaymentListResponse {
        payments: payments
            .into_iter()
            .map(|payment| LoanPaymentView {
                id: payment.id,
                amount_minor: payment.amount_minor,
                paid_at: payment.paid_at.with_timezone(&utc),
                note: payment.note,
            })
            .collect(),
    }))
}
