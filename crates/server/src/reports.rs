//! Report download endpoint

use api_types::report::ReportRequest;
use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use engine::users;

use crate::{ServerError, server::ServerState};

/// Streams the rendered monthly report as a downloadable text document.
pub async fn monthly(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ReportRequest>,
) -> Result<Response, ServerError> {
    let report = state
        .engine
        .monthly_report(&user.username, payload.year, payload.month, Utc::now())
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", report.filename);
    let response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.render(),
    )
        .into_response();
    Ok(response)
}
