//! Spreadsheet-sync endpoint.
//!
//! Action dispatch: `authenticate` hands back the provider authorization
//! URL, `sync` pulls the published sheet as CSV, parses the rows and
//! imports them through the engine's dedupe path. The whole sync reports
//! as one unit: any failure fails the request, nothing partial.

use api_types::sync::{SyncAction, SyncRequest, SyncResponse};
use axum::{Extension, Json, extract::State};
use chrono::{NaiveDate, TimeZone, Utc};
use engine::{ImportRow, Money, TransactionKind, users};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};

/// One spreadsheet row as exported by the sheet template.
#[derive(Debug, Deserialize)]
struct SheetRow {
    date: String,
    #[serde(rename = "type")]
    kind: String,
    amount: String,
    category: String,
    #[serde(default)]
    note: Option<String>,
}

/// Extracts the document id from a Google Sheets URL.
///
/// Rejects anything that is not `https://docs.google.com/spreadsheets/d/<id>/…`
/// before any network dispatch.
fn parse_sheet_id(url: &str) -> Result<String, ServerError> {
    let malformed = || ServerError::Generic("unparseable spreadsheet URL".to_string());

    let rest = url
        .trim()
        .strip_prefix("https://docs.google.com/spreadsheets/d/")
        .ok_or_else(malformed)?;
    let id: &str = rest.split(['/', '?', '#']).next().unwrap_or("");
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(malformed());
    }
    Ok(id.to_string())
}

fn parse_rows(csv_text: &str) -> Result<Vec<ImportRow>, ServerError> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let mut rows = Vec::new();

    for record in reader.deserialize::<SheetRow>() {
        let record =
            record.map_err(|err| ServerError::Generic(format!("malformed sheet row: {err}")))?;

        let date = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d")
            .map_err(|_| ServerError::Generic(format!("invalid date: {}", record.date)))?;
        let occurred_at = Utc
            .from_utc_datetime(&date.and_hms_opt(0, 0, 0).ok_or_else(|| {
                ServerError::Generic(format!("invalid date: {}", record.date))
            })?);

        let kind = TransactionKind::try_from(record.kind.trim().to_lowercase().as_str())
            .map_err(ServerError::from)?;
        let amount = record
            .amount
            .trim()
            .parse::<Money>()
            .map_err(ServerError::from)?;

        rows.push(ImportRow {
            kind,
            amount_minor: amount.minor(),
            category: record.category,
            occurred_at,
            note: record.note.filter(|note| !note.trim().is_empty()),
        });
    }

    Ok(rows)
}

pub async fn dispatch(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, ServerError> {
    match payload.action {
        SyncAction::Authenticate => {
            let Some(sheets) = state.config.sheets.as_ref() else {
                return Err(ServerError::Generic(
                    "spreadsheet sync not configured".to_string(),
                ));
            };
            Ok(Json(SyncResponse::Redirect {
                url: format!("{}?user={}", sheets.auth_url, user.username),
            }))
        }
        SyncAction::Sync => {
            let settings = state.engine.user_settings(&user.username).await?;
            let url = settings.spreadsheet_url.ok_or_else(|| {
                ServerError::Generic("no spreadsheet linked in settings".to_string())
            })?;
            let sheet_id = parse_sheet_id(&url)?;

            let export_url = format!(
                "https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv"
            );
            let response = state.http.get(&export_url).send().await.map_err(|err| {
                tracing::error!("spreadsheet fetch failed: {err}");
                ServerError::Generic("spreadsheet unavailable".to_string())
            })?;
            if !response.status().is_success() {
                return Err(ServerError::Generic("spreadsheet unavailable".to_string()));
            }
            let body = response.text().await.map_err(|err| {
                tracing::error!("spreadsheet fetch failed: {err}");
                ServerError::Generic("spreadsheet unavailable".to_string())
            })?;

            let rows = parse_rows(&body)?;
            let outcome = state.engine.import_transactions(&user.username, rows).await?;

            Ok(Json(SyncResponse::Report {
                imported: outcome.imported,
                duplicates: outcome.duplicates,
                total: outcome.total,
                message: format!(
                    "Imported {} of {} rows ({} duplicates)",
                    outcome.imported, outcome.total, outcome.duplicates
                ),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_id_parses_from_canonical_urls() {
        let id = parse_sheet_id(
            "https://docs.google.com/spreadsheets/d/1AbC-def_456/edit#gid=0",
        )
        .unwrap();
        assert_eq!(id, "1AbC-def_456");

        let bare = parse_sheet_id("https://docs.google.com/spreadsheets/d/xyz").unwrap();
        assert_eq!(bare, "xyz");
    }

    #[test]
    fn malformed_urls_are_rejected_before_dispatch() {
        assert!(parse_sheet_id("https://example.com/spreadsheets/d/abc").is_err());
        assert!(parse_sheet_id("not a url").is_err());
        assert!(parse_sheet_id("https://docs.google.com/spreadsheets/d/").is_err());
    }

    #[test]
    fn rows_parse_dates_amounts_and_kinds() {
        let csv = "date,type,amount,category,note\n\
                   2026-07-01,expense,450.50,Food,lunch\n\
                   2026-07-02,income,85000,Salary,\n";
        let rows = parse_rows(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount_minor, 450_50);
        assert_eq!(rows[0].kind, TransactionKind::Expense);
        assert_eq!(rows[0].note.as_deref(), Some("lunch"));
        assert_eq!(rows[1].amount_minor, 85_000_00);
        assert!(rows[1].note.is_none());
    }

    #[test]
    fn a_bad_row_fails_the_whole_parse() {
        let csv = "date,type,amount,category,note\n\
                   2026-07-01,expense,450.50,Food,\n\
                   garbage,expense,1,Food,\n";
        assert!(parse_rows(csv).is_err());
    }
}
