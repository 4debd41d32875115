//! HTTP client for the Fintrack API.
//!
//! Thin typed wrapper over reqwest plus the fetch cache: list and
//! aggregate calls are served from cache per (kind, window) until a
//! mutation of that kind invalidates them. Credentials are checked up
//! front; a client without them refuses to dispatch anything.

use api_types::{
    budget::{BudgetListResponse, BudgetUpsert, BudgetView},
    lending::{LendingBalancesResponse, LendingList, LendingListResponse, LendingNew, LendingUpdate},
    loan::{LoanListResponse, LoanNew, LoanPaymentListResponse, LoanPaymentNew},
    payment::{OrderCreated, OrderNew},
    recurring::{DueSoonRequest, DueSoonResponse, RecurringListResponse, RecurringNew, RecurringUpdate},
    report::ReportRequest,
    settings::{SettingsUpdate, SettingsView},
    stats::{BudgetStatusResponse, StatsRequest, SummaryResponse},
    subscription::SubscriptionView,
    sync::{SyncRequest, SyncResponse},
    transaction::{TransactionCreated, TransactionList, TransactionListResponse, TransactionNew, TransactionUpdate},
};
use chrono::{DateTime, Utc};
use reqwest::{Method, Url};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    cache::{EntityKind, FetchCache},
    error::{AppError, Result},
};

#[derive(Debug)]
pub enum ClientError {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict(String),
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
}

#[derive(Debug, serde::Deserialize)]
struct ErrorResponse {
    error: String,
}

/// A downloaded report document.
#[derive(Debug, Clone)]
pub struct ReportDownload {
    pub filename: String,
    pub content: String,
}

#[derive(Debug)]
pub struct Client {
    base_url: Url,
    username: String,
    password: String,
    http: reqwest::Client,
    cache: FetchCache,
}

type ApiResult<T> = std::result::Result<T, ClientError>;

impl Client {
    /// Builds a client; refuses empty credentials before any dispatch.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::MissingCredentials(
                "username and password are required".to_string(),
            ));
        }
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Invalid(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            username: username.to_string(),
            password: password.to_string(),
            http: reqwest::Client::new(),
            cache: FetchCache::new(),
        })
    }

    async fn request<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<R> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;

        let mut builder = self
            .http
            .request(method, endpoint)
            .basic_auth(&self.username, Some(&self.password));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let res = builder.send().await.map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return res.json::<R>().await.map_err(ClientError::Transport);
        }

        Err(error_for_response(res).await)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<R> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.request::<(), R>(Method::GET, path, None).await
    }

    // ── transactions ────────────────────────────────────────────────────

    pub async fn transactions_list(
        &mut self,
        payload: TransactionList,
    ) -> ApiResult<TransactionListResponse> {
        let window = window_of(payload.from, payload.to);
        let variant = variant_of(&payload);
        if let Some(hit) = self.cache.get(EntityKind::Transactions, window, &variant) {
            tracing::debug!("transactions list served from cache");
            return Ok(hit);
        }

        let response: TransactionListResponse = self.post("transactions/list", &payload).await?;
        self.cache
            .put(EntityKind::Transactions, window, &variant, &response);
        Ok(response)
    }

    pub async fn create_transaction(
        &mut self,
        payload: TransactionNew,
    ) -> ApiResult<TransactionCreated> {
        let created = self.post("transactions", &payload).await?;
        self.cache.invalidate(EntityKind::Transactions);
        self.cache.invalidate_derived();
        Ok(created)
    }

    pub async fn update_transaction(
        &mut self,
        id: Uuid,
        payload: TransactionUpdate,
    ) -> ApiResult<()> {
        let _: serde_json::Value = self
            .request(Method::PATCH, &format!("transactions/{id}"), Some(&payload))
            .await?;
        self.cache.invalidate(EntityKind::Transactions);
        self.cache.invalidate_derived();
        Ok(())
    }

    pub async fn delete_transaction(&mut self, id: Uuid) -> ApiResult<()> {
        self.delete(&format!("transactions/{id}")).await?;
        self.cache.invalidate(EntityKind::Transactions);
        self.cache.invalidate_derived();
        Ok(())
    }

    // ── budgets ─────────────────────────────────────────────────────────

    pub async fn budgets(&mut self) -> ApiResult<BudgetListResponse> {
        if let Some(hit) = self.cache.get(EntityKind::Budgets, None, "") {
            return Ok(hit);
        }
        let response: BudgetListResponse = self.get("budgets").await?;
        self.cache.put(EntityKind::Budgets, None, "", &response);
        Ok(response)
    }

    pub async fn upsert_budget(&mut self, payload: BudgetUpsert) -> ApiResult<BudgetView> {
        let budget = self.post("budgets", &payload).await?;
        self.cache.invalidate(EntityKind::Budgets);
        self.cache.invalidate(EntityKind::BudgetStatus);
        Ok(budget)
    }

    pub async fn delete_budget(&mut self, id: Uuid) -> ApiResult<()> {
        self.delete(&format!("budgets/{id}")).await?;
        self.cache.invalidate(EntityKind::Budgets);
        self.cache.invalidate(EntityKind::BudgetStatus);
        Ok(())
    }

    // ── loans ───────────────────────────────────────────────────────────

    pub async fn loans(&mut self) -> ApiResult<LoanListResponse> {
        if let Some(hit) = self.cache.get(EntityKind::Loans, None, "") {
            return Ok(hit);
        }
        let response: LoanListResponse = self.get("loans").await?;
        self.cache.put(EntityKind::Loans, None, "", &response);
        Ok(response)
    }

    pub async fn create_loan(&mut self, payload: LoanNew) -> ApiResult<serde_json::Value> {
        let loan = self.post("loans", &payload).await?;
        self.cache.invalidate(EntityKind::Loans);
        Ok(loan)
    }

    pub async fn record_loan_payment(
        &mut self,
        loan_id: Uuid,
        payload: LoanPaymentNew,
    ) -> ApiResult<serde_json::Value> {
        let payment = self
            .post(&format!("loans/{loan_id}/payments"), &payload)
            .await?;
        self.cache.invalidate(EntityKind::Loans);
        Ok(payment)
    }

    pub async fn loan_payments(&self, loan_id: Uuid) -> ApiResult<LoanPaymentListResponse> {
        self.get(&format!("loans/{loan_id}/payments")).await
    }

    // ── lending ─────────────────────────────────────────────────────────

    pub async fn lending_list(&mut self, payload: LendingList) -> ApiResult<LendingListResponse> {
        let window = window_of(payload.from, payload.to);
        let variant = variant_of(&payload);
        if let Some(hit) = self.cache.get(EntityKind::Lending, window, &variant) {
            return Ok(hit);
        }
        let response: LendingListResponse = self.post("lending/list", &payload).await?;
        self.cache.put(EntityKind::Lending, window, &variant, &response);
        Ok(response)
    }

    pub async fn create_lending(&mut self, payload: LendingNew) -> ApiResult<serde_json::Value> {
        let entry = self.post("lending", &payload).await?;
        self.cache.invalidate(EntityKind::Lending);
        Ok(entry)
    }

    pub async fn update_lending(
        &mut self,
        id: Uuid,
        payload: LendingUpdate,
    ) -> ApiResult<serde_json::Value> {
        let entry = self
            .request(Method::PATCH, &format!("lending/{id}"), Some(&payload))
            .await?;
        self.cache.invalidate(EntityKind::Lending);
        Ok(entry)
    }

    pub async fn lending_balances(&self) -> ApiResult<LendingBalancesResponse> {
        self.get("lending/balances").await
    }

    // ── recurring ───────────────────────────────────────────────────────

    pub async fn recurring_list(&mut self) -> ApiResult<RecurringListResponse> {
        if let Some(hit) = self.cache.get(EntityKind::Recurring, None, "") {
            return Ok(hit);
        }
        let response: RecurringListResponse = self.get("recurring").await?;
        self.cache.put(EntityKind::Recurring, None, "", &response);
        Ok(response)
    }

    pub async fn create_recurring(&mut self, payload: RecurringNew) -> ApiResult<serde_json::Value> {
        let payment = self.post("recurring", &payload).await?;
        self.cache.invalidate(EntityKind::Recurring);
        Ok(payment)
    }

    pub async fn update_recurring(
        &mut self,
        id: Uuid,
        payload: RecurringUpdate,
    ) -> ApiResult<serde_json::Value> {
        let payment = self
            .request(Method::PATCH, &format!("recurring/{id}"), Some(&payload))
            .await?;
        self.cache.invalidate(EntityKind::Recurring);
        Ok(payment)
    }

    pub async fn recurring_due_soon(&self, payload: DueSoonRequest) -> ApiResult<DueSoonResponse> {
        self.post("recurring/due", &payload).await
    }

    // ── aggregates ──────────────────────────────────────────────────────

    pub async fn summary(&mut self, payload: StatsRequest) -> ApiResult<SummaryResponse> {
        let window = window_of(Some(payload.from), Some(payload.to));
        if let Some(hit) = self.cache.get(EntityKind::Summary, window, "") {
            return Ok(hit);
        }
        let response: SummaryResponse = self.post("stats/summary", &payload).await?;
        self.cache.put(EntityKind::Summary, window, "", &response);
        Ok(response)
    }

    pub async fn budget_statuses(&mut self, payload: StatsRequest) -> ApiResult<BudgetStatusResponse> {
        let window = window_of(Some(payload.from), Some(payload.to));
        if let Some(hit) = self.cache.get(EntityKind::BudgetStatus, window, "") {
            return Ok(hit);
        }
        let response: BudgetStatusResponse = self.post("stats/budgets", &payload).await?;
        self.cache.put(EntityKind::BudgetStatus, window, "", &response);
        Ok(response)
    }

    // ── settings, subscription, payments, sync, report ──────────────────

    pub async fn settings(&self) -> ApiResult<SettingsView> {
        self.get("settings").await
    }

    pub async fn update_settings(&self, payload: SettingsUpdate) -> ApiResult<SettingsView> {
        self.request(Method::PUT, "settings", Some(&payload)).await
    }

    pub async fn subscription(&self) -> ApiResult<SubscriptionView> {
        self.get("subscription").await
    }

    pub async fn start_trial(&self) -> ApiResult<SubscriptionView> {
        self.post("subscription/trial", &serde_json::json!({})).await
    }

    pub async fn payment_order(&self, payload: OrderNew) -> ApiResult<OrderCreated> {
        self.post("payments/order", &payload).await
    }

    /// Runs a sheet sync; a successful import invalidates everything the
    /// imported rows can affect.
    pub async fn sheet_sync(&mut self, payload: SyncRequest) -> ApiResult<SyncResponse> {
        let response: SyncResponse = self.post("sheets/sync", &payload).await?;
        if matches!(response, SyncResponse::Report { .. }) {
            self.cache.invalidate(EntityKind::Transactions);
            self.cache.invalidate_derived();
        }
        Ok(response)
    }

    /// Downloads the monthly report document.
    pub async fn monthly_report(&self, payload: ReportRequest) -> ApiResult<ReportDownload> {
        let endpoint = self
            .base_url
            .join("reports/monthly")
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;

        let res = self
            .http
            .post(endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(&payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !res.status().is_success() {
            return Err(error_for_response(res).await);
        }

        let filename = res
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_filename)
            .unwrap_or_else(|| format!("fintrack-report-{}-{:02}.txt", payload.year, payload.month));
        let content = res.text().await.map_err(ClientError::Transport)?;

        Ok(ReportDownload { filename, content })
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;

        let res = self
            .http
            .delete(endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return Ok(());
        }
        Err(error_for_response(res).await)
    }
}

async fn error_for_response(res: reqwest::Response) -> ClientError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());

    match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    }
}

fn window_of(
    from: Option<chrono::DateTime<chrono::FixedOffset>>,
    to: Option<chrono::DateTime<chrono::FixedOffset>>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    match (from, to) {
        (Some(from), Some(to)) => Some((from.with_timezone(&Utc), to.with_timezone(&Utc))),
        _ => None,
    }
}

/// Serialized payload as a cache discriminator for kind-local filters.
fn variant_of<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_credentials_are_refused_before_dispatch() {
        assert!(matches!(
            Client::new("http://127.0.0.1:3000", "", "secret"),
            Err(AppError::MissingCredentials(_))
        ));
        assert!(matches!(
            Client::new("http://127.0.0.1:3000", "alice", ""),
            Err(AppError::MissingCredentials(_))
        ));
        assert!(Client::new("http://127.0.0.1:3000", "alice", "secret").is_ok());
    }

    #[test]
    fn invalid_base_url_is_refused() {
        assert!(matches!(
            Client::new("not a url", "alice", "secret"),
            Err(AppError::Invalid(_))
        ));
    }

    #[test]
    fn filename_extracts_from_content_disposition() {
        assert_eq!(
            extract_filename("attachment; filename=\"fintrack-report-2026-07.txt\"").as_deref(),
            Some("fintrack-report-2026-07.txt")
        );
        assert!(extract_filename("inline").is_none());
    }
}

fn extract_filename(disposition: &str) -> Option<String> {
    let marker = "filename=\"";
    let start = disposition.find(marker)? + marker.len();
    let rest = &disposition[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}
