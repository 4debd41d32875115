use chrono::{DateTime, TimeZone, Utc};

use crate::{
    EngineError, ResultEngine,
    analytics::{self, BudgetStatus, FinancialSummary, HealthScore},
    report::{self, Report},
};

use super::Engine;

impl Engine {
    /// Aggregates of one window: totals, savings rate, breakdown, trend.
    pub async fn summary(
        &self,
        username: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ResultEngine<FinancialSummary> {
        let currency = self.user_settings(username).await?.currency;
        let transactions = self.transactions_in_window(username, from, to).await?;
        Ok(FinancialSummary::compute(currency, &transactions))
    }

    /// Health score for one window's totals.
    pub async fn health(
        &self,
        username: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ResultEngine<HealthScore> {
        let transactions = self.transactions_in_window(username, from, to).await?;
        let totals = analytics::Totals::from_transactions(&transactions);
        Ok(analytics::score_from_totals(&totals))
    }

    /// Budget utilization of every budgeted category over one window.
    pub async fn budget_statuses(
        &self,
        username: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ResultEngine<Vec<BudgetStatus>> {
        let budgets = self.budgets(username).await?;
        let transactions = self.transactions_in_window(username, from, to).await?;
        Ok(analytics::budget_statuses(&budgets, &transactions))
    }

    /// Renders the downloadable report for one calendar month.
    pub async fn monthly_report(
        &self,
        username: &str,
        year: i32,
        month: u32,
        generated_at: DateTime<Utc>,
    ) -> ResultEngine<Report> {
        let (from, to) = month_window(year, month)?;
        let summary = self.summary(username, from, to).await?;
        let health = analytics::score_from_totals(&summary.totals);
        Ok(report::monthly_report(
            &summary, &health, year, month, generated_at,
        ))
    }
}

/// `[first day of month, first day of next month)` in UTC.
fn month_window(year: i32, month: u32) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || EngineError::InvalidInput(format!("invalid month: {year}-{month:02}"));

    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(invalid)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or_else(invalid)?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_window_spans_the_calendar_month() {
        let (from, to) = month_window(2026, 7).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap());

        let (_, december_end) = month_window(2026, 12).unwrap();
        assert_eq!(
            december_end,
            Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn month_window_rejects_invalid_months() {
        assert!(month_window(2026, 0).is_err());
        assert!(month_window(2026, 13).is_err());
    }
}
