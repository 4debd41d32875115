//! Monthly report document.
//!
//! Renders a [`FinancialSummary`] into a paginated plain-text document:
//! header block, summary key-value table, top-categories table, monthly
//! breakdown table and a page-numbered footer. Layout only; every number
//! arrives pre-computed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Currency, Money, analytics::FinancialSummary, analytics::HealthScore};

/// Width of the rendered page in characters.
const PAGE_WIDTH: usize = 72;
/// Content lines per page, footer excluded.
const LINES_PER_PAGE: usize = 44;
/// How many categories the top-categories table shows.
const TOP_CATEGORIES: usize = 10;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub filename: String,
    pub pages: Vec<String>,
}

impl Report {
    /// Joins all pages with a form feed, ready to stream as one file.
    #[must_use]
    pub fn render(&self) -> String {
        self.pages.join("\u{c}\n")
    }
}

/// Builds the report for one calendar month.
///
/// `generated_at` is passed in by the caller so rendering stays pure.
#[must_use]
pub fn monthly_report(
    summary: &FinancialSummary,
    health: &HealthScore,
    year: i32,
    month: u32,
    generated_at: DateTime<Utc>,
) -> Report {
    let mut lines = Vec::new();

    let month_name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown");

    lines.push("=".repeat(PAGE_WIDTH));
    lines.push(center("FINTRACK MONTHLY REPORT"));
    lines.push(center(&format!("{month_name} {year}")));
    lines.push(center(&format!(
        "Generated {}",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    )));
    lines.push("=".repeat(PAGE_WIDTH));
    lines.push(String::new());

    summary_section(&mut lines, summary, health);
    categories_section(&mut lines, summary);
    monthly_section(&mut lines, summary);

    Report {
        filename: format!("fintrack-report-{year}-{month:02}.txt"),
        pages: paginate(lines),
    }
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= PAGE_WIDTH {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((PAGE_WIDTH - len) / 2), text)
}

fn heading(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push("-".repeat(title.chars().count()));
}

fn key_value(lines: &mut Vec<String>, label: &str, value: String) {
    lines.push(format!("  {label:<28}{value:>24}"));
}

fn summary_section(lines: &mut Vec<String>, summary: &FinancialSummary, health: &HealthScore) {
    let currency = summary.currency;
    let fmt = |minor: i64| Money::new(minor).format(currency);

    heading(lines, "Summary");
    key_value(lines, "Total income", fmt(summary.totals.income_minor));
    key_value(lines, "Total expenses", fmt(summary.totals.expenses_minor));
    key_value(lines, "Total investment", fmt(summary.totals.investment_minor));
    key_value(lines, "EMI paid", fmt(summary.totals.emi_minor));
    key_value(lines, "Money lent", fmt(summary.totals.lent_minor));
    key_value(lines, "Money borrowed", fmt(summary.totals.borrowed_minor));
    key_value(lines, "Net savings", fmt(summary.net_savings_minor));
    key_value(
        lines,
        "Savings rate",
        format!("{:.1}%", summary.savings_rate * 100.0),
    );
    key_value(
        lines,
        "Health score",
        format!("{} ({:?})", health.score, health.label),
    );
    lines.push(String::new());
}

fn categories_section(lines: &mut Vec<String>, summary: &FinancialSummary) {
    heading(lines, "Top categories");
    if summary.categories.is_empty() {
        lines.push("  (no expenses in this period)".to_string());
        lines.push(String::new());
        return;
    }

    lines.push(format!("  {:<30}{:>20}{:>10}", "Category", "Amount", "Share"));
    for share in summary.categories.iter().take(TOP_CATEGORIES) {
        lines.push(format!(
            "  {:<30}{:>20}{:>9.1}%",
            truncate(&share.category, 28),
            Money::new(share.amount_minor).format(summary.currency),
            share.share * 100.0,
        ));
    }
    lines.push(String::new());
}

fn monthly_section(lines: &mut Vec<String>, summary: &FinancialSummary) {
    heading(lines, "Monthly breakdown");
    if summary.monthly.is_empty() {
        lines.push("  (no activity in this period)".to_string());
        lines.push(String::new());
        return;
    }

    lines.push(format!(
        "  {:<10}{:>20}{:>20}{:>20}",
        "Month", "Income", "Expenses", "Net"
    ));
    for flow in &summary.monthly {
        let fmt = |minor: i64| Money::new(minor).format(summary.currency);
        lines.push(format!(
            "  {:<10}{:>20}{:>20}{:>20}",
            format!("{}-{:02}", flow.year, flow.month),
            fmt(flow.income_minor),
            fmt(flow.expenses_minor),
            fmt(flow.net_minor()),
        ));
    }
    lines.push(String::new());
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Splits content lines into pages and appends a `Page N of M` footer to
/// each. Every line is emitted exactly once; rows are never split.
fn paginate(lines: Vec<String>) -> Vec<String> {
    let chunks: Vec<&[String]> = lines.chunks(LINES_PER_PAGE).collect();
    let total = chunks.len().max(1);

    if chunks.is_empty() {
        return vec![footer_only(1, 1)];
    }

    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let mut page = chunk.join("\n");
            page.push('\n');
            let pad = LINES_PER_PAGE.saturating_sub(chunk.len());
            page.push_str(&"\n".repeat(pad));
            page.push_str(&footer_only(index + 1, total));
            page
        })
        .collect()
}

fn footer_only(page: usize, total: usize) -> String {
    let text = format!("Page {page} of {total}");
    format!("{}\n{:>width$}\n", "-".repeat(PAGE_WIDTH), text, width = PAGE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{HealthLabel, Totals};
    use chrono::TimeZone;

    fn sample_summary() -> FinancialSummary {
        let totals = Totals {
            income_minor: 100_000_00,
            expenses_minor: 40_000_00,
            investment_minor: 10_000_00,
            emi_minor: 5_000_00,
            lent_minor: 0,
            borrowed_minor: 0,
        };
        FinancialSummary {
            currency: Currency::Inr,
            totals,
            net_savings_minor: totals.net_savings_minor(),
            savings_rate: totals.savings_rate(),
            categories: vec![crate::analytics::CategoryShare {
                category: "Food".to_string(),
                amount_minor: 40_000_00,
                share: 1.0,
            }],
            monthly: vec![crate::analytics::MonthlyFlow {
                year: 2026,
                month: 7,
                income_minor: 100_000_00,
                expenses_minor: 40_000_00,
            }],
        }
    }

    fn sample_health() -> HealthScore {
        HealthScore {
            score: 82,
            label: HealthLabel::Excellent,
        }
    }

    #[test]
    fn filename_carries_year_month_stamp() {
        let report = monthly_report(
            &sample_summary(),
            &sample_health(),
            2026,
            7,
            Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap(),
        );
        assert_eq!(report.filename, "fintrack-report-2026-07.txt");
    }

    #[test]
    fn every_page_has_a_numbered_footer() {
        let report = monthly_report(
            &sample_summary(),
            &sample_health(),
            2026,
            7,
            Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap(),
        );
        let total = report.pages.len();
        for (index, page) in report.pages.iter().enumerate() {
            assert!(page.contains(&format!("Page {} of {total}", index + 1)));
        }
    }

    #[test]
    fn report_contains_summary_and_tables() {
        let report = monthly_report(
            &sample_summary(),
            &sample_health(),
            2026,
            7,
            Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap(),
        );
        let text = report.render();
        assert!(text.contains("FINTRACK MONTHLY REPORT"));
        assert!(text.contains("July 2026"));
        assert!(text.contains("Total income"));
        assert!(text.contains("₹ 1,00,000.00"));
        assert!(text.contains("Food"));
        assert!(text.contains("2026-07"));
    }

    #[test]
    fn long_content_paginates_without_losing_rows() {
        let mut summary = sample_summary();
        summary.monthly = (1..=12)
            .flat_map(|month| {
                (0..6).map(move |i| crate::analytics::MonthlyFlow {
                    year: 2020 + i,
                    month,
                    income_minor: 1_000_00,
                    expenses_minor: 500_00,
                })
            })
            .collect();

        let report = monthly_report(
            &summary,
            &sample_health(),
            2026,
            7,
            Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap(),
        );
        assert!(report.pages.len() > 1);
        let text = report.render();
        let rows = text.matches("1,000.00").count();
        assert_eq!(rows, 72);
    }
}
