use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Currency, Engine, EngineError, ImportRow, NewLending, NewLoan, NewRecurring, NewTransaction,
    SettingsPatch, TransactionKind, TransactionListFilter, TransactionPatch, TransactionStatus,
    analytics::BudgetHealth, LendingKind, LendingListFilter, LendingStatus,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

fn expense(amount_minor: i64, category: &str, day: u32) -> NewTransaction {
    NewTransaction {
        kind: TransactionKind::Expense,
        amount_minor,
        category: category.to_string(),
        occurred_at: Utc.with_ymd_and_hms(2026, 7, day, 12, 0, 0).unwrap(),
        note: None,
        status: TransactionStatus::Completed,
    }
}

fn income(amount_minor: i64, day: u32) -> NewTransaction {
    NewTransaction {
        kind: TransactionKind::Income,
        amount_minor,
        category: "Salary".to_string(),
        occurred_at: Utc.with_ymd_and_hms(2026, 7, day, 9, 0, 0).unwrap(),
        note: None,
        status: TransactionStatus::Completed,
    }
}

fn july() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
    )
}

#[tokio::test]
async fn create_rejects_non_positive_amounts() {
    let (engine, _db) = engine_with_db().await;
    let result = engine.create_transaction("alice", expense(0, "Food", 1)).await;
    assert!(matches!(result, Err(EngineError::InvalidAmount(_))));
}

#[tokio::test]
async fn created_transactions_carry_the_user_currency() {
    let (engine, _db) = engine_with_db().await;
    engine
        .update_settings(
            "alice",
            SettingsPatch {
                currency: Some(Currency::Usd),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let tx = engine
        .create_transaction("alice", expense(500_00, "Food", 1))
        .await
        .unwrap();
    assert_eq!(tx.currency, Currency::Usd);
}

#[tokio::test]
async fn list_paginates_newest_to_older() {
    let (engine, _db) = engine_with_db().await;
    for day in 1..=5 {
        engine
            .create_transaction("alice", expense(day as i64 * 100, "Food", day))
            .await
            .unwrap();
    }

    let filter = TransactionListFilter::default();
    let (first_page, cursor) = engine
        .list_transactions_page("alice", 2, None, &filter)
        .await
        .unwrap();
    assert_eq!(first_page.len(), 2);
    assert!(first_page[0].occurred_at > first_page[1].occurred_at);
    let cursor = cursor.expect("older items remain");

    let (second_page, _) = engine
        .list_transactions_page("alice", 2, Some(&cursor), &filter)
        .await
        .unwrap();
    assert_eq!(second_page.len(), 2);
    assert!(second_page[0].occurred_at < first_page[1].occurred_at);
}

#[tokio::test]
async fn list_rejects_garbage_cursors() {
    let (engine, _db) = engine_with_db().await;
    let result = engine
        .list_transactions_page("alice", 10, Some("not-a-cursor"), &TransactionListFilter::default())
        .await;
    assert!(matches!(result, Err(EngineError::InvalidCursor(_))));
}

#[tokio::test]
async fn update_replaces_fields_and_delete_removes() {
    let (engine, _db) = engine_with_db().await;
    let tx = engine
        .create_transaction("alice", expense(500_00, "Food", 1))
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            "alice",
            tx.id,
            TransactionPatch {
                amount_minor: Some(750_00),
                category: Some("Groceries".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 750_00);
    assert_eq!(updated.category, "Groceries");

    engine.delete_transaction("alice", tx.id).await.unwrap();
    let missing = engine.delete_transaction("alice", tx.id).await;
    assert!(matches!(missing, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn transactions_are_scoped_per_user() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["bob".into(), "password".into()],
    ))
    .await
    .unwrap();

    let tx = engine
        .create_transaction("alice", expense(500_00, "Food", 1))
        .await
        .unwrap();

    let (bobs, _) = engine
        .list_transactions_page("bob", 10, None, &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(bobs.is_empty());

    let stolen = engine.delete_transaction("bob", tx.id).await;
    assert!(matches!(stolen, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn summary_aggregates_the_window() {
    let (engine, _db) = engine_with_db().await;
    engine.create_transaction("alice", income(100_000_00, 1)).await.unwrap();
    engine
        .create_transaction("alice", expense(30_000_00, "Food", 5))
        .await
        .unwrap();
    engine
        .create_transaction("alice", expense(10_000_00, "food", 6))
        .await
        .unwrap();
    // Outside the window: must not count.
    engine
        .create_transaction(
            "alice",
            NewTransaction {
                occurred_at: Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 0).unwrap(),
                ..expense(99_000_00, "Food", 1)
            },
        )
        .await
        .unwrap();

    let (from, to) = july();
    let summary = engine.summary("alice", from, to).await.unwrap();
    assert_eq!(summary.totals.income_minor, 100_000_00);
    assert_eq!(summary.totals.expenses_minor, 40_000_00);
    assert_eq!(summary.net_savings_minor, 60_000_00);
    assert!((summary.savings_rate - 0.6).abs() < 1e-9);
    // "Food" and "food" fold into one category line.
    assert_eq!(summary.categories.len(), 1);
    assert_eq!(summary.categories[0].amount_minor, 40_000_00);

    let health = engine.health("alice", from, to).await.unwrap();
    assert!(health.score > 0);
}

#[tokio::test]
async fn budget_statuses_match_spent_amounts() {
    let (engine, _db) = engine_with_db().await;
    engine.upsert_budget("alice", "Food", 1_000_00).await.unwrap();
    engine
        .create_transaction("alice", expense(950_00, "food", 10))
        .await
        .unwrap();

    let (from, to) = july();
    let statuses = engine.budget_statuses("alice", from, to).await.unwrap();
    assert_eq!(statuses.len(), 1);
    assert!((statuses[0].percent_used - 95.0).abs() < 1e-9);
    assert_eq!(statuses[0].status, BudgetHealth::Exceeded);
}

#[tokio::test]
async fn budget_upsert_replaces_by_canonical_category() {
    let (engine, _db) = engine_with_db().await;
    engine.upsert_budget("alice", "Food", 1_000_00).await.unwrap();
    engine.upsert_budget("alice", "food", 2_000_00).await.unwrap();

    let budgets = engine.budgets("alice").await.unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].monthly_limit_minor, 2_000_00);
}

#[tokio::test]
async fn loan_lifecycle_tracks_progress() {
    let (engine, _db) = engine_with_db().await;
    let loan = engine
        .create_loan(
            "alice",
            NewLoan {
                name: "Car loan".to_string(),
                principal_minor: 100_000_00,
                interest_rate_pct: 12.0,
                tenure_months: 12,
                start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                monthly_emi_minor: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(loan.monthly_emi_minor, 8_884_88);

    engine
        .record_loan_payment(
            "alice",
            loan.id,
            loan.monthly_emi_minor,
            Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
            None,
        )
        .await
        .unwrap();

    let loans = engine.loans("alice").await.unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].paid_minor, loan.monthly_emi_minor);
    assert!(loans[0].outstanding_minor < 100_000_00);

    let payments = engine.loan_payments("alice", loan.id).await.unwrap();
    assert_eq!(payments.len(), 1);
}

#[tokio::test]
async fn lending_balances_net_out_per_person() {
    let (engine, _db) = engine_with_db().await;
    let lend = |kind, amount, day| NewLending {
        kind,
        person: "Ravi".to_string(),
        amount_minor: amount,
        occurred_at: Utc.with_ymd_and_hms(2026, 7, day, 0, 0, 0).unwrap(),
        status: LendingStatus::Pending,
    };

    engine.create_lending("alice", lend(LendingKind::Lent, 5_000_00, 1)).await.unwrap();
    engine
        .create_lending("alice", lend(LendingKind::RepaidByThem, 2_000_00, 10))
        .await
        .unwrap();

    let balances = engine.lending_balances("alice").await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].person, "Ravi");
    assert_eq!(balances[0].net_minor, 3_000_00);

    let entries = engine
        .lending_entries("alice", &LendingListFilter::default())
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn recurring_due_within_walks_occurrences() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_recurring(
            "alice",
            NewRecurring {
                title: "Rent".to_string(),
                amount_minor: 15_000_00,
                category: "Housing".to_string(),
                frequency: engine::Frequency::Monthly,
                next_due_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                is_active: true,
            },
        )
        .await
        .unwrap();

    let due = engine
        .recurring_due_within("alice", NaiveDate::from_ymd_opt(2026, 7, 25).unwrap(), 40)
        .await
        .unwrap();
    assert_eq!(due.len(), 2);
    assert_eq!(due[0].due_on, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
    assert_eq!(due[1].due_on, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
}

#[tokio::test]
async fn import_skips_duplicates_and_reports_counts() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_transaction("alice", expense(500_00, "Food", 1))
        .await
        .unwrap();

    let row = |amount, category: &str, day| ImportRow {
        kind: TransactionKind::Expense,
        amount_minor: amount,
        category: category.to_string(),
        occurred_at: Utc.with_ymd_and_hms(2026, 7, day, 12, 0, 0).unwrap(),
        note: None,
    };

    let outcome = engine
        .import_transactions(
            "alice",
            vec![
                // Same timestamp/kind/amount/category as the stored one.
                row(500_00, "food", 1),
                row(700_00, "Travel", 2),
                row(700_00, "Travel", 2),
            ],
        )
        .await
        .unwrap();

    assert_eq!(outcome.total, 3);
    assert_eq!(outcome.imported, 1);
    assert_eq!(outcome.duplicates, 2);
}

#[tokio::test]
async fn premium_gate_follows_subscription_state() {
    let (engine, _db) = engine_with_db().await;
    let now = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();

    assert!(!engine.is_premium("alice", now).await.unwrap());

    engine.start_trial("alice", now).await.unwrap();
    assert!(engine.is_premium("alice", now).await.unwrap());
    // Trials are 14 days; a month later the gate is closed again.
    let later = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
    assert!(!engine.is_premium("alice", later).await.unwrap());

    let second_trial = engine.start_trial("alice", later).await;
    assert!(matches!(second_trial, Err(EngineError::ExistingKey(_))));

    engine
        .activate_subscription(
            "alice",
            later,
            Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();
    assert!(engine.is_premium("alice", later).await.unwrap());

    engine.cancel_subscription("alice").await.unwrap();
    assert!(!engine.is_premium("alice", later).await.unwrap());
}

#[tokio::test]
async fn settings_round_trip_with_defaults() {
    let (engine, _db) = engine_with_db().await;

    let defaults = engine.user_settings("alice").await.unwrap();
    assert_eq!(defaults.currency, Currency::Inr);

    engine
        .update_settings(
            "alice",
            SettingsPatch {
                currency: Some(Currency::Eur),
                timezone: Some("Europe/Rome".to_string()),
                spreadsheet_url: Some(Some(
                    "https://docs.google.com/spreadsheets/d/abc123/edit".to_string(),
                )),
            },
        )
        .await
        .unwrap();

    let stored = engine.user_settings("alice").await.unwrap();
    assert_eq!(stored.currency, Currency::Eur);
    assert_eq!(stored.timezone, "Europe/Rome");
    assert!(stored.spreadsheet_url.is_some());
}
