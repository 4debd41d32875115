use chrono::{TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use serde_json::{Value, json};

use engine::Engine;
use migration::MigratorTrait;
use server::ServerConfig;

async fn spawn_server() -> (String, DatabaseConnection) {
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
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine, db.clone(), ServerConfig::default(), listener)
        .unwrap();

    (format!("http://{addr}"), db)
}

fn http() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn requests_without_credentials_are_refused() {
    let (base, _db) = spawn_server().await;

    let res = http().get(format!("{base}/budgets")).send().await.unwrap();
    assert_eq!(res.status(), 401);

    let res = http()
        .get(format!("{base}/budgets"))
        .basic_auth("alice", Some("wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn transaction_create_list_roundtrip() {
    let (base, _db) = spawn_server().await;
    let client = http();

    let created = client
        .post(format!("{base}/transactions"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "kind": "expense",
            "amount_minor": 45000,
            "category": "Food",
            "occurred_at": "2026-07-10T12:00:00+05:30",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);

    let list: Value = client
        .post(format!("{base}/transactions/list"))
        .basic_auth("alice", Some("password"))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let transactions = list["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["amount_minor"], 45000);
    assert_eq!(transactions[0]["currency"], "INR");
}

#[tokio::test]
async fn zero_amount_creates_are_unprocessable() {
    let (base, _db) = spawn_server().await;

    let res = http()
        .post(format!("{base}/transactions"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "kind": "expense",
            "amount_minor": 0,
            "category": "Food",
            "occurred_at": "2026-07-10T12:00:00Z",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 422);
}

#[tokio::test]
async fn summary_reports_totals_and_health() {
    let (base, _db) = spawn_server().await;
    let client = http();

    for (kind, amount, category) in [
        ("income", 100_000_00_i64, "Salary"),
        ("expense", 40_000_00, "Food"),
        ("investment", 10_000_00, "Stocks"),
        ("emi", 5_000_00, "Loans"),
    ] {
        let res = client
            .post(format!("{base}/transactions"))
            .basic_auth("alice", Some("password"))
            .json(&json!({
                "kind": kind,
                "amount_minor": amount,
                "category": category,
                "occurred_at": "2026-07-10T12:00:00Z",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 201);
    }

    let summary: Value = client
        .post(format!("{base}/stats/summary"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "from": "2026-07-01T00:00:00Z",
            "to": "2026-08-01T00:00:00Z",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary["total_income_minor"], 10_000_000);
    assert_eq!(summary["total_expenses_minor"], 4_000_000);
    assert_eq!(summary["net_savings_minor"], 6_000_000);
    assert!((summary["savings_rate"].as_f64().unwrap() - 0.6).abs() < 1e-9);
    assert!(summary["health"]["score"].as_u64().unwrap() <= 100);
    assert_eq!(summary["categories"][0]["category"], "Food");
}

#[tokio::test]
async fn budget_status_uses_strict_thresholds() {
    let (base, _db) = spawn_server().await;
    let client = http();

    let res = client
        .post(format!("{base}/budgets"))
        .basic_auth("alice", Some("password"))
        .json(&json!({"category": "Food", "monthly_limit_minor": 100_000}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let res = client
        .post(format!("{base}/transactions"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "kind": "expense",
            "amount_minor": 95_000,
            "category": "food",
            "occurred_at": "2026-07-10T12:00:00Z",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let statuses: Value = client
        .post(format!("{base}/stats/budgets"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "from": "2026-07-01T00:00:00Z",
            "to": "2026-08-01T00:00:00Z",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let status = &statuses["statuses"][0];
    assert_eq!(status["status"], "exceeded");
    assert!((status["percent_used"].as_f64().unwrap() - 95.0).abs() < 1e-9);
    assert_eq!(status["remaining_minor"], 5_000);
}

#[tokio::test]
async fn report_downloads_with_year_month_filename() {
    let (base, _db) = spawn_server().await;

    let res = http()
        .post(format!("{base}/reports/monthly"))
        .basic_auth("alice", Some("password"))
        .json(&json!({"year": 2026, "month": 7}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let disposition = res
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("fintrack-report-2026-07.txt"));

    let body = res.text().await.unwrap();
    assert!(body.contains("FINTRACK MONTHLY REPORT"));
    assert!(body.contains("Page 1 of"));
}

#[tokio::test]
async fn payment_order_requires_a_configured_gateway() {
    let (base, _db) = spawn_server().await;

    let res = http()
        .post(format!("{base}/payments/order"))
        .basic_auth("alice", Some("password"))
        .json(&json!({"amount_minor": 49900, "currency": "INR"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "payment gateway not configured");
}

#[tokio::test]
async fn sheet_sync_refuses_unlinked_and_malformed_spreadsheets() {
    let (base, _db) = spawn_server().await;
    let client = http();

    let res = client
        .post(format!("{base}/sheets/sync"))
        .basic_auth("alice", Some("password"))
        .json(&json!({"action": "sync"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    // A malformed stored URL is rejected before any fetch.
    let res = client
        .put(format!("{base}/settings"))
        .basic_auth("alice", Some("password"))
        .json(&json!({"spreadsheet_url": "https://example.com/not-a-sheet"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .post(format!("{base}/sheets/sync"))
        .basic_auth("alice", Some("password"))
        .json(&json!({"action": "sync"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unparseable spreadsheet URL");
}

#[tokio::test]
async fn subscription_trial_opens_the_premium_gate() {
    let (base, _db) = spawn_server().await;
    let client = http();

    let res = client
        .get(format!("{base}/subscription"))
        .basic_auth("alice", Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let trial: Value = client
        .post(format!("{base}/subscription/trial"))
        .basic_auth("alice", Some("password"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(trial["status"], "trial");
    assert_eq!(trial["premium"], true);

    let cancelled: Value = client
        .post(format!("{base}/subscription/cancel"))
        .basic_auth("alice", Some("password"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cancelled["premium"], false);
}

#[tokio::test]
async fn users_cannot_see_each_other() {
    let (base, db) = spawn_server().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["bob".into(), "password".into()],
    ))
    .await
    .unwrap();
    let client = http();

    let res = client
        .post(format!("{base}/transactions"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "kind": "expense",
            "amount_minor": 45000,
            "category": "Food",
            "occurred_at": "2026-07-10T12:00:00Z",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let list: Value = client
        .post(format!("{base}/transactions/list"))
        .basic_auth("bob", Some("password"))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn lending_balances_net_per_person() {
    let (base, _db) = spawn_server().await;
    let client = http();

    for (kind, amount) in [("lent", 500_000_i64), ("repaid_by_them", 200_000)] {
        let res = client
            .post(format!("{base}/lending"))
            .basic_auth("alice", Some("password"))
            .json(&json!({
                "kind": kind,
                "person": "Ravi",
                "amount_minor": amount,
                "occurred_at": Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap().to_rfc3339(),
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 201);
    }

    let balances: Value = client
        .get(format!("{base}/lending/balances"))
        .basic_auth("alice", Some("password"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(balances["balances"][0]["person"], "Ravi");
    assert_eq!(balances["balances"][0]["net_minor"], 300_000);
}
