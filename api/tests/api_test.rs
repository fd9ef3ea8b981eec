//! HTTP-level tests for the admin API and the daily ROI trigger, run against
//! the in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use shared::entity::{deposit_requests, investment_plans, investments, users};
use shared::Config;
use std::sync::Arc;
use tower::ServiceExt;
use yieldboard_api::repositories::{MemoryRepository, Repository};
use yieldboard_api::{router, AppState};

const SECRET: &str = "s3cret";

/// Helper to build the app around a fresh in-memory store
fn test_app() -> (Router, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    let config = Config {
        cron_secret: Some(SECRET.to_string()),
        ..Config::default()
    };
    let shared_repo: Arc<dyn Repository> = repo.clone();
    let state = AppState::with_repository(shared_repo, &config);
    (router(state), repo)
}

fn user(id: &str, wallet: Decimal) -> users::Model {
    users::Model {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        full_name: None,
        status: "active".to_string(),
        admin_note: None,
        wallet_balance: wallet,
        invested_balance: Decimal::ZERO,
        pending_deposits: Decimal::ZERO,
        pending_withdrawals: Decimal::ZERO,
        account_balance: wallet,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

fn position(user_id: &str, amount: Decimal, days_completed: i32, duration: i32) -> investments::Model {
    investments::Model {
        user_id: user_id.to_string(),
        plan_id: Some("gold".to_string()),
        plan_name: Some("Gold".to_string()),
        amount,
        roi_rate: Some(dec!(0.04)),
        days_completed,
        duration_days: Some(duration),
        is_active: true,
        status: "active".to_string(),
        has_active_plan: true,
        wallet_bal: Decimal::ZERO,
        locked_bal: amount,
        total_earned: Decimal::ZERO,
        last_roi_paid_at: None,
        plan_started_at: Some(Utc::now()),
        plan_completed_at: None,
        updated_at: None,
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn run_job(app: &Router) -> (StatusCode, Value) {
    send(app, "GET", &format!("/api/cron/daily-roi?secret={}", SECRET), None).await
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cron_rejects_bad_secret() {
    let (app, repo) = test_app();
    repo.insert_investment(position("u1", dec!(1000), 0, 7)).await;

    let (status, body) = send(&app, "GET", "/api/cron/daily-roi?secret=wrong", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let (status, _) = send(&app, "POST", "/api/cron/daily-roi", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let stored = repo.find_investment("u1").await.unwrap().unwrap();
    assert_eq!(stored.days_completed, 0);
    assert!(repo.job_runs(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cron_accepts_scheduler_header() {
    let (app, repo) = test_app();
    repo.insert_investment(position("u1", dec!(1000), 0, 7)).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/cron/daily-roi")
        .header("x-cron-secret", SECRET)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = repo.find_investment("u1").await.unwrap().unwrap();
    assert_eq!(stored.days_completed, 1);
}

#[tokio::test]
async fn test_cron_without_configured_secret_rejects_everyone() {
    let repo: Arc<dyn Repository> = Arc::new(MemoryRepository::new());
    let app = router(AppState::with_repository(repo, &Config::default()));

    let (status, _) = send(&app, "GET", "/api/cron/daily-roi?secret=", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_final_day_payout_then_release() {
    let (app, repo) = test_app();
    repo.insert_investment(position("u1", dec!(1000), 6, 7)).await;

    let (status, body) = run_job(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Daily ROI processed successfully");
    assert_eq!(body["usersUpdated"], 1);
    assert_eq!(body["updatedUsers"][0]["userId"], "u1");
    assert_eq!(body["updatedUsers"][0]["day"], 7);

    let stored = repo.find_investment("u1").await.unwrap().unwrap();
    assert_eq!(stored.wallet_bal, dec!(40));
    assert_eq!(stored.days_completed, 7);
    assert!(!stored.is_active);
    assert_eq!(stored.status, "completed");

    let logs = repo.roi_logs("u1").await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].amount, dec!(40));
    assert_eq!(logs[0].day_number, 7);
    assert_eq!(logs[0].total_days, 7);

    // Next run releases the principal and closes the plan without paying again.
    let (status, body) = run_job(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usersUpdated"], 0);
    assert_eq!(body["skippedUsers"], json!(["u1"]));

    let stored = repo.find_investment("u1").await.unwrap().unwrap();
    assert_eq!(stored.wallet_bal, dec!(1040));
    assert_eq!(stored.locked_bal, Decimal::ZERO);
    assert!(!stored.has_active_plan);
    assert!(stored.plan_completed_at.is_some());
    assert_eq!(repo.roi_logs("u1").await.unwrap().len(), 1);

    let (_, body) = run_job(&app).await;
    assert_eq!(body["message"], "No active investments found");
}

#[tokio::test]
async fn test_paused_position_is_left_alone() {
    let (app, repo) = test_app();
    let mut paused = position("u1", dec!(500), 2, 7);
    paused.status = "paused".to_string();
    repo.insert_investment(paused.clone()).await;

    let (status, body) = run_job(&app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skippedUsers"], json!(["u1"]));
    assert_eq!(repo.find_investment("u1").await.unwrap().unwrap(), paused);
    assert!(repo.roi_logs("u1").await.unwrap().is_empty());

    let runs = repo.job_runs(10).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].users_updated, Some(0));
    assert_eq!(runs[0].skipped_users, Some(1));
}

#[tokio::test]
async fn test_running_twice_pays_twice() {
    let (app, repo) = test_app();
    repo.insert_investment(position("u1", dec!(1000), 0, 7)).await;

    run_job(&app).await;
    run_job(&app).await;

    let stored = repo.find_investment("u1").await.unwrap().unwrap();
    assert_eq!(stored.days_completed, 2);
    assert_eq!(stored.wallet_bal, dec!(80));
    assert_eq!(stored.total_earned, dec!(80));
    assert_eq!(repo.roi_logs("u1").await.unwrap().len(), 2);

    let (status, runs) = send(&app, "GET", "/api/cron/runs?limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(runs.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_credit_user() {
    let (app, repo) = test_app();
    repo.insert_user(user("u1", dec!(100))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/credit",
        Some(json!({ "userId": "u1", "amount": "50" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User credited successfully");

    let stored = repo.find_user("u1").await.unwrap().unwrap();
    assert_eq!(stored.wallet_balance, dec!(150));
    assert_eq!(stored.account_balance, dec!(150));

    let history = repo.wallet_transactions("u1").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, "Credit");
    assert_eq!(history[0].amount, dec!(50));
}

#[tokio::test]
async fn test_debit_over_balance_is_rejected() {
    let (app, repo) = test_app();
    repo.insert_user(user("u1", dec!(100))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/debit",
        Some(json!({ "userId": "u1", "amount": 200 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient wallet balance");
    let stored = repo.find_user("u1").await.unwrap().unwrap();
    assert_eq!(stored.wallet_balance, dec!(100));
    assert!(repo.wallet_transactions("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_debit_user() {
    let (app, repo) = test_app();
    repo.insert_user(user("u1", dec!(100))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/debit",
        Some(json!({ "userId": "u1", "amount": 30.5 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User debited successfully");
    let stored = repo.find_user("u1").await.unwrap().unwrap();
    assert_eq!(stored.wallet_balance, dec!(69.5));
    assert_eq!(repo.wallet_transactions("u1").await.unwrap()[0].kind, "Debit");
}

#[tokio::test]
async fn test_wallet_request_validation() {
    let (app, _) = test_app();

    for body in [
        json!({ "amount": 10 }),
        json!({ "userId": "u1" }),
        json!({ "userId": "u1", "amount": 0 }),
        json!({ "userId": "u1", "amount": -5 }),
        json!({ "userId": "u1", "amount": "ten" }),
    ] {
        let (status, response) = send(&app, "POST", "/api/users/credit", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Invalid request parameters");
    }
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/users/credit",
        Some(json!({ "userId": "ghost", "amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/users/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_detail_and_admin_actions() {
    let (app, repo) = test_app();
    repo.insert_user(user("u1", dec!(10))).await;
    repo.insert_investment(position("u1", dec!(1000), 3, 7)).await;

    let (status, body) = send(&app, "GET", "/api/users/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "u1");
    assert_eq!(body["investment"]["daysCompleted"], 3);

    let (status, body) = send(&app, "POST", "/api/users/suspend", Some(json!({ "userId": "u1" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "suspended");

    let (status, _) = send(
        &app,
        "POST",
        "/api/users/note",
        Some(json!({ "userId": "u1", "adminNote": "KYC pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stored = repo.find_user("u1").await.unwrap().unwrap();
    assert_eq!(stored.admin_note.as_deref(), Some("KYC pending"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/investments/status",
        Some(json!({ "userId": "u1", "status": "paused" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");

    let (status, _) = send(
        &app,
        "POST",
        "/api/investments/status",
        Some(json!({ "userId": "u1", "status": "bogus" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/investments/restart", Some(json!({ "userId": "u1" }))).await;
    assert_eq!(status, StatusCode::OK);
    let stored = repo.find_investment("u1").await.unwrap().unwrap();
    assert_eq!(stored.days_completed, 0);
    assert_eq!(stored.status, "active");
    assert!(stored.is_active);
}

#[tokio::test]
async fn test_plan_crud() {
    let (app, repo) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/plans",
        Some(json!({ "name": "Silver", "roiRate": "0.03", "durationDays": 14, "minAmount": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Plan added successfully!");
    let plan_id = body["newPlanId"].as_str().unwrap().to_string();

    let stored = repo.find_plan(&plan_id).await.unwrap().unwrap();
    assert_eq!(stored.roi_rate, dec!(0.03));
    assert_eq!(stored.duration_days, 14);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/plans/{}", plan_id),
        Some(json!({ "roiRate": 0.05 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stored = repo.find_plan(&plan_id).await.unwrap().unwrap();
    assert_eq!(stored.roi_rate, dec!(0.05));
    assert_eq!(stored.name, "Silver");

    let (status, _) = send(&app, "POST", "/api/plans", Some(json!({ "roiRate": 0.05 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &format!("/api/plans/{}", plan_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/plans/{}", plan_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "PUT", "/api/plans/missing", Some(json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_template_rate_applies_to_positions_without_snapshot() {
    let (app, repo) = test_app();
    repo.insert_plan(investment_plans::Model {
        id: "gold".to_string(),
        name: "Gold".to_string(),
        roi_rate: dec!(0.02),
        duration_days: 10,
        min_amount: Decimal::ZERO,
        max_amount: None,
        created_at: None,
        updated_at: None,
    })
    .await
    .unwrap();
    let mut legacy = position("u1", dec!(1000), 0, 7);
    legacy.roi_rate = None;
    legacy.duration_days = None;
    repo.insert_investment(legacy).await;

    let (status, body) = run_job(&app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedUsers"][0]["totalDays"], 10);
    let stored = repo.find_investment("u1").await.unwrap().unwrap();
    assert_eq!(stored.wallet_bal, dec!(20));
}

#[tokio::test]
async fn test_deposit_review() {
    let (app, repo) = test_app();
    let mut owner = user("u1", dec!(10));
    owner.pending_deposits = dec!(75);
    owner.recompute_account_balance();
    repo.insert_user(owner).await;
    for (id, amount) in [("d1", dec!(50)), ("d2", dec!(25))] {
        repo.insert_deposit_request(deposit_requests::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            amount,
            method: "USDT".to_string(),
            status: "pending".to_string(),
            created_at: Utc::now(),
            reviewed_at: None,
        })
        .await;
    }

    let (status, body) = send(&app, "GET", "/api/admin/deposit-requests", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, body) = send(&app, "POST", "/api/admin/deposit-requests/d1/approve", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");

    let (status, _) = send(&app, "POST", "/api/admin/deposit-requests/d2/decline", None).await;
    assert_eq!(status, StatusCode::OK);

    let stored = repo.find_user("u1").await.unwrap().unwrap();
    assert_eq!(stored.wallet_balance, dec!(60));
    assert_eq!(stored.pending_deposits, Decimal::ZERO);
    let history = repo.wallet_transactions("u1").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, "Deposit");

    let (status, body) = send(&app, "POST", "/api/admin/deposit-requests/d1/decline", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Deposit request is already approved");

    let (status, _) = send(&app, "POST", "/api/admin/deposit-requests/nope/approve", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn send_raw(app: &Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_credit_beyond_decimal_range_is_rejected() {
    let (app, repo) = test_app();
    repo.insert_user(user("u1", dec!(100))).await;

    for amount in [json!("79228162514264337593543950335"), json!("1000000000000")] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/users/credit",
            Some(json!({ "userId": "u1", "amount": amount })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request parameters");
    }

    // A valid amount that would push the balance past the column range.
    let (status, body) = send(
        &app,
        "POST",
        "/api/users/credit",
        Some(json!({ "userId": "u1", "amount": "999999999999" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let stored = repo.find_user("u1").await.unwrap().unwrap();
    assert_eq!(stored.wallet_balance, dec!(100));
    assert!(repo.wallet_transactions("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_bodies_get_validation_errors() {
    let (app, repo) = test_app();
    repo.insert_user(user("u1", dec!(100))).await;

    let cases = [
        ("/api/users/credit", Some("application/json"), r#"{"userId":5,"amount":50}"#),
        ("/api/users/debit", None, r#"{"userId":"u1","amount":50}"#),
        ("/api/users/credit", Some("application/json"), r#"{"userId":"u1","amo"#),
        ("/api/users/suspend", Some("text/plain"), r#"{"userId":"u1"}"#),
        ("/api/plans", Some("application/json"), r#"{"name":"Gold","durationDays":"seven"}"#),
    ];
    for (uri, content_type, body) in cases {
        let (status, response) = send_raw(&app, uri, content_type, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} accepted {}", uri, body);
        assert!(response["error"].is_string(), "{} returned {}", uri, response);
    }

    let stored = repo.find_user("u1").await.unwrap().unwrap();
    assert_eq!(stored.wallet_balance, dec!(100));
    assert_eq!(stored.status, "active");
}
