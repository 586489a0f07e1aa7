//! Integration tests for `POST /score/{id}` and `POST /score/cron`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::{
    build_test_app, build_test_app_with, expect_json, post, test_config, FakeModel, TEST_API_KEY,
};
use ethix_core::company::Company;
use ethix_db::{CompanyStore, InMemoryCompanyStore};

fn globex() -> Company {
    Company {
        id: "gbx-1".into(),
        name: "Globex".into(),
        ticker: Some("GBX".into()),
        ethics_score: Some(50),
        source_reason: Some("Average disclosure.".into()),
        last_updated: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
    }
}

// ---------------------------------------------------------------------------
// Single company
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scoring_returns_and_persists_updated_company() {
    let store = Arc::new(InMemoryCompanyStore::new());
    let acme = store.insert("Acme Co", Some("ACME")).await;
    let model = Arc::new(FakeModel::replying("Score: 72. Reasonable labor practices."));
    let before = Utc::now();

    let json = expect_json(
        post(
            build_test_app(store.clone(), model),
            &format!("/score/{}", acme.id),
            Some(TEST_API_KEY),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(json["id"], acme.id.as_str());
    assert_eq!(json["ethics_score"], 72);
    assert!(json["source_reason"]
        .as_str()
        .unwrap()
        .contains("Reasonable labor practices"));

    let stored = store.get(&acme.id).await.unwrap();
    assert_eq!(stored.ethics_score, Some(72));
    assert!(stored.last_updated.unwrap() >= before);
}

#[tokio::test]
async fn scoring_unknown_company_is_404_without_model_call() {
    let store = Arc::new(InMemoryCompanyStore::new());
    let model = Arc::new(FakeModel::replying("Score: 72. ok"));

    let json = expect_json(
        post(build_test_app(store, model.clone()), "/score/missing", Some(TEST_API_KEY)).await,
        StatusCode::NOT_FOUND,
    )
    .await;

    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn unparseable_reply_is_502_and_record_unchanged() {
    let store = Arc::new(InMemoryCompanyStore::with_companies(vec![globex()]));
    let model = Arc::new(FakeModel::replying("I cannot rate this company."));

    let json = expect_json(
        post(build_test_app(store.clone(), model), "/score/gbx-1", Some(TEST_API_KEY)).await,
        StatusCode::BAD_GATEWAY,
    )
    .await;

    assert_eq!(json["code"], "SCORE_PARSE_ERROR");
    assert_eq!(store.get("gbx-1").await.unwrap(), globex());
}

#[tokio::test]
async fn model_outage_is_502_and_record_unchanged() {
    let store = Arc::new(InMemoryCompanyStore::with_companies(vec![globex()]));
    let model = Arc::new(FakeModel::unavailable());

    let json = expect_json(
        post(build_test_app(store.clone(), model), "/score/gbx-1", Some(TEST_API_KEY)).await,
        StatusCode::BAD_GATEWAY,
    )
    .await;

    assert_eq!(json["code"], "MODEL_UNAVAILABLE");
    assert_eq!(store.get("gbx-1").await.unwrap(), globex());
}

#[tokio::test]
async fn slow_model_outage_is_502_not_a_request_timeout() {
    let store = Arc::new(InMemoryCompanyStore::with_companies(vec![globex()]));
    let model = Arc::new(FakeModel::unavailable().with_delay(Duration::from_millis(1_500)));
    let mut config = test_config(Some(TEST_API_KEY));
    config.request_timeout_secs = 1;

    let json = expect_json(
        post(
            build_test_app_with(config, store.clone(), model.clone()),
            "/score/gbx-1",
            Some(TEST_API_KEY),
        )
        .await,
        StatusCode::BAD_GATEWAY,
    )
    .await;

    assert_eq!(json["code"], "MODEL_UNAVAILABLE");
    assert_eq!(model.calls(), 1);
    assert_eq!(store.get("gbx-1").await.unwrap(), globex());
}

#[tokio::test]
async fn model_quota_is_502() {
    let store = Arc::new(InMemoryCompanyStore::with_companies(vec![globex()]));
    let model = Arc::new(FakeModel::over_quota());

    let json = expect_json(
        post(build_test_app(store, model), "/score/gbx-1", Some(TEST_API_KEY)).await,
        StatusCode::BAD_GATEWAY,
    )
    .await;

    assert_eq!(json["code"], "MODEL_QUOTA_EXCEEDED");
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cron_reports_successes_and_failures() {
    let store = Arc::new(InMemoryCompanyStore::new());
    for name in ["Acme Co", "Globex", "Initech", "Umbrella"] {
        store.insert(name, None).await;
    }
    let model = Arc::new(FakeModel::from_fn(|prompt| {
        if prompt.user.starts_with("Company name: Initech.") {
            Ok("No idea.".into())
        } else {
            Ok("Score: 80. Strong governance.".into())
        }
    }));

    let json = expect_json(
        post(build_test_app(store.clone(), model), "/score/cron", Some(TEST_API_KEY)).await,
        StatusCode::OK,
    )
    .await;

    let initech = store
        .snapshot()
        .await
        .into_iter()
        .find(|c| c.name == "Initech")
        .unwrap();

    assert_eq!(json["succeeded"], 3);
    assert_eq!(json["failed"], serde_json::json!([initech.id]));
    assert_eq!(initech.ethics_score, None);
    assert!(store
        .snapshot()
        .await
        .iter()
        .filter(|c| c.name != "Initech")
        .all(|c| c.ethics_score == Some(80)));
}

#[tokio::test]
async fn cron_is_not_treated_as_a_company_id() {
    let store = Arc::new(InMemoryCompanyStore::new());
    let model = Arc::new(FakeModel::replying("Score: 80. ok"));

    let json = expect_json(
        post(build_test_app(store, model.clone()), "/score/cron", Some(TEST_API_KEY)).await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(json["succeeded"], 0);
    assert_eq!(json["failed"], serde_json::json!([]));
    assert_eq!(model.calls(), 0);
}
