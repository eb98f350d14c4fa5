mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::json;

use common::ExhaustiveBackend;
use school_placements::config::AppConfig;
use school_placements::server::{json_config, routes, AppState, BackendFactory, API_KEY_HEADER};
use school_placements::SolverBackend;

fn exhaustive_factory(created: Arc<AtomicUsize>) -> BackendFactory {
    Arc::new(move |_name: &str| {
        created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ExhaustiveBackend::new()) as Box<dyn SolverBackend>)
    })
}

fn state(config: AppConfig) -> (web::Data<AppState>, Arc<AtomicUsize>) {
    let created = Arc::new(AtomicUsize::new(0));
    let state = AppState::with_backends(config, exhaustive_factory(created.clone()));
    (web::Data::new(state), created)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .app_data(json_config(1024 * 1024))
                .configure(routes),
        )
        .await
    };
}

fn scenario_a_body() -> serde_json::Value {
    json!({
        "schools": [
            {"id": "metro", "year4_capacity": 2, "year5_capacity": 2, "region": "metro"},
            {"id": "rural", "year4_capacity": 2, "year5_capacity": 2, "region": "rural"}
        ],
        "pathways": [{"id": "arts", "capacity": 3}],
        "students": [
            {"id": "ann", "year4_ranks": [1, 2], "year5_ranks": [1, 2], "pathway_ranks": [1],
             "year4_scale": 1, "year5_scale": 1, "pathway_scale": 1},
            {"id": "ben", "year4_ranks": [1, 2], "year5_ranks": [1, 2], "pathway_ranks": [1],
             "year4_scale": 1, "year5_scale": 1, "pathway_scale": 1},
            {"id": "cat", "year4_ranks": [1, 2], "year5_ranks": [1, 2], "pathway_ranks": [1],
             "year4_scale": 1, "year5_scale": 1, "pathway_scale": 1}
        ]
    })
}

#[actix_web::test]
async fn test_health_endpoint() {
    let (state, _) = state(AppConfig::default());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"OK");
}

#[actix_web::test]
async fn test_docs_endpoint() {
    let (state, _) = state(AppConfig::default());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/docs").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("School Placements API Documentation"));
    assert!(body.contains("<!DOCTYPE html"));
}

#[actix_web::test]
async fn test_root_redirects_to_docs() {
    let (state, _) = state(AppConfig::default());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get("Location").unwrap(), "/docs");
}

#[actix_web::test]
async fn test_nonexistent_endpoint() {
    let (state, _) = state(AppConfig::default());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/nonexistent").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_placements_valid_request() {
    let (state, _) = state(AppConfig::default());
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/placements")
        .set_json(scenario_a_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "optimal");
    assert_eq!(body["objective"].as_f64().unwrap(), 11.0);
    let assignments = body["assignments"].as_array().unwrap();
    assert_eq!(assignments.len(), 3);
    for assignment in assignments {
        assert!(
            assignment["year4_school_id"] == "metro" || assignment["year5_school_id"] == "metro"
        );
        assert_eq!(assignment["pathway_id"], "arts");
    }
}

#[actix_web::test]
async fn test_placements_invalid_json() {
    let (state, _) = state(AppConfig::default());
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/placements")
        .insert_header(("content-type", "application/json"))
        .set_payload("invalid json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_placements_capacity_shortfall_is_bad_request() {
    let (state, created) = state(AppConfig::default());
    let app = app!(state);

    let mut body = scenario_a_body();
    body["pathways"][0]["capacity"] = json!(2);
    let req = test::TestRequest::post().uri("/placements").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("Capacity"));
    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(state.cache.is_empty());
}

#[actix_web::test]
async fn test_placements_without_metro_school_is_unprocessable() {
    let (state, _) = state(AppConfig::default());
    let app = app!(state);

    let mut body = scenario_a_body();
    body["schools"][0]["region"] = json!("rural");
    let req = test::TestRequest::post().uri("/placements").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);
}

#[actix_web::test]
async fn test_placements_scale_out_of_range_is_bad_request() {
    let (state, _) = state(AppConfig::default());
    let app = app!(state);

    let mut body = scenario_a_body();
    body["students"][0]["pathway_scale"] = json!(4);
    let req = test::TestRequest::post().uri("/placements").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_placements_request_scaling_overrides_default() {
    let (state, _) = state(AppConfig::default());
    let app = app!(state);

    let mut body = scenario_a_body();
    body["scaling"] = json!([2.0]);
    let req = test::TestRequest::post().uri("/placements").set_json(body).to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["objective"].as_f64().unwrap(), 22.0);
}

#[actix_web::test]
async fn test_placements_unknown_solver_is_bad_request() {
    let state = web::Data::new(AppState::new(AppConfig::default()));
    let app = app!(state);

    let mut body = scenario_a_body();
    body["solver"] = json!("simulated-annealing");
    let req = test::TestRequest::post().uri("/placements").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_placements_results_are_cached() {
    let (state, created) = state(AppConfig::default());
    let app = app!(state);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/placements")
            .set_json(scenario_a_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }
    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert_eq!(state.cache.len(), 1);
}

#[actix_web::test]
async fn test_placements_requires_api_key_when_configured() {
    let config = AppConfig {
        api_key: Some("secret".to_string()),
        ..AppConfig::default()
    };
    let (state, _) = state(config);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/placements")
        .set_json(scenario_a_body())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/placements")
        .insert_header((API_KEY_HEADER, "wrong"))
        .set_json(scenario_a_body())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/placements")
        .insert_header((API_KEY_HEADER, "secret"))
        .set_json(scenario_a_body())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
}
