// HTTP API tests for Ongi Match

use actix_web::{http::StatusCode, test, web, App};
use ongi_match::models::{AnsweredOption, ErrorResponse, ProfileVector, SimilarUsersResponse};
use ongi_match::routes::{self, AppState};
use ongi_match::{InMemoryStore, MatchStore, Matcher};
use serde_json::{json, Value};
use std::sync::Arc;

fn create_state(store: InMemoryStore) -> AppState {
    let store: Arc<dyn MatchStore> = Arc::new(store);
    let matcher = Matcher::with_default_policy(store.clone());
    AppState::new(store, matcher, 10, 100)
}

fn create_store() -> InMemoryStore {
    InMemoryStore::new()
        .with_profile(1, ProfileVector::uniform(50.0))
        .with_profile(2, ProfileVector::uniform(55.0))
        .with_profile(3, ProfileVector::uniform(100.0))
        .with_answers(7, vec![AnsweredOption::new("sociality", 5)])
}

#[actix_web::test]
async fn test_health() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_state(create_store())))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_similar_users() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_state(create_store())))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/1/similar?limit=5")
        .to_request();
    let body: SimilarUsersResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.user_id, 1);
    assert_eq!(body.count, 1);
    assert_eq!(body.similar_users[0].user_id, 2);
}

#[actix_web::test]
async fn test_error_mapping() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_state(create_store())))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/users/abc/similar").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/v1/users/99/profile").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "profile_not_found");
    assert_eq!(body.status_code, 404);

    let req = test::TestRequest::post().uri("/api/v1/users/8/scores").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // user 3 has nobody similar
    let req = test::TestRequest::post()
        .uri("/api/v1/users/3/auto-match-group")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_compute_scores() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_state(create_store())))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/v1/users/7/scores").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["user_id"], 7);
    assert_eq!(body["sociality_score"], 100.0);
    assert_eq!(body["activity_score"], 0.0);
}

#[actix_web::test]
async fn test_create_club_and_auto_match() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_state(create_store())))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/clubs")
        .set_json(json!({ "name": "", "maxMembers": 10 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/clubs")
        .set_json(json!({ "name": "Board Games", "vibe": "cozy", "maxMembers": 10 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let club: Value = test::read_body_json(resp).await;
    assert_eq!(club["vibe"], "cozy");
    assert_eq!(club["member_count"], 0);

    let req = test::TestRequest::post()
        .uri("/api/v1/users/1/auto-match")
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(report["outcome"], "matched");
    assert_eq!(report["joined_clubs"][0]["name"], "Board Games");

    // second attempt finds the user already in the only club
    let req = test::TestRequest::post()
        .uri("/api/v1/users/1/auto-match")
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(report["outcome"], "already_member");

    let req = test::TestRequest::post().uri("/api/v1/match-all").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
