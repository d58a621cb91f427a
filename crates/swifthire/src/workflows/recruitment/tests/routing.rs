use super::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::workflows::recruitment::domain::{Caller, Role};
use crate::workflows::recruitment::tier::PremiumTier;
use crate::workflows::recruitment::CALLER_HEADER;

fn json_request(method: &str, uri: &str, caller: Option<&Caller>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(caller) = caller {
        builder = builder.header(CALLER_HEADER, caller.id.to_string());
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request")
}

fn get_request(uri: &str, caller: Option<&Caller>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(caller) = caller {
        builder = builder.header(CALLER_HEADER, caller.id.to_string());
    }
    builder.body(Body::empty()).expect("request")
}

#[tokio::test]
async fn register_route_creates_account() {
    let fixture = build_fixture();
    let mut form = json!({
        "username": "ana",
        "email": "ana@example.com",
        "first_name": "Ana",
        "last_name": "Souza",
        "role": "JOB_SEEKER",
        "security_question": "pet",
        "security_answer": "Biscuit",
    });

    let response = router(&fixture)
        .oneshot(json_request(
            "POST",
            "/api/v1/accounts/register",
            None,
            form.clone(),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("role"), Some(&json!("JOB_SEEKER")));
    assert!(payload.get("security").is_none());

    form["email"] = json!("other@example.com");
    let response = router(&fixture)
        .oneshot(json_request("POST", "/api/v1/accounts/register", None, form))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("error"),
        Some(&json!("Username or Email already in use."))
    );
}

#[tokio::test]
async fn caller_header_is_required() {
    let fixture = build_fixture();

    let response = router(&fixture)
        .oneshot(json_request(
            "POST",
            "/api/v1/jobs",
            None,
            serde_json::to_value(draft("Rust Engineer")).expect("draft json"),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("error"), Some(&json!("Authentication required.")));
}

#[tokio::test]
async fn employer_posts_and_search_lists_after_approval() {
    let fixture = build_fixture();
    let admin = admin(&fixture);
    let employer = employer(&fixture, "acme", "Acme", PremiumTier::Basic);

    let response = router(&fixture)
        .oneshot(json_request(
            "POST",
            "/api/v1/jobs",
            Some(&employer),
            serde_json::to_value(draft("Rust Engineer")).expect("draft json"),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("held"), Some(&json!(false)));
    let job_id = payload["job"]["id"].as_str().expect("job id").to_string();

    let response = router(&fixture)
        .oneshot(get_request("/api/v1/jobs?q=rust", None))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!([]));

    let response = router(&fixture)
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/admin/jobs/{job_id}/approve"),
            Some(&admin),
            json!({}),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router(&fixture)
        .oneshot(get_request(
            "/api/v1/jobs?q=rust&job_types=Part-time,%20Full-time",
            None,
        ))
        .await
        .expect("router dispatch");
    let listings = read_json_body(response).await;
    let listings = listings.as_array().expect("listing array");
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].get("company_name"), Some(&json!("Acme")));
    assert_eq!(listings[0].get("status"), Some(&json!("ACTIVE")));
}

#[tokio::test]
async fn seeker_applies_over_http() {
    let fixture = build_fixture();
    let admin = admin(&fixture);
    let employer = employer(&fixture, "acme", "Acme", PremiumTier::Basic);
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);
    complete_profile(&fixture, &seeker);
    let job = active_job(&fixture, &employer, &admin, "Rust Engineer");
    let uri = format!("/api/v1/jobs/{}/applications", job.id);

    let response = router(&fixture)
        .oneshot(json_request("POST", &uri, Some(&seeker), json!({})))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("status"), Some(&json!("APPLIED")));
    assert_eq!(
        payload["messages"].as_array().map(Vec::len),
        Some(1),
        "receipt message is logged"
    );

    let response = router(&fixture)
        .oneshot(json_request("POST", &uri, Some(&seeker), json!({})))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router(&fixture)
        .oneshot(get_request(&uri, Some(&employer)))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);
    let applicants = read_json_body(response).await;
    assert_eq!(applicants.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn error_kinds_map_to_status_codes() {
    let fixture = build_fixture();
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);

    let response = router(&fixture)
        .oneshot(get_request(
            "/api/v1/jobs/6f1c1d9e-8a61-4c4f-9d53-0f3f1b2a7c11",
            None,
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router(&fixture)
        .oneshot(get_request("/api/v1/admin/overview", Some(&seeker)))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router(&fixture)
        .oneshot(json_request(
            "POST",
            "/api/v1/support",
            Some(&seeker),
            json!({ "message": "  " }),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn admin_lists_users_by_role() {
    let fixture = build_fixture();
    let admin = admin(&fixture);
    employer(&fixture, "acme", "Acme", PremiumTier::Basic);
    seeker(&fixture, "ana", PremiumTier::Basic);

    let response = router(&fixture)
        .oneshot(get_request(
            &format!("/api/v1/admin/users?role={}", Role::Employer.label()),
            Some(&admin),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);
    let users = read_json_body(response).await;
    let users = users.as_array().expect("user array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].get("username"), Some(&json!("acme")));
}
