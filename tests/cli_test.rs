//! End-to-end runs of the binary against a mocked backend.
//!
//! The binary blocks the calling thread, so these tests use a multi-threaded
//! runtime to keep the mock server responsive.

#[path = "common/mod.rs"]
mod common;

use common::KeepsakeTest;
use common::mock_data::{envelope, kid, milestone, users};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn keepsake_for(server: &MockServer) -> KeepsakeTest {
    KeepsakeTest::new()
        .with_api(&format!("{}/api/v1/", server.uri()))
        .with_token("cli-token")
}

// ============================================================================
// Lists
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_users_ls_requests_one_based_page() {
    let server = MockServer::start().await;
    let all = users(25);
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/users"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "20"))
        .and(header("authorization", "Bearer cli-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&all[20..], 25)))
        .expect(1)
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let json = keepsake.run_json(&["users", "ls", "--page", "2", "--json"]);

    assert_eq!(json["kind"], "users");
    assert_eq!(json["page"], 2);
    assert_eq!(json["page_count"], 2);
    assert_eq!(json["total_count"], 25);
    assert_eq!(json["items"].as_array().unwrap().len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_milestones_ls_renders_table_and_footer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/milestones"))
        .and(query_param("kid_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            milestone(1, 1, "First smile", "2026-02-01"),
            milestone(2, 1, "First steps", "2026-09-12"),
        ])))
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let output = keepsake.run_success(&["milestones", "ls", "--kid", "1"]);

    assert!(output.contains("First smile"));
    assert!(output.contains("2026-09-12"));
    assert!(output.contains("Page 1 of 1 (2 total)"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_narrows_without_extra_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/milestones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            milestone(1, 1, "First smile", "2026-02-01"),
            milestone(2, 1, "First steps", "2026-09-12"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let json = keepsake.run_json(&["milestones", "ls", "--search", "STEPS", "--json"]);

    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "First steps");
    // The total is the collection's, not the number of matches.
    assert_eq!(json["total_count"], 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_expired_session_asks_to_sign_in() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/kids"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})),
        )
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let stderr = keepsake.run_failure(&["kids", "ls"]);
    assert!(stderr.contains("Please sign in again"));
    assert!(stderr.contains("Token expired"));
}

#[test]
fn test_videos_need_a_kid_or_album() {
    let keepsake = KeepsakeTest::new();
    let stderr = keepsake.run_failure(&["videos", "ls"]);
    assert!(stderr.contains("--kid"));
}

#[test]
fn test_page_size_is_checked_per_resource() {
    let keepsake = KeepsakeTest::new().with_api("http://127.0.0.1:9/api/v1/");
    let stderr = keepsake.run_failure(&["photos", "ls", "--page-size", "20"]);
    assert!(stderr.contains("page size 20 is not allowed for photos"));
}

// ============================================================================
// Forms
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_kids_add_posts_form_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/kids"))
        .and(body_partial_json(json!({"name": "Mina", "birth_date": "2022-04-01"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(kid(5, "Mina", "2022-04-01")))
        .expect(1)
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let output = keepsake.run_success(&["kids", "add", "Mina", "--born", "2022-04-01"]);
    assert_eq!(output.trim(), "Created kid 5");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_form_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/kids"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let stderr = keepsake.run_failure(&["kids", "add", "Mina"]);
    assert!(stderr.contains("birth_date"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_kids_edit_sends_only_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/kids/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kid(5, "Mina", "2022-04-01")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/kids/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kid(5, "Mina Park", "2022-04-01")))
        .expect(1)
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let json = keepsake.run_json(&["kids", "edit", "5", "--name", "Mina Park", "--json"]);
    assert_eq!(json["action"], "updated");
    assert_eq!(json["record"]["name"], "Mina Park");

    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&put.body).unwrap();
    assert_eq!(body, json!({"name": "Mina Park"}));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unchanged_edit_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/kids/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kid(5, "Mina", "2022-04-01")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/kids/5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let output = keepsake.run_success(&["kids", "edit", "5", "--name", "Mina"]);
    assert_eq!(output.trim(), "No changes to save");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_backend_field_errors_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/milestones"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "title"], "msg": "already recorded"}]
        })))
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let stderr = keepsake.run_failure(&[
        "milestones",
        "add",
        "1",
        "First steps",
        "--on",
        "2026-09-12",
    ]);
    assert!(stderr.contains("title: already recorded"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_users_rm_deletes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/admin/users/8"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let output = keepsake.run_success(&["users", "rm", "8"]);
    assert_eq!(output.trim(), "Deleted user 8");
}

// ============================================================================
// Uploads and dashboard
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_photo_upload_reports_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/photos/upload"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 31,
            "album_id": 7,
            "url": "/uploads/photos/31.jpg",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    keepsake.write_file("beach.jpg", &[1u8; 2048]);
    let json = keepsake.run_json(&["photos", "upload", "beach.jpg", "--album", "7", "--json"]);

    assert_eq!(json["uploaded"], 1);
    assert_eq!(json["failed"], 0);
    assert_eq!(json["files"][0]["file"], "beach.jpg");
    assert_eq!(json["files"][0]["id"], "31");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_upload_exits_with_error() {
    let server = MockServer::start().await;
    let keepsake = keepsake_for(&server);

    let output = keepsake.run(&["photos", "upload", "missing.jpg"]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 uploaded, 1 failed"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stats_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_users": 12,
            "total_families": 4,
            "total_kids": 7,
            "total_albums": 9,
            "total_photos": 340,
            "total_videos": 21,
        })))
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let output = keepsake.run_success(&["stats"]);
    assert!(output.contains("photos"));
    assert!(output.contains("340"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_calendar_marks_days_with_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": 1, "url": "/p/1.jpg", "taken_at": "2026-10-03T09:00:00Z"},
                {"id": 2, "url": "/p/2.jpg", "taken_at": "2026-10-03T11:00:00Z"},
                {"id": 3, "url": "/p/3.jpg", "taken_at": "2026-11-01T11:00:00Z"},
            ],
            "total": 3,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/milestones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            milestone(1, 1, "First steps", "2026-10-15"),
        ])))
        .mount(&server)
        .await;

    let keepsake = keepsake_for(&server);
    let json = keepsake.run_json(&["calendar", "--month", "2026-10", "--json"]);

    assert_eq!(json["year"], 2026);
    assert_eq!(json["month"], 10);
    assert_eq!(
        json["days"],
        json!([
            {"date": "2026-10-03", "photos": 2, "videos": 0, "milestones": 0},
            {"date": "2026-10-15", "photos": 0, "videos": 0, "milestones": 1},
        ])
    );
}
