use linkbox::application::{BookmarkServiceImpl, ImportServiceImpl};
use linkbox::domain::bookmark::BookmarkCandidate;
use linkbox::domain::caller::CallerId;
use linkbox::domain::import::ImportPolicy;
use linkbox::domain::repositories::repository::BookmarkRepository;
use linkbox::infrastructure::http::{post_import, CALLER_HEADER};
use linkbox::server::{router_with_body_limit, serve, serve_router, AppState};
use linkbox::util::test_context::TestContext;
use linkbox::util::testing::InMemoryBookmarkRepository;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_server(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { serve(listener, state, std::future::pending()).await });
    format!("http://{}", addr)
}

async fn post_json(base: &str, path: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut request = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(&body);
    if let Some(user) = user {
        request = request.header(CALLER_HEADER, user);
    }
    let response = request.send().await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn list(base: &str) -> Vec<Value> {
    reqwest::get(format!("{}/api/bookmarks", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn given_running_server_when_health_then_ok_with_version() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;

    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn given_valid_batch_when_import_then_success_and_count() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;

    let (status, body) = post_json(
        &base,
        "/api/bookmarks/import",
        Some("7"),
        json!({"bookmarks": [
            {"category": "Work", "title": "My Site", "url": "http://example.com", "username": "alice", "defaultBrowser": "chrome"},
            {"title": "Blog", "url": "http://blog.example.com"}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "count": 2}));
    let stored = list(&base).await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["userId"], 7);
    assert_eq!(stored[0]["defaultBrowser"], "chrome");
    assert_eq!(stored[1]["category"], "Default Category");
    assert_eq!(stored[1]["username"], "");
}

#[tokio::test]
async fn given_non_array_or_missing_bookmarks_when_import_then_invalid_format() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;

    for body in [
        json!({"bookmarks": {"title": "t", "url": "u"}}),
        json!({"bookmarks": "t,u"}),
        json!({"bookmarks": null}),
        json!({}),
        json!([]),
    ] {
        let (status, response) = post_json(&base, "/api/bookmarks/import", Some("1"), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "invalid data format"}));
    }
    assert_eq!(ctx.repository().count().unwrap(), 0);
}

#[tokio::test]
async fn given_malformed_json_when_import_then_invalid_format() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/bookmarks/import", base))
        .header(CALLER_HEADER, "1")
        .header("content-type", "application/json")
        .body("{\"bookmarks\": [")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "invalid data format");
}

#[tokio::test]
async fn given_one_incomplete_record_when_import_then_rejected_without_creates() {
    let ctx = TestContext::with_policy(ImportPolicy::Independent, 4);
    let base = spawn_server(ctx.app_state()).await;

    let (status, body) = post_json(
        &base,
        "/api/bookmarks/import",
        Some("1"),
        json!({"bookmarks": [
            {"title": "fine", "url": "http://fine"},
            {"title": "missing url"}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid bookmark data exists"}));
    assert!(list(&base).await.is_empty());
}

#[tokio::test]
async fn given_missing_or_invalid_caller_when_mutating_then_401() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;
    let batch = json!({"bookmarks": [{"title": "t", "url": "http://u"}]});

    for user in [None, Some("abc"), Some("0")] {
        let (status, body) = post_json(&base, "/api/bookmarks/import", user, batch.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "authentication required");

        let (status, _) = post_json(&base, "/api/bookmarks", user, json!({"title": "t", "url": "http://u"})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    assert_eq!(ctx.repository().count().unwrap(), 0);
}

#[tokio::test]
async fn given_storage_failure_when_import_atomic_then_500_with_message() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;
    let mut conn = ctx.repository().get_connection().unwrap();
    diesel::RunQueryDsl::execute(diesel::sql_query("DROP TABLE bookmarks"), &mut conn).unwrap();
    drop(conn);

    let (status, body) = post_json(
        &base,
        "/api/bookmarks/import",
        Some("1"),
        json!({"bookmarks": [{"title": "t", "url": "http://u"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("no such table"));
}

#[tokio::test]
async fn given_storage_failure_when_import_independent_then_500_and_others_kept() {
    let repository = Arc::new(InMemoryBookmarkRepository::new().failing_on("http://2"));
    let state = AppState {
        bookmark_service: Arc::new(BookmarkServiceImpl::new(repository.clone())),
        import_service: Arc::new(ImportServiceImpl::new(
            repository.clone(),
            ImportPolicy::Independent,
            2,
        )),
    };
    let base = spawn_server(state).await;
    let bookmarks: Vec<Value> = (1..=4)
        .map(|i| json!({"title": format!("t{}", i), "url": format!("http://{}", i)}))
        .collect();

    let (status, body) = post_json(
        &base,
        "/api/bookmarks/import",
        Some("3"),
        json!({ "bookmarks": bookmarks }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("http://2"));
    assert_eq!(repository.count().unwrap(), 3);
    assert_eq!(list(&base).await.len(), 3);
}

#[tokio::test]
async fn given_candidate_when_create_then_201_with_bookmark() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;

    let (status, body) = post_json(
        &base,
        "/api/bookmarks",
        Some("12"),
        json!({"title": "Rust", "url": "https://rust-lang.org", "userId": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userId"], 12);
    assert_eq!(body["category"], "Default Category");
    assert!(body["id"].as_i64().unwrap() > 0);

    let (status, body) = post_json(&base, "/api/bookmarks", Some("12"), json!(["x"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid data format");

    let (status, body) = post_json(&base, "/api/bookmarks", Some("12"), json!({"title": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid bookmark data exists");
}

#[tokio::test]
async fn given_parsed_candidates_when_posted_by_client_then_imported() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;
    let candidates = vec![
        BookmarkCandidate {
            category: Some("Work".to_string()),
            title: Some("Site".to_string()),
            url: Some("http://site".to_string()),
            username: Some(String::new()),
            default_browser: None,
        },
        BookmarkCandidate {
            title: Some("Other".to_string()),
            url: Some("http://other".to_string()),
            ..Default::default()
        },
    ];

    let url = base.clone();
    let summary = tokio::task::spawn_blocking(move || {
        post_import(&url, CallerId::new(8).unwrap(), &candidates)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(summary.count, 2);
    assert_eq!(ctx.repository().get_by_user(8).unwrap().len(), 2);
}

#[tokio::test]
async fn given_rejected_batch_when_posted_by_client_then_error_carries_message() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;
    let candidates = vec![BookmarkCandidate {
        title: Some("no url".to_string()),
        ..Default::default()
    }];

    let err = tokio::task::spawn_blocking(move || {
        post_import(&base, CallerId::new(8).unwrap(), &candidates)
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(err.to_string().contains("invalid bookmark data exists"));
    assert!(err.to_string().contains("400"));
}

async fn get_json(base: &str, path: &str) -> (StatusCode, Value) {
    let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn import_fixture(base: &str) {
    let (status, _) = post_json(
        base,
        "/api/bookmarks/import",
        Some("2"),
        json!({"bookmarks": [
            {"category": "Work", "title": "Tracker", "url": "http://tracker"},
            {"title": "Rust", "url": "https://rust-lang.org", "defaultBrowser": "firefox"},
            {"category": "Work", "title": "Wiki", "url": "http://wiki"}
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn given_stored_bookmarks_when_get_by_id_then_found_or_404() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;
    import_fixture(&base).await;

    let (status, body) = get_json(&base, "/api/bookmarks/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Rust");
    assert_eq!(body["defaultBrowser"], "firefox");
    assert_eq!(body["userId"], 2);

    let (status, body) = get_json(&base, "/api/bookmarks/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Bookmark not found: 99");

    for bad in ["0", "-4", "abc"] {
        let (status, body) = get_json(&base, &format!("/api/bookmarks/{}", bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "id {}", bad);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn given_categories_when_filtering_list_then_only_matching_bookmarks() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;
    import_fixture(&base).await;

    let (status, body) = get_json(&base, "/api/bookmarks?category=Work").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Tracker", "Wiki"]);

    let (_, body) = get_json(&base, "/api/bookmarks?category=Default%20Category").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get_json(&base, "/api/bookmarks?category=Nope").await;
    assert_eq!(body, json!([]));

    let (status, _) = get_json(&base, "/api/bookmarks?category=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(&base, "/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Default Category", "Work"]));
}

#[tokio::test]
async fn given_body_over_import_limit_when_import_then_413() {
    let ctx = TestContext::new();
    let state = ctx.app_state();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = router_with_body_limit(state.clone(), 1024);
    tokio::spawn(async move { serve_router(listener, app, &state, std::future::pending()).await });

    let (status, body) = post_json(
        &base,
        "/api/bookmarks/import",
        Some("1"),
        json!({"bookmarks": [{"title": "x".repeat(2048), "url": "http://big"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({"error": "request body too large"}));
    assert_eq!(ctx.repository().count().unwrap(), 0);
}

#[tokio::test]
async fn given_batch_above_two_megabytes_when_import_then_accepted() {
    let ctx = TestContext::new();
    let base = spawn_server(ctx.app_state()).await;
    let bookmarks: Vec<Value> = (0..600)
        .map(|i| json!({"title": format!("{}{}", i, "t".repeat(4000)), "url": format!("http://{}", i)}))
        .collect();

    let (status, body) = post_json(
        &base,
        "/api/bookmarks/import",
        Some("1"),
        json!({ "bookmarks": bookmarks }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 600);
}
