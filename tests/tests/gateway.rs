//! End-to-end behaviour of the gateway router over the in-memory upstream.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use newsgate_gateway::server::router;
use newsgate_gateway::sink::{ErrorSink, ErrorSinkConfig, ErrorSinkWorker};
use newsgate_gateway::state::AppState;
use newsgate_kernel::{Comment, NewsItem, StatusClass, UpstreamOutcome};
use newsgate_testing::{InMemoryUpstream, assert_upstream_called};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const TIMEOUT: Duration = Duration::from_millis(500);

fn news(id: i64) -> NewsItem {
    NewsItem {
        id,
        title: format!("news {id}"),
        content: "content".into(),
        pub_time: 1_700_000_000 + id,
        link: format!("https://example.org/{id}"),
    }
}

fn comment(id: i64, news_id: i64, text: &str) -> Comment {
    Comment {
        id,
        news_id,
        text: text.into(),
        parent_comment_id: 0,
        pub_time: 1_700_000_100 + id,
    }
}

fn gateway(upstream: &InMemoryUpstream) -> (Router, ErrorSinkWorker) {
    let (sink, worker) = ErrorSink::spawn(ErrorSinkConfig::default());
    let state = AppState::new(Arc::new(upstream.clone()), sink, TIMEOUT);
    (router(state), worker)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_comment(body: Value) -> Request<Body> {
    Request::post("/add-comment")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn draft(news_id: i64, parent: i64, text: &str) -> Value {
    json!({
        "NewsID": news_id,
        "Comment": text,
        "ParentCommentID": parent,
        "PubTime": 1_700_000_500
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Comment submission
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn valid_comment_is_written_once() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, post_comment(draft(1, 0, "nice article"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Error": 0 }));
    assert_upstream_called!(upstream, "store_comment", 1);
    assert_eq!(upstream.stored_comments()[0].text, "nice article");
}

#[tokio::test]
async fn top_level_comment_skips_parent_check() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    let (app, _worker) = gateway(&upstream);

    send(&app, post_comment(draft(1, 0, "hello"))).await;

    assert_upstream_called!(upstream, "parent_comment_exists", 0);
    assert_upstream_called!(upstream, "news_exists", 1);
    assert_upstream_called!(upstream, "validate_comment", 1);
}

#[tokio::test]
async fn reply_checks_parent_in_same_news() {
    let upstream = InMemoryUpstream::new()
        .with_news(news(1))
        .with_news(news(2))
        .with_comment(comment(5, 2, "on another item"));
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, post_comment(draft(1, 5, "reply"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Error"], 404);
    assert_upstream_called!(upstream, "parent_comment_exists", 1);
    assert_upstream_called!(upstream, "store_comment", 0);

    let (status, _) = send(&app, post_comment(draft(2, 5, "reply"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(upstream.stored_comments()[0].parent_comment_id, 5);
}

#[tokio::test]
async fn rejected_validation_prevents_write() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, post_comment(draft(1, 0, "QWERTY spam"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "Error": 400 }));

    // Missing news outranks the validation failure, still no write.
    let (status, _) = send(&app, post_comment(draft(9, 0, "zxvbnm"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_upstream_called!(upstream, "store_comment", 0);
}

#[tokio::test]
async fn identical_resubmission_writes_twice() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    let (app, _worker) = gateway(&upstream);

    for _ in 0..2 {
        let (status, _) = send(&app, post_comment(draft(1, 0, "same text"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let stored = upstream.stored_comments();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].id, stored[1].id);
}

#[tokio::test]
async fn failed_write_is_internal_error() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    upstream.script(
        "store_comment",
        UpstreamOutcome::Rejected(StatusClass::BadRequest, "constraint".into()),
    );
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, post_comment(draft(1, 0, "fine"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["Error"], 500);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_keep_their_own_outcome() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    let (app, _worker) = gateway(&upstream);

    let mut handles = Vec::new();
    for i in 0..16 {
        let app = app.clone();
        let text = if i % 2 == 0 {
            format!("comment {i}")
        } else {
            format!("qwerty {i}")
        };
        handles.push(tokio::spawn(async move {
            let (status, _) = send(&app, post_comment(draft(1, 0, &text))).await;
            (i, status)
        }));
    }

    for handle in handles {
        let (i, status) = handle.await.unwrap();
        let expected = if i % 2 == 0 {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        assert_eq!(status, expected, "submission {i}");
    }

    let stored = upstream.stored_comments();
    assert_eq!(stored.len(), 8);
    assert!(stored.iter().all(|c| c.text.starts_with("comment")));
}

#[tokio::test(start_paused = true)]
async fn failure_precedence_ignores_completion_order() {
    for (slow, fast) in [("news_exists", "validate_comment"), ("validate_comment", "news_exists")] {
        let upstream = InMemoryUpstream::new().with_news(news(1));
        upstream.script(
            "news_exists",
            UpstreamOutcome::Rejected(StatusClass::NotFound, "gone".into()),
        );
        upstream.script(
            "validate_comment",
            UpstreamOutcome::Rejected(StatusClass::BadRequest, "banned".into()),
        );
        upstream.delay(slow, Duration::from_millis(200));
        upstream.delay(fast, Duration::from_millis(1));
        let (app, _worker) = gateway(&upstream);

        let (status, body) = send(&app, post_comment(draft(1, 0, "text"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{slow} finishing last");
        assert_eq!(body["Error"], 404);
    }
}

#[tokio::test(start_paused = true)]
async fn bad_request_outranks_unreachable_dependency() {
    let upstream = InMemoryUpstream::new()
        .with_news(news(1))
        .with_comment(comment(3, 1, "parent"));
    upstream.script("parent_comment_exists", UpstreamOutcome::Unavailable("down".into()));
    let (app, _worker) = gateway(&upstream);

    let (status, _) = send(&app, post_comment(draft(1, 3, "qwerty"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(start_paused = true)]
async fn hung_dependency_is_cut_off_by_deadline() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    upstream.delay("news_exists", Duration::from_secs(3600));
    let (app, worker) = gateway(&upstream);

    let (status, body) = send(&app, post_comment(draft(1, 0, "hello"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["Error"], 500);
    assert_upstream_called!(upstream, "store_comment", 0);

    drop(app);
    assert_eq!(worker.drain().await, 1);
}

#[tokio::test]
async fn invalid_input_never_reaches_dependencies() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    let (app, worker) = gateway(&upstream);

    let (status, body) = send(&app, post_comment(draft(0, 0, "hello"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Error"], 400);

    let (status, _) = send(&app, post_comment(draft(1, -4, "hello"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let malformed = Request::post("/add-comment")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "Error": 400 }));

    let (status, body) = send(&app, get("/news+comments?news_id=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Error"], 400);

    assert!(upstream.calls().is_empty());
    drop(app);
    assert_eq!(worker.drain().await, 4);
}

// ─────────────────────────────────────────────────────────────────────────────
// Content retrieval
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn news_with_comments_merges_both_reads() {
    let upstream = InMemoryUpstream::new()
        .with_news(news(1))
        .with_comment(comment(1, 1, "older"))
        .with_comment(comment(2, 1, "newer"));
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, get("/news+comments?news_id=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Error"], 0);
    assert_eq!(body["News"]["ID"], 1);
    assert_eq!(body["News"]["Title"], "news 1");
    let comments = body["Comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["Comment"], "newer");
}

#[tokio::test]
async fn missing_news_clears_the_thread() {
    let upstream = InMemoryUpstream::new()
        .with_comment(comment(1, 4, "orphan a"))
        .with_comment(comment(2, 4, "orphan b"));
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, get("/news+comments?news_id=4")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Error"], 404);
    assert_eq!(body["News"]["ID"], 0);
    assert_eq!(body["News"]["Title"], "");
    assert_eq!(body["Comments"], json!([]));
    assert_upstream_called!(upstream, "fetch_thread", 1);
}

#[tokio::test]
async fn news_without_comments_has_empty_thread() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, get("/news+comments?news_id=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Error"], 0);
    assert_eq!(body["News"]["ID"], 1);
    assert_eq!(body["Comments"], json!([]));
}

#[tokio::test]
async fn broken_thread_read_fails_the_fetch() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    upstream.script("fetch_thread", UpstreamOutcome::Unavailable("reset".into()));
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, get("/news+comments?news_id=1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["Error"], 500);
    assert_eq!(body["News"]["ID"], 0);
}

#[tokio::test]
async fn news_list_pagination() {
    let mut upstream = InMemoryUpstream::new();
    for id in 1..=25 {
        upstream = upstream.with_news(news(id));
    }
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, get("/newsList")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["NewsList"].as_array().unwrap().len(), 10);
    assert_eq!(body["NewsList"][0]["ID"], 25);
    assert_eq!(body["PaginationInfo"]["TotalNews"], 25);
    assert_eq!(body["PaginationInfo"]["TotalPages"], 3);
    assert_eq!(body["PaginationInfo"]["Page"], 1);

    let (_, body) = send(&app, get("/newsList?page=3")).await;
    assert_eq!(body["NewsList"].as_array().unwrap().len(), 5);

    let (_, body) = send(&app, get("/newsList?amount=5&search=NEWS%202")).await;
    // "news 2" and "news 20".."news 25"
    assert_eq!(body["PaginationInfo"]["TotalNews"], 7);
    assert_eq!(body["PaginationInfo"]["TotalPages"], 2);
}

#[tokio::test]
async fn news_list_exact_multiple_has_no_extra_page() {
    let mut upstream = InMemoryUpstream::new();
    for id in 1..=20 {
        upstream = upstream.with_news(news(id));
    }
    let (app, _worker) = gateway(&upstream);

    let (_, body) = send(&app, get("/newsList?amount=10")).await;
    assert_eq!(body["PaginationInfo"]["TotalPages"], 2);
}

#[tokio::test]
async fn news_list_rejects_bad_parameters_locally() {
    let upstream = InMemoryUpstream::new();
    let (app, _worker) = gateway(&upstream);

    for uri in ["/newsList?amount=0", "/newsList?page=-1", "/newsList?amount=ten"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["Error"], 400);
        assert_eq!(body["NewsList"], json!([]));
    }
    assert!(upstream.calls().is_empty());
}

#[tokio::test]
async fn single_news_and_thread_pass_through() {
    let upstream = InMemoryUpstream::new()
        .with_news(news(1))
        .with_news(news(2))
        .with_comment(comment(1, 1, "only"));
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, get("/news?news_id=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ID"], 1);
    assert_eq!(body["Error"], 0);

    let (status, body) = send(&app, get("/news?news_id=3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ID"], 0);
    assert_eq!(body["Error"], 404);

    let (status, body) = send(&app, get("/comment?news_id=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Unlike /news+comments, an empty thread is a 404 here.
    let (status, body) = send(&app, get("/comment?news_id=2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Error"], 404);
}

// ─────────────────────────────────────────────────────────────────────────────
// Correlation and liveness
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn correlation_id_reaches_every_dependency_and_the_client() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    let (app, _worker) = gateway(&upstream);

    let response = app
        .clone()
        .oneshot(get("/news+comments?news_id=1&request_id=trace-77"))
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-77");

    let calls = upstream.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.correlation_id.as_str() == "trace-77"));
}

#[tokio::test]
async fn generated_correlation_id_is_shared_by_all_calls() {
    let upstream = InMemoryUpstream::new().with_news(news(1));
    let (app, _worker) = gateway(&upstream);

    let response = app
        .clone()
        .oneshot(post_comment(draft(1, 0, "hello")))
        .await
        .unwrap();
    let echoed = response.headers()["x-request-id"].to_str().unwrap().to_string();

    let calls = upstream.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.correlation_id.as_str() == echoed));
}

#[tokio::test]
async fn health_does_not_touch_dependencies() {
    let upstream = InMemoryUpstream::new();
    let (app, _worker) = gateway(&upstream);

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
    assert!(upstream.calls().is_empty());
}
