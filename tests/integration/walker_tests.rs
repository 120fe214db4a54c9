//! Comment tree walk against a scripted comment-list endpoint

use crate::{comment, comment_page, QueryParamMissing, COMMENTS_PATH};
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use weibo_comments::crawler::{CommentTreeWalker, Pause, RecordingLimiter};
use weibo_comments::output::CollectingSink;
use weibo_comments::{CommentDepth, CrawlError, RecencyCutoff};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POST_ID: &str = "5028762471369664";
const AUTHOR_ID: &str = "1642634100";

fn cutoff() -> RecencyCutoff {
    RecencyCutoff::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
}

fn walker(server: &MockServer, limiter: Arc<RecordingLimiter>) -> CommentTreeWalker {
    CommentTreeWalker::new(
        Client::new(),
        format!("{}{}", server.uri(), COMMENTS_PATH),
        limiter,
    )
}

/// Mounts a parent list of three pages ([101], [102], []) with cursors
/// 2001, 2002 and the sentinel, and the reply lists under 101 and 102.
async fn mount_comment_tree(server: &MockServer) {
    // Parent pages
    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .and(query_param("id", POST_ID))
        .and(query_param("fetch_level", "0"))
        .and(QueryParamMissing("max_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(
            2001,
            vec![comment(101, "<p>first <b>parent</b></p>", "Mon Jan 01 10:00:00 +0800 2024")],
        )))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .and(query_param("id", POST_ID))
        .and(query_param("fetch_level", "0"))
        .and(query_param("flow", "0"))
        .and(query_param("max_id", "2001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(
            2002,
            vec![comment(102, "second parent", "Tue Jan 02 10:00:00 +0800 2024")],
        )))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .and(query_param("id", POST_ID))
        .and(query_param("fetch_level", "0"))
        .and(query_param("max_id", "2002"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(0, vec![])))
        .expect(1)
        .mount(server)
        .await;

    // Replies under 101: two pages
    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .and(query_param("id", "101"))
        .and(query_param("fetch_level", "1"))
        .and(query_param("max_id", "0"))
        .and(QueryParamMissing("flow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(
            3001,
            vec![
                comment(
                    201,
                    "fresh <a href=\"/n/someone\">@someone</a>",
                    "Sat Mar 16 00:00:01 +0800 2024",
                ),
                comment(202, "same day as cutoff", "Fri Mar 15 23:00:00 +0800 2024"),
            ],
        )))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .and(query_param("id", "101"))
        .and(query_param("fetch_level", "1"))
        .and(query_param("flow", "0"))
        .and(query_param("max_id", "3001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(
            0,
            vec![json!({
                "id": 203,
                "text": "own words",
                "reply_original_text": "<span>quoted original</span>",
                "created_at": "Mon Apr 01 09:30:00 +0800 2024"
            })],
        )))
        .expect(1)
        .mount(server)
        .await;

    // Replies under 102: empty single page
    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .and(query_param("id", "102"))
        .and(query_param("fetch_level", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(0, vec![])))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_walk_follows_both_cursor_levels() {
    let server = MockServer::start().await;
    mount_comment_tree(&server).await;

    let limiter = Arc::new(RecordingLimiter::new());
    let mut sink = CollectingSink::new();

    let stats = walker(&server, limiter.clone())
        .walk(POST_ID, AUTHOR_ID, &cutoff(), &mut sink)
        .await
        .expect("walk failed");

    // 3 parent pages + 2 reply pages under 101 + 1 under 102
    assert_eq!(stats.requests, 6);
    assert_eq!(stats.parent_pages, 3);
    assert_eq!(stats.parents, 2);
    assert_eq!(stats.children, 2);
    assert_eq!(stats.filtered, 1);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 6);

    let emitted: Vec<(CommentDepth, &str, &str)> = sink
        .comments
        .iter()
        .map(|c| (c.depth, c.text.as_str(), c.created_at.as_str()))
        .collect();
    assert_eq!(
        emitted,
        vec![
            (CommentDepth::Parent, "first parent", "2024-01-01 10:00:00"),
            (CommentDepth::Child, "fresh @someone", "2024-03-16 00:00:01"),
            (CommentDepth::Child, "quoted original", "2024-04-01 09:30:00"),
            (CommentDepth::Parent, "second parent", "2024-01-02 10:00:00"),
        ]
    );

    // Records point at the request that carried them
    assert!(sink.comments[0].source_url.contains(&format!("id={}", POST_ID)));
    assert!(sink.comments[1].source_url.contains("id=101"));
    assert!(sink.comments[2].source_url.contains("max_id=3001"));
}

#[tokio::test]
async fn test_walk_pauses() {
    let server = MockServer::start().await;
    mount_comment_tree(&server).await;

    let limiter = Arc::new(RecordingLimiter::new());
    let mut sink = CollectingSink::new();

    walker(&server, limiter.clone())
        .walk(POST_ID, AUTHOR_ID, &cutoff(), &mut sink)
        .await
        .expect("walk failed");

    // Cursor sequence [2001, 2002, 0]: a pause between pages 1→2 and 2→3 only
    assert_eq!(limiter.count(Pause::BetweenPages), 2);
    assert_eq!(limiter.count(Pause::AfterRequest), 6);
    assert_eq!(limiter.count(Pause::BeforeRetry), 0);
    assert_ne!(limiter.pauses().last(), Some(&Pause::BetweenPages));
}

#[tokio::test]
async fn test_single_exhausted_page_makes_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .and(query_param("fetch_level", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(0, vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let limiter = Arc::new(RecordingLimiter::new());
    let mut sink = CollectingSink::new();
    let stats = walker(&server, limiter.clone())
        .walk(POST_ID, AUTHOR_ID, &cutoff(), &mut sink)
        .await
        .unwrap();

    assert_eq!(stats.requests, 1);
    assert!(sink.comments.is_empty());
    assert_eq!(limiter.count(Pause::BetweenPages), 0);
}

#[tokio::test]
async fn test_comment_endpoint_failure_ends_walk() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let limiter = Arc::new(RecordingLimiter::new());
    let mut sink = CollectingSink::new();
    let result = walker(&server, limiter.clone())
        .walk(POST_ID, AUTHOR_ID, &cutoff(), &mut sink)
        .await;

    assert!(matches!(result, Err(CrawlError::Status { status: 500, .. })));
    // The failed request is still followed by its pause
    assert_eq!(limiter.count(Pause::AfterRequest), 1);
}

#[tokio::test]
async fn test_missing_cursor_is_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let mut sink = CollectingSink::new();
    let result = walker(&server, Arc::new(RecordingLimiter::new()))
        .walk(POST_ID, AUTHOR_ID, &cutoff(), &mut sink)
        .await;

    assert!(matches!(result, Err(CrawlError::Protocol { .. })));
}

#[tokio::test]
async fn test_bad_timestamp_ends_walk() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .and(query_param("fetch_level", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(
            0,
            vec![comment(101, "parent", "2024-01-01 10:00:00")],
        )))
        .mount(&server)
        .await;

    let mut sink = CollectingSink::new();
    let result = walker(&server, Arc::new(RecordingLimiter::new()))
        .walk(POST_ID, AUTHOR_ID, &cutoff(), &mut sink)
        .await;

    assert!(matches!(result, Err(CrawlError::Timestamp(_))));
    assert!(sink.comments.is_empty());
}
