//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the search, comment-list and
//! detail endpoints, and a recording rate limiter in place of real sleeps.

mod walker_tests;

use serde_json::{json, Value};
use weibo_comments::config::{
    ClientConfig, Config, CrawlerConfig, EndpointConfig, OutputConfig, SearchConfig,
};
use wiremock::{Match, Request};

pub const COMMENTS_PATH: &str = "/ajax/statuses/buildComments";
pub const SEARCH_PATH: &str = "/weibo";
pub const DETAIL_PATH: &str = "/detail";

/// Matches requests that do not carry the given query parameter
pub struct QueryParamMissing(pub &'static str);

impl Match for QueryParamMissing {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == self.0)
    }
}

/// Creates a test configuration pointing every endpoint at the mock server
pub fn create_test_config(base_url: &str, query: &str, max_pages: u32) -> Config {
    Config {
        search: SearchConfig {
            query: query.to_string(),
            max_pages,
        },
        crawler: CrawlerConfig {
            months_ago: 1,
            request_delay_ms: 0,
            page_delay_ms: 0,
            retry_delay_ms: 0,
            fetch_post_details: false,
        },
        client: ClientConfig {
            user_agent: "TestBot/1.0".to_string(),
            cookie: "SUB=test".to_string(),
            referer: "https://s.weibo.com".to_string(),
            timeout_secs: 5,
        },
        endpoints: EndpointConfig {
            search_url: format!("{}{}", base_url, SEARCH_PATH),
            comments_url: format!("{}{}", base_url, COMMENTS_PATH),
            detail_url: format!("{}{}", base_url, DETAIL_PATH),
        },
        output: OutputConfig::default(),
    }
}

/// One comment entry as the comment-list endpoint returns it
pub fn comment(id: u64, text: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "text": text,
        "created_at": created_at,
    })
}

/// A comment-list response body
pub fn comment_page(max_id: u64, data: Vec<Value>) -> Value {
    json!({
        "ok": 1,
        "max_id": max_id,
        "data": data,
    })
}

/// One search result card
pub fn result_card(mid: &str, uid: &str, date: &str, body: &str) -> String {
    format!(
        r#"<div class="card-wrap" action-type="feed_list_item" mid="{mid}">
            <div class="card"><div class="card-feed">
                <div class="avator"><a href="//weibo.com/{uid}?refer_flag=1001030103_"><img src="avatar.jpg"/></a></div>
                <div class="content">
                    <p class="txt" node-type="feed_list_content">{body}</p>
                    <div class="from"><a href="//weibo.com/{uid}/{mid}" target="_blank">{date}</a> 来自 <a>微博 weibo.com</a></div>
                </div>
            </div></div>
        </div>"#
    )
}

/// A search result page wrapping the given cards
pub fn result_page(cards: &[String]) -> String {
    format!(
        r#"<html><head><title>微博搜索</title></head><body><div id="pl_feedlist_index">{}</div></body></html>"#,
        cards.concat()
    )
}
