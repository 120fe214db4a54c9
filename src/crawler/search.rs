//! Search result lister
//!
//! Pages through the search results for a query and pulls one
//! [`SearchHit`] out of every result card.
//!
//! A page that fails to load ends the listing early with whatever was
//! already collected. A single card that cannot be read is logged and
//! skipped; the rest of its page is still used.

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::model::SearchHit;
use crate::text::strip_zero_width;
use crate::Result;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const ITEM_SELECTOR: &str = r#"div[action-type="feed_list_item"]"#;
const AVATAR_SELECTOR: &str = "div.card-feed > div.avator > a";
const DATE_SELECTOR: &str = "div.card-feed > div.content > div.from > a:first-of-type";
const BODY_SELECTOR: &str = "div.card-feed > div.content > p:last-of-type";

/// Lists posts matching a search query
pub struct SearchResultLister {
    client: Client,
    search_url: String,
}

impl SearchResultLister {
    pub fn new(client: Client, search_url: impl Into<String>) -> Self {
        Self {
            client,
            search_url: search_url.into(),
        }
    }

    /// URL of one result page
    pub fn page_url(&self, query: &str, page: u32) -> Result<Url> {
        let page = page.to_string();
        Ok(Url::parse_with_params(
            &self.search_url,
            &[("q", query), ("page", page.as_str())],
        )?)
    }

    /// Collects the hits of result pages `1..=max_pages`, in page order
    ///
    /// Stops at the first page that does not load; the hits gathered up to
    /// that point are returned.
    pub async fn list(&self, query: &str, max_pages: u32) -> Result<Vec<SearchHit>> {
        let mut hits = Vec::new();

        for page in 1..=max_pages {
            let url = self.page_url(query, page)?;
            tracing::debug!("Fetching search page {}: {}", page, url);

            let body = match fetch_url(&self.client, &url).await {
                FetchResult::Success { body, .. } => body,
                failed => {
                    tracing::error!(
                        "Cannot access {} ({}), stopping search listing",
                        url,
                        failed.describe_failure().unwrap_or_default()
                    );
                    return Ok(hits);
                }
            };

            let before = hits.len();
            for extracted in extract_hits(&body) {
                match extracted {
                    Ok(hit) => hits.push(hit),
                    Err(e) => tracing::warn!("Skipping result on page {}: {}", page, e),
                }
            }
            tracing::info!(
                "Search page {} yielded {} posts",
                page,
                hits.len() - before
            );
        }

        Ok(hits)
    }
}

struct ResultSelectors {
    item: Selector,
    avatar: Selector,
    date: Selector,
    body: Selector,
}

impl ResultSelectors {
    fn new() -> std::result::Result<Self, String> {
        let parse = |css: &str| Selector::parse(css).map_err(|e| format!("{}: {:?}", css, e));
        Ok(Self {
            item: parse(ITEM_SELECTOR)?,
            avatar: parse(AVATAR_SELECTOR)?,
            date: parse(DATE_SELECTOR)?,
            body: parse(BODY_SELECTOR)?,
        })
    }
}

/// Extracts every result card of a search page, in document order
///
/// Each card yields either a hit or the reason it could not be read. Fields
/// other than the post id are empty strings when the card lacks them.
pub fn extract_hits(html: &str) -> Vec<std::result::Result<SearchHit, String>> {
    let selectors = match ResultSelectors::new() {
        Ok(selectors) => selectors,
        Err(e) => return vec![Err(format!("invalid selector {}", e))],
    };

    let document = Html::parse_document(html);
    document
        .select(&selectors.item)
        .map(|item| extract_hit(item, &selectors))
        .collect()
}

fn extract_hit(
    item: ElementRef<'_>,
    selectors: &ResultSelectors,
) -> std::result::Result<SearchHit, String> {
    let post_id = item
        .value()
        .attr("mid")
        .filter(|mid| !mid.is_empty())
        .ok_or_else(|| "result card without a mid".to_string())?
        .to_string();

    let author_id = match item.select(&selectors.avatar).next() {
        Some(link) => {
            let href = link
                .value()
                .attr("href")
                .ok_or_else(|| format!("avatar link of {} has no href", post_id))?;
            author_id_from_profile_link(href)
                .ok_or_else(|| format!("unrecognized profile link '{}' on {}", href, post_id))?
        }
        None => String::new(),
    };

    let created_at = item
        .select(&selectors.date)
        .next()
        .map(|a| a.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let text = item
        .select(&selectors.body)
        .next()
        .map(|p| {
            p.text()
                .map(|fragment| strip_zero_width(fragment).trim().to_string())
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .unwrap_or_default();

    Ok(SearchHit {
        post_id,
        author_id,
        created_at,
        text,
    })
}

/// Pulls the author id out of a profile link such as
/// `//weibo.com/1642634100?refer_flag=1001030103_`
pub fn author_id_from_profile_link(href: &str) -> Option<String> {
    let (_, rest) = href.split_once(".com/")?;
    rest.split('?').next().map(str::to_string)
}
