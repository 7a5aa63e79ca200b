use std::sync::LazyLock;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;
use url::Url;

use crate::errors::AppError;
use crate::models::SearchHit;
use crate::search::endpoint_url;

static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static RESULT_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.result-link"));
static RESULT_SNIPPET: LazyLock<Selector> = LazyLock::new(|| selector("td.result-snippet"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// `{base}/lite/?q={query}`
pub fn search_url(base: &Url, query: &str) -> Result<Url, AppError> {
    let mut url = endpoint_url(base, &["lite", ""])?;
    url.query_pairs_mut().append_pair("q", query);
    Ok(url)
}

/// Unwraps `//duckduckgo.com/l/?uddg=<target>` redirect links.
fn resolve_href(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned())
        })
        .unwrap_or(absolute)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts results from the lite results table.
///
/// Each result spans several rows: the link row, then a snippet row.
pub fn parse_results(html: &str) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let mut hits: Vec<SearchHit> = Vec::new();

    for row in document.select(&ROW) {
        if let Some(link) = row.select(&RESULT_LINK).next() {
            let title = collapse_whitespace(&link.text().collect::<String>());
            let href = link.value().attr("href").unwrap_or_default();
            if !title.is_empty() && !href.is_empty() {
                hits.push(SearchHit { title, url: resolve_href(href), snippet: None });
            }
            continue;
        }

        if let Some(cell) = row.select(&RESULT_SNIPPET).next() {
            let snippet = collapse_whitespace(&cell.text().collect::<String>());
            if let Some(last) = hits.last_mut() {
                if last.snippet.is_none() && !snippet.is_empty() {
                    last.snippet = Some(snippet);
                }
            }
        }
    }
    hits
}

pub async fn search(client: &Client, base: &Url, query: &str) -> Result<Vec<SearchHit>, AppError> {
    info!("Searching DuckDuckGo for: {query}");
    let url = search_url(base, query)?;
    let resp = client.get(url.clone()).send().await?;
    if !resp.status().is_success() {
        return Err(AppError::UnexpectedStatus {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }
    Ok(parse_results(&resp.text().await?))
}
