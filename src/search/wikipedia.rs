use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::errors::AppError;
use crate::models::WikiSummary;
use crate::search::endpoint_url;

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageLink>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    page: String,
}

fn article_title(title: &str) -> String {
    title.trim().replace(' ', "_")
}

/// `{base}/api/rest_v1/page/summary/{title}` with the title percent-encoded.
pub fn summary_url(base: &Url, title: &str) -> Result<Url, AppError> {
    let title = article_title(title);
    endpoint_url(base, &["api", "rest_v1", "page", "summary", title.as_str()])
}

pub fn opensearch_url(base: &Url, query: &str, limit: usize) -> Result<Url, AppError> {
    let mut url = endpoint_url(base, &["w", "api.php"])?;
    url.query_pairs_mut()
        .append_pair("action", "opensearch")
        .append_pair("search", query)
        .append_pair("limit", &limit.to_string())
        .append_pair("namespace", "0")
        .append_pair("format", "json");
    Ok(url)
}

/// Parses a REST summary body. Pages without an extract count as missing.
pub fn parse_summary(body: &str, base: &Url) -> Result<Option<WikiSummary>, AppError> {
    let payload: SummaryPayload =
        serde_json::from_str(body).map_err(|e| AppError::parse("Wikipedia", e))?;
    if payload.extract.trim().is_empty() {
        return Ok(None);
    }
    let url = payload
        .content_urls
        .and_then(|c| c.desktop)
        .map(|d| d.page)
        .unwrap_or_else(|| {
            format!("{}/wiki/{}", base.as_str().trim_end_matches('/'), article_title(&payload.title))
        });
    Ok(Some(WikiSummary { title: payload.title, extract: payload.extract, url }))
}

/// Opensearch answers `[query, [titles…], [descriptions…], [urls…]]`.
pub fn parse_opensearch(body: &str) -> Result<Vec<String>, AppError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| AppError::parse("Wikipedia opensearch", e))?;
    let titles = value
        .get(1)
        .and_then(|t| t.as_array())
        .map(|titles| {
            titles
                .iter()
                .filter_map(|t| t.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Ok(titles)
}

pub async fn fetch_summary(
    client: &Client,
    base: &Url,
    title: &str,
) -> Result<Option<WikiSummary>, AppError> {
    info!("Searching Wikipedia for: {title}");
    let url = summary_url(base, title)?;
    let resp = client.get(url.clone()).send().await?;

    match resp.status() {
        StatusCode::NOT_FOUND => Ok(None),
        status if status.is_success() => parse_summary(&resp.text().await?, base),
        status => Err(AppError::UnexpectedStatus { url: url.to_string(), status: status.as_u16() }),
    }
}

pub async fn opensearch(
    client: &Client,
    base: &Url,
    query: &str,
    limit: usize,
) -> Result<Vec<String>, AppError> {
    let url = opensearch_url(base, query, limit)?;
    let resp = client.get(url.clone()).send().await?;
    if !resp.status().is_success() {
        return Err(AppError::UnexpectedStatus {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }
    parse_opensearch(&resp.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://en.wikipedia.org").unwrap()
    }

    #[test]
    fn summary_url_encodes_title() {
        let url = summary_url(&base(), "Rust (programming language)").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Rust_(programming_language)"
        );

        let url = summary_url(&base(), "AC/DC").unwrap();
        assert!(url.as_str().ends_with("/summary/AC%2FDC"));
    }

    #[test]
    fn opensearch_url_carries_query_pairs() {
        let url = opensearch_url(&base(), "rust lang", 3).unwrap();
        assert_eq!(url.path(), "/w/api.php");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("search".into(), "rust lang".into())));
        assert!(pairs.contains(&("limit".into(), "3".into())));
        assert!(pairs.contains(&("action".into(), "opensearch".into())));
    }

    #[test]
    fn mirrored_base_keeps_its_path() {
        let mirror = Url::parse("https://mirror.test/wikipedia/").unwrap();
        assert_eq!(opensearch_url(&mirror, "x", 1).unwrap().path(), "/wikipedia/w/api.php");
        assert_eq!(
            summary_url(&mirror, "Ferris").unwrap().path(),
            "/wikipedia/api/rest_v1/page/summary/Ferris"
        );
    }

    #[test]
    fn parses_summary_with_desktop_link() {
        let body = r#"{
            "type": "standard",
            "title": "Rust (programming language)",
            "extract": "Rust is a general-purpose programming language.",
            "content_urls": {
                "desktop": { "page": "https://en.wikipedia.org/wiki/Rust_(programming_language)" }
            }
        }"#;
        let summary = parse_summary(body, &base()).unwrap().unwrap();
        assert_eq!(summary.title, "Rust (programming language)");
        assert!(summary.extract.starts_with("Rust is"));
        assert_eq!(summary.url, "https://en.wikipedia.org/wiki/Rust_(programming_language)");
    }

    #[test]
    fn summary_without_link_builds_one() {
        let body = r#"{"title": "Ferris", "extract": "A crab."}"#;
        let summary = parse_summary(body, &base()).unwrap().unwrap();
        assert_eq!(summary.url, "https://en.wikipedia.org/wiki/Ferris");
    }

    #[test]
    fn empty_extract_counts_as_missing() {
        let body = r#"{"title": "Nothing", "extract": "  "}"#;
        assert!(parse_summary(body, &base()).unwrap().is_none());
    }

    #[test]
    fn parses_opensearch_titles() {
        let body = r#"["rust", ["Rust", "Rust (programming language)", "Rust Belt"], ["", "", ""], []]"#;
        assert_eq!(
            parse_opensearch(body).unwrap(),
            vec!["Rust", "Rust (programming language)", "Rust Belt"]
        );
        assert!(parse_opensearch(r#"["zzz", []]"#).unwrap().is_empty());
        assert!(parse_opensearch("<html>").is_err());
    }
}
