use std::sync::LazyLock;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::errors::AppError;

/// Containers that usually hold the main content, best first.
static CONTENT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["article", "main", "[role=main]"]
        .iter()
        .map(|css| Selector::parse(css).expect("static selector is valid"))
        .collect()
});

static BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, p, li, blockquote, pre, td")
        .expect("static selector is valid")
});

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("static selector is valid"));

/// Text of an element with whitespace runs collapsed. Script and style
/// contents are skipped.
fn element_text(element: &ElementRef) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let inside_code = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| matches!(el.value().name(), "script" | "style" | "noscript"));
        if inside_code {
            continue;
        }
        for word in fragment.split_whitespace() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(word);
        }
    }
    text
}

/// Block-level text under `root`, one block per line. Blocks nested inside
/// another block are part of the outer block's line.
fn block_lines(root: &ElementRef) -> Vec<String> {
    root.select(&BLOCKS)
        .filter(|el| {
            !el.ancestors()
                .take_while(|node| node.id() != root.id())
                .filter_map(ElementRef::wrap)
                .any(|outer| BLOCKS.matches(&outer))
        })
        .map(|el| element_text(&el))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Extracts readable text from an HTML document.
///
/// Prefers `<article>` / `<main>` content, then block elements of `<body>`,
/// then any body text at all.
pub fn extract_readable_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector in CONTENT_SELECTORS.iter() {
        let lines: Vec<String> = document
            .select(selector)
            .flat_map(|el| {
                let lines = block_lines(&el);
                if lines.is_empty() {
                    vec![element_text(&el)]
                } else {
                    lines
                }
            })
            .filter(|line| !line.is_empty())
            .collect();
        if !lines.is_empty() {
            return lines.join("\n");
        }
    }

    let Some(body) = document.select(&BODY).next() else {
        return String::new();
    };
    let lines = block_lines(&body);
    if lines.is_empty() {
        element_text(&body)
    } else {
        lines.join("\n")
    }
}

/// Connection failures and timeouts mean the site could not be reached.
fn unreachable(url: &str, err: reqwest::Error) -> Result<Option<String>, AppError> {
    if err.is_connect() || err.is_timeout() {
        warn!("Could not reach {url}: {err}");
        Ok(None)
    } else {
        Err(err.into())
    }
}

/// Fetches `url` and extracts its text. Unreachable hosts, non-success
/// statuses and pages with no readable text come back as `None`.
pub async fn fetch_text(client: &Client, url: &str) -> Result<Option<String>, AppError> {
    info!("Scraping website: {url}");
    let resp = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => return unreachable(url, e),
    };
    if !resp.status().is_success() {
        warn!("{url} responded with {}", resp.status());
        return Ok(None);
    }
    let body = match resp.text().await {
        Ok(body) => body,
        Err(e) => return unreachable(url, e),
    };
    let text = extract_readable_text(&body);
    Ok((!text.trim().is_empty()).then_some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_article_content() {
        let html = r#"
            <html><body>
              <nav><li>Home</li><li>About</li></nav>
              <article>
                <h1>Crabs</h1>
                <p>Crabs are decapod   crustaceans.</p>
                <script>var tracking = 1;</script>
              </article>
            </body></html>
        "#;
        assert_eq!(extract_readable_text(html), "Crabs\nCrabs are decapod crustaceans.");
    }

    #[test]
    fn falls_back_to_body_blocks() {
        let html = r#"
            <html><head><style>p { color: red }</style></head><body>
              <p>First paragraph.</p>
              <ul><li>One item</li></ul>
            </body></html>
        "#;
        assert_eq!(extract_readable_text(html), "First paragraph.\nOne item");
    }

    #[test]
    fn bare_body_text_without_blocks() {
        let html = "<html><body>Just <b>some</b> text<script>alert(1)</script></body></html>";
        assert_eq!(extract_readable_text(html), "Just some text");
    }

    #[test]
    fn empty_document_yields_empty_text() {
        assert_eq!(extract_readable_text("<html><body>  </body></html>"), "");
    }

    #[test]
    fn nested_blocks_are_read_once() {
        let html = r#"
            <html><body><article>
              <ul><li><p>Only once</p></li></ul>
              <blockquote><p>Quoted</p></blockquote>
              <table><tr><td><p>Cell</p></td></tr></table>
            </article></body></html>
        "#;
        let text = extract_readable_text(html);
        assert_eq!(text, "Only once\nQuoted\nCell");
        assert_eq!(text.matches("Only once").count(), 1);
    }

    #[tokio::test]
    async fn unreachable_host_is_not_an_error() {
        let client = Client::new();
        let text = fetch_text(&client, "http://127.0.0.1:1/").await.unwrap();
        assert!(text.is_none());
    }
}
