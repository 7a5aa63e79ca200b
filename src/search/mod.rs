pub mod duckduckgo;
pub mod page;
pub mod wikipedia;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::ServerConfig;
use crate::errors::AppError;
use crate::models::{SearchHit, WikiSummary};

const USER_AGENT: &str = "InfoBot/0.2 (https://github.com/infobot; info@example.com)";

/// Where the bot looks things up.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Summary of the article titled exactly `title`, if one exists.
    async fn page_summary(&self, title: &str) -> Result<Option<WikiSummary>, AppError>;

    /// Article titles matching `query`, best match first.
    async fn related_titles(&self, query: &str, limit: usize) -> Result<Vec<String>, AppError>;

    async fn web_search(&self, query: &str) -> Result<Vec<SearchHit>, AppError>;

    /// Readable text of the page at `url`; `None` when the page is unreachable or empty.
    async fn read_page(&self, url: &str) -> Result<Option<String>, AppError>;
}

/// Live lookups against Wikipedia, DuckDuckGo and arbitrary pages.
#[derive(Clone)]
pub struct WebKnowledge {
    client: Client,
    wikipedia_base: Url,
    search_base: Url,
}

impl WebKnowledge {
    pub fn new(config: &ServerConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.lookup_timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self {
            client,
            wikipedia_base: parse_base(&config.wikipedia_base_url)?,
            search_base: parse_base(&config.search_base_url)?,
        })
    }
}

fn parse_base(raw: &str) -> Result<Url, AppError> {
    Url::parse(raw).map_err(|e| AppError::InvalidUrl { url: raw.to_string(), message: e.to_string() })
}

/// `base` with `segments` appended to its path. A path prefix on `base` is kept.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::InvalidUrl {
            url: base.to_string(),
            message: "cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl KnowledgeSource for WebKnowledge {
    async fn page_summary(&self, title: &str) -> Result<Option<WikiSummary>, AppError> {
        wikipedia::fetch_summary(&self.client, &self.wikipedia_base, title).await
    }

    async fn related_titles(&self, query: &str, limit: usize) -> Result<Vec<String>, AppError> {
        wikipedia::opensearch(&self.client, &self.wikipedia_base, query, limit).await
    }

    async fn web_search(&self, query: &str) -> Result<Vec<SearchHit>, AppError> {
        duckduckgo::search(&self.client, &self.search_base, query).await
    }

    async fn read_page(&self, url: &str) -> Result<Option<String>, AppError> {
        page::fetch_text(&self.client, url).await
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Canned lookups; records every query it receives.
    #[derive(Default)]
    pub struct StubSource {
        pub summaries: HashMap<String, WikiSummary>,
        pub titles: Vec<String>,
        pub hits: Vec<SearchHit>,
        pub pages: HashMap<String, String>,
        pub fail_wikipedia: bool,
        pub fail_search: bool,
        pub fail_pages: bool,
        pub calls: Mutex<Vec<String>>,
    }

    impl StubSource {
        pub fn with_summary(mut self, title: &str, extract: &str) -> Self {
            self.summaries.insert(
                title.to_string(),
                WikiSummary {
                    title: title.to_string(),
                    extract: extract.to_string(),
                    url: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
                },
            );
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    fn unavailable(what: &str) -> AppError {
        AppError::UnexpectedStatus { url: format!("https://{what}.test"), status: 503 }
    }

    #[async_trait]
    impl KnowledgeSource for StubSource {
        async fn page_summary(&self, title: &str) -> Result<Option<WikiSummary>, AppError> {
            self.record(format!("summary:{title}"));
            if self.fail_wikipedia {
                return Err(unavailable("wikipedia"));
            }
            Ok(self.summaries.get(title).cloned())
        }

        async fn related_titles(&self, query: &str, limit: usize) -> Result<Vec<String>, AppError> {
            self.record(format!("titles:{query}"));
            Ok(self.titles.iter().take(limit).cloned().collect())
        }

        async fn web_search(&self, query: &str) -> Result<Vec<SearchHit>, AppError> {
            self.record(format!("search:{query}"));
            if self.fail_search {
                return Err(unavailable("search"));
            }
            Ok(self.hits.clone())
        }

        async fn read_page(&self, url: &str) -> Result<Option<String>, AppError> {
            self.record(format!("page:{url}"));
            if self.fail_pages {
                return Err(AppError::parse("page", "unexpected markup"));
            }
            Ok(self.pages.get(url).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_keeps_base_path_prefix() {
        let base = Url::parse("https://proxy.test/mirror").unwrap();
        let url = endpoint_url(&base, &["w", "api.php"]).unwrap();
        assert_eq!(url.as_str(), "https://proxy.test/mirror/w/api.php");

        let base = Url::parse("https://proxy.test/ddg/").unwrap();
        let url = endpoint_url(&base, &["lite", ""]).unwrap();
        assert_eq!(url.as_str(), "https://proxy.test/ddg/lite/");
    }

    #[test]
    fn endpoint_url_rejects_opaque_bases() {
        let base = Url::parse("mailto:bot@example.com").unwrap();
        assert!(matches!(endpoint_url(&base, &["x"]), Err(AppError::InvalidUrl { .. })));
    }
}
