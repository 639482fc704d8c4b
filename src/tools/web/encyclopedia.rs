//! Encyclopedia summaries via Wikipedia
//!
//! Looks the topic up as a page title first. A missing or disambiguation page
//! falls back to an opensearch query and the first result that has a summary.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{Error, Result};

/// Search results tried after a direct title miss
const SEARCH_LIMIT: usize = 3;

/// Encyclopedia collaborator
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Short summary of `topic`
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing matches, other errors if the
    /// provider cannot be reached
    async fn summary(&self, topic: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Wikipedia REST client
pub struct Wikipedia {
    client: reqwest::Client,
    base_url: String,
    sentences: usize,
}

impl Wikipedia {
    /// Create a client returning `sentences` sentences per summary
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, sentences: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("herald/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sentences: sentences.max(1),
        })
    }

    /// Summary of an exact page title, `None` if there is no usable page
    async fn page_summary(&self, title: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/api/rest_v1/page/summary/{}",
            self.base_url,
            urlencoding::encode(&title.replace(' ', "_"))
        );

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let page: PageSummary = response.error_for_status().map_err(Error::Http)?.json().await?;

        if page.kind == "disambiguation" || page.extract.trim().is_empty() {
            tracing::debug!(title, kind = %page.kind, "no direct summary");
            return Ok(None);
        }
        Ok(Some(first_sentences(&page.extract, self.sentences)))
    }

    /// Page titles matching `query`
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let url = format!("{}/w/api.php", self.base_url);
        let limit = SEARCH_LIMIT.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("action", "opensearch"),
                ("search", query),
                ("limit", limit.as_str()),
                ("namespace", "0"),
                ("format", "json"),
            ])
            .send()
            .await?;

        // [query, [titles], [descriptions], [urls]]
        let body: Vec<serde_json::Value> =
            response.error_for_status().map_err(Error::Http)?.json().await?;
        let titles = body
            .get(1)
            .and_then(serde_json::Value::as_array)
            .map(|titles| {
                titles
                    .iter()
                    .filter_map(|t| t.as_str().map(ToString::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Ok(titles)
    }
}

#[async_trait]
impl Encyclopedia for Wikipedia {
    async fn summary(&self, topic: &str) -> Result<String> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::InvalidInput("empty topic".to_string()));
        }

        if let Some(summary) = self.page_summary(topic).await? {
            return Ok(summary);
        }

        for title in self.search(topic).await? {
            if let Some(summary) = self.page_summary(&title).await? {
                tracing::debug!(topic, title = %title, "summary found via search");
                return Ok(summary);
            }
        }

        Err(Error::NotFound(topic.to_string()))
    }
}

/// The first `count` sentences of `text`
#[must_use]
pub fn first_sentences(text: &str, count: usize) -> String {
    let mut seen = 0;
    for (i, c) in text.char_indices() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();
        if text[end..].chars().next().is_none_or(char::is_whitespace) {
            seen += 1;
            if seen == count {
                return text[..end].trim().to_string();
            }
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sentences() {
        let text = "Rust is a language. It is fast! Is it safe? Yes.";
        assert_eq!(first_sentences(text, 1), "Rust is a language.");
        assert_eq!(first_sentences(text, 2), "Rust is a language. It is fast!");
        assert_eq!(first_sentences(text, 10), text);
    }

    #[test]
    fn test_decimal_points_do_not_end_sentences() {
        let text = "Pi is about 3.14 in value. It is irrational.";
        assert_eq!(first_sentences(text, 1), "Pi is about 3.14 in value.");
    }
}
