//! Channel discovery through Gemini's `google_search` grounding tool.
//!
//! The backend sends a `generateContent` request restricted to `site:t.me`,
//! then collects channel candidates from two places: the grounded references
//! attached to the answer and the `t.me` links listed in the answer text.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

use pitchdesk_core::PitchdeskError;
use pitchdesk_core::config::SearchConfig;
use pitchdesk_core::search::{RawCandidate, SearchBackend, username_from_link};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_DESCRIPTION_CHARS: usize = 500;

static TITLE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Telegram:\s*(Contact|View|Join)\s*@\S+\s*[-–—]?\s*")
        .expect("title prefix pattern is valid")
});

static TITLE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[-–—]\s*Telegram\s*$").expect("title suffix pattern is valid"));

/// [`SearchBackend`] that asks a grounded model for public Telegram channels.
#[derive(Clone)]
pub struct GroundedChannelSearch {
    client: Client,
    api_key: String,
    model: String,
}

impl GroundedChannelSearch {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, PitchdeskError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| PitchdeskError::config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Builds the backend from `[search]`, or `None` when no key is configured.
    pub fn from_config(config: &SearchConfig) -> Result<Option<Self>, PitchdeskError> {
        match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Self::new(key, &config.model).map(Some),
            _ => Ok(None),
        }
    }

    async fn perform_search(&self, query: &str, limit: usize) -> Result<Value, String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: search_prompt(query, limit),
                }],
            }],
            tools: vec![Tool::default()],
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| format!("request failed: {err}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(describe_http_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|err| format!("failed to parse response: {err}"))
    }
}

#[async_trait]
impl SearchBackend for GroundedChannelSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<RawCandidate> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let payload = match self.perform_search(query, limit).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(query, error = %err, "channel search failed");
                return Vec::new();
            }
        };

        let candidates = extract_candidates(&payload, limit);
        tracing::info!(query, found = candidates.len(), "channel search completed");
        candidates
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize, Default)]
struct Tool {
    google_search: GoogleSearchConfig,
}

#[derive(Serialize, Default)]
struct GoogleSearchConfig {}

fn search_prompt(query: &str, limit: usize) -> String {
    format!(
        "site:t.me {query}\n\n\
         List up to {limit} public Telegram channels or chats matching this search. \
         One per line, formatted as: https://t.me/<username> | <title> | <short description>"
    )
}

/// Collects candidates from grounded references first, then from answer lines.
fn extract_candidates(root: &Value, limit: usize) -> Vec<RawCandidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    let found = extract_references(root)
        .into_iter()
        .chain(extract_answer_lines(root));

    for candidate in found {
        let Some(username) = candidate.username.clone() else {
            continue;
        };
        if !seen.insert(username.to_lowercase()) {
            continue;
        }
        candidates.push(candidate);
        if candidates.len() >= limit {
            break;
        }
    }
    candidates
}

fn extract_references(root: &Value) -> Vec<RawCandidate> {
    let mut candidates = Vec::new();
    let Some(list) = root.get("candidates").and_then(Value::as_array) else {
        return candidates;
    };

    for candidate in list {
        let Some(chunks) = candidate
            .get("groundingMetadata")
            .and_then(|metadata| metadata.get("groundingChunks"))
            .and_then(Value::as_array)
        else {
            continue;
        };

        for chunk in chunks {
            let Some(web) = chunk.get("web").or_else(|| chunk.get("retrievedReference")) else {
                continue;
            };
            let Some(url) = web
                .get("uri")
                .or_else(|| web.get("url"))
                .and_then(Value::as_str)
            else {
                continue;
            };
            let title = web.get("title").and_then(Value::as_str).unwrap_or_default();
            let snippet = web
                .get("snippet")
                .or_else(|| web.get("text"))
                .and_then(Value::as_str);

            if let Some(parsed) = parse_result(url, title, snippet) {
                candidates.push(parsed);
            }
        }
    }
    candidates
}

fn extract_answer_lines(root: &Value) -> Vec<RawCandidate> {
    let mut candidates = Vec::new();
    let Some(list) = root.get("candidates").and_then(Value::as_array) else {
        return candidates;
    };

    let texts = list
        .iter()
        .filter_map(|candidate| candidate.get("content")?.get("parts")?.as_array())
        .flatten()
        .filter_map(|part| part.get("text").and_then(Value::as_str));

    for text in texts {
        for line in text.lines() {
            let mut fields = line.split('|').map(str::trim);
            let link = fields.next().unwrap_or_default();
            let title = fields.next().unwrap_or_default();
            let description = fields.next();
            if let Some(parsed) = parse_result(link, title, description) {
                candidates.push(parsed);
            }
        }
    }
    candidates
}

/// Turns one search hit into a candidate, or `None` if it is not a channel.
fn parse_result(link: &str, title: &str, body: Option<&str>) -> Option<RawCandidate> {
    let username = username_from_link(link)?;

    let mut title = clean_title(title);
    if title.is_empty() || title.eq_ignore_ascii_case("t.me") {
        title = format!("@{username}");
    }

    let description = body
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.chars().take(MAX_DESCRIPTION_CHARS).collect::<String>());

    Some(RawCandidate {
        username: Some(username),
        url: Some(link.trim().to_string()),
        title: Some(title),
        description,
        subscribers_count: None,
        category: None,
    })
}

fn clean_title(title: &str) -> String {
    let without_prefix = TITLE_PREFIX.replace(title.trim(), "");
    TITLE_SUFFIX
        .replace(without_prefix.trim(), "")
        .trim()
        .to_string()
}

fn describe_http_error(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());
    format!("HTTP {}: {}", status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_title_strips_telegram_decorations() {
        assert_eq!(
            clean_title("Telegram: Contact @python_jobs - Python Jobs"),
            "Python Jobs"
        );
        assert_eq!(clean_title("Remote Work — Telegram"), "Remote Work");
        assert_eq!(clean_title("Фриланс заказы"), "Фриланс заказы");
    }

    #[test]
    fn test_parse_result_falls_back_to_username_title() {
        let parsed = parse_result("https://t.me/s/design_orders", "Telegram", None).unwrap();
        assert_eq!(parsed.username.as_deref(), Some("design_orders"));
        assert_eq!(parsed.title.as_deref(), Some("Telegram"));

        let parsed = parse_result("https://t.me/design_orders", "", None).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("@design_orders"));
    }

    #[test]
    fn test_parse_result_caps_description() {
        let long = "а".repeat(800);
        let parsed = parse_result("https://t.me/long_channel", "Long", Some(&long)).unwrap();
        assert_eq!(parsed.description.unwrap().chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_parse_result_rejects_service_pages() {
        assert!(parse_result("https://t.me/joinchat/xyz", "Join", None).is_none());
        assert!(parse_result("https://example.com", "Example", None).is_none());
    }

    #[test]
    fn test_extract_candidates_merges_sources_without_duplicates() {
        let payload = json!({
            "candidates": [{
                "content": {"parts": [{"text":
                    "https://t.me/python_jobs | Python Jobs | Вакансии для разработчиков\n\
                     https://t.me/freelance_ru | Фриланс | Заказы каждый день\n\
                     not a link at all"
                }]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://t.me/s/python_jobs", "title": "Telegram: View @python_jobs - Python Jobs"}},
                    {"web": {"uri": "https://t.me/addstickers/x", "title": "Stickers"}}
                ]}
            }]
        });

        let candidates = extract_candidates(&payload, 10);
        let usernames: Vec<_> = candidates
            .iter()
            .map(|c| c.username.clone().unwrap())
            .collect();
        assert_eq!(usernames, vec!["python_jobs", "freelance_ru"]);
        assert_eq!(candidates[0].title.as_deref(), Some("Python Jobs"));
        assert_eq!(
            candidates[1].description.as_deref(),
            Some("Заказы каждый день")
        );
    }

    #[test]
    fn test_extract_candidates_respects_limit() {
        let payload = json!({
            "candidates": [{
                "content": {"parts": [{"text":
                    "https://t.me/first_channel | A\nhttps://t.me/second_channel | B"
                }]}
            }]
        });
        assert_eq!(extract_candidates(&payload, 1).len(), 1);
    }

    #[test]
    fn test_from_config_without_key() {
        let config = SearchConfig::default();
        assert!(GroundedChannelSearch::from_config(&config).unwrap().is_none());
    }
}
