//! Radar service: channel discovery and connection management.
//!
//! Discovery runs the candidate pipeline: enrich the query, over-fetch from
//! the search backend, resolve identities, drop duplicates and irrelevant
//! channels, then merge the survivors into the channel catalog.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use pitchdesk_core::channel::{
    Channel, ChannelPurpose, ChannelRepository, LinkedChannel, NewChannel, UserChannel,
};
use pitchdesk_core::config::SearchConfig;
use pitchdesk_core::error::Result;
use pitchdesk_core::profile::ProfileRepository;
use pitchdesk_core::search::{RawCandidate, SearchBackend, username_from_link};

/// Terms appended to every query to steer results toward job postings.
pub const SEARCH_CONTEXT: &str = "вакансии фриланс работа заказы";

static RELEVANCE_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)вакансии|работа|заказ|фриланс|freelance|job|hire|ищем|ищу|нужен|требуется|удалённ|удаленн|remote|recruiting|подработк|тендер|аутсорс|outsourc",
    )
    .expect("relevance pattern is valid")
});

pub struct RadarService {
    backend: Arc<dyn SearchBackend>,
    channels: Arc<dyn ChannelRepository>,
    profiles: Arc<dyn ProfileRepository>,
    result_limit: usize,
    over_fetch_factor: usize,
}

impl RadarService {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        channels: Arc<dyn ChannelRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        let defaults = SearchConfig::default();
        Self {
            backend,
            channels,
            profiles,
            result_limit: defaults.result_limit,
            over_fetch_factor: defaults.over_fetch_factor,
        }
    }

    /// Applies `result_limit` and `over_fetch_factor` from `[search]`.
    pub fn with_search_config(mut self, config: &SearchConfig) -> Self {
        self.result_limit = config.result_limit.max(1);
        self.over_fetch_factor = config.over_fetch_factor.max(1);
        self
    }

    /// Runs the candidate pipeline with the configured result limit.
    pub async fn search_channels(&self, query: &str) -> Result<Vec<Channel>> {
        self.search_channels_limited(query, self.result_limit).await
    }

    /// Runs the candidate pipeline, returning at most `limit` catalog entries.
    ///
    /// Backend failures surface as an empty list. Data store errors propagate.
    pub async fn search_channels_limited(&self, query: &str, limit: usize) -> Result<Vec<Channel>> {
        let enriched = enrich_query(query);
        let raw = self
            .backend
            .search(&enriched, limit.saturating_mul(self.over_fetch_factor))
            .await;
        let fetched = raw.len();

        let mut channels = Vec::new();
        for candidate in select_candidates(raw).into_iter().take(limit) {
            channels.push(self.channels.get_or_create_by_username(candidate).await?);
        }

        tracing::info!(query, fetched, relevant = channels.len(), "radar search finished");
        Ok(channels)
    }

    /// Query built from the active search profile, if it has any keywords.
    pub async fn profile_query(&self, user_id: &str) -> Result<Option<String>> {
        let profile = self.profiles.active_search_profile(user_id).await?;
        Ok(profile.and_then(|p| p.keyword_query()))
    }

    /// Active links of `user_id` joined with their channels, oldest first.
    pub async fn linked_channels(&self, user_id: &str) -> Result<Vec<LinkedChannel>> {
        self.channels.list_links(user_id).await
    }

    /// One of the user's connections by link id.
    pub async fn linked_channel(&self, user_id: &str, link_id: &str) -> Result<Option<LinkedChannel>> {
        let links = self.channels.list_links(user_id).await?;
        Ok(links.into_iter().find(|linked| linked.link.id == link_id))
    }

    /// Links a channel; an existing link for the pair is returned unchanged.
    pub async fn link_channel(
        &self,
        user_id: &str,
        channel_id: &str,
        purpose: ChannelPurpose,
    ) -> Result<UserChannel> {
        let link = self
            .channels
            .get_or_create_link(user_id, channel_id, purpose)
            .await?;
        tracing::info!(user_id, channel_id, purpose = %link.purpose, "channel linked");
        Ok(link)
    }

    pub async fn change_purpose(&self, link_id: &str, purpose: ChannelPurpose) -> Result<UserChannel> {
        self.channels.update_link_purpose(link_id, purpose).await
    }

    pub async fn unlink_channel(&self, user_id: &str, channel_id: &str) -> Result<()> {
        self.channels.unlink(user_id, channel_id).await?;
        tracing::info!(user_id, channel_id, "channel unlinked");
        Ok(())
    }
}

/// Appends the job-domain context terms to a user query.
pub fn enrich_query(query: &str) -> String {
    format!("{} {}", query.trim(), SEARCH_CONTEXT)
}

/// Normalizes, de-duplicates and filters raw backend output, keeping order.
pub fn select_candidates(raw: Vec<RawCandidate>) -> Vec<NewChannel> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(normalize)
        .filter(|candidate| seen.insert(candidate.username.to_ascii_lowercase()))
        .filter(is_relevant)
        .collect()
}

/// Resolves the channel identity of a raw candidate.
///
/// An explicit username wins over one parsed from the link. Candidates with
/// neither are dropped.
pub fn normalize(raw: RawCandidate) -> Option<NewChannel> {
    let username = raw
        .username
        .as_deref()
        .map(|name| name.trim().trim_start_matches('@'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| raw.url.as_deref().and_then(username_from_link))?;

    Some(NewChannel {
        username,
        title: raw.title,
        description: raw.description,
        subscribers_count: raw.subscribers_count,
        category: raw.category,
    })
}

/// Whether title, description, username or category mention a relevance marker.
pub fn is_relevant(candidate: &NewChannel) -> bool {
    let text = [
        candidate.title.as_deref(),
        candidate.description.as_deref(),
        Some(candidate.username.as_str()),
        candidate.category.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    RELEVANCE_MARKERS.is_match(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrich_query() {
        assert_eq!(
            enrich_query("  python разработка "),
            "python разработка вакансии фриланс работа заказы"
        );
    }

    #[test]
    fn test_normalize_prefers_username_then_link() {
        let explicit = RawCandidate::with_username("@design_jobs");
        assert_eq!(normalize(explicit).unwrap().username, "design_jobs");

        let linked = RawCandidate {
            url: Some("https://t.me/s/remote_work".into()),
            ..RawCandidate::default()
        };
        assert_eq!(normalize(linked).unwrap().username, "remote_work");

        let anonymous = RawCandidate::default().title("Вакансии без ссылки");
        assert!(normalize(anonymous).is_none());
    }

    #[test]
    fn test_relevance_is_case_insensitive_and_checks_all_fields() {
        let by_title = NewChannel {
            username: "abc_channel".into(),
            title: Some("ФРИЛАНС биржа".into()),
            ..NewChannel::default()
        };
        assert!(is_relevant(&by_title));

        let by_username = NewChannel {
            username: "python_jobs".into(),
            ..NewChannel::default()
        };
        assert!(is_relevant(&by_username));

        let by_category = NewChannel {
            username: "somechannel".into(),
            category: Some("Remote".into()),
            ..NewChannel::default()
        };
        assert!(is_relevant(&by_category));

        let unrelated = NewChannel {
            username: "cat_memes".into(),
            title: Some("Котики".into()),
            description: Some("Смешные картинки каждый день".into()),
            ..NewChannel::default()
        };
        assert!(!is_relevant(&unrelated));
    }

    #[test]
    fn test_select_candidates_first_occurrence_wins() {
        let raw = vec![
            RawCandidate::with_username("python_jobs").title("Python вакансии"),
            RawCandidate::with_username("Python_Jobs").title("Duplicate"),
            RawCandidate::with_username("rust_hire").description("We hire rustaceans"),
        ];
        let selected = select_candidates(raw);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].title.as_deref(), Some("Python вакансии"));
        assert_eq!(selected[1].username, "rust_hire");
    }
}
