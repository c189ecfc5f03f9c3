use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Result, TubesenseError};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// The Data API never returns more than this per page or per id lookup
pub const PAGE_LIMIT: usize = 50;

/// Video search and metadata lookup used by discovery
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Ids of the most viewed English videos for `query`, best first
    async fn search_video_ids(&self, query: &str, max_results: u32) -> Result<Vec<String>>;

    /// `(video id, ISO-8601 duration)` for each id the provider still knows
    async fn video_durations(&self, video_ids: &[String]) -> Result<Vec<(String, String)>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

/// YouTube Data API v3 client
pub struct YouTubeDataApi {
    http: reqwest::Client,
    api_key: String,
}

impl YouTubeDataApi {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TubesenseError::SearchFailed {
                query: context.to_string(),
                reason: format!("{}: {}", status, body.trim()),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl VideoSearch for YouTubeDataApi {
    async fn search_video_ids(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
        let wanted = max_results as usize;
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        while ids.len() < wanted {
            let page_size = (wanted - ids.len()).min(PAGE_LIMIT);
            let mut params = vec![
                ("q", query.to_string()),
                ("part", "snippet".to_string()),
                ("maxResults", page_size.to_string()),
                ("order", "viewCount".to_string()),
                ("type", "video".to_string()),
                ("relevanceLanguage", "en".to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let page: SearchResponse = self.get_json(SEARCH_URL, &params, query).await?;
            let page_len = page.items.len();
            ids.extend(page.items.into_iter().filter_map(|item| item.id.video_id));

            tracing::debug!(query, page_len, total = ids.len(), "search page received");

            match page.next_page_token {
                Some(token) if page_len > 0 => page_token = Some(token),
                _ => break,
            }
        }

        ids.truncate(wanted);
        Ok(ids)
    }

    async fn video_durations(&self, video_ids: &[String]) -> Result<Vec<(String, String)>> {
        let mut durations = Vec::with_capacity(video_ids.len());

        for chunk in video_ids.chunks(PAGE_LIMIT) {
            let params = [
                ("part", "contentDetails".to_string()),
                ("id", chunk.join(",")),
            ];
            let response: VideosResponse = self.get_json(VIDEOS_URL, &params, "videos.list").await?;
            durations.extend(
                response
                    .items
                    .into_iter()
                    .map(|item| (item.id, item.content_details.duration)),
            );
        }

        Ok(durations)
    }
}
