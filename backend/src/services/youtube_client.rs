use crate::config::{load_api_key, REQUEST_TIMEOUT};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Largest page the search endpoint hands out per request.
const SEARCH_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request to YouTube API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("YouTube API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid YouTube API url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    Date,
    Rating,
    #[default]
    Relevance,
    Title,
    VideoCount,
    ViewCount,
}

impl fmt::Display for SearchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchOrder::Date => "date",
            SearchOrder::Rating => "rating",
            SearchOrder::Relevance => "relevance",
            SearchOrder::Title => "title",
            SearchOrder::VideoCount => "videoCount",
            SearchOrder::ViewCount => "viewCount",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub title: String,
    #[serde(default)]
    pub channel_title: Option<String>,
}

/// One hit of a search, carrying only the stub the search endpoint returns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    items: Vec<SearchItem>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub category_id: Option<String>,
    pub published_at: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Counts arrive as decimal strings.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub dislike_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct VideoDetails {
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoDetails>,
}

/// The two remote calls acquisition needs.
#[rocket::async_trait]
pub trait VideoSource: Send + Sync {
    async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
        order: SearchOrder,
    ) -> Result<Vec<SearchItem>, RemoteError>;

    /// `Ok(None)` when the API knows no video with this id.
    async fn get_video_details(&self, video_id: &str)
        -> Result<Option<VideoDetails>, RemoteError>;
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YouTubeClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: Url::parse(API_BASE_URL)?,
        })
    }

    pub fn from_credentials_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let api_key = load_api_key(path)?;
        Ok(Self::new(api_key, *REQUEST_TIMEOUT)?)
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.join(resource)?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, RemoteError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[rocket::async_trait]
impl VideoSource for YouTubeClient {
    // Documentation: https://developers.google.com/youtube/v3/docs/search/list
    async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
        order: SearchOrder,
    ) -> Result<Vec<SearchItem>, RemoteError> {
        let order = order.to_string();
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        while (items.len() as u32) < max_results {
            let page_size = (max_results - items.len() as u32).min(SEARCH_PAGE_LIMIT);
            let page_size = page_size.to_string();
            let mut params = vec![
                ("q", query),
                ("type", "video"),
                ("part", "id,snippet"),
                ("order", order.as_str()),
                ("maxResults", page_size.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let url = self.endpoint("search", &params)?;
            let page: SearchPage = self.get_json(url).await?;
            debug!("Search \"{query}\" returned {} items", page.items.len());

            let exhausted = page.items.is_empty();
            items.extend(page.items);
            page_token = page.next_page_token;
            if exhausted || page_token.is_none() {
                break;
            }
        }

        items.truncate(max_results as usize);
        Ok(items)
    }

    // Documentation: https://developers.google.com/youtube/v3/docs/videos
    async fn get_video_details(
        &self,
        video_id: &str,
    ) -> Result<Option<VideoDetails>, RemoteError> {
        let url = self.endpoint("videos", &[("id", video_id), ("part", "statistics,snippet")])?;
        let response: VideoListResponse = self.get_json(url).await?;
        Ok(response.items.into_iter().next())
    }
}
