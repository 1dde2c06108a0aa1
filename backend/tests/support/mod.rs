#![allow(dead_code)]

use chrono::NaiveDate;
use dashboard_backend::models::{TableSource, VideoRow, WorkingTable};
use dashboard_backend::services::youtube_client::{
    RemoteError, SearchItem, SearchItemId, SearchOrder, SearchSnippet, VideoDetails, VideoSnippet,
    VideoSource, VideoStatistics,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory stand-in for the YouTube API.
#[derive(Default)]
pub struct FakeSource {
    searches: HashMap<String, Vec<SearchItem>>,
    details: HashMap<String, VideoDetails>,
    fail_search_on: Option<String>,
    pub lookups: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hit for `query` whose lookup reports `channel` as owner.
    pub fn video(
        mut self,
        query: &str,
        video_id: &str,
        channel: &str,
        published_at: &str,
        views: u64,
        tags: &[&str],
    ) -> Self {
        self.searches
            .entry(query.to_string())
            .or_default()
            .push(SearchItem {
                id: SearchItemId {
                    video_id: video_id.to_string(),
                },
                snippet: SearchSnippet {
                    title: format!("Video {video_id}"),
                    channel_title: Some(channel.to_string()),
                },
            });
        self.details.insert(
            video_id.to_string(),
            VideoDetails {
                snippet: Some(VideoSnippet {
                    channel_id: Some(format!("UC-{channel}")),
                    channel_title: Some(channel.to_string()),
                    category_id: Some("22".to_string()),
                    published_at: Some(published_at.to_string()),
                    tags: (!tags.is_empty()).then(|| tags.iter().map(|t| t.to_string()).collect()),
                }),
                statistics: Some(VideoStatistics {
                    view_count: Some(views.to_string()),
                    like_count: Some((views / 10).to_string()),
                    dislike_count: Some((views / 100).to_string()),
                    comment_count: Some((views / 50).to_string()),
                }),
            },
        );
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.fail_search_on = Some(query.to_string());
        self
    }
}

#[rocket::async_trait]
impl VideoSource for FakeSource {
    async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
        _order: SearchOrder,
    ) -> Result<Vec<SearchItem>, RemoteError> {
        if self.fail_search_on.as_deref() == Some(query) {
            return Err(RemoteError::Status {
                status: 403,
                body: "quotaExceeded".to_string(),
            });
        }
        let mut hits = self.searches.get(query).cloned().unwrap_or_default();
        hits.truncate(max_results as usize);
        Ok(hits)
    }

    async fn get_video_details(
        &self,
        video_id: &str,
    ) -> Result<Option<VideoDetails>, RemoteError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.details.get(video_id).cloned())
    }
}

pub fn video_row(channel: &str, ordinal: usize, views: i64, tags: &[&str]) -> VideoRow {
    VideoRow {
        fetch_index: ordinal,
        channel_ordinal: ordinal,
        channel_id: Some(format!("UC-{channel}")),
        channel_title: channel.to_string(),
        category_id: Some("22".to_string()),
        title: format!("{channel} #{ordinal}"),
        video_id: format!("{}-{ordinal}", channel.replace(' ', "")),
        published_at: "2021-03-01T12:00:00Z".to_string(),
        view_count: views,
        like_count: views / 10,
        dislike_count: views / 100,
        comment_count: views / 50,
        tags: (!tags.is_empty()).then(|| tags.iter().map(|t| t.to_string()).collect()),
        channel_video_id: format!("{channel} {ordinal}"),
        date_published: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
        days_published: 20,
        average_view_count: (views / 20) as f64,
        positive_rating: (views > 0).then_some(10.0),
        negative_rating: (views > 0).then_some(1.0),
        engagement_rating: (views > 0).then_some(2.0),
    }
}

/// Two channels with tags, one without.
pub fn sample_table() -> WorkingTable {
    WorkingTable::new(
        TableSource::Fallback,
        vec![
            video_row("Meet Kevin", 0, 40_000, &["stocks", "money"]),
            video_row("Meet Kevin", 1, 20_000, &["money"]),
            video_row("Andrei Jikh", 0, 10_000, &["crypto"]),
            video_row("Joma Tech", 0, 0, &[]),
        ],
    )
}
