//! Live acquisition of the working table.
//!
//! Every configured channel is searched, each hit is looked up for its
//! snippet and statistics, the hits that really belong to the channel are
//! kept (newest 30), and metrics are derived over the combined table. Any
//! failure aborts the whole run; the caller then substitutes the fallback
//! dataset.

use crate::config::{CHANNELS, DATASET_PATH, DATASET_SNAPSHOT, FETCH_CONCURRENCY, SEARCH_MAX_RESULTS};
use crate::models::{TableSource, VideoRecord, VideoRow, WorkingTable};
use crate::services::fallback::{load_fallback_table, write_dataset};
use crate::services::youtube_client::{
    RemoteError, SearchItem, SearchOrder, VideoDetails, VideoSource,
};
use crate::utils::{parse_iso8601_date, percentage, round_half_even};
use chrono::{Days, Local, NaiveDate};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{info, warn};
use std::path::Path;
use thiserror::Error;

/// Rows kept per channel.
pub const CHANNEL_ROW_LIMIT: usize = 30;

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("video {video_id}: {field} \"{value}\" is not an integer")]
    MalformedCount {
        video_id: String,
        field: &'static str,
        value: String,
    },
    #[error("video {video_id} has no publish date")]
    MissingPublishDate { video_id: String },
    #[error("video {video_id}: publish date \"{value}\" is not ISO8601")]
    InvalidPublishDate { video_id: String, value: String },
}

#[derive(Debug, Clone)]
pub struct AcquisitionOptions {
    pub max_results: u32,
    pub order: SearchOrder,
    pub concurrency: usize,
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        Self {
            max_results: *SEARCH_MAX_RESULTS,
            order: SearchOrder::Relevance,
            concurrency: *FETCH_CONCURRENCY,
        }
    }
}

/// The day after today; publish ages are measured against it.
pub fn reference_date() -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

fn parse_count(
    video_id: &str,
    field: &'static str,
    raw: Option<String>,
) -> Result<Option<i64>, AcquisitionError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| AcquisitionError::MalformedCount {
                video_id: video_id.to_string(),
                field,
                value,
            })
    })
    .transpose()
}

/// Flatten a search hit and its lookup into one record. Fields the lookup
/// does not carry stay `None`.
pub fn extract_record(
    item: SearchItem,
    details: Option<VideoDetails>,
) -> Result<VideoRecord, AcquisitionError> {
    let details = details.unwrap_or_default();
    let snippet = details.snippet.unwrap_or_default();
    let statistics = details.statistics.unwrap_or_default();
    let video_id = item.id.video_id;

    Ok(VideoRecord {
        channel_id: snippet.channel_id,
        channel_title: snippet.channel_title,
        category_id: snippet.category_id,
        title: item.snippet.title,
        published_at: snippet.published_at,
        view_count: parse_count(&video_id, "viewCount", statistics.view_count)?,
        like_count: parse_count(&video_id, "likeCount", statistics.like_count)?,
        dislike_count: parse_count(&video_id, "dislikeCount", statistics.dislike_count)?,
        comment_count: parse_count(&video_id, "commentCount", statistics.comment_count)?,
        tags: snippet.tags,
        video_id,
    })
}

/// Keep the records whose channel title is exactly `channel`, newest first,
/// at most [`CHANNEL_ROW_LIMIT`]. Each survivor keeps its position in the
/// raw fetch order.
pub fn select_channel_records(
    channel: &str,
    records: Vec<VideoRecord>,
) -> Vec<(usize, VideoRecord)> {
    let mut kept: Vec<(usize, VideoRecord)> = records
        .into_iter()
        .enumerate()
        .filter(|(_, record)| record.channel_title.as_deref() == Some(channel))
        .collect();

    // Stable sort: equal timestamps keep fetch order. Missing dates sink.
    kept.sort_by(|(_, a), (_, b)| b.published_at.cmp(&a.published_at));
    kept.truncate(CHANNEL_ROW_LIMIT);
    kept
}

/// Search one channel and look up every hit, at most `concurrency` lookups
/// in flight. Results keep search order.
pub async fn fetch_channel_records<S: VideoSource + ?Sized>(
    source: &S,
    channel: &str,
    options: &AcquisitionOptions,
) -> Result<Vec<VideoRecord>, AcquisitionError> {
    let hits = source
        .search_videos(channel, options.max_results, options.order)
        .await?;
    info!("Search \"{channel}\" returned {} videos", hits.len());

    stream::iter(hits)
        .map(|item| async move {
            let details = source.get_video_details(&item.id.video_id).await?;
            extract_record(item, details)
        })
        .buffered(options.concurrency.max(1))
        .try_collect()
        .await
}

/// Compute the derived columns for one kept record.
pub fn derive_row(
    fetch_index: usize,
    channel_ordinal: usize,
    record: VideoRecord,
    reference: NaiveDate,
) -> Result<VideoRow, AcquisitionError> {
    let published_at = record
        .published_at
        .ok_or_else(|| AcquisitionError::MissingPublishDate {
            video_id: record.video_id.clone(),
        })?;
    let date_published =
        parse_iso8601_date(&published_at).ok_or_else(|| AcquisitionError::InvalidPublishDate {
            video_id: record.video_id.clone(),
            value: published_at.clone(),
        })?;

    let channel_title = record.channel_title.unwrap_or_default();
    let view_count = record.view_count.unwrap_or(0);
    let like_count = record.like_count.unwrap_or(0);
    let dislike_count = record.dislike_count.unwrap_or(0);
    let comment_count = record.comment_count.unwrap_or(0);

    let days_published = (reference - date_published).num_days().max(1);

    Ok(VideoRow {
        fetch_index,
        channel_ordinal,
        channel_video_id: format!("{channel_title} {channel_ordinal}"),
        channel_id: record.channel_id,
        channel_title,
        category_id: record.category_id,
        title: record.title,
        video_id: record.video_id,
        published_at,
        view_count,
        like_count,
        dislike_count,
        comment_count,
        tags: record.tags,
        date_published,
        days_published,
        average_view_count: round_half_even(view_count as f64 / days_published as f64, 0),
        positive_rating: percentage(like_count, view_count),
        negative_rating: percentage(dislike_count, view_count),
        engagement_rating: percentage(comment_count, view_count),
    })
}

/// Build the live working table for `channels`, in order. The first failure
/// anywhere aborts the run and nothing fetched so far is returned.
pub async fn acquire_working_table<S: VideoSource + ?Sized>(
    source: &S,
    channels: &[&str],
    options: &AcquisitionOptions,
    reference: NaiveDate,
) -> Result<WorkingTable, AcquisitionError> {
    let mut selected: Vec<(usize, usize, VideoRecord)> = Vec::new();

    for channel in channels {
        let records = fetch_channel_records(source, channel, options).await?;
        let kept = select_channel_records(channel, records);
        info!("Channel \"{channel}\": kept {} videos", kept.len());

        selected.extend(
            kept.into_iter()
                .enumerate()
                .map(|(ordinal, (fetch_index, record))| (fetch_index, ordinal, record)),
        );
    }

    let rows = selected
        .into_iter()
        .map(|(fetch_index, ordinal, record)| derive_row(fetch_index, ordinal, record, reference))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WorkingTable::new(TableSource::Live, rows))
}

/// Try a live acquisition; on any failure load the fallback dataset instead.
/// Only a failing fallback is an error.
pub async fn acquire_or_fallback<S: VideoSource + ?Sized>(
    source: Option<&S>,
    channels: &[&str],
    options: &AcquisitionOptions,
    reference: NaiveDate,
    fallback_path: &Path,
) -> anyhow::Result<WorkingTable> {
    let live = match source {
        Some(source) => acquire_working_table(source, channels, options, reference)
            .await
            .map_err(anyhow::Error::from),
        None => Err(anyhow::anyhow!("no video source configured")),
    };

    match live {
        Ok(table) => {
            info!("Live acquisition finished with {} rows", table.len());
            Ok(table)
        }
        Err(e) => {
            warn!(
                "Live acquisition failed ({e:#}); loading fallback dataset {}",
                fallback_path.display()
            );
            Ok(load_fallback_table(fallback_path)?)
        }
    }
}

/// Startup entry point: build the client from the credentials file, acquire
/// the fixed channel set and fall back to the dataset file if needed.
pub async fn build_working_table<S: VideoSource>(
    source: anyhow::Result<S>,
) -> anyhow::Result<WorkingTable> {
    let source = match source {
        Ok(source) => Some(source),
        Err(e) => {
            warn!("YouTube client unavailable: {e:#}");
            None
        }
    };

    let fallback_path = Path::new(DATASET_PATH.as_str());
    let table = acquire_or_fallback(
        source.as_ref(),
        &CHANNELS,
        &AcquisitionOptions::default(),
        reference_date(),
        fallback_path,
    )
    .await?;

    if table.source == TableSource::Live && *DATASET_SNAPSHOT {
        match write_dataset(&table, fallback_path) {
            Ok(()) => info!("Wrote dataset snapshot to {}", fallback_path.display()),
            Err(e) => warn!("Failed to write dataset snapshot: {e:#}"),
        }
    }

    Ok(table)
}
