//! The on-disk dataset that stands in for live data.
//!
//! One CSV row per video with the raw fields and the derived columns. The
//! `tags` column holds a list literal (`['a', 'b']`); every other column is a
//! plain scalar. Absent values are written as `0`, ratings without a value
//! as an empty cell.

use crate::models::{TableSource, VideoRow, WorkingTable};
use crate::utils::{format_tag_literal, parse_tag_literal, TagLiteralError};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Writer};
use log::info;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

const SENTINEL: &str = "0";

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("failed to open dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: malformed tags literal: {source}")]
    Tags {
        row: usize,
        #[source]
        source: TagLiteralError,
    },
    #[error("row {row}: malformed date \"{value}\"")]
    Date { row: usize, value: String },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetRow {
    #[serde(rename = "index", default)]
    fetch_index: usize,
    #[serde(rename = "level_0", default)]
    channel_ordinal: usize,
    channel_id: String,
    channel_title: String,
    category_id: String,
    title: String,
    video_id: String,
    published_at: String,
    view_count: i64,
    like_count: i64,
    dislike_count: i64,
    comment_count: i64,
    tags: String,
    channel_video_id: String,
    date_published: String,
    days_published: i64,
    average_view_count: f64,
    positive_rating: Option<f64>,
    negative_rating: Option<f64>,
    engagement_rating: Option<f64>,
}

fn from_sentinel(value: String) -> Option<String> {
    (value != SENTINEL).then_some(value)
}

fn to_sentinel(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| SENTINEL.to_string())
}

impl DatasetRow {
    fn into_video_row(self, row: usize) -> Result<VideoRow, FallbackError> {
        let tags = if self.tags.trim() == SENTINEL {
            None
        } else {
            Some(
                parse_tag_literal(&self.tags)
                    .map_err(|source| FallbackError::Tags { row, source })?,
            )
        };
        // The date column may carry a time part ("2021-01-02 00:00:00").
        let date_published = self
            .date_published
            .get(0..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(|| FallbackError::Date {
                row,
                value: self.date_published.clone(),
            })?;

        Ok(VideoRow {
            fetch_index: self.fetch_index,
            channel_ordinal: self.channel_ordinal,
            channel_id: from_sentinel(self.channel_id),
            channel_title: self.channel_title,
            category_id: from_sentinel(self.category_id),
            title: self.title,
            video_id: self.video_id,
            published_at: self.published_at,
            view_count: self.view_count,
            like_count: self.like_count,
            dislike_count: self.dislike_count,
            comment_count: self.comment_count,
            tags,
            channel_video_id: self.channel_video_id,
            date_published,
            days_published: self.days_published,
            average_view_count: self.average_view_count,
            positive_rating: self.positive_rating,
            negative_rating: self.negative_rating,
            engagement_rating: self.engagement_rating,
        })
    }

    fn from_video_row(row: &VideoRow) -> Self {
        Self {
            fetch_index: row.fetch_index,
            channel_ordinal: row.channel_ordinal,
            channel_id: to_sentinel(&row.channel_id),
            channel_title: row.channel_title.clone(),
            category_id: to_sentinel(&row.category_id),
            title: row.title.clone(),
            video_id: row.video_id.clone(),
            published_at: row.published_at.clone(),
            view_count: row.view_count,
            like_count: row.like_count,
            dislike_count: row.dislike_count,
            comment_count: row.comment_count,
            tags: row
                .tags
                .as_deref()
                .map(format_tag_literal)
                .unwrap_or_else(|| SENTINEL.to_string()),
            channel_video_id: row.channel_video_id.clone(),
            date_published: row.date_published.format("%Y-%m-%d").to_string(),
            days_published: row.days_published,
            average_view_count: row.average_view_count,
            positive_rating: row.positive_rating,
            negative_rating: row.negative_rating,
            engagement_rating: row.engagement_rating,
        }
    }
}

pub fn read_dataset<R: Read>(reader: R) -> Result<WorkingTable, FallbackError> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut rows = Vec::new();

    for (i, result) in csv_reader.deserialize::<DatasetRow>().enumerate() {
        rows.push(result?.into_video_row(i + 1)?);
    }

    Ok(WorkingTable::new(TableSource::Fallback, rows))
}

/// Load the fallback dataset from `path`. A missing or malformed file is an
/// error the caller cannot recover from.
pub fn load_fallback_table(path: &Path) -> Result<WorkingTable, FallbackError> {
    let file = std::fs::File::open(path)?;
    let table = read_dataset(file)?;
    info!(
        "Loaded {} rows from fallback dataset {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

pub fn write_dataset_to<W: Write>(table: &WorkingTable, writer: W) -> Result<(), FallbackError> {
    let mut csv_writer = Writer::from_writer(writer);
    for row in &table.rows {
        csv_writer.serialize(DatasetRow::from_video_row(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_dataset(table: &WorkingTable, path: &Path) -> Result<(), FallbackError> {
    let file = std::fs::File::create(path)?;
    write_dataset_to(table, file)
}
