use chrono::NaiveDate;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use std::io::Cursor;

/// One video as returned by the API, before any filtering or derivation.
/// `None` marks a field the API omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub category_id: Option<String>,
    pub title: String,
    pub video_id: String,
    pub published_at: Option<String>,
    pub view_count: Option<i64>,
    pub like_count: Option<i64>,
    pub dislike_count: Option<i64>,
    pub comment_count: Option<i64>,
    pub tags: Option<Vec<String>>,
}

/// A row of the working table: a kept video plus its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRow {
    pub fetch_index: usize,
    pub channel_ordinal: usize,
    pub channel_id: Option<String>,
    pub channel_title: String,
    pub category_id: Option<String>,
    pub title: String,
    pub video_id: String,
    pub published_at: String,
    pub view_count: i64,
    pub like_count: i64,
    pub dislike_count: i64,
    pub comment_count: i64,
    pub tags: Option<Vec<String>>,
    pub channel_video_id: String,
    pub date_published: NaiveDate,
    pub days_published: i64,
    pub average_view_count: f64,
    pub positive_rating: Option<f64>,
    pub negative_rating: Option<f64>,
    pub engagement_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableSource {
    Live,
    Fallback,
}

/// The dataset behind every dashboard visual. Built once at startup and
/// only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingTable {
    pub source: TableSource,
    pub rows: Vec<VideoRow>,
}

impl WorkingTable {
    pub fn new(source: TableSource, rows: Vec<VideoRow>) -> Self {
        Self { source, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn channel_rows<'a>(&'a self, channel: &'a str) -> impl Iterator<Item = &'a VideoRow> {
        self.rows.iter().filter(move |row| row.channel_title == channel)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSeries {
    pub name: String,
    pub color: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    pub title: String,
    pub y_axis_title: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    pub bar_mode: String,
    pub bar_gap: f64,
    pub bar_group_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreemapNode {
    pub id: String,
    pub label: String,
    pub parent: String,
    pub value: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treemap {
    pub nodes: Vec<TreemapNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoTableRow {
    pub channel_title: String,
    pub channel_video_id: String,
    pub title: String,
    pub view_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStyle {
    pub fixed_header: bool,
    pub height_px: u32,
    pub header_background: String,
    pub header_color: String,
    pub white_space: String,
    pub line_height_px: u32,
    pub text_align: String,
    pub cell_width_px: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTable {
    pub title: String,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<VideoTableRow>,
    pub style: TableStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloudImage {
    pub src: String,
    pub channel: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub rows: usize,
    pub source: TableSource,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip)]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: "reactor_failed".to_string(),
            message: message.into(),
            status: Some(500),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.into(),
            status: Some(400),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: "not_found".to_string(),
            message: message.into(),
            status: Some(404),
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self
            .status
            .and_then(Status::from_code)
            .unwrap_or(Status::BadRequest);
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
