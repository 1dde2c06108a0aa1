use serde::{Deserialize, Serialize};

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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
