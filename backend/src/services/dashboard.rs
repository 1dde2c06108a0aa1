//! One pure function per dashboard visual.
//!
//! Each takes the power toggle and the working table and returns a fresh
//! payload. Powered off, charts and the table keep their shape with no
//! data; word clouds instead draw the placeholder word "na".

use crate::config::CHANNELS;
use crate::models::{
    BarChart, BarSeries, TableColumn, TableStyle, Treemap, TreemapNode, VideoRow, VideoTable,
    VideoTableRow, WordCloudImage, WorkingTable,
};
use crate::services::wordcloud::{render_data_url, WordCloudError};
use std::collections::BTreeMap;

const BAR_COLOR: &str = "rgb(48, 88, 128)";
const POSITIVE_COLOR: &str = "rgb(0, 153, 153)";
const NEGATIVE_COLOR: &str = "rgb(96, 96, 96)";

/// Qualitative "Antique" palette; channels take colors in order of first
/// appearance.
const ANTIQUE: [&str; 11] = [
    "rgb(133, 92, 117)",
    "rgb(217, 175, 107)",
    "rgb(175, 100, 88)",
    "rgb(115, 111, 76)",
    "rgb(82, 106, 131)",
    "rgb(98, 83, 119)",
    "rgb(104, 133, 92)",
    "rgb(156, 156, 94)",
    "rgb(160, 97, 119)",
    "rgb(140, 120, 93)",
    "rgb(124, 124, 124)",
];

pub const WORDCLOUD_PLACEHOLDER: &str = "na";

fn visible_rows(on: bool, table: &WorkingTable) -> &[VideoRow] {
    if on {
        &table.rows
    } else {
        &[]
    }
}

/// Mean of the values each extractor yields, per channel title, channels in
/// sorted order. Missing values are skipped; a channel with none gets `None`.
fn channel_means(
    rows: &[VideoRow],
    extractors: &[fn(&VideoRow) -> Option<f64>],
) -> (Vec<String>, Vec<Vec<Option<f64>>>) {
    let mut groups: BTreeMap<&str, Vec<(f64, usize)>> = BTreeMap::new();
    for row in rows {
        let sums = groups
            .entry(row.channel_title.as_str())
            .or_insert_with(|| vec![(0.0, 0); extractors.len()]);
        for (slot, extract) in sums.iter_mut().zip(extractors) {
            if let Some(value) = extract(row) {
                slot.0 += value;
                slot.1 += 1;
            }
        }
    }

    let categories = groups.keys().map(|k| k.to_string()).collect();
    let columns = (0..extractors.len())
        .map(|i| {
            groups
                .values()
                .map(|sums| {
                    let (sum, count) = sums[i];
                    (count > 0).then(|| sum / count as f64)
                })
                .collect()
        })
        .collect();
    (categories, columns)
}

fn grouped_bar_chart(
    title: &str,
    y_axis_title: &str,
    categories: Vec<String>,
    series: Vec<BarSeries>,
) -> BarChart {
    BarChart {
        title: title.to_string(),
        y_axis_title: y_axis_title.to_string(),
        categories,
        series,
        bar_mode: "group".to_string(),
        bar_gap: 0.15,
        bar_group_gap: 0.1,
    }
}

fn series(name: &str, color: &str, values: Vec<Option<f64>>) -> BarSeries {
    BarSeries {
        name: name.to_string(),
        color: color.to_string(),
        values,
    }
}

pub fn average_views_by_channel(on: bool, table: &WorkingTable) -> BarChart {
    let (categories, mut columns) =
        channel_means(visible_rows(on, table), &[|row: &VideoRow| Some(row.average_view_count)]);
    grouped_bar_chart(
        "Average Daily Views Count By Channel",
        "Views",
        categories,
        vec![series("Channels", BAR_COLOR, columns.remove(0))],
    )
}

pub fn quality_rating(on: bool, table: &WorkingTable) -> BarChart {
    let (categories, mut columns) = channel_means(
        visible_rows(on, table),
        &[|row: &VideoRow| row.positive_rating, |row: &VideoRow| row.negative_rating],
    );
    let negative = columns.remove(1);
    let positive = columns.remove(0);
    grouped_bar_chart(
        "Content Quality Rating",
        "Ratings (%)",
        categories,
        vec![
            series("Positive Rating", POSITIVE_COLOR, positive),
            series("Negative Rating", NEGATIVE_COLOR, negative),
        ],
    )
}

pub fn engagement_rating(on: bool, table: &WorkingTable) -> BarChart {
    let (categories, mut columns) =
        channel_means(visible_rows(on, table), &[|row: &VideoRow| row.engagement_rating]);
    grouped_bar_chart(
        "Audience Engagement Rating",
        "Engagement (%)",
        categories,
        vec![series("Channels", BAR_COLOR, columns.remove(0))],
    )
}

/// Channel → video treemap sized by view count.
pub fn video_treemap(on: bool, table: &WorkingTable) -> Treemap {
    let rows = visible_rows(on, table);

    let mut channel_order: Vec<&str> = Vec::new();
    let mut leaves: Vec<TreemapNode> = Vec::with_capacity(rows.len());
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();

    for row in rows {
        let channel = row.channel_title.as_str();
        if !channel_order.contains(&channel) {
            channel_order.push(channel);
        }
        let color_index = channel_order.iter().position(|c| *c == channel).unwrap_or(0);
        *totals.entry(channel).or_insert(0) += row.view_count;

        leaves.push(TreemapNode {
            id: format!("{channel}/{}", row.channel_video_id),
            label: row.channel_video_id.clone(),
            parent: channel.to_string(),
            value: row.view_count,
            color: ANTIQUE[color_index % ANTIQUE.len()].to_string(),
        });
    }

    let mut nodes: Vec<TreemapNode> = channel_order
        .iter()
        .enumerate()
        .map(|(i, channel)| TreemapNode {
            id: channel.to_string(),
            label: channel.to_string(),
            parent: String::new(),
            value: totals.get(channel).copied().unwrap_or(0),
            color: ANTIQUE[i % ANTIQUE.len()].to_string(),
        })
        .collect();
    nodes.extend(leaves);

    Treemap { nodes }
}

pub fn video_table(on: bool, table: &WorkingTable) -> VideoTable {
    let columns = ["channelTitle", "channelVideoId", "title", "viewCount"]
        .iter()
        .map(|name| TableColumn {
            name: name.to_string(),
            id: name.to_string(),
        })
        .collect();

    let rows = visible_rows(on, table)
        .iter()
        .map(|row| VideoTableRow {
            channel_title: row.channel_title.clone(),
            channel_video_id: row.channel_video_id.clone(),
            title: row.title.clone(),
            view_count: row.view_count,
        })
        .collect();

    VideoTable {
        title: "YouTube Videos".to_string(),
        columns,
        rows,
        style: TableStyle {
            fixed_header: true,
            height_px: 400,
            header_background: "#009999".to_string(),
            header_color: "white".to_string(),
            white_space: "normal".to_string(),
            line_height_px: 20,
            text_align: "center".to_string(),
            cell_width_px: 20,
        },
    }
}

/// Every tag of `channel`'s videos with a count per distinct tag. Videos
/// without tags contribute nothing.
pub fn tag_bag(table: &WorkingTable, channel: &str) -> BTreeMap<String, usize> {
    let mut bag = BTreeMap::new();
    for tags in table.channel_rows(channel).filter_map(|row| row.tags.as_ref()) {
        for tag in tags {
            *bag.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    bag
}

/// The channel shown in word-cloud slot `slot` (1-based).
pub fn wordcloud_channel(slot: usize) -> Option<&'static str> {
    slot.checked_sub(1).and_then(|i| CHANNELS.get(i).copied())
}

pub fn tag_wordcloud(
    on: bool,
    table: &WorkingTable,
    channel: &str,
) -> Result<WordCloudImage, WordCloudError> {
    let bag = if on {
        tag_bag(table, channel)
    } else {
        BTreeMap::from([(WORDCLOUD_PLACEHOLDER.to_string(), 1)])
    };

    Ok(WordCloudImage {
        src: render_data_url(&bag)?,
        channel: channel.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TableSource;
    use chrono::NaiveDate;

    fn row(channel: &str, ordinal: usize, views: i64, avg: f64, tags: Option<&[&str]>) -> VideoRow {
        VideoRow {
            fetch_index: ordinal,
            channel_ordinal: ordinal,
            channel_id: Some(format!("UC-{channel}")),
            channel_title: channel.to_string(),
            category_id: Some("22".to_string()),
            title: format!("{channel} video {ordinal}"),
            video_id: format!("{channel}-{ordinal}"),
            published_at: "2021-01-01T00:00:00Z".to_string(),
            view_count: views,
            like_count: views / 10,
            dislike_count: 0,
            comment_count: views / 100,
            tags: tags.map(|t| t.iter().map(|s| s.to_string()).collect()),
            channel_video_id: format!("{channel} {ordinal}"),
            date_published: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            days_published: 10,
            average_view_count: avg,
            positive_rating: (views > 0).then_some(10.0),
            negative_rating: (views > 0).then_some(0.0),
            engagement_rating: (views > 0).then_some(1.0),
        }
    }

    fn table() -> WorkingTable {
        WorkingTable::new(
            TableSource::Live,
            vec![
                row("Meet Kevin", 0, 1000, 100.0, Some(&["a", "b"][..])),
                row("Meet Kevin", 1, 3000, 300.0, Some(&["b"][..])),
                row("Joma Tech", 0, 0, 0.0, None),
            ],
        )
    }

    #[test]
    fn averages_group_by_sorted_channel() {
        let chart = average_views_by_channel(true, &table());
        assert_eq!(chart.categories, vec!["Joma Tech", "Meet Kevin"]);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].values, vec![Some(0.0), Some(200.0)]);
        assert_eq!(chart.bar_mode, "group");
    }

    #[test]
    fn rating_mean_skips_missing_values() {
        let chart = quality_rating(true, &table());
        assert_eq!(chart.series[0].name, "Positive Rating");
        assert_eq!(chart.series[0].values, vec![None, Some(10.0)]);
        assert_eq!(chart.series[1].values, vec![None, Some(0.0)]);
    }

    #[test]
    fn power_off_keeps_chart_shape_without_data() {
        let table = table();
        for chart in [
            average_views_by_channel(false, &table),
            quality_rating(false, &table),
            engagement_rating(false, &table),
        ] {
            assert!(!chart.title.is_empty());
            assert!(chart.categories.is_empty());
            assert!(!chart.series.is_empty());
            assert!(chart.series.iter().all(|s| s.values.is_empty()));
        }
        assert!(video_treemap(false, &table).nodes.is_empty());
        let off_table = video_table(false, &table);
        assert_eq!(off_table.columns.len(), 4);
        assert!(off_table.rows.is_empty());
    }

    #[test]
    fn treemap_parents_sum_their_leaves() {
        let treemap = video_treemap(true, &table());
        let kevin = treemap.nodes.iter().find(|n| n.id == "Meet Kevin").unwrap();
        assert_eq!(kevin.value, 4000);
        assert_eq!(kevin.parent, "");
        let leaf = treemap
            .nodes
            .iter()
            .find(|n| n.id == "Meet Kevin/Meet Kevin 1")
            .unwrap();
        assert_eq!(leaf.parent, "Meet Kevin");
        assert_eq!(leaf.value, 3000);
        assert_eq!(leaf.color, kevin.color);
        assert_eq!(treemap.nodes.len(), 2 + 3);
    }

    #[test]
    fn table_lists_one_row_per_video() {
        let t = video_table(true, &table());
        assert_eq!(t.rows.len(), 3);
        assert_eq!(t.rows[1].channel_video_id, "Meet Kevin 1");
        assert_eq!(t.columns[3].id, "viewCount");
        assert!(t.style.fixed_header);
    }

    #[test]
    fn tag_bag_counts_across_videos() {
        let bag = tag_bag(&table(), "Meet Kevin");
        assert_eq!(bag, BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]));
        assert!(tag_bag(&table(), "Joma Tech").is_empty());
    }

    #[test]
    fn tag_bag_ignores_row_order() {
        let mut reversed = table();
        reversed.rows.reverse();
        assert_eq!(tag_bag(&reversed, "Meet Kevin"), tag_bag(&table(), "Meet Kevin"));
    }

    #[test]
    fn slots_map_to_channels() {
        assert_eq!(wordcloud_channel(1), Some("Meet Kevin"));
        assert_eq!(wordcloud_channel(5), Some("Graham Stephan"));
        assert_eq!(wordcloud_channel(0), None);
        assert_eq!(wordcloud_channel(6), None);
    }

    #[test]
    fn reactors_are_repeatable() {
        let table = table();
        assert_eq!(
            serde_json::to_string(&quality_rating(true, &table)).unwrap(),
            serde_json::to_string(&quality_rating(true, &table)).unwrap()
        );
        assert_eq!(video_treemap(true, &table), video_treemap(true, &table));
    }

    #[test]
    fn wordcloud_is_repeatable() {
        let table = table();
        let first = tag_wordcloud(true, &table, "Meet Kevin").unwrap();
        let second = tag_wordcloud(true, &table, "Meet Kevin").unwrap();
        assert_eq!(first.src, second.src);
    }

    #[test]
    fn wordcloud_off_draws_placeholder_instead_of_tags() {
        let table = table();
        let on = tag_wordcloud(true, &table, "Meet Kevin").unwrap();
        let off = tag_wordcloud(false, &table, "Meet Kevin").unwrap();
        assert_eq!(off.channel, "Meet Kevin");
        assert_ne!(on.src, off.src);

        let placeholder = BTreeMap::from([(WORDCLOUD_PLACEHOLDER.to_string(), 1)]);
        assert_eq!(off.src, render_data_url(&placeholder).unwrap());
    }

    #[test]
    fn wordcloud_on_without_tags_fails() {
        assert!(matches!(
            tag_wordcloud(true, &table(), "Joma Tech"),
            Err(WordCloudError::EmptyBag)
        ));
        assert!(tag_wordcloud(false, &table(), "Joma Tech").is_ok());
    }
}
