mod support;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dashboard_backend::models::{
    BarChart, ErrorResponse, HealthResponse, TableSource, Treemap, VideoTable, WordCloudImage,
};
use dashboard_backend::{build_rocket, AppState};
use resvg::tiny_skia::Pixmap;
use rocket::http::Status;
use rocket::local::blocking::Client;
use support::sample_table;

fn decode_image(image: &WordCloudImage) -> Pixmap {
    let payload = image.src.strip_prefix("data:image/png;base64,").unwrap();
    Pixmap::decode_png(&STANDARD.decode(payload).unwrap()).unwrap()
}

fn client() -> Client {
    let rocket = build_rocket(AppState::new(sample_table())).unwrap();
    Client::tracked(rocket).unwrap()
}

#[test]
fn health_reports_table_size_and_source() {
    let client = client();
    let response = client.get("/health").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let health: HealthResponse = response.into_json().unwrap();
    assert_eq!(health.rows, 4);
    assert_eq!(health.source, TableSource::Fallback);
}

#[test]
fn average_views_default_to_powered_on() {
    let client = client();
    let chart: BarChart = client
        .get("/dashboard/average-views")
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(chart.title, "Average Daily Views Count By Channel");
    assert_eq!(
        chart.categories,
        vec!["Andrei Jikh", "Joma Tech", "Meet Kevin"]
    );
    assert_eq!(chart.series[0].values, vec![Some(500.0), Some(0.0), Some(1500.0)]);
}

#[test]
fn powered_off_charts_are_empty() {
    let client = client();
    for path in [
        "/dashboard/average-views?on=false",
        "/dashboard/quality-rating?on=false",
        "/dashboard/engagement-rating?on=false",
    ] {
        let chart: BarChart = client.get(path).dispatch().into_json().unwrap();
        assert!(chart.categories.is_empty(), "{path}");
    }
    let treemap: Treemap = client
        .get("/dashboard/treemap?on=false")
        .dispatch()
        .into_json()
        .unwrap();
    assert!(treemap.nodes.is_empty());
    let table: VideoTable = client
        .get("/dashboard/videos?on=false")
        .dispatch()
        .into_json()
        .unwrap();
    assert!(table.rows.is_empty());
    assert_eq!(table.columns.len(), 4);
}

#[test]
fn quality_rating_has_two_series() {
    let client = client();
    let chart: BarChart = client
        .get("/dashboard/quality-rating?on=true")
        .dispatch()
        .into_json()
        .unwrap();
    let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Positive Rating", "Negative Rating"]);
    // Joma Tech has no views, so no rating.
    assert_eq!(chart.series[0].values[1], None);
}

#[test]
fn video_table_lists_every_row() {
    let client = client();
    let table: VideoTable = client.get("/dashboard/videos").dispatch().into_json().unwrap();
    assert_eq!(table.title, "YouTube Videos");
    assert_eq!(table.rows.len(), 4);
    assert_eq!(table.rows[0].channel_video_id, "Meet Kevin 0");
}

#[test]
fn wordcloud_renders_channel_tags() {
    let client = client();
    let image: WordCloudImage = client
        .get("/dashboard/wordcloud/1")
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(image.channel, "Meet Kevin");
    assert!(image.src.starts_with("data:image/png;base64,"));
}

#[test]
fn wordcloud_off_draws_placeholder_for_untagged_channel() {
    let client = client();
    let response = client.get("/dashboard/wordcloud/3?on=false").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let image: WordCloudImage = response.into_json().unwrap();
    assert_eq!(image.channel, "Joma Tech");
}

#[test]
fn wordcloud_without_tags_fails() {
    let client = client();
    let response = client.get("/dashboard/wordcloud/3").dispatch();
    assert_eq!(response.status(), Status::InternalServerError);
    let body: ErrorResponse = response.into_json().unwrap();
    assert_eq!(body.error, "reactor_failed");
}

#[test]
fn unknown_wordcloud_slot_is_not_found() {
    let client = client();
    let response = client.get("/dashboard/wordcloud/9").dispatch();
    assert_eq!(response.status(), Status::NotFound);
}

#[test]
fn wordcloud_draws_words_on_the_canvas() {
    let client = client();
    let image: WordCloudImage = client
        .get("/dashboard/wordcloud/1")
        .dispatch()
        .into_json()
        .unwrap();
    let pixmap = decode_image(&image);
    assert_eq!((pixmap.width(), pixmap.height()), (800, 300));
    assert!(pixmap
        .pixels()
        .iter()
        .any(|p| p.red() != 255 || p.green() != 255 || p.blue() != 255));
}

#[test]
fn wordcloud_toggle_switches_between_tags_and_placeholder() {
    let client = client();
    let fetch = |path: &str| -> WordCloudImage {
        client.get(path).dispatch().into_json().unwrap()
    };
    let on = fetch("/dashboard/wordcloud/1?on=true");
    let off = fetch("/dashboard/wordcloud/1?on=false");
    assert_ne!(on.src, off.src);
    assert_eq!(on.src, fetch("/dashboard/wordcloud/1?on=true").src);
}

#[test]
fn malformed_toggle_is_a_bad_request() {
    let client = client();
    for path in [
        "/dashboard/average-views?on=yes",
        "/dashboard/treemap?on=maybe",
        "/dashboard/wordcloud/1?on=yes",
    ] {
        let response = client.get(path).dispatch();
        assert_eq!(response.status(), Status::BadRequest, "{path}");
        let body: ErrorResponse = response.into_json().unwrap();
        assert_eq!(body.error, "bad_request");
    }
}
