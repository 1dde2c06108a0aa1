use crate::models::{BarChart, ErrorResponse, Treemap, VideoTable, WordCloudImage};
use crate::services::dashboard;
use crate::AppState;
use log::error;
use rocket::serde::json::Json;
use rocket::{get, State};

/// The `?on=` power toggle. Missing means on; anything but a boolean is
/// rejected rather than guessed.
fn power(on: Option<&str>) -> Result<bool, ErrorResponse> {
    match on.map(str::trim) {
        None => Ok(true),
        Some(raw) if raw.eq_ignore_ascii_case("true") || raw == "1" => Ok(true),
        Some(raw) if raw.eq_ignore_ascii_case("false") || raw == "0" => Ok(false),
        Some(raw) => Err(ErrorResponse::bad_request(format!(
            "Invalid power toggle \"{raw}\"; expected true or false"
        ))),
    }
}

#[get("/average-views?<on>")]
pub fn average_views(
    on: Option<&str>,
    state: &State<AppState>,
) -> Result<Json<BarChart>, ErrorResponse> {
    Ok(Json(dashboard::average_views_by_channel(
        power(on)?,
        &state.table,
    )))
}

#[get("/quality-rating?<on>")]
pub fn quality_rating(
    on: Option<&str>,
    state: &State<AppState>,
) -> Result<Json<BarChart>, ErrorResponse> {
    Ok(Json(dashboard::quality_rating(power(on)?, &state.table)))
}

#[get("/engagement-rating?<on>")]
pub fn engagement_rating(
    on: Option<&str>,
    state: &State<AppState>,
) -> Result<Json<BarChart>, ErrorResponse> {
    Ok(Json(dashboard::engagement_rating(power(on)?, &state.table)))
}

#[get("/treemap?<on>")]
pub fn treemap(on: Option<&str>, state: &State<AppState>) -> Result<Json<Treemap>, ErrorResponse> {
    Ok(Json(dashboard::video_treemap(power(on)?, &state.table)))
}

#[get("/videos?<on>")]
pub fn videos(on: Option<&str>, state: &State<AppState>) -> Result<Json<VideoTable>, ErrorResponse> {
    Ok(Json(dashboard::video_table(power(on)?, &state.table)))
}

#[get("/wordcloud/<slot>?<on>")]
pub async fn wordcloud(
    slot: usize,
    on: Option<&str>,
    state: &State<AppState>,
) -> Result<Json<WordCloudImage>, ErrorResponse> {
    let on = power(on)?;
    let channel = dashboard::wordcloud_channel(slot)
        .ok_or_else(|| ErrorResponse::not_found(format!("No word cloud in slot {slot}")))?;

    let table = state.table.clone();
    // Rasterizing is CPU-bound; keep it off the async workers.
    let rendered =
        tokio::task::spawn_blocking(move || dashboard::tag_wordcloud(on, &table, channel)).await;

    match rendered {
        Ok(Ok(image)) => Ok(Json(image)),
        Ok(Err(e)) => {
            error!("Word cloud for \"{channel}\" failed: {e}");
            Err(ErrorResponse::internal(e.to_string()))
        }
        Err(e) => {
            error!("Word cloud task for \"{channel}\" panicked: {e}");
            Err(ErrorResponse::internal("word cloud rendering aborted"))
        }
    }
}
