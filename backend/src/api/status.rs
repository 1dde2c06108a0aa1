use crate::models::HealthResponse;
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/health")]
pub fn health(state: &State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        rows: state.table.len(),
        source: state.table.source,
    })
}
