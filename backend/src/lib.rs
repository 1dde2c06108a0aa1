#[macro_use]
extern crate rocket;

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use crate::models::WorkingTable;
use rocket::{Build, Rocket};
use std::sync::Arc;

/// Shared by every route. The table is never mutated after startup.
pub struct AppState {
    pub table: Arc<WorkingTable>,
}

impl AppState {
    pub fn new(table: WorkingTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }
}

pub fn build_rocket(state: AppState) -> anyhow::Result<Rocket<Build>> {
    let cors = config::create_cors()?;

    Ok(rocket::build()
        .manage(state)
        .mount("/", routes![api::health])
        .mount(
            "/dashboard",
            routes![
                api::average_views,
                api::quality_rating,
                api::engagement_rating,
                api::treemap,
                api::videos,
                api::wordcloud,
            ],
        )
        .attach(cors))
}
