use anyhow::{Context, Result};
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{info, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Channels shown on the dashboard, in display order. Word-cloud slot `n`
/// renders the n-th entry.
pub const CHANNELS: [&str; 5] = [
    "Meet Kevin",
    "Andrei Jikh",
    "Joma Tech",
    "Ali Abdaal",
    "Graham Stephan",
];

pub const APP_TITLE: &str = "TOP YOUTUBE CHANNEL";

lazy_static! {
    pub static ref CREDENTIALS_PATH: String =
        env::var("CREDENTIALS_PATH").unwrap_or_else(|_| "config.json".to_string());
    pub static ref DATASET_PATH: String =
        env::var("DATASET_PATH").unwrap_or_else(|_| "dataset.csv".to_string());
    pub static ref FETCH_CONCURRENCY: usize = env::var("FETCH_CONCURRENCY")
        .unwrap_or_else(|_| "8".to_string())
        .parse::<usize>()
        .unwrap_or(8)
        .max(1);
    pub static ref REQUEST_TIMEOUT: Duration = Duration::from_secs(
        env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .unwrap_or(10)
    );
    pub static ref SEARCH_MAX_RESULTS: u32 = env::var("SEARCH_MAX_RESULTS")
        .unwrap_or_else(|_| "1000".to_string())
        .parse::<u32>()
        .unwrap_or(1000);
    pub static ref DATASET_SNAPSHOT: bool = env::var("DATASET_SNAPSHOT")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);
    pub static ref FRONTEND_ORIGIN: String =
        env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:8080".to_string());
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting dashboard backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

#[derive(Debug, Deserialize)]
struct Credentials {
    dict: serde_json::Map<String, serde_json::Value>,
}

/// Reads the API key from a `{"dict": {<label>: <key>}}` file. The first
/// entry in file order wins.
pub fn load_api_key(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials file {}", path.display()))?;
    parse_api_key(&raw).with_context(|| format!("Invalid credentials file {}", path.display()))
}

fn parse_api_key(raw: &str) -> Result<String> {
    let credentials: Credentials = serde_json::from_str(raw)?;
    let (label, value) = credentials
        .dict
        .iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No API key entries under \"dict\""))?;

    value
        .as_str()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("API key \"{label}\" is not a string"))
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[FRONTEND_ORIGIN.as_str()]))
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
