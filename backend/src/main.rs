use dashboard_backend::config::{init_logger, load_environment, APP_TITLE, CREDENTIALS_PATH};
use dashboard_backend::services::acquisition::build_working_table;
use dashboard_backend::services::youtube_client::YouTubeClient;
use dashboard_backend::{build_rocket, AppState};
use log::info;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    load_environment();
    init_logger();

    let table = build_working_table(YouTubeClient::from_credentials_file(
        CREDENTIALS_PATH.as_str(),
    ))
    .await?;
    info!(
        "{APP_TITLE}: serving {} videos ({:?} data)",
        table.len(),
        table.source
    );

    build_rocket(AppState::new(table))?
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {e}"))?;
    Ok(())
}
