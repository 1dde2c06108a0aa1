use crate::env_variable_utils::BACKEND_URL;
use crate::models::{BarChart, ErrorResponse, Treemap, VideoTable, WordCloudImage};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::rc::Rc;
use yew::UseStateHandle;

/// Number of word-cloud panels, one per channel.
pub const WORDCLOUD_SLOTS: usize = 5;

/// A panel's payload, or the message to show in its place.
pub type Panel<T> = Option<Result<T, String>>;

/// Tags a batch of requests so a slow response from an earlier toggle state
/// cannot overwrite a panel that a newer batch already owns.
#[derive(Clone)]
pub struct RequestGeneration {
    latest: Rc<RefCell<u64>>,
    issued: u64,
}

impl RequestGeneration {
    /// Starts a new batch; every generation handed out before is now stale.
    pub fn next(counter: &Rc<RefCell<u64>>) -> Self {
        let mut latest = counter.borrow_mut();
        *latest += 1;
        Self {
            latest: counter.clone(),
            issued: *latest,
        }
    }

    pub fn is_current(&self) -> bool {
        *self.latest.borrow() == self.issued
    }

    fn deliver<T>(&self, target: &UseStateHandle<Panel<T>>, result: Result<T, String>) {
        if self.is_current() {
            target.set(Some(result));
        }
    }
}

async fn fetch_json<T: DeserializeOwned>(path: &str, on: bool) -> Result<T, String> {
    let url = format!("{}/dashboard/{path}?on={on}", &*BACKEND_URL);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;

    if response.ok() {
        return response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to parse response: {e}"));
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(error_response) => Err(error_response.message),
        Err(_) => Err(format!("Request failed ({status}): {text}")),
    }
}

fn report<T>(result: &Result<T, String>, what: &str) {
    if let Err(e) = result {
        web_sys::console::error_1(&format!("{what}: {e}").into());
    }
}

pub async fn load_bar_chart(
    path: &'static str,
    on: bool,
    generation: RequestGeneration,
    target: UseStateHandle<Panel<BarChart>>,
) {
    let result = fetch_json::<BarChart>(path, on).await;
    report(&result, path);
    generation.deliver(&target, result);
}

pub async fn load_treemap(
    on: bool,
    generation: RequestGeneration,
    target: UseStateHandle<Panel<Treemap>>,
) {
    let result = fetch_json::<Treemap>("treemap", on).await;
    report(&result, "treemap");
    generation.deliver(&target, result);
}

pub async fn load_video_table(
    on: bool,
    generation: RequestGeneration,
    target: UseStateHandle<Panel<VideoTable>>,
) {
    let result = fetch_json::<VideoTable>("videos", on).await;
    report(&result, "videos");
    generation.deliver(&target, result);
}

pub async fn load_wordcloud(
    slot: usize,
    on: bool,
    generation: RequestGeneration,
    target: UseStateHandle<Panel<WordCloudImage>>,
) {
    let path = format!("wordcloud/{slot}");
    let result = fetch_json::<WordCloudImage>(&path, on).await;
    report(&result, &path);
    generation.deliver(&target, result);
}
