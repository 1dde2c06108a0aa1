pub mod acquisition;
pub mod dashboard;
pub mod fallback;
pub mod wordcloud;
pub mod youtube_client;
