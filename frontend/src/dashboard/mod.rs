pub mod api;
pub mod components;
pub mod page;
pub mod treemap_layout;
