pub mod dashboard;
mod status;

pub use dashboard::*;
pub use status::*;
