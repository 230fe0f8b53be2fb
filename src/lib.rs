pub mod app;
pub mod chart;
pub mod dataset;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod scenes;
pub mod state;
pub mod ui;

pub use app::router;
pub use dataset::{load, resolve_source};
pub use state::AppState;
