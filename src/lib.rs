pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod routing;
pub mod state;
pub mod storage;
pub mod tracker;
pub mod ui;
pub mod validation;

pub use app::router;
pub use state::AppState;
pub use storage::{load_habits, resolve_data_path};
pub use tracker::Tracker;
