use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/restore", get(handlers::restore))
        .route("/habits", post(handlers::add_habit))
        .route("/habits/:id", get(handlers::select_habit))
        .route("/habits/:id/delete", post(handlers::delete_habit))
        .route("/days", post(handlers::add_day))
        .route("/days/:index/delete", post(handlers::delete_day))
        .route("/api/state", get(handlers::get_state))
        .route("/api/habits", post(handlers::api_add_habit))
        .route("/api/habits/:id", delete(handlers::api_delete_habit))
        .route("/api/habits/:id/select", post(handlers::api_select_habit))
        .route("/api/days", post(handlers::api_add_day))
        .route("/api/days/:index", delete(handlers::api_delete_day))
        .with_state(state)
}
