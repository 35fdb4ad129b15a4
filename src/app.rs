use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/complete", post(handlers::complete_form))
        .route("/reset", post(handlers::reset_form))
        .route("/api/session", get(handlers::get_session))
        .route("/api/stats", put(handlers::put_stats))
        .route("/api/mode", put(handlers::put_mode))
        .route("/api/checkin", post(handlers::check_in))
        .route("/api/reflection", post(handlers::reflection))
        .route("/api/complete", post(handlers::complete))
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
