use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits", post(handlers::form_add_habit))
        .route("/habits/:id/toggle", post(handlers::form_toggle_today))
        .route("/habits/:id/delete", post(handlers::form_delete_habit))
        .route("/api/habits", get(handlers::list_habits).post(handlers::add_habit))
        .route("/api/habits/:id", delete(handlers::delete_habit))
        .route("/api/habits/:id/toggle", post(handlers::toggle_completion))
        .route("/api/badges", get(handlers::get_badges))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/calendar", get(handlers::get_calendar))
        .with_state(state)
}
