// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn scheduling_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/slots", post(handlers::list_slots))
        .route("/slots/day", post(handlers::list_day_slots))
        .route("/range", get(handlers::get_date_range))
        .route("/status/counts", post(handlers::count_statuses))
        .route("/status/transition", post(handlers::transition_status))
        .with_state(state)
}
