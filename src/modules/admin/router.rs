use crate::modules::admin::controller::{feature_teacher, health, top_teacher};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/teachers/{id}/feature", post(feature_teacher))
        .route("/top-teacher", get(top_teacher))
}
