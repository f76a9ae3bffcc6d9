use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_governor::GovernorLayer;

use crate::state::AppState;

use super::controller::{get_current_user, login_user, register_user, update_profile};

/// Register and login are rate limited per client IP when a limit is configured.
pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let mut credentials = Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user));

    if let Some(config) = state.rate_limit_config.auth_governor_config() {
        credentials = credentials.layer(GovernorLayer::new(config));
    }

    Router::new()
        .merge(credentials)
        .route("/me", get(get_current_user))
        .route("/profile", patch(update_profile))
}
