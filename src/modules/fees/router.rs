use crate::modules::fees::controller::{
    create_fee, delete_fee, get_fee, get_fees, get_student_fee_summary, update_fee,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_fees_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_fee).get(get_fees))
        .route(
            "/student/{student_id}/summary",
            get(get_student_fee_summary),
        )
        .route("/{id}", get(get_fee).put(update_fee).delete(delete_fee))
}
