use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use schoolhub_models::teachers::TeacherView;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub database: String,
}
