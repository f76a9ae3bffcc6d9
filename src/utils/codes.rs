//! Database-backed uniqueness checks for generated student and teacher codes.

use rand::SeedableRng;
use rand::rngs::StdRng;
use schoolhub_core::{AppError, CodeKind, RetriesExhausted, resolve_unique_code};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::{track_code_collision, track_code_exhausted, track_code_generated};

fn exists_query(kind: CodeKind) -> &'static str {
    match kind {
        CodeKind::Student => "SELECT EXISTS(SELECT 1 FROM students WHERE student_code = $1)",
        CodeKind::Teacher => "SELECT EXISTS(SELECT 1 FROM teachers WHERE staff_id = $1)",
    }
}

/// Draws a code of `kind` that no stored record uses yet.
///
/// Nothing is reserved; the insert that follows can still hit the unique
/// index if another request claimed the same code in between.
#[instrument(skip(db))]
pub async fn next_unique_code(
    db: &PgPool,
    kind: CodeKind,
    max_retries: u32,
) -> Result<String, AppError> {
    let mut rng = StdRng::from_entropy();
    let query = exists_query(kind);

    let result = resolve_unique_code(kind, &mut rng, max_retries, move |candidate| async move {
        let taken = sqlx::query_scalar::<_, bool>(query)
            .bind(&candidate)
            .fetch_one(db)
            .await?;

        if taken {
            track_code_collision(kind);
        }

        Ok::<_, AppError>(taken)
    })
    .await;

    match &result {
        Ok(_) => track_code_generated(kind),
        Err(err) if err.error.downcast_ref::<RetriesExhausted>().is_some() => {
            track_code_exhausted(kind)
        }
        Err(_) => {}
    }

    result
}
