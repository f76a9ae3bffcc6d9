mod common;

use axum::http::StatusCode;
use common::{create_test_user, request, send, test_app, test_state, token_for};
use sqlx::PgPool;
use uuid::Uuid;

async fn insert_teacher(pool: &PgPool, staff_id: &str, experience: i32) -> Uuid {
    let (user_id, _) = create_test_user(pool, "teacher").await;
    sqlx::query_scalar(
        "INSERT INTO teachers (user_id, staff_id, experience) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(user_id)
    .bind(staff_id)
    .bind(experience)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_health(pool: PgPool) {
    let state = test_state(pool);
    let token = token_for(&state, Uuid::new_v4(), "admin");
    let app = test_app(state);

    let (status, body) = send(&app, request("GET", "/api/admin/health", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_top_teacher_prefers_featured(pool: PgPool) {
    let state = test_state(pool.clone());
    let token = token_for(&state, Uuid::new_v4(), "admin");
    let app = test_app(state);

    let (status, _) = send(&app, request("GET", "/api/admin/top-teacher", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let junior = insert_teacher(&pool, "T-JU001", 2).await;
    let senior = insert_teacher(&pool, "T-SE001", 20).await;

    let (_, top) = send(&app, request("GET", "/api/admin/top-teacher", Some(&token), None)).await;
    assert_eq!(top["id"], senior.to_string());

    let (status, featured) = send(
        &app,
        request("POST", &format!("/api/admin/teachers/{junior}/feature"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(featured["featured"], true);

    let (_, top) = send(&app, request("GET", "/api/admin/top-teacher", Some(&token), None)).await;
    assert_eq!(top["id"], junior.to_string());

    send(
        &app,
        request("POST", &format!("/api/admin/teachers/{senior}/feature"), Some(&token), None),
    )
    .await;
    let featured_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teachers WHERE featured")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(featured_count, 1);

    let (status, _) = send(
        &app,
        request("POST", &format!("/api/admin/teachers/{}/feature", Uuid::new_v4()), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
