mod common;

use axum::http::StatusCode;
use common::{create_test_user, request, send, test_app, test_state, token_for};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

async fn insert_teacher(pool: &PgPool) -> Uuid {
    let (user_id, _) = create_test_user(pool, "teacher").await;
    sqlx::query_scalar("INSERT INTO teachers (user_id, staff_id) VALUES ($1, $2) RETURNING id")
        .bind(user_id)
        .bind(format!("T-{}", &Uuid::new_v4().simple().to_string()[..5]))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_class_with_teacher(pool: PgPool) {
    let teacher_id = insert_teacher(&pool).await;
    let state = test_state(pool);
    let token = token_for(&state, Uuid::new_v4(), "parent");
    let app = test_app(state);

    let (status, class) = send(
        &app,
        request(
            "POST",
            "/api/classes",
            Some(&token),
            Some(json!({
                "name": "Grade 4",
                "code": "G4-01",
                "grade": "Grade 4",
                "subject": "General",
                "teacher_id": teacher_id,
                "schedule": [{ "day": "Monday", "start_time": "08:00", "end_time": "09:00" }]
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(class["capacity"], 30);
    assert_eq!(class["status"], "active");
    assert_eq!(class["student_count"], 0);
    assert_eq!(class["teacher"]["id"], json!(teacher_id));
    assert_eq!(class["teacher"]["name"], "Test User");
    assert_eq!(class["schedule"][0]["day"], "Monday");

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/classes",
            Some(&token),
            Some(json!({ "name": "Grade 4B", "code": "G4-01", "grade": "Grade 4", "subject": "General" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Class code already exists");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_unknown_teacher_is_not_found(pool: PgPool) {
    let state = test_state(pool);
    let token = token_for(&state, Uuid::new_v4(), "admin");
    let app = test_app(state);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/classes",
            Some(&token),
            Some(json!({
                "name": "Grade 5",
                "code": "G5-01",
                "grade": "Grade 5",
                "subject": "General",
                "teacher_id": Uuid::new_v4()
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Teacher not found");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_status_filter_and_unassign(pool: PgPool) {
    let teacher_id = insert_teacher(&pool).await;
    let state = test_state(pool);
    let token = token_for(&state, Uuid::new_v4(), "teacher");
    let app = test_app(state);

    let mut ids = Vec::new();
    for code in ["KG1-01", "KG2-01"] {
        let (_, class) = send(
            &app,
            request(
                "POST",
                "/api/classes",
                Some(&token),
                Some(json!({
                    "name": code,
                    "code": code,
                    "grade": "KG",
                    "subject": "General",
                    "teacher_id": teacher_id
                })),
            ),
        )
        .await;
        ids.push(class["id"].as_str().unwrap().to_string());
    }

    let (status, archived) = send(
        &app,
        request(
            "PUT",
            &format!("/api/classes/{}", ids[1]),
            Some(&token),
            Some(json!({ "status": "archived", "teacher_id": null })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["status"], "archived");
    assert!(archived["teacher"].is_null());

    let (_, active) = send(&app, request("GET", "/api/classes", Some(&token), None)).await;
    assert_eq!(active.as_array().map(Vec::len), Some(1));
    assert_eq!(active[0]["id"], ids[0].as_str());

    let (_, all) = send(&app, request("GET", "/api/classes?status=all", Some(&token), None)).await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let (_, by_teacher) = send(
        &app,
        request("GET", &format!("/api/classes?teacher_id={teacher_id}&status=all"), Some(&token), None),
    )
    .await;
    assert_eq!(by_teacher.as_array().map(Vec::len), Some(1));

    let (status, renamed) = send(
        &app,
        request(
            "PUT",
            &format!("/api/classes/{}", ids[0]),
            Some(&token),
            Some(json!({ "location": "Block A" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["location"], "Block A");
    assert_eq!(renamed["teacher"]["id"], json!(teacher_id));

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/classes/{}", ids[0]),
            Some(&token),
            Some(json!({ "code": "KG2-01" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, request("DELETE", &format!("/api/classes/{}", ids[0]), Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, request("GET", &format!("/api/classes/{}", ids[0]), Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
