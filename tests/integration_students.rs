mod common;

use axum::http::StatusCode;
use common::{create_test_user, generate_unique_email, request, send, test_app, test_state, token_for};
use schoolhub::schoolhub_core::codes::is_student_code;
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use uuid::Uuid;

fn student_payload(extra: Value) -> Value {
    let mut payload = json!({
        "name": "Chidi Okafor",
        "email": generate_unique_email(),
        "password": "secret123",
        "admission_number": format!("ADM-{}", &Uuid::new_v4().simple().to_string()[..8]),
    });
    if let (Some(base), Some(extra)) = (payload.as_object_mut(), extra.as_object()) {
        base.extend(extra.clone());
    }
    payload
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_student_generates_code(pool: PgPool) {
    let (teacher_id, _) = create_test_user(&pool, "teacher").await;
    let state = test_state(pool);
    let token = token_for(&state, teacher_id, "teacher");
    let app = test_app(state);

    let (status, body) = send(
        &app,
        request("POST", "/api/students", Some(&token), Some(student_payload(json!({})))),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let code = body["student_code"].as_str().unwrap();
    assert!(is_student_code(code), "{code}");
    assert_eq!(body["student"]["student_code"], code);
    assert_eq!(body["student"]["class_name"], "Not Assigned");
    assert_eq!(body["user"]["role"], "student");

    let (status, found) = send(
        &app,
        request(
            "GET",
            &format!("/api/students/by-code/{}", code.to_lowercase()),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], body["student_id"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_supplied_code_conflict_rolls_back_user(pool: PgPool) {
    let (admin_id, _) = create_test_user(&pool, "admin").await;
    let state = test_state(pool.clone());
    let token = token_for(&state, admin_id, "admin");
    let app = test_app(state);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/students",
            Some(&token),
            Some(student_payload(json!({ "student_code": "QZ042" }))),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let payload = student_payload(json!({ "student_code": "QZ042" }));
    let email = payload["email"].as_str().unwrap().to_string();
    let (status, body) = send(&app, request("POST", "/api/students", Some(&token), Some(payload))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Student code already in use");

    let leftover: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!leftover);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_email_and_admission_number(pool: PgPool) {
    let (admin_id, email) = create_test_user(&pool, "admin").await;
    let state = test_state(pool);
    let token = token_for(&state, admin_id, "admin");
    let app = test_app(state);

    let (status, _) = send(
        &app,
        request("POST", "/api/students", Some(&token), Some(student_payload(json!({ "email": email })))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let first = student_payload(json!({ "admission_number": "ADM-DUP" }));
    let (status, _) = send(&app, request("POST", "/api/students", Some(&token), Some(first))).await;
    assert_eq!(status, StatusCode::CREATED);

    let second = student_payload(json!({ "admission_number": "ADM-DUP" }));
    let (status, body) = send(&app, request("POST", "/api/students", Some(&token), Some(second))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Admission number already in use");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_oversized_avatar_creates_nothing(pool: PgPool) {
    let (admin_id, _) = create_test_user(&pool, "admin").await;
    let state = test_state(pool.clone());
    let token = token_for(&state, admin_id, "admin");
    let app = test_app(state);

    // test storage accepts at most 1 KiB
    let big = data_encoding::BASE64.encode(&vec![0u8; 4096]);
    let payload = student_payload(json!({ "avatar": format!("data:image/png;base64,{}", big) }));
    let email = payload["email"].as_str().unwrap().to_string();

    let (status, _) = send(&app, request("POST", "/api/students", Some(&token), Some(payload))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let created: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!created);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_class_assignment_update_and_delete(pool: PgPool) {
    let (admin_id, _) = create_test_user(&pool, "admin").await;
    let class_id: Uuid = sqlx::query_scalar(
        "INSERT INTO classes (name, code, grade, subject) VALUES ('Grade 3', 'G3-01', 'Grade 3', 'General') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let state = test_state(pool);
    let token = token_for(&state, admin_id, "admin");
    let app = test_app(state);

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/api/students",
            Some(&token),
            Some(student_payload(json!({ "class_id": class_id, "dob": "2015-04-01" }))),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["student"]["class_name"], "Grade 3");
    assert_eq!(created["student"]["date_of_birth"], "2015-04-01");

    let id = created["student_id"].as_str().unwrap();
    let (status, updated) = send(
        &app,
        request(
            "PUT",
            &format!("/api/students/{id}"),
            Some(&token),
            Some(json!({ "section": "B", "status": "graduated" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["section"], "B");
    assert_eq!(updated["status"], "graduated");
    assert_eq!(updated["class_name"], "Grade 3");

    let (status, _) = send(&app, request("DELETE", &format!("/api/students/{id}"), Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request("GET", &format!("/api/students/{id}"), Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_student_can_view_but_not_list(pool: PgPool) {
    let (admin_id, _) = create_test_user(&pool, "admin").await;
    let state = test_state(pool);
    let admin = token_for(&state, admin_id, "admin");
    let student = token_for(&state, Uuid::new_v4(), "student");
    let app = test_app(state);

    let (_, created) = send(
        &app,
        request("POST", "/api/students", Some(&admin), Some(student_payload(json!({})))),
    )
    .await;
    let id = created["student_id"].as_str().unwrap();

    let (status, _) = send(&app, request("GET", &format!("/api/students/{id}"), Some(&student), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request("GET", "/api/students", Some(&student), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_code_exhaustion_fails_without_creating_user(pool: PgPool) {
    let mut state = test_state(pool.clone());
    state.provisioning.code_max_retries = 0;
    let token = token_for(&state, Uuid::new_v4(), "admin");
    let app = test_app(state);

    let payload = student_payload(json!({}));
    let email = payload["email"].as_str().unwrap().to_string();

    let (status, body) = send(&app, request("POST", "/api/students", Some(&token), Some(payload))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("student code"));

    let created: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!created);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_student_on_single_connection_pool(
    pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let pool = pool_options
        .max_connections(1)
        .connect_with(connect_options)
        .await
        .unwrap();
    let state = test_state(pool);
    let token = token_for(&state, Uuid::new_v4(), "teacher");
    let app = test_app(state);

    let (status, body) = send(
        &app,
        request("POST", "/api/students", Some(&token), Some(student_payload(json!({})))),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(is_student_code(body["student_code"].as_str().unwrap()));
}
