mod common;

use axum::http::StatusCode;
use common::{
    create_test_department, create_test_user, get_request, json_request, send, setup_test_app,
};
use learnhub_auth::UserRole;
use serde_json::json;
use sqlx::PgPool;

async fn create_course(pool: &PgPool) -> i64 {
    let teacher = create_test_user(pool, UserRole::Teacher).await;
    let dept = create_test_department(pool).await;
    sqlx::query_scalar(
        r#"INSERT INTO courses (teacher_id, department_id, title, code)
           VALUES ($1, $2, 'Economics', 'ECO-1')
           RETURNING id"#,
    )
    .bind(teacher.id)
    .bind(dept)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verified_profile_discount(pool: PgPool) {
    let course_id = create_course(&pool).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/payments",
            Some(&student.token),
            json!({ "course_id": course_id, "amount": 100.0, "transaction_id": "tx-full" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount"], 100.0);
    assert_eq!(body["discount_applied"], 0.0);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["user_id"], student.id);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/profiles",
            Some(&student.token),
            json!({ "college": "State University", "student_id": "SU-001" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/profiles/{}/verify", student.id),
            Some(&student.token),
            json!({ "verified": true }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/profiles/{}/verify", student.id),
            Some(&admin.token),
            json!({ "verified": true }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], true);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/payments",
            Some(&student.token),
            json!({ "course_id": course_id, "amount": 100.0, "payment_method": "card" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount"], 80.0);
    assert_eq!(body["discount_applied"], 20.0);

    let (status, body) = send(
        &app,
        get_request(&format!("/api/payments/user/{}", student.id), Some(&student.token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_rejections(pool: PgPool) {
    let course_id = create_course(&pool).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/payments",
            Some(&student.token),
            json!({ "course_id": course_id, "amount": 0.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/payments",
            Some(&student.token),
            json!({ "course_id": course_id + 1000, "amount": 10.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/payments",
                Some(&student.token),
                json!({ "course_id": course_id, "amount": 10.0, "transaction_id": "tx-dup" }),
            ),
        )
        .await;
        assert_eq!(status, expected);
    }

    let (status, _) = send(
        &app,
        json_request("POST", "/api/payments", None, json!({ "course_id": course_id, "amount": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
