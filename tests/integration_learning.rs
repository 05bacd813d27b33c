//! Enrollment through certificate download, driven over HTTP.

mod common;

use axum::http::{StatusCode, header};
use common::{
    TestUser, assign_teacher, create_test_department, create_test_user, get_request,
    json_request, send, setup_test_app,
};
use http_body_util::BodyExt;
use learnhub_auth::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

struct Course {
    teacher: TestUser,
    course_id: i64,
    assignment_id: i64,
    question_id: i64,
    correct_option: i64,
    wrong_option: i64,
}

async fn build_course(app: &axum::Router, pool: &PgPool) -> Course {
    let teacher = create_test_user(pool, UserRole::Teacher).await;
    let dept = create_test_department(pool).await;
    assign_teacher(pool, teacher.id, dept).await;

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/courses",
            Some(&teacher.token),
            json!({ "title": "Databases", "code": "DB-200", "credits": 4, "department_id": dept }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let course_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/assignments",
            Some(&teacher.token),
            json!({ "title": "Normal forms", "course_id": course_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let assignment_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        json_request(
            "POST",
            &format!("/api/assignments/{assignment_id}/questions"),
            Some(&teacher.token),
            json!({ "text": "Which form removes transitive dependencies?" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let question_id = body["id"].as_i64().unwrap();

    let mut options = Vec::new();
    for (text, is_correct) in [("3NF", true), ("1NF", false)] {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                &format!("/api/questions/{question_id}/options"),
                Some(&teacher.token),
                json!({ "text": text, "is_correct": is_correct }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        options.push(body["id"].as_i64().unwrap());
    }

    Course {
        teacher,
        course_id,
        assignment_id,
        question_id,
        correct_option: options[0],
        wrong_option: options[1],
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_full_learning_flow(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let course = build_course(&app, &pool).await;
    let student = create_test_user(&pool, UserRole::Student).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/enrollments",
            Some(&student.token),
            json!({ "course_id": course.course_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "active");
    assert_eq!(body["progress"], 0.0);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/enrollments",
            Some(&student.token),
            json!({ "course_id": course.course_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "already enrolled in this course");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/certificates/issue",
            Some(&student.token),
            json!({ "user_id": student.id, "course_id": course.course_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "course not completed, certificate cannot be issued");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/submissions",
            Some(&student.token),
            json!({
                "assignment_id": course.assignment_id,
                "answers": { course.question_id.to_string(): course.wrong_option }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["score"], 0);
    assert_eq!(body["total_questions"], 1);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/submissions",
            Some(&student.token),
            json!({
                "assignment_id": course.assignment_id,
                "answers": { course.question_id.to_string(): course.correct_option }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["score"], 1);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/progress/update",
            Some(&student.token),
            json!({ "user_id": student.id, "course_id": course.course_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"], 100.0);
    assert_eq!(body["total"], 1);
    assert_eq!(body["completed"], 1);

    let (status, body) = send(
        &app,
        get_request(
            &format!("/api/progress/{}/{}", student.id, course.course_id),
            Some(&student.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"], 100.0);

    let (status, certificate) = send(
        &app,
        json_request(
            "POST",
            "/api/certificates/issue",
            Some(&student.token),
            json!({ "user_id": student.id, "course_id": course.course_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let code = certificate["code"].as_str().unwrap().to_string();
    assert!(code.starts_with("CERT-"));

    let (status, body) = send(
        &app,
        get_request(&format!("/api/users/{}/enrollments", student.id), Some(&student.token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["status"], "completed");
    assert_eq!(body[0]["certificate_id"], code);
    assert_eq!(body[0]["course"]["code"], "DB-200");

    let certificate_id = certificate["id"].as_i64().unwrap();
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/certificates/download/{certificate_id}"),
            Some(&student.token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=certificate_{code}.pdf").as_str()
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));

    let (status, body) = send(
        &app,
        get_request(
            &format!("/api/submissions/assignment/{}", course.assignment_id),
            Some(&course.teacher.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_students_cannot_read_each_other(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let course = build_course(&app, &pool).await;
    let alice = create_test_user(&pool, UserRole::Student).await;
    let bob = create_test_user(&pool, UserRole::Student).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/enrollments",
            Some(&alice.token),
            json!({ "course_id": course.course_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    for uri in [
        format!("/api/users/{}/enrollments", alice.id),
        format!("/api/submissions/user/{}", alice.id),
        format!("/api/certificates/user/{}", alice.id),
        format!("/api/payments/user/{}", alice.id),
        format!("/api/progress/{}/{}", alice.id, course.course_id),
    ] {
        let (status, body) = send(&app, get_request(&uri, Some(&bob.token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(
            body["error"],
            "Forbidden: students can only access their own records"
        );
    }

    let (status, body) = send(
        &app,
        get_request(
            &format!("/api/courses/{}/enrollments", course.course_id),
            Some(&course.teacher.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["user_id"], alice.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_enroll(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let course = build_course(&app, &pool).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/enrollments",
            Some(&course.teacher.token),
            json!({ "course_id": course.course_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "only students can enroll in courses");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_correct_option_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let course = build_course(&app, &pool).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/questions/{}/options", course.question_id),
            Some(&course.teacher.token),
            json!({ "text": "BCNF", "is_correct": true }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "question already has a correct option");

    let (status, body) = send(
        &app,
        get_request(
            &format!("/api/assignments/{}", course.assignment_id),
            Some(&course.teacher.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"][0]["options"].as_array().unwrap().len(), 2);
}
