//! Row builders shared by the service tests.

use sqlx::PgPool;

use learnhub_auth::{Claims, UserRole};

use crate::middleware::auth::AuthUser;

pub fn caller(user_id: i64, role: UserRole) -> AuthUser {
    AuthUser(Claims {
        user_id,
        role,
        exp: usize::MAX,
        iat: 0,
    })
}

pub async fn insert_user(db: &PgPool, email: &str, role: UserRole) -> i64 {
    sqlx::query_scalar(
        r#"INSERT INTO users (name, email, password, role, is_verified)
           VALUES ($1, $2, 'not-a-real-hash', $3, true)
           RETURNING id"#,
    )
    .bind(format!("User {email}"))
    .bind(email)
    .bind(role)
    .fetch_one(db)
    .await
    .unwrap()
}

pub async fn insert_department(db: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO departments (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(db)
        .await
        .unwrap()
}

pub async fn assign_department(db: &PgPool, teacher_id: i64, department_id: Option<i64>) {
    sqlx::query(
        r#"INSERT INTO teacher_profiles (user_id, department_id) VALUES ($1, $2)
           ON CONFLICT (user_id) DO UPDATE SET department_id = EXCLUDED.department_id"#,
    )
    .bind(teacher_id)
    .bind(department_id)
    .execute(db)
    .await
    .unwrap();
}

pub async fn insert_course(db: &PgPool, teacher_id: i64, department_id: i64, code: &str) -> i64 {
    sqlx::query_scalar(
        r#"INSERT INTO courses (teacher_id, department_id, title, code)
           VALUES ($1, $2, $3, $3)
           RETURNING id"#,
    )
    .bind(teacher_id)
    .bind(department_id)
    .bind(code)
    .fetch_one(db)
    .await
    .unwrap()
}

pub async fn insert_assignment(db: &PgPool, course_id: i64, teacher_id: i64) -> i64 {
    sqlx::query_scalar(
        r#"INSERT INTO assignments (title, course_id, teacher_id)
           VALUES ('Quiz', $1, $2)
           RETURNING id"#,
    )
    .bind(course_id)
    .bind(teacher_id)
    .fetch_one(db)
    .await
    .unwrap()
}

pub async fn insert_question(db: &PgPool, assignment_id: i64) -> i64 {
    sqlx::query_scalar("INSERT INTO questions (assignment_id, text) VALUES ($1, 'Q?') RETURNING id")
        .bind(assignment_id)
        .fetch_one(db)
        .await
        .unwrap()
}

pub async fn insert_option(db: &PgPool, question_id: i64, is_correct: bool) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO options (question_id, text, is_correct) VALUES ($1, 'A', $2) RETURNING id",
    )
    .bind(question_id)
    .bind(is_correct)
    .fetch_one(db)
    .await
    .unwrap()
}

pub async fn enroll(db: &PgPool, user_id: i64, course_id: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO enrollments (user_id, course_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(db)
    .await
    .unwrap()
}
