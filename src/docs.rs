use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use learnhub_auth::UserRole;

use crate::modules::assignments::model::{
    AnswerOption, Assignment, AssignmentWithQuestions, CreateAssignmentDto, CreateOptionDto,
    CreateQuestionDto, Question, QuestionWithOptions, UpdateAssignmentDto, UpdateOptionDto,
    UpdateQuestionDto,
};
use crate::modules::auth::model::{
    ErrorResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest, ResetPasswordRequest, VerifyEmailRequest,
};
use crate::modules::certificates::model::{Certificate, IssueCertificateDto};
use crate::modules::courses::model::{
    Course, CourseWithRelations, CreateCourseDto, DepartmentSummary, TeacherSummary,
    UpdateCourseDto,
};
use crate::modules::departments::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};
use crate::modules::enrollments::model::{
    EnrollDto, EnrolledCourse, EnrolledStudent, Enrollment, EnrollmentStatus,
    EnrollmentWithCourse, EnrollmentWithStudent, UpdateEnrollmentDto,
};
use crate::modules::payments::model::{CreatePaymentDto, Payment, PaymentStatus};
use crate::modules::profiles::model::{
    CreateProfileDto, Profile, TeacherProfile, UpsertTeacherProfileDto, VerifyProfileDto,
};
use crate::modules::progress::model::{ProgressUpdate, ProgressView, UpdateProgressDto};
use crate::modules::submissions::model::{Submission, SubmissionResult, SubmitAnswersDto};
use crate::modules::users::model::User;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::verify_email,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::forget_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::get_me,
        crate::modules::profiles::controller::create_profile,
        crate::modules::profiles::controller::get_my_profile,
        crate::modules::profiles::controller::verify_profile,
        crate::modules::profiles::controller::get_teacher_profile,
        crate::modules::profiles::controller::upsert_teacher_profile,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::list_departments,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::list_assignments,
        crate::modules::assignments::controller::get_assignment,
        crate::modules::assignments::controller::update_assignment,
        crate::modules::assignments::controller::delete_assignment,
        crate::modules::assignments::controller::create_question,
        crate::modules::assignments::controller::list_questions,
        crate::modules::assignments::controller::update_question,
        crate::modules::assignments::controller::delete_question,
        crate::modules::assignments::controller::create_option,
        crate::modules::assignments::controller::list_options,
        crate::modules::assignments::controller::update_option,
        crate::modules::assignments::controller::delete_option,
        crate::modules::enrollments::controller::enroll,
        crate::modules::enrollments::controller::get_user_enrollments,
        crate::modules::enrollments::controller::get_course_enrollments,
        crate::modules::enrollments::controller::update_enrollment,
        crate::modules::enrollments::controller::delete_enrollment,
        crate::modules::submissions::controller::submit,
        crate::modules::submissions::controller::get_user_submissions,
        crate::modules::submissions::controller::get_assignment_submissions,
        crate::modules::progress::controller::update_progress,
        crate::modules::progress::controller::get_progress,
        crate::modules::certificates::controller::issue_certificate,
        crate::modules::certificates::controller::get_user_certificates,
        crate::modules::certificates::controller::get_certificate,
        crate::modules::certificates::controller::download_certificate,
        crate::modules::payments::controller::create_payment,
        crate::modules::payments::controller::get_user_payments,
    ),
    components(
        schemas(
            User,
            UserRole,
            RegisterRequest,
            VerifyEmailRequest,
            LoginRequest,
            LoginResponse,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,
            ErrorResponse,
            Profile,
            TeacherProfile,
            CreateProfileDto,
            VerifyProfileDto,
            UpsertTeacherProfileDto,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            Course,
            CourseWithRelations,
            TeacherSummary,
            DepartmentSummary,
            CreateCourseDto,
            UpdateCourseDto,
            Assignment,
            AssignmentWithQuestions,
            Question,
            QuestionWithOptions,
            AnswerOption,
            CreateAssignmentDto,
            UpdateAssignmentDto,
            CreateQuestionDto,
            UpdateQuestionDto,
            CreateOptionDto,
            UpdateOptionDto,
            Enrollment,
            EnrollmentStatus,
            EnrollmentWithCourse,
            EnrollmentWithStudent,
            EnrolledCourse,
            EnrolledStudent,
            EnrollDto,
            UpdateEnrollmentDto,
            Submission,
            SubmissionResult,
            SubmitAnswersDto,
            UpdateProgressDto,
            ProgressUpdate,
            ProgressView,
            Certificate,
            IssueCertificateDto,
            Payment,
            PaymentStatus,
            CreatePaymentDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and password reset"),
        (name = "Users", description = "Current user and their enrollments"),
        (name = "Profiles", description = "Student and teacher profiles"),
        (name = "Departments", description = "Department management"),
        (name = "Courses", description = "Course catalog"),
        (name = "Assignments", description = "Assignments, questions and answer options"),
        (name = "Enrollments", description = "Course enrollment"),
        (name = "Submissions", description = "Answer submission and scoring"),
        (name = "Progress", description = "Course progress"),
        (name = "Certificates", description = "Completion certificates"),
        (name = "Payments", description = "Course payments")
    ),
    info(
        title = "LearnHub API",
        version = "0.1.0",
        description = "A learning management REST API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
