use anyhow::anyhow;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use super::model::{Certificate, IssueCertificateDto};
use super::pdf::render_certificate;
use super::service::CertificateService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/certificates/issue",
    request_body = IssueCertificateDto,
    responses(
        (status = 201, description = "Certificate issued", body = Certificate),
        (status = 400, description = "Course not completed", body = ErrorResponse),
        (status = 403, description = "Another student's enrollment", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    tag = "Certificates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn issue_certificate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<IssueCertificateDto>,
) -> Result<(StatusCode, Json<Certificate>), AppError> {
    auth_user.ensure_self_or_staff(dto.user_id)?;
    let certificate =
        CertificateService::issue(&state.db, &state.certificate_config, dto.user_id, dto.course_id)
            .await?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

#[utoipa::path(
    get,
    path = "/api/certificates/user/{user_id}",
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Certificates of the user", body = Vec<Certificate>),
        (status = 403, description = "Another student's certificates", body = ErrorResponse)
    ),
    tag = "Certificates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_user_certificates(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Certificate>>, AppError> {
    auth_user.ensure_self_or_staff(user_id)?;
    let certificates = CertificateService::get_user_certificates(&state.db, user_id).await?;
    Ok(Json(certificates))
}

#[utoipa::path(
    get,
    path = "/api/certificates/{id}",
    params(("id" = i64, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "Certificate", body = Certificate),
        (status = 403, description = "Another student's certificate", body = ErrorResponse),
        (status = 404, description = "Certificate not found", body = ErrorResponse)
    ),
    tag = "Certificates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_certificate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Certificate>, AppError> {
    let certificate = CertificateService::get_certificate(&state.db, id).await?;
    auth_user.ensure_self_or_staff(certificate.user_id)?;
    Ok(Json(certificate))
}

/// Download the certificate as a PDF
#[utoipa::path(
    get,
    path = "/api/certificates/download/{id}",
    params(("id" = i64, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "Certificate PDF", content_type = "application/pdf"),
        (status = 403, description = "Another student's certificate", body = ErrorResponse),
        (status = 404, description = "Certificate not found", body = ErrorResponse)
    ),
    tag = "Certificates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn download_certificate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let (certificate, document) =
        CertificateService::get_document(&state.db, &state.certificate_config, id).await?;
    auth_user.ensure_self_or_staff(certificate.user_id)?;

    let file_name = document.file_name();
    let bytes = tokio::task::spawn_blocking(move || render_certificate(&document))
        .await
        .map_err(|e| AppError::internal(anyhow!("certificate rendering panicked: {e}")))?
        .map_err(|e| AppError::internal(anyhow!("failed to render certificate: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={file_name}"),
            ),
        ],
        bytes,
    )
        .into_response())
}
