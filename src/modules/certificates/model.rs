use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Certificate {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    /// `CERT-<year>-<6 digits>`
    pub code: String,
    /// Verification URL, also encoded in the PDF's QR code.
    pub url: Option<String>,
    pub issued_at: DateTime<Utc>,
}

/// A certificate with the names printed on its PDF.
#[derive(FromRow, Debug, Clone)]
pub struct CertificateDetails {
    #[sqlx(flatten)]
    pub certificate: Certificate,
    pub user_name: String,
    pub course_title: String,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct IssueCertificateDto {
    pub user_id: i64,
    pub course_id: i64,
}
