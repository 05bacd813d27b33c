use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{CreatePaymentDto, Payment};
use crate::metrics::track_payment;
use crate::modules::courses::service::CourseService;
use crate::modules::profiles::service::ProfileService;
use crate::utils::errors::AppError;

/// Share of the amount waived for students with a verified profile.
pub const VERIFIED_DISCOUNT_RATE: f64 = 0.20;

/// Splits a requested amount into `(charged, discount)`.
pub fn apply_discount(amount: f64, verified: bool) -> (f64, f64) {
    if !verified {
        return (amount, 0.0);
    }
    let discount = amount * VERIFIED_DISCOUNT_RATE;
    (amount - discount, discount)
}

pub struct PaymentService;

impl PaymentService {
    /// Records a pending payment for the caller.
    #[instrument(skip(db, dto), fields(course_id = dto.course_id))]
    pub async fn create_payment(
        db: &PgPool,
        user_id: i64,
        dto: CreatePaymentDto,
    ) -> Result<Payment, AppError> {
        CourseService::get_course(db, dto.course_id).await?;

        let verified = ProfileService::find_profile(db, user_id)
            .await?
            .is_some_and(|profile| profile.verified);
        let (amount, discount) = apply_discount(dto.amount, verified);

        let payment = sqlx::query_as::<_, Payment>(
            r#"INSERT INTO payments (user_id, course_id, amount, discount_applied, status, payment_method, transaction_id)
               VALUES ($1, $2, $3, $4, 'pending', $5, $6)
               RETURNING *"#,
        )
        .bind(user_id)
        .bind(dto.course_id)
        .bind(amount)
        .bind(discount)
        .bind(&dto.payment_method)
        .bind(&dto.transaction_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow!("transaction_id already exists"));
            }
            AppError::database(e)
        })?;

        track_payment(verified);
        info!(payment_id = payment.id, amount, discount, "Payment recorded");

        Ok(payment)
    }

    #[instrument(skip(db))]
    pub async fn get_user_payments(db: &PgPool, user_id: i64) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(payments)
    }
}
