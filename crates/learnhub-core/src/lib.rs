//! # LearnHub Core
//!
//! Foundational types shared by every LearnHub crate:
//!
//! - [`errors`]: the HTTP-aware application error
//! - [`password`]: bcrypt password hashing and verification
//!
//! ```ignore
//! use learnhub_core::errors::AppError;
//! use learnhub_core::password::hash_password;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;

pub use errors::AppError;
pub use password::{hash_password, verify_password};
