//! Shared utilities.
//!
//! - [`codes`]: one-time codes and certificate codes
//! - [`email`]: SMTP delivery of one-time codes
//! - [`errors`]: the application error (from `learnhub-core`)
//! - [`password`]: bcrypt hashing (from `learnhub-core`)

pub mod codes;
pub mod email;

pub use learnhub_core::{errors, password};
