//! Feature modules. Each one splits into `model`, `service`, `controller` and
//! `router`.

pub mod assignments;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod payments;
pub mod profiles;
pub mod progress;
pub mod submissions;
pub mod users;

#[cfg(test)]
pub mod fixtures;

pub use self::auth::model::LoginRequest;
pub use self::users::model::User;
