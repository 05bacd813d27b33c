//! Request guards.
//!
//! - [`auth`]: bearer-token extraction into [`auth::AuthUser`]
//! - [`role`]: role allow-lists, as a layer or as extractors

pub mod auth;
pub mod role;
