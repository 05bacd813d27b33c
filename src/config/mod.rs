//! Application configuration, re-exported from `learnhub-config` so modules
//! can reach every setting through `crate::config`.

pub use learnhub_config::{certificate, cors, email, jwt, rate_limit, registration, scoring};
