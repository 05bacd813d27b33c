pub mod controller;
pub mod model;
pub mod pdf;
pub mod router;
pub mod service;

pub use router::init_certificates_router;
