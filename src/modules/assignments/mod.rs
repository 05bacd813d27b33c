pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_assignments_router, init_questions_router};
