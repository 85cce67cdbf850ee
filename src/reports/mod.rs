pub mod handlers;
pub mod repo;

pub use handlers::report_routes as router;
