pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use handlers::transaction_routes as router;
