pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use handlers::inventory_routes as router;
