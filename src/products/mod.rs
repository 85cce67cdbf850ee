pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use handlers::product_routes as router;
