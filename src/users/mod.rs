pub mod dto;
pub mod handlers;
pub mod services;

pub use handlers::user_routes as router;
