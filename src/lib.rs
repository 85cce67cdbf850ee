pub mod app;
pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod inventory;
pub mod products;
pub mod rate_limit;
pub mod reports;
pub mod sales;
pub mod state;
pub mod transactions;
pub mod users;
pub mod validation;
