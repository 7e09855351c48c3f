pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod market;
pub mod models;
pub mod notify;

pub use config::AppConfig;
pub use db::create_pool;
pub use error::MarketError;
