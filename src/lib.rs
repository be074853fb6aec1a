pub mod auth;
pub mod cache;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod summary;

pub use db::create_pool;
pub use error::ApiError;
