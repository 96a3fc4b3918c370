pub mod app;
pub mod config;
pub mod dapr;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod health;
pub mod manager;
pub mod model;
pub mod observability;

pub use app::{router, AppState};
