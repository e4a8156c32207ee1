//! HTTP API for the chat gateway

pub mod chat;
pub mod health;

pub use chat::chat_routes;
pub use health::health_routes;
