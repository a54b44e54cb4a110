//! PostgreSQL store backend

pub mod client;
pub mod models;
pub mod store;

pub use client::PostgresClient;
pub use store::PostgresStore;
