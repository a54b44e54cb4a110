//! Adapters for stores and artifact sinks

pub mod postgres;
pub mod sink;
pub mod store;
