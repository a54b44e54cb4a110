//! Core export logic

pub mod export;
