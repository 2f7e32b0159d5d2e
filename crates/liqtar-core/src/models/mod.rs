//! Data models for statement extraction.

pub mod category;
pub mod config;
pub mod summary;
