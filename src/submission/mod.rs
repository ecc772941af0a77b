//! Ingestion of client submitted samples.

pub mod candidate;
pub mod post;
