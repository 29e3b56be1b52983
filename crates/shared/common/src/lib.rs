//! Common utilities shared by the gateway and the triage pipeline.
//!
//! This crate provides:
//! - Unified error handling for HTTP
//! - Environment configuration helpers

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
