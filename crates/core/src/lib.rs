//! Dawaa Core Library
//!
//! This crate provides the foundational utilities for the dawaa engine:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (endpoints, timeouts, thresholds)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, Endpoints, Thresholds};
pub use error::{AppError, AppResult};
