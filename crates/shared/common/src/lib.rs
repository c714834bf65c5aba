//! Common utilities shared by the application and its tooling.
//!
//! This crate provides:
//! - Unified error handling with HTTP rendering
//! - Configuration sections

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
