//! Bar Booking - backend for a bar booking platform.
//!
//! Accounts with e-mail OTP and Google sign-in, category management,
//! notifications with per-recipient read tracking and push delivery, and
//! paginated payment history scoped to a bar or a customer.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: command-line entry points
//! - **config**: configuration and constants
//! - **services**: use cases behind object-safe traits
//! - **infra**: database, repositories, unit of work and outbound integrations
//! - **api**: HTTP handlers, middleware and routes
//! - **jobs**: background job definitions
//! - **types**: pagination and response envelopes
//! - **errors**: centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! cargo run -- serve
//! cargo run -- migrate up
//! cargo run -- jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use errors::{AppError, AppResult};
