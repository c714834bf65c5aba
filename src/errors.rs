//! Error handling for the application crate.
//!
//! The error taxonomy lives in the shared `common` crate so the domain,
//! infrastructure and API layers agree on it.

pub use common::{AppError, AppResult, OptionExt};
