//! HTTP API module for the configuration service.
//!
//! This module exposes the loaded run configuration to harness processes
//! and validates submitted configuration documents.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ValidateParams;
pub use response::{ApiError, ApiErrorResponse, ValidationIssue, ValidationReport};
pub use state::AppState;
