//! Training Run Configuration Loader
//!
//! This crate loads the YAML hyperparameter documents that drive image
//! classification training runs, validates them against a fixed schema, and
//! exposes an immutable [`config::RunConfig`] to the training harness.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
