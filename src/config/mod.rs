//! Configuration loading for training runs.
//!
//! This module loads a training run document from YAML, validates every
//! section against the schema, and produces an immutable [`RunConfig`].
//!
//! # Example
//!
//! ```no_run
//! use run_config::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/convnext.yaml").unwrap();
//! println!("Loaded run: {}", config.common().run_label);
//! ```

mod loader;
mod reader;
mod rules;
mod schema;
mod types;

#[cfg(test)]
mod proptests;

pub use loader::{ConfigLoader, LoadOptions};
pub use schema::{DEFAULT_MIN_LEARNING_RATE, SECTIONS};
pub use types::{
    CommonSection, CriterionSection, DatasetSection, DeviceType, MixMode, MixSection, ModelSection,
    OptimizerSection, RunConfig, SchedulerSection,
};
