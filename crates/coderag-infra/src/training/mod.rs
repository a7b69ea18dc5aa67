//! Fine-tuning inputs: dataset validation and plan resolution.
//!
//! The training run itself happens in an external framework; this module
//! only checks that its inputs are well-formed.

pub mod dataset;

use coderag_types::error::ConfigError;
use coderag_types::training::TrainingPlan;

pub use self::dataset::{format_example, load_dataset};

/// Resolve the LoRA training plan from the process environment.
pub fn plan_from_env() -> Result<TrainingPlan, ConfigError> {
    TrainingPlan::from_lookup(|key| std::env::var(key).ok())
}
