//! Prompt sessions: one-off questions and fixed-count repeated runs.

pub mod runner;

pub use runner::{RunPlan, SessionRunner};
