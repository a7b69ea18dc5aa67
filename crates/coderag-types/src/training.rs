//! Fine-tuning dataset records and the LoRA training plan.
//!
//! The training run itself is executed by an external framework; these types
//! describe its inputs so they can be validated and inspected up front.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One supervised example (a single JSONL line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub instruction: String,
    pub output: String,
}

/// Low-rank adapter hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoraSettings {
    pub r: u32,
    pub alpha: u32,
    pub dropout: f64,
    pub target_modules: Vec<String>,
}

const DEFAULT_TARGET_MODULES: &str = "q_proj,k_proj,v_proj,o_proj,gate_proj,up_proj,down_proj";

impl Default for LoraSettings {
    fn default() -> Self {
        Self {
            r: 64,
            alpha: 16,
            dropout: 0.05,
            target_modules: split_modules(DEFAULT_TARGET_MODULES),
        }
    }
}

fn split_modules(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

/// Resolved hyperparameters for a quantized LoRA fine-tuning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub model_name: String,
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub seq_len: u32,
    pub micro_batch_size: u32,
    pub gradient_accumulation_steps: u32,
    pub num_epochs: f64,
    pub learning_rate: f64,
    pub warmup_ratio: f64,
    pub weight_decay: f64,
    pub lora: LoraSettings,
}

impl Default for TrainingPlan {
    fn default() -> Self {
        Self {
            model_name: "meta-llama/Llama-3.1-8B-Instruct".to_string(),
            data_path: PathBuf::from("data.jsonl"),
            output_dir: PathBuf::from("./outputs-qlora-llama3-8b"),
            seq_len: 1024,
            micro_batch_size: 1,
            gradient_accumulation_steps: 16,
            num_epochs: 100.0,
            learning_rate: 2e-4,
            warmup_ratio: 0.03,
            weight_decay: 0.0,
            lora: LoraSettings::default(),
        }
    }
}

impl TrainingPlan {
    /// Build a plan from a key lookup (normally the process environment).
    ///
    /// Unset keys keep their defaults; set-but-unparseable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut plan = Self::default();

        if let Some(v) = lookup("MODEL_NAME") {
            plan.model_name = v;
        }
        if let Some(v) = lookup("DATA_PATH") {
            plan.data_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("OUTPUT_DIR") {
            plan.output_dir = PathBuf::from(v);
        }
        parse_into(&lookup, "SEQ_LEN", &mut plan.seq_len)?;
        parse_into(&lookup, "MICRO_BATCH_SIZE", &mut plan.micro_batch_size)?;
        parse_into(&lookup, "GA_STEPS", &mut plan.gradient_accumulation_steps)?;
        parse_into(&lookup, "NUM_EPOCHS", &mut plan.num_epochs)?;
        parse_into(&lookup, "LR", &mut plan.learning_rate)?;
        parse_into(&lookup, "WARMUP_RATIO", &mut plan.warmup_ratio)?;
        parse_into(&lookup, "WEIGHT_DECAY", &mut plan.weight_decay)?;
        parse_into(&lookup, "LORA_R", &mut plan.lora.r)?;
        parse_into(&lookup, "LORA_ALPHA", &mut plan.lora.alpha)?;
        parse_into(&lookup, "LORA_DROPOUT", &mut plan.lora.dropout)?;
        if let Some(v) = lookup("TARGET_MODULES") {
            plan.lora.target_modules = split_modules(&v);
        }

        Ok(plan)
    }

    /// Examples consumed per optimizer step. Widened so any pair of `u32`
    /// settings fits.
    pub fn effective_batch_size(&self) -> u64 {
        u64::from(self.micro_batch_size) * u64::from(self.gradient_accumulation_steps)
    }

    /// Optimizer steps needed to see `examples` once.
    pub fn steps_per_epoch(&self, examples: usize) -> u64 {
        (examples as u64).div_ceil(self.effective_batch_size().max(1))
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, slot: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        *slot = raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}
