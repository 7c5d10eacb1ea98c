//! context-core - Shared types for the travel context agent
//!
//! This crate provides the building blocks used across the context crates:
//! - `fragment` - ContextFragment, the tagged unit every provider produces
//! - `json` - cleanup and tolerant decoding of model output
//! - `date` - the "no dates in the past" validation policy
//! - `config` - Config loading from file and environment

pub mod config;
pub mod date;
pub mod fragment;
pub mod json;

// Re-export commonly used types
pub use config::{config_value, Config, ConfigError, DispatchMode};
pub use date::{validate_date, validate_date_on};
pub use fragment::ContextFragment;
pub use json::{clean_json_response, parse_model_json, ExtractionError};
