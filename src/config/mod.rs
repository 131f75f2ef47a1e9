//! Configuration loading and validation
//!
//! Configuration is read from a TOML file. A SHA-256 hash of the file
//! content is computed alongside loading so runs can log which
//! configuration they were started with.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{
    Config, Freshness, HarvestConfig, OutputConfig, ScheduleConfig, SiteConfig, TranslationConfig,
};
pub use validation::validate;
