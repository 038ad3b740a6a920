//! Configuration file loading for llm-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./council.toml` or `./.council.toml`
//! 3. Global: `$XDG_CONFIG_HOME/llm-council/config.toml`
//! 4. Environment: `LLM_COUNCIL_*`, nested with `__`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileCouncilConfig, FileExecutionConfig, FileOutputConfig, FileProviderConfig,
};
pub use loader::ConfigLoader;
