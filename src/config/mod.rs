//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use weibo_comments::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Searching for: {}", config.search.query);
//! ```

mod overrides;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClientConfig, Config, CrawlerConfig, EndpointConfig, OutputConfig, OutputFormat, SearchConfig,
};

pub use overrides::ConfigOverrides;

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
