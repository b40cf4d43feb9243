//! Configuration module for ccsd-scrape
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; an absent file or section falls back to the defaults
//! that point at the public CCSD schedule.
//!
//! # Example
//!
//! ```no_run
//! use ccsd_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ccsd.toml")).unwrap();
//! println!("Listing {} codes per page", config.site.page_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, MissingFieldPolicy, OutputConfig, SiteConfig,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
