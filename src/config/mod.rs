//! Configuration loading and validation for Shopscope
//!
//! All knobs are simple scalars with documented defaults; the TOML
//! config file is optional and partial files fill in the rest.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{Config, ExtractConfig, FeedConfig, FetchConfig};
pub use validation::validate;
