//! Configuration file parsing for threadline
//!
//! Supports:
//! - `.threadline/config.toml` - Global settings
//! - Thread seed files - the comments a page was rendered with

pub mod seed;
pub mod settings;
pub mod types;

pub use seed::{load_seed, resolve_seed_path, ThreadSeed};
pub use settings::{init_threadline_directory, load_settings, CONFIG_FILENAME, THREADLINE_DIR};
pub use types::*;
