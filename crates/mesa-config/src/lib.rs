//! Configuration for mesa world generation.
//!
//! Settings persist to disk as RON, tolerate missing or extra fields, and
//! can be overridden from the command line via clap. Generation parameters
//! are defensively clamped to documented ranges on load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BiomeConfig, Config, DebugConfig, GenerationConfig, PaletteConfig, StepPolicy, WorldConfig,
};
pub use error::ConfigError;
