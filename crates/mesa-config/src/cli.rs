//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, StepPolicy};

/// Command-line arguments for mesa tools.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "mesa", about = "Stepped single-biome terrain generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<i64>,

    /// Biome identifier for the generated world.
    #[arg(long)]
    pub biome: Option<String>,

    /// Plateau cell width in blocks.
    #[arg(long)]
    pub step_width: Option<i32>,

    /// Plateau step height in blocks.
    #[arg(long)]
    pub step_height: Option<i32>,

    /// Use the plain modulo staircase policy instead of edge smoothing.
    #[arg(long)]
    pub staircase: bool,

    /// Enable the coherent noise overlay.
    #[arg(long)]
    pub noise_overlay: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.default_seed = seed;
        }
        if let Some(ref biome) = args.biome {
            self.biomes.default_biome = biome.clone();
        }
        if let Some(w) = args.step_width {
            self.generation.step_width = w;
        }
        if let Some(h) = args.step_height {
            self.generation.step_height = h;
        }
        if args.staircase {
            self.generation.step_policy = StepPolicy::Staircase;
        }
        if args.noise_overlay {
            self.generation.noise_overlay = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(42),
            biome: Some("desert".to_string()),
            staircase: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.default_seed, 42);
        assert_eq!(config.biomes.default_biome, "desert");
        assert_eq!(config.generation.step_policy, StepPolicy::Staircase);
        // Non-overridden fields retain defaults.
        assert_eq!(config.generation.step_width, 20);
        assert!(!config.generation.noise_overlay);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }
}
