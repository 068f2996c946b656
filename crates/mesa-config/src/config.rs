//! Configuration structs with defaults, range clamping, and RON persistence.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terrain shape parameters.
    pub generation: GenerationConfig,
    /// Enabled biomes and per-biome block palettes.
    pub biomes: BiomeConfig,
    /// World-level settings and pass-through toggles.
    pub world: WorldConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Which height policy the generator uses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum StepPolicy {
    /// Seeded per-cell offset with a Gaussian perturbation faded out near
    /// cell edges. The canonical policy.
    #[default]
    EdgeSmoothed,
    /// Deterministic modulo staircase with no randomness. Combine with
    /// `noise_overlay` for a noise-perturbed staircase.
    Staircase,
}

/// Terrain shape parameters.
///
/// Immutable for the lifetime of a generator instance. Values read from
/// disk are clamped via [`GenerationConfig::sanitized`] before use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Horizontal size of one plateau cell, in blocks.
    pub step_width: i32,
    /// Vertical rise scale between plateaus, in blocks.
    pub step_height: i32,
    /// Elevation that plateau offsets are applied around.
    pub base_height: i32,
    /// Lowest surface elevation the generator will produce (inclusive).
    pub min_height: i32,
    /// Highest surface elevation bound (exclusive).
    pub max_height: i32,
    /// Total span of the per-cell random base offset.
    pub max_variation: i32,
    /// Columns below this elevation are flooded with the liquid material.
    pub sea_level: i32,
    /// Height policy selection.
    pub step_policy: StepPolicy,
    /// Adds a coherent low-amplitude noise layer across cell boundaries.
    pub noise_overlay: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            step_width: 20,
            step_height: 4,
            base_height: 64,
            min_height: 60,
            max_height: 120,
            max_variation: 80,
            sea_level: 63,
            step_policy: StepPolicy::EdgeSmoothed,
            noise_overlay: false,
        }
    }
}

impl GenerationConfig {
    /// Returns a copy with every value clamped to its documented range.
    ///
    /// Heights are repaired rather than rejected so a world can always
    /// generate: `min_height >= max_height` falls back to the default span.
    pub fn sanitized(&self) -> Self {
        let mut cfg = self.clone();
        cfg.step_height = cfg.step_height.clamp(1, 20);
        cfg.step_width = cfg.step_width.clamp(5, 100);
        cfg.base_height = cfg.base_height.clamp(1, 250);
        cfg.max_variation = cfg.max_variation.clamp(10, 200);
        if cfg.min_height >= cfg.max_height {
            log::warn!(
                "min_height {} >= max_height {}, restoring default height span",
                cfg.min_height,
                cfg.max_height
            );
            let defaults = Self::default();
            cfg.min_height = defaults.min_height;
            cfg.max_height = defaults.max_height;
        }
        cfg
    }
}

/// One biome's block palette, by material name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    pub surface: String,
    pub subsurface: String,
    pub base: String,
    pub decoration: String,
    pub liquid: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            surface: "grass_block".to_string(),
            subsurface: "dirt".to_string(),
            base: "stone".to_string(),
            decoration: "oak_log".to_string(),
            liquid: "water".to_string(),
        }
    }
}

/// Enabled biomes and their palettes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BiomeConfig {
    /// Biome identifiers a world may be created with.
    pub enabled: Vec<String>,
    /// Fallback when a requested biome is unknown or disabled.
    pub default_biome: String,
    /// Palette overrides per biome; biomes without an entry use built-in
    /// defaults.
    pub palettes: HashMap<String, PaletteConfig>,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            enabled: vec![
                "plains".to_string(),
                "desert".to_string(),
                "badlands".to_string(),
                "snowy_taiga".to_string(),
                "mushroom_fields".to_string(),
            ],
            default_biome: "plains".to_string(),
            palettes: HashMap::new(),
        }
    }
}

/// World-level settings, including toggles the core only passes through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Material written at the sink's minimum height.
    pub floor_block: String,
    /// Chance per column of a decoration block above the surface.
    pub decoration_probability: f64,
    /// Pass-through flag for the host's structure generation.
    pub generate_structures: bool,
    /// Pass-through flag for the host's decoration pass.
    pub generate_decorations: bool,
    /// Pass-through flag for the host's cave carving.
    pub generate_caves: bool,
    /// Seed used when the host does not supply one (0 = random).
    pub default_seed: i64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            floor_block: "bedrock".to_string(),
            decoration_probability: 0.001,
            generate_structures: true,
            generate_decorations: true,
            generate_caves: true,
            default_seed: 0,
        }
    }
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g. "debug", "info", "warn").
    pub log_level: String,
    /// Log every chunk generation call.
    pub log_generation: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_generation: false,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                    path: config_path.clone(),
                    source,
                })?;
            let config: Config =
                ron::from_str(&contents).map_err(|source| ConfigError::Malformed {
                    path: config_path.clone(),
                    source,
                })?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents =
            std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                path: config_path.clone(),
                source,
            })?;
        let new_config: Config =
            ron::from_str(&contents).map_err(|source| ConfigError::Malformed {
                path: config_path.clone(),
                source,
            })?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("step_width: 20"));
        assert!(ron_str.contains("default_biome: \"plains\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.biomes.palettes.insert(
            "desert".to_string(),
            PaletteConfig {
                surface: "sand".to_string(),
                subsurface: "sandstone".to_string(),
                base: "sandstone".to_string(),
                decoration: "cactus".to_string(),
                liquid: "water".to_string(),
            },
        );
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(generation: (step_width: 32))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.generation.step_width, 32);
        assert_eq!(config.generation.step_height, 4);
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn test_sanitized_clamps_out_of_range_values() {
        let cfg = GenerationConfig {
            step_width: 3,
            step_height: 50,
            base_height: 400,
            max_variation: 5,
            ..Default::default()
        };
        let clamped = cfg.sanitized();
        assert_eq!(clamped.step_width, 5);
        assert_eq!(clamped.step_height, 20);
        assert_eq!(clamped.base_height, 250);
        assert_eq!(clamped.max_variation, 10);
    }

    #[test]
    fn test_sanitized_repairs_inverted_height_span() {
        let cfg = GenerationConfig {
            min_height: 200,
            max_height: 100,
            ..Default::default()
        };
        let repaired = cfg.sanitized();
        assert!(repaired.min_height < repaired.max_height);
        assert_eq!(repaired.min_height, GenerationConfig::default().min_height);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let cfg = GenerationConfig::default();
        assert_eq!(cfg.sanitized(), cfg);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.generation.step_width = 40;
        config.biomes.default_biome = "desert".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.generation.sea_level = 70;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().generation.sea_level, 70);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_settings_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();

        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
        assert!(err.to_string().contains("config.ron"));
        assert_eq!(
            err.path().map(|p| p.file_name()),
            Some(dir.path().join("config.ron").file_name())
        );
    }

    #[test]
    fn test_reload_missing_file_reports_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("config.ron"));
    }
}
