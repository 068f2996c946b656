//! Biome definitions and the single-biome classifier.
//!
//! Biomes here are palettes, not climate: each one names the materials a
//! column is built from. A world uses exactly one biome everywhere, chosen
//! at world creation and resolved against the enabled set with a fallback.

use hashbrown::HashMap;
use mesa_config::{BiomeConfig, PaletteConfig};
use mesa_voxel::{BlockPalette, MaterialId, MaterialRegistry};
use thiserror::Error;
use tracing::warn;

/// Index into a [`BiomeRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BiomeId(pub u16);

/// A named biome and its resolved block palette.
#[derive(Clone, Debug)]
pub struct BiomeDef {
    pub name: String,
    pub palette: BlockPalette,
}

#[derive(Debug, Error)]
pub enum BiomeRegistryError {
    #[error("biome name already registered: {0}")]
    DuplicateName(String),
}

/// Registry of enabled biomes, keyed by id with a name index.
pub struct BiomeRegistry {
    biomes: Vec<BiomeDef>,
    by_name: HashMap<String, BiomeId>,
}

/// Built-in palette for a biome the config has no override for.
fn builtin_palette(biome: &str) -> PaletteConfig {
    let (surface, subsurface, base, decoration) = match biome {
        "desert" => ("sand", "sandstone", "sandstone", "cactus"),
        "badlands" => ("red_sand", "red_sandstone", "terracotta", "dead_bush"),
        "snowy_taiga" => ("snow_block", "dirt", "stone", "spruce_log"),
        "mushroom_fields" => ("mycelium", "dirt", "stone", "red_mushroom"),
        _ => ("grass_block", "dirt", "stone", "oak_log"),
    };
    PaletteConfig {
        surface: surface.to_string(),
        subsurface: subsurface.to_string(),
        base: base.to_string(),
        decoration: decoration.to_string(),
        liquid: "water".to_string(),
    }
}

impl BiomeRegistry {
    pub fn new() -> Self {
        Self {
            biomes: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Builds a registry from the enabled biome list, resolving material
    /// names against the registry. Unknown materials fall back to the
    /// plains defaults with a warning rather than failing world creation.
    pub fn from_config(config: &BiomeConfig, materials: &MaterialRegistry) -> Self {
        let mut registry = Self::new();
        for name in &config.enabled {
            let palette_cfg = config
                .palettes
                .get(name)
                .cloned()
                .unwrap_or_else(|| builtin_palette(name));
            let palette = resolve_palette(name, &palette_cfg, materials);
            if let Err(BiomeRegistryError::DuplicateName(dup)) =
                registry.register(name.clone(), palette)
            {
                warn!(biome = %dup, "duplicate biome in enabled list, ignoring");
            }
        }
        if registry.is_empty() {
            warn!("no valid biomes enabled, registering plains defaults");
            let palette = resolve_palette("plains", &builtin_palette("plains"), materials);
            let _ = registry.register("plains".to_string(), palette);
        }
        registry
    }

    pub fn register(
        &mut self,
        name: String,
        palette: BlockPalette,
    ) -> Result<BiomeId, BiomeRegistryError> {
        if self.by_name.contains_key(&name) {
            return Err(BiomeRegistryError::DuplicateName(name));
        }
        let id = BiomeId(self.biomes.len() as u16);
        self.by_name.insert(name.clone(), id);
        self.biomes.push(BiomeDef { name, palette });
        Ok(id)
    }

    pub fn get(&self, id: BiomeId) -> Option<&BiomeDef> {
        self.biomes.get(id.0 as usize)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<BiomeId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_palette(
    biome: &str,
    cfg: &PaletteConfig,
    materials: &MaterialRegistry,
) -> BlockPalette {
    let defaults = builtin_palette(biome);
    let resolve = |name: &str, fallback: &str| -> MaterialId {
        let fallback_id = materials.lookup_by_name(fallback).unwrap_or(MaterialId::AIR);
        materials.resolve_or(name, fallback_id)
    };
    BlockPalette {
        surface: resolve(&cfg.surface, &defaults.surface),
        subsurface: resolve(&cfg.subsurface, &defaults.subsurface),
        base: resolve(&cfg.base, &defaults.base),
        decoration: resolve(&cfg.decoration, &defaults.decoration),
        liquid: resolve(&cfg.liquid, &defaults.liquid),
    }
}

/// Answers every biome query with the world's single biome.
#[derive(Clone, Copy, Debug)]
pub struct SingleBiomeClassifier {
    biome: BiomeId,
}

impl SingleBiomeClassifier {
    /// Resolves the requested biome against the registry. An unknown or
    /// disabled name falls back to `default_biome`, then to the first
    /// registered biome.
    pub fn resolve(requested: &str, registry: &BiomeRegistry, default_biome: &str) -> Self {
        let biome = registry.lookup_by_name(requested).unwrap_or_else(|| {
            warn!(
                requested,
                fallback = default_biome,
                "unknown or disabled biome, using fallback"
            );
            registry
                .lookup_by_name(default_biome)
                .unwrap_or(BiomeId(0))
        });
        Self { biome }
    }

    /// The biome at any position. Coordinates are accepted for interface
    /// parity with multi-biome classifiers and ignored.
    pub fn biome_at(&self, _x: i64, _y: i32, _z: i64) -> BiomeId {
        self.biome
    }

    pub fn biome(&self) -> BiomeId {
        self.biome
    }

    /// Every biome this world can contain.
    pub fn enabled_biomes(&self) -> [BiomeId; 1] {
        [self.biome]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (BiomeRegistry, MaterialRegistry) {
        let materials = MaterialRegistry::with_defaults();
        let biomes = BiomeRegistry::from_config(&BiomeConfig::default(), &materials);
        (biomes, materials)
    }

    #[test]
    fn test_default_config_registers_all_enabled_biomes() {
        let (biomes, _) = registry();
        assert_eq!(biomes.len(), 5);
        for name in ["plains", "desert", "badlands", "snowy_taiga", "mushroom_fields"] {
            assert!(biomes.lookup_by_name(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_builtin_palettes_resolve_to_real_materials() {
        let (biomes, materials) = registry();
        let desert = biomes.get(biomes.lookup_by_name("desert").unwrap()).unwrap();
        assert_eq!(
            desert.palette.surface,
            materials.lookup_by_name("sand").unwrap()
        );
        assert_eq!(
            desert.palette.decoration,
            materials.lookup_by_name("cactus").unwrap()
        );
    }

    #[test]
    fn test_palette_override_wins_over_builtin() {
        let materials = MaterialRegistry::with_defaults();
        let mut config = BiomeConfig::default();
        config.palettes.insert(
            "plains".to_string(),
            PaletteConfig {
                surface: "snow_block".to_string(),
                ..Default::default()
            },
        );
        let biomes = BiomeRegistry::from_config(&config, &materials);
        let plains = biomes.get(biomes.lookup_by_name("plains").unwrap()).unwrap();
        assert_eq!(
            plains.palette.surface,
            materials.lookup_by_name("snow_block").unwrap()
        );
    }

    #[test]
    fn test_unknown_material_falls_back_to_builtin() {
        let materials = MaterialRegistry::with_defaults();
        let mut config = BiomeConfig::default();
        config.palettes.insert(
            "plains".to_string(),
            PaletteConfig {
                surface: "no_such_block".to_string(),
                ..Default::default()
            },
        );
        let biomes = BiomeRegistry::from_config(&config, &materials);
        let plains = biomes.get(biomes.lookup_by_name("plains").unwrap()).unwrap();
        assert_eq!(
            plains.palette.surface,
            materials.lookup_by_name("grass_block").unwrap()
        );
    }

    #[test]
    fn test_empty_enabled_list_still_yields_a_biome() {
        let materials = MaterialRegistry::with_defaults();
        let config = BiomeConfig {
            enabled: Vec::new(),
            ..Default::default()
        };
        let biomes = BiomeRegistry::from_config(&config, &materials);
        assert_eq!(biomes.len(), 1);
        assert!(biomes.lookup_by_name("plains").is_some());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut biomes = BiomeRegistry::new();
        let palette = BlockPalette {
            surface: MaterialId(1),
            subsurface: MaterialId(2),
            base: MaterialId(3),
            decoration: MaterialId(4),
            liquid: MaterialId(5),
        };
        biomes.register("plains".to_string(), palette).unwrap();
        assert!(matches!(
            biomes.register("plains".to_string(), palette),
            Err(BiomeRegistryError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_classifier_is_constant_everywhere() {
        let (biomes, _) = registry();
        let classifier = SingleBiomeClassifier::resolve("desert", &biomes, "plains");
        let desert = biomes.lookup_by_name("desert").unwrap();
        assert_eq!(classifier.biome(), desert);
        assert_eq!(classifier.biome_at(0, 64, 0), desert);
        assert_eq!(classifier.biome_at(-1_000_000, -64, 999_999), desert);
        assert_eq!(classifier.enabled_biomes(), [desert]);
    }

    #[test]
    fn test_classifier_falls_back_for_unknown_biome() {
        let (biomes, _) = registry();
        let classifier = SingleBiomeClassifier::resolve("the_end", &biomes, "plains");
        assert_eq!(classifier.biome(), biomes.lookup_by_name("plains").unwrap());
    }
}
