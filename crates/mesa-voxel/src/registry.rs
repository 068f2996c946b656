//! Material registry: maps compact [`MaterialId`] values to [`MaterialDef`]
//! metadata, with name lookup and fallback-on-miss resolution.
//!
//! Air is always id 0 so that zero-initialized chunk storage reads as empty
//! space. Material identifiers arriving from configuration are strings and
//! are resolved against this registry; an unknown name falls back to a
//! caller-supplied default with a warning rather than aborting generation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compact identifier stored in every voxel cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u16);

impl MaterialId {
    /// The air material, always id 0.
    pub const AIR: Self = Self(0);
}

/// Descriptor for one material.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Registry name, e.g. "stone" or "grass_block".
    pub name: String,
    /// Whether entities collide with this material.
    pub solid: bool,
    /// Whether this material behaves as a liquid (water fills above it).
    pub liquid: bool,
}

impl MaterialDef {
    fn solid(name: &str) -> Self {
        Self {
            name: name.to_string(),
            solid: true,
            liquid: false,
        }
    }
}

/// The five material slots associated with one biome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockPalette {
    /// Topmost block of every column.
    pub surface: MaterialId,
    /// The three layers immediately below the surface.
    pub subsurface: MaterialId,
    /// Bulk fill between the floor and the subsurface band.
    pub base: MaterialId,
    /// Occasional block placed one above the surface.
    pub decoration: MaterialId,
    /// Fill between the surface and sea level in low columns.
    pub liquid: MaterialId,
}

/// Errors that can occur during material registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A material with the same name has already been registered.
    #[error("duplicate material name: {0}")]
    DuplicateName(String),
    /// All 65 536 id slots are consumed.
    #[error("material registry is full (max 65536 materials)")]
    RegistryFull,
}

/// Maps [`MaterialId`] to [`MaterialDef`] with O(1) lookup both ways.
pub struct MaterialRegistry {
    /// Dense array where `index == MaterialId.0`.
    materials: Vec<MaterialDef>,
    name_to_id: HashMap<String, MaterialId>,
}

impl MaterialRegistry {
    /// Creates a registry with air pre-registered as id 0.
    pub fn new() -> Self {
        let air = MaterialDef {
            name: "air".to_string(),
            solid: false,
            liquid: false,
        };
        let mut name_to_id = HashMap::new();
        name_to_id.insert("air".to_string(), MaterialId::AIR);
        Self {
            materials: vec![air],
            name_to_id,
        }
    }

    /// Creates a registry pre-populated with the standard material set used
    /// by the built-in biome palettes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for name in [
            "bedrock",
            "stone",
            "dirt",
            "grass_block",
            "sand",
            "sandstone",
            "red_sand",
            "red_sandstone",
            "terracotta",
            "snow_block",
            "mycelium",
            "oak_log",
            "spruce_log",
            "cactus",
            "dead_bush",
            "red_mushroom",
        ] {
            // Names are distinct literals, registration cannot fail here.
            let _ = registry.register(MaterialDef::solid(name));
        }
        let _ = registry.register(MaterialDef {
            name: "water".to_string(),
            solid: false,
            liquid: true,
        });
        registry
    }

    /// Registers a new material and returns its assigned id.
    ///
    /// Ids are assigned sequentially starting from 1 (0 is air).
    pub fn register(&mut self, def: MaterialDef) -> Result<MaterialId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.materials.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }
        let id = MaterialId(self.materials.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.materials.push(def);
        Ok(id)
    }

    /// Returns the definition for a given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range; ids are only produced by the registry
    /// itself, so this indicates a programming error.
    pub fn get(&self, id: MaterialId) -> &MaterialDef {
        &self.materials[id.0 as usize]
    }

    /// Returns the id for a named material, or `None` if not registered.
    pub fn lookup_by_name(&self, name: &str) -> Option<MaterialId> {
        self.name_to_id.get(name).copied()
    }

    /// Resolves a configured material name, falling back on miss.
    ///
    /// Generation must proceed even when a palette entry is misspelled, so
    /// an unknown name produces a warning and the supplied fallback id.
    pub fn resolve_or(&self, name: &str, fallback: MaterialId) -> MaterialId {
        match self.lookup_by_name(name) {
            Some(id) => id,
            None => {
                tracing::warn!(
                    material = name,
                    fallback = %self.get(fallback).name,
                    "unknown material name, using fallback"
                );
                fallback
            }
        }
    }

    /// Total number of registered materials, including air.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.materials.len() <= 1
    }

    /// Returns `true` for the air material.
    pub fn is_air(&self, id: MaterialId) -> bool {
        id.0 == 0
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
