//! Deterministic stepped-plateau terrain generation for single-biome worlds.
//!
//! The pipeline for one column is: step coordinate mapping, per-cell seeded
//! height sampling with edge smoothing, an optional coherent noise overlay,
//! and column materialization into a host-supplied chunk sink. Every height
//! is a pure function of `(world seed, coordinates, config)`, so chunks can
//! be generated concurrently and in any order with identical results.

mod biome;
mod column;
mod generator;
mod height;
mod overlay;
mod pool;
mod seed;
mod step;

pub use biome::{BiomeDef, BiomeId, BiomeRegistry, BiomeRegistryError, SingleBiomeClassifier};
pub use column::ColumnMaterializer;
pub use generator::PlateauGenerator;
pub use height::PlateauHeightSampler;
pub use overlay::NoiseOverlay;
pub use pool::{ChunkWorkerPool, GeneratedChunk, GenerationTask};
pub use seed::{bounded_normal, cell_rng, column_rng, derive_cell_seed, derive_column_seed};
pub use step::cell_of;
