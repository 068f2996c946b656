//! Material registry, block palettes, and palette-compressed column storage
//! for generated chunks.

pub mod bit_packed;
pub mod chunk;
pub mod registry;

pub use chunk::{CHUNK_WIDTH, ChunkBuffer, ChunkPos, ChunkSink};
pub use registry::{BlockPalette, MaterialDef, MaterialId, MaterialRegistry, RegistryError};
