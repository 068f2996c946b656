//! The chunk write surface and a palette-compressed in-memory implementation.
//!
//! A chunk is a 16×16 tile of columns spanning a signed world-y range. The
//! host supplies the sink per generation call; [`ChunkBuffer`] is the
//! in-memory sink used by the worker pool and tests. Storage keeps a palette
//! of distinct [`MaterialId`] values and a bit-packed index array whose width
//! scales with the palette size, so a freshly cleared chunk costs no index
//! bytes at all.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::bit_packed::PackedIndexArray;
use crate::registry::MaterialId;

/// Horizontal side length of a chunk in columns.
pub const CHUNK_WIDTH: usize = 16;

/// Horizontal address of a chunk in chunk units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World coordinate of this chunk's first column on the given axis.
    pub fn base_x(&self) -> i64 {
        i64::from(self.x) * CHUNK_WIDTH as i64
    }

    pub fn base_z(&self) -> i64 {
        i64::from(self.z) * CHUNK_WIDTH as i64
    }
}

/// Bounds-aware, write-only destination for generated block data.
///
/// The host supplies one sink per chunk request. Writes outside the vertical
/// bounds are discarded by the implementation; the generator never reads
/// back from the sink.
pub trait ChunkSink {
    /// Lowest writable world-y coordinate (inclusive).
    fn min_height(&self) -> i32;
    /// Highest writable world-y coordinate (exclusive).
    fn max_height(&self) -> i32;
    /// Writes one block at the local column `(local_x, local_z)`, both in
    /// `0..16`, at world height `y`.
    fn set_block(&mut self, local_x: usize, y: i32, local_z: usize, material: MaterialId);
}

/// Palette-compressed in-memory chunk, 16×16 columns over `[min_y, max_y)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkBuffer {
    min_y: i32,
    max_y: i32,
    palette: Vec<MaterialId>,
    storage: PackedIndexArray,
    bit_width: u8,
}

impl ChunkBuffer {
    /// Creates an air-filled buffer spanning `[min_y, max_y)`.
    ///
    /// # Panics
    ///
    /// Panics if `min_y >= max_y`.
    pub fn new(min_y: i32, max_y: i32) -> Self {
        assert!(min_y < max_y, "chunk must span at least one layer");
        let volume = Self::volume(min_y, max_y);
        Self {
            min_y,
            max_y,
            palette: vec![MaterialId::AIR],
            storage: PackedIndexArray::new(0, volume),
            bit_width: 0,
        }
    }

    fn volume(min_y: i32, max_y: i32) -> usize {
        CHUNK_WIDTH * CHUNK_WIDTH * (max_y - min_y) as usize
    }

    /// Number of vertical layers.
    pub fn height_span(&self) -> usize {
        (self.max_y - self.min_y) as usize
    }

    /// Returns the material at the given local column and world height.
    ///
    /// Out-of-bounds heights read as air.
    pub fn get(&self, local_x: usize, y: i32, local_z: usize) -> MaterialId {
        if y < self.min_y || y >= self.max_y {
            return MaterialId::AIR;
        }
        if self.bit_width == 0 {
            return self.palette[0];
        }
        let index = self.linear_index(local_x, y, local_z);
        self.palette[self.storage.get(index) as usize]
    }

    /// Number of distinct materials currently in the palette.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// Current bits per stored index.
    pub fn bit_width(&self) -> u8 {
        self.bit_width
    }

    /// Approximate index storage size in bytes.
    pub fn storage_bytes(&self) -> usize {
        self.storage.storage_bytes()
    }

    /// Hashes every cell, for determinism comparisons between two buffers.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for local_x in 0..CHUNK_WIDTH {
            for local_z in 0..CHUNK_WIDTH {
                for y in self.min_y..self.max_y {
                    self.get(local_x, y, local_z).0.hash(&mut hasher);
                }
            }
        }
        hasher.finish()
    }

    /// `(local_x, y, local_z)` to a linear index; x varies fastest.
    fn linear_index(&self, local_x: usize, y: i32, local_z: usize) -> usize {
        debug_assert!(local_x < CHUNK_WIDTH && local_z < CHUNK_WIDTH);
        let layer = (y - self.min_y) as usize;
        local_x + local_z * CHUNK_WIDTH + layer * CHUNK_WIDTH * CHUNK_WIDTH
    }

    /// Required bit width for a palette of the given size.
    fn bits_for_palette_size(size: usize) -> u8 {
        match size {
            0 | 1 => 0,
            2..=4 => 2,
            5..=16 => 4,
            17..=256 => 8,
            _ => 16,
        }
    }

    /// Finds or inserts a material in the palette, widening storage if the
    /// palette outgrows the current bit width.
    fn palette_index_or_insert(&mut self, material: MaterialId) -> usize {
        if let Some(idx) = self.palette.iter().position(|&m| m == material) {
            return idx;
        }
        let new_bits = Self::bits_for_palette_size(self.palette.len() + 1);
        if new_bits != self.bit_width {
            self.widen_storage(new_bits);
        }
        let idx = self.palette.len();
        self.palette.push(material);
        idx
    }

    /// Rebuilds storage at a wider bit width, preserving existing cells.
    fn widen_storage(&mut self, new_bits: u8) {
        let volume = Self::volume(self.min_y, self.max_y);
        let mut wider = PackedIndexArray::new(new_bits, volume);
        if self.bit_width > 0 {
            for i in 0..volume {
                wider.set(i, self.storage.get(i));
            }
        }
        // A zero-width source is uniform: all indices are 0, already the case.
        self.storage = wider;
        self.bit_width = new_bits;
    }
}

impl ChunkSink for ChunkBuffer {
    fn min_height(&self) -> i32 {
        self.min_y
    }

    fn max_height(&self) -> i32 {
        self.max_y
    }

    fn set_block(&mut self, local_x: usize, y: i32, local_z: usize, material: MaterialId) {
        if y < self.min_y || y >= self.max_y {
            return;
        }
        let palette_idx = self.palette_index_or_insert(material);
        if self.bit_width == 0 {
            // Uniform chunk and the same material: nothing to store.
            if palette_idx == 0 {
                return;
            }
        }
        let index = self.linear_index(local_x, y, local_z);
        self.storage.set(index, palette_idx as u16);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_buffer_is_uniform_air() {
        let buffer = ChunkBuffer::new(-64, 320);
        assert_eq!(buffer.palette_len(), 1);
        assert_eq!(buffer.bit_width(), 0);
        assert_eq!(buffer.storage_bytes(), 0);
        assert_eq!(buffer.get(0, 0, 0), MaterialId::AIR);
        assert_eq!(buffer.get(15, -64, 15), MaterialId::AIR);
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let mut buffer = ChunkBuffer::new(0, 128);
        buffer.set_block(3, 64, 7, MaterialId(5));
        assert_eq!(buffer.get(3, 64, 7), MaterialId(5));
        assert_eq!(buffer.get(3, 65, 7), MaterialId::AIR);
        assert_eq!(buffer.get(4, 64, 7), MaterialId::AIR);
    }

    #[test]
    fn test_negative_heights_addressable() {
        let mut buffer = ChunkBuffer::new(-64, 64);
        buffer.set_block(0, -64, 0, MaterialId(1));
        buffer.set_block(0, -1, 0, MaterialId(2));
        assert_eq!(buffer.get(0, -64, 0), MaterialId(1));
        assert_eq!(buffer.get(0, -1, 0), MaterialId(2));
    }

    #[test]
    fn test_out_of_bounds_writes_discarded() {
        let mut buffer = ChunkBuffer::new(0, 64);
        buffer.set_block(0, -1, 0, MaterialId(1));
        buffer.set_block(0, 64, 0, MaterialId(1));
        // Nothing was stored and the buffer remains uniform.
        assert_eq!(buffer.bit_width(), 0);
        assert_eq!(buffer.get(0, 0, 0), MaterialId::AIR);
    }

    #[test]
    fn test_bit_width_widens_with_palette() {
        let mut buffer = ChunkBuffer::new(0, 32);
        assert_eq!(buffer.bit_width(), 0);
        for i in 1..=4u16 {
            buffer.set_block(i as usize, 0, 0, MaterialId(i));
        }
        assert_eq!(buffer.palette_len(), 5);
        assert_eq!(buffer.bit_width(), 4);
        // Earlier writes survive the widening.
        assert_eq!(buffer.get(1, 0, 0), MaterialId(1));
        assert_eq!(buffer.get(4, 0, 0), MaterialId(4));
    }

    #[test]
    fn test_content_hash_detects_differences() {
        let mut a = ChunkBuffer::new(0, 64);
        let mut b = ChunkBuffer::new(0, 64);
        a.set_block(1, 10, 1, MaterialId(3));
        b.set_block(1, 10, 1, MaterialId(3));
        assert_eq!(a.content_hash(), b.content_hash());

        b.set_block(1, 11, 1, MaterialId(3));
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_chunk_pos_base_coordinates() {
        let pos = ChunkPos::new(-2, 3);
        assert_eq!(pos.base_x(), -32);
        assert_eq!(pos.base_z(), 48);
    }
}
