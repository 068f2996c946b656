//! Turns one surface height into a vertical block column.

use mesa_voxel::{BlockPalette, ChunkSink, MaterialId};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Thickness of the subsurface band directly under the surface block.
const SUBSURFACE_DEPTH: i32 = 3;

/// Writes the layered column for one surface height into a sink.
///
/// Layering from the bottom up: floor marker at the sink's minimum height,
/// base fill, a thin subsurface band, the surface block, and above it either
/// a rare decoration or, for columns below sea level, liquid up to sea level.
pub struct ColumnMaterializer {
    palette: BlockPalette,
    floor: MaterialId,
    sea_level: i32,
    decoration_probability: f64,
    decorations_enabled: bool,
}

impl ColumnMaterializer {
    pub fn new(
        palette: BlockPalette,
        floor: MaterialId,
        sea_level: i32,
        decoration_probability: f64,
        decorations_enabled: bool,
    ) -> Self {
        Self {
            palette,
            floor,
            sea_level,
            decoration_probability: decoration_probability.clamp(0.0, 1.0),
            decorations_enabled,
        }
    }

    pub fn palette(&self) -> &BlockPalette {
        &self.palette
    }

    /// Fills the column at `(local_x, local_z)` up to `surface_y`.
    ///
    /// The surface height is clamped to the sink's writable range first, so
    /// a sink narrower than the configured height span still gets a closed
    /// surface. `rng` is the column's private stream; one draw decides
    /// decoration placement.
    pub fn fill<S: ChunkSink>(
        &self,
        sink: &mut S,
        local_x: usize,
        local_z: usize,
        surface_y: i32,
        rng: &mut ChaCha8Rng,
    ) {
        let floor_y = sink.min_height();
        let ceiling = sink.max_height();
        let height = surface_y.clamp(floor_y, ceiling - 1);

        sink.set_block(local_x, floor_y, local_z, self.floor);

        let subsurface_start = (height - SUBSURFACE_DEPTH).max(floor_y + 1);
        for y in (floor_y + 1)..subsurface_start {
            sink.set_block(local_x, y, local_z, self.palette.base);
        }
        for y in subsurface_start..height {
            sink.set_block(local_x, y, local_z, self.palette.subsurface);
        }
        sink.set_block(local_x, height, local_z, self.palette.surface);

        if height < self.sea_level {
            for y in (height + 1)..=self.sea_level.min(ceiling - 1) {
                sink.set_block(local_x, y, local_z, self.palette.liquid);
            }
        } else if self.decorations_enabled
            && height + 1 < ceiling
            && rng.random::<f64>() < self.decoration_probability
        {
            sink.set_block(local_x, height + 1, local_z, self.palette.decoration);
        }
    }
}
