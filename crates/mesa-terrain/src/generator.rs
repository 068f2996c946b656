//! The chunk generation facade tying heights, biomes, and columns together.

use mesa_config::Config;
use mesa_voxel::{CHUNK_WIDTH, ChunkBuffer, ChunkPos, ChunkSink, MaterialId, MaterialRegistry};
use tracing::debug;

use crate::biome::{BiomeId, BiomeRegistry, SingleBiomeClassifier};
use crate::column::ColumnMaterializer;
use crate::height::PlateauHeightSampler;
use crate::seed::column_rng;

/// Generates stepped-plateau chunks for one world.
///
/// Immutable after construction; every method takes `&self`, so one instance
/// can be shared across worker threads behind an `Arc` with no locking.
pub struct PlateauGenerator {
    seed: u64,
    height: PlateauHeightSampler,
    materializer: ColumnMaterializer,
    classifier: SingleBiomeClassifier,
    biomes: BiomeRegistry,
    generate_structures: bool,
    generate_decorations: bool,
    generate_caves: bool,
    log_generation: bool,
}

impl PlateauGenerator {
    /// Builds a generator for a world with the given seed and biome.
    ///
    /// Material names from the biome palettes are resolved against
    /// `materials` up front; generation itself never touches strings.
    pub fn new(seed: u64, biome: &str, config: &Config, materials: &MaterialRegistry) -> Self {
        let biomes = BiomeRegistry::from_config(&config.biomes, materials);
        let classifier =
            SingleBiomeClassifier::resolve(biome, &biomes, &config.biomes.default_biome);
        let palette = biomes
            .get(classifier.biome())
            .map(|def| def.palette)
            .expect("classifier always resolves to a registered biome");

        let floor = materials
            .lookup_by_name(&config.world.floor_block)
            .unwrap_or(MaterialId::AIR);
        let generation = config.generation.sanitized();
        let materializer = ColumnMaterializer::new(
            palette,
            floor,
            generation.sea_level,
            config.world.decoration_probability,
            config.world.generate_decorations,
        );

        Self {
            seed,
            height: PlateauHeightSampler::new(seed, &generation),
            materializer,
            classifier,
            biomes,
            generate_structures: config.world.generate_structures,
            generate_decorations: config.world.generate_decorations,
            generate_caves: config.world.generate_caves,
            log_generation: config.debug.log_generation,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Surface height at a world column, without materializing anything.
    pub fn surface_height(&self, world_x: i64, world_z: i64) -> i32 {
        self.height.sample(world_x, world_z)
    }

    pub fn biome_at(&self, x: i64, y: i32, z: i64) -> BiomeId {
        self.classifier.biome_at(x, y, z)
    }

    pub fn enabled_biomes(&self) -> [BiomeId; 1] {
        self.classifier.enabled_biomes()
    }

    pub fn biome_registry(&self) -> &BiomeRegistry {
        &self.biomes
    }

    /// Pass-through toggle for the host's structure pass.
    pub fn should_generate_structures(&self) -> bool {
        self.generate_structures
    }

    pub fn should_generate_decorations(&self) -> bool {
        self.generate_decorations
    }

    pub fn should_generate_caves(&self) -> bool {
        self.generate_caves
    }

    /// Generates the 16x16 chunk at `(chunk_x, chunk_z)` into the sink.
    pub fn generate<S: ChunkSink>(&self, chunk_x: i32, chunk_z: i32, sink: &mut S) {
        let base_x = i64::from(chunk_x) * CHUNK_WIDTH as i64;
        let base_z = i64::from(chunk_z) * CHUNK_WIDTH as i64;

        for local_z in 0..CHUNK_WIDTH {
            for local_x in 0..CHUNK_WIDTH {
                let world_x = base_x + local_x as i64;
                let world_z = base_z + local_z as i64;
                let surface_y = self.height.sample(world_x, world_z);
                let mut rng = column_rng(self.seed, world_x, world_z);
                self.materializer
                    .fill(sink, local_x, local_z, surface_y, &mut rng);
            }
        }

        if self.log_generation {
            debug!(chunk_x, chunk_z, "generated chunk");
        }
    }

    /// Convenience wrapper producing an in-memory buffer spanning the
    /// configured height range.
    pub fn generate_chunk(&self, pos: ChunkPos) -> ChunkBuffer {
        let config = self.height.config();
        // One extra layer above max_height leaves room for decorations on
        // columns clamped to the top of the range.
        let mut buffer = ChunkBuffer::new(config.min_height.min(0), config.max_height + 1);
        self.generate(pos.x, pos.z, &mut buffer);
        buffer
    }
}
