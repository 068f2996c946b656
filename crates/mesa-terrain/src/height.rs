//! Surface height sampling.
//!
//! Two policies share one entry point. The canonical edge-smoothed policy
//! gives each plateau cell a seeded base offset plus a Gaussian perturbation
//! that fades to zero near cell edges. The staircase policy is a pure
//! modulo pattern with no randomness at all.

use mesa_config::{GenerationConfig, StepPolicy};
use rand::Rng;

use crate::overlay::NoiseOverlay;
use crate::seed::{bounded_normal, cell_rng};
use crate::step::cell_of;

/// Fraction of `step_width` over which the edge fade ramps from 0 to 1.
const EDGE_BAND_FRACTION: f64 = 0.1;

/// Samples surface heights for a fixed seed and configuration.
///
/// Heights are a pure function of `(seed, world_x, world_z)`; the sampler
/// holds no mutable state and is safe to share across worker threads.
pub struct PlateauHeightSampler {
    seed: u64,
    config: GenerationConfig,
    overlay: Option<NoiseOverlay>,
}

impl PlateauHeightSampler {
    /// The configuration is sanitized on construction, so out-of-range
    /// values from disk cannot reach the sampling math.
    pub fn new(seed: u64, config: &GenerationConfig) -> Self {
        let config = config.sanitized();
        let overlay = config.noise_overlay.then(|| NoiseOverlay::new(seed));
        Self {
            seed,
            config,
            overlay,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Surface height for the column at `(world_x, world_z)`, clamped to
    /// `[min_height, max_height)`.
    pub fn sample(&self, world_x: i64, world_z: i64) -> i32 {
        let raw = match self.config.step_policy {
            StepPolicy::EdgeSmoothed => self.edge_smoothed_height(world_x, world_z),
            StepPolicy::Staircase => self.staircase_height(world_x, world_z),
        };

        let raw = match &self.overlay {
            Some(overlay) => raw + overlay.sample(world_x, world_z),
            None => raw,
        };

        (libm::floor(raw) as i32).clamp(self.config.min_height, self.config.max_height - 1)
    }

    /// Canonical policy: seeded per-cell offset plus an edge-faded Gaussian.
    fn edge_smoothed_height(&self, world_x: i64, world_z: i64) -> f64 {
        let width = self.config.step_width;
        let (cell_x, off_x) = cell_of(world_x, width);
        let (cell_z, off_z) = cell_of(world_z, width);

        let mut rng = cell_rng(self.seed, cell_x, cell_z);

        // Uniform base offset spanning [-max_variation/2, +max_variation/2].
        let half = self.config.max_variation / 2;
        let offset = rng.random_range(-half..=half);

        let perturbation = bounded_normal(&mut rng) * f64::from(self.config.step_height) * 0.5;

        f64::from(self.config.base_height)
            + f64::from(offset)
            + perturbation * Self::edge_factor(off_x, off_z, width)
    }

    /// Ramps from 0 at a cell edge to 1 past the edge band, so the Gaussian
    /// perturbation vanishes where two cells meet.
    fn edge_factor(off_x: i32, off_z: i32, step_width: i32) -> f64 {
        let edge_distance = off_x.min(step_width - off_x).min(off_z).min(step_width - off_z);
        let band = f64::from(step_width) * EDGE_BAND_FRACTION;
        (f64::from(edge_distance) / band).clamp(0.0, 1.0)
    }

    /// Alternate policy: interleaved modulo staircases, fully deterministic
    /// without any RNG. Euclidean modulo keeps the pattern consistent on
    /// negative coordinates.
    fn staircase_height(&self, world_x: i64, world_z: i64) -> f64 {
        let width = i64::from(self.config.step_width);
        let step_height = i64::from(self.config.step_height);
        let cell_x = world_x.div_euclid(width);
        let cell_z = world_z.div_euclid(width);

        let fine = (cell_x + cell_z).rem_euclid(8) * step_height;
        let coarse = (cell_x.div_euclid(3) + cell_z.div_euclid(3)).rem_euclid(4) * step_height * 2;

        (i64::from(self.config.base_height) + fine + coarse) as f64
    }
}
