//! Optional coherent noise layer over the plateau heights.

use noise::{NoiseFn, Simplex};

/// Low-frequency simplex noise sampled per column and added to the plateau
/// height. Unlike the per-cell offset, the overlay is continuous across cell
/// boundaries, which softens the hard steps between plateaus.
pub struct NoiseOverlay {
    noise: Simplex,
    frequency: f64,
    amplitude: f64,
}

impl NoiseOverlay {
    pub const DEFAULT_FREQUENCY: f64 = 0.005;
    pub const DEFAULT_AMPLITUDE: f64 = 3.0;

    /// Overlay with the default frequency and amplitude, seeded from the
    /// world seed so two worlds do not share a noise field.
    pub fn new(world_seed: u64) -> Self {
        Self::with_params(
            world_seed,
            Self::DEFAULT_FREQUENCY,
            Self::DEFAULT_AMPLITUDE,
        )
    }

    pub fn with_params(world_seed: u64, frequency: f64, amplitude: f64) -> Self {
        Self {
            noise: Simplex::new(world_seed as u32),
            frequency,
            amplitude,
        }
    }

    /// Height delta for a column, in `[-amplitude, amplitude]`.
    pub fn sample(&self, world_x: i64, world_z: i64) -> f64 {
        let value = self.noise.get([
            world_x as f64 * self.frequency,
            world_z as f64 * self.frequency,
        ]);
        value * self.amplitude
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
}
