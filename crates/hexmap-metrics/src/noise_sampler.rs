//! Four-channel fractal noise used to perturb vertex positions.
//!
//! Each channel is an independent fBm stack over simplex noise, sampled in the
//! XZ plane so that vertices at the same horizontal position always move the
//! same way regardless of height. This keeps shared edges between cells and
//! chunks watertight.

use glam::{Vec3, Vec4};
use noise::{NoiseFn, Simplex};

/// Settings for the perturbation sampler.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    /// Base seed; channel `i` uses `seed + i`.
    pub seed: u32,
    /// World-to-noise scale applied to X and Z before sampling.
    pub scale: f64,
    /// Octaves per channel.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 0.003,
            octaves: 3,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

/// Pure function of position returning four values in `[0, 1]`.
#[derive(Clone)]
pub struct NoiseSampler {
    channels: [Simplex; 4],
    params: NoiseParams,
}

impl std::fmt::Debug for NoiseSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseSampler")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl NoiseSampler {
    /// Create a sampler with one simplex generator per channel.
    pub fn new(params: NoiseParams) -> Self {
        let seed = params.seed;
        let channels = [
            Simplex::new(seed),
            Simplex::new(seed.wrapping_add(1)),
            Simplex::new(seed.wrapping_add(2)),
            Simplex::new(seed.wrapping_add(3)),
        ];
        Self { channels, params }
    }

    /// Sample all four channels at the XZ projection of `position`.
    pub fn sample(&self, position: Vec3) -> Vec4 {
        let x = position.x as f64 * self.params.scale;
        let z = position.z as f64 * self.params.scale;
        Vec4::new(
            self.fbm(&self.channels[0], x, z),
            self.fbm(&self.channels[1], x, z),
            self.fbm(&self.channels[2], x, z),
            self.fbm(&self.channels[3], x, z),
        )
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    fn fbm(&self, noise: &Simplex, x: f64, z: f64) -> f32 {
        let mut total = 0.0;
        let mut norm = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;

        for _ in 0..self.params.octaves.max(1) {
            total += noise.get([x * frequency, z * frequency]) * amplitude;
            norm += amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        ((total / norm) * 0.5 + 0.5).clamp(0.0, 1.0) as f32
    }
}

impl Default for NoiseSampler {
    fn default() -> Self {
        Self::new(NoiseParams::default())
    }
}
