//! Random point clouds in 2D (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic inputs for property tests and benchmarks of `polygon_sort`.
//!
//! Model
//! - Star clouds: `n` equally spaced angles on [0, 2π) with bounded angular
//!   and radial jitter around `center`, then shuffled so file order carries no
//!   angular information.
//! - Uniform clouds: i.i.d. points in an axis-aligned box.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::types::{Point, PointSet};

/// Point count distribution.
#[derive(Clone, Copy, Debug)]
pub enum PointCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl PointCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            PointCount::Fixed(n) => n.max(1),
            PointCount::Uniform { min, max } => {
                let lo = min.max(1);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Star-cloud sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct CloudCfg {
    pub count: PointCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub base_radius: f64,
    pub center: Vector2<f64>,
}
impl Default for CloudCfg {
    fn default() -> Self {
        Self {
            count: PointCount::Fixed(12),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            center: Vector2::zeros(),
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a shuffled point cloud that is star-shaped around `cfg.center`.
pub fn draw_star_cloud(cfg: CloudCfg, tok: ReplayToken) -> PointSet {
    let mut rng = tok.to_std_rng();
    let n = cfg.count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.99);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = rng.gen::<f64>() * std::f64::consts::TAU;
    let mut pts: Vec<Point> = (0..n)
        .map(|k| {
            let th = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj) * r0;
            cfg.center + Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    pts.shuffle(&mut rng);
    PointSet::new(pts).unwrap_or_default()
}

/// Draw `n` points uniformly from `[-half_extent, half_extent]²`.
pub fn draw_uniform_cloud(n: usize, half_extent: f64, tok: ReplayToken) -> PointSet {
    let mut rng = tok.to_std_rng();
    let h = half_extent.abs().max(1e-9);
    let pts = (0..n)
        .map(|_| Vector2::new(rng.gen_range(-h..=h), rng.gen_range(-h..=h)))
        .collect();
    PointSet::new(pts).unwrap_or_default()
}
