use crate::core::bounds::Bound;
use rand::Rng;

/// Fraction of the initial neighborhood that is shed by the final generation.
const PATCH_SHRINK: f64 = 0.9;

/// Neighborhood half-width for a generation, shrinking linearly from `ngh` towards `0.1 * ngh`.
#[inline]
pub fn patch_width(ngh: f64, iteration: usize, max_iterations: usize) -> f64 {
    ngh * (1.0 - PATCH_SHRINK * iteration as f64 / max_iterations as f64)
}

/// Draws a scout uniformly over the full search box.
pub fn scout(bounds: &[Bound], rng: &mut impl Rng) -> Vec<f64> {
    bounds.iter().map(|bound| bound.sample(rng)).collect()
}

/// Draws a recruit around `site`: every dimension is offset independently by a uniform amount
/// in `[-patch, +patch] * range` and clipped back into its bound.
pub fn recruit(site: &[f64], bounds: &[Bound], patch: f64, rng: &mut impl Rng) -> Vec<f64> {
    site.iter()
        .zip(bounds)
        .map(|(&value, bound)| {
            let offset = if patch > 0.0 {
                rng.gen_range(-patch..=patch) * bound.width()
            } else {
                0.0
            };
            bound.clamp(value + offset)
        })
        .collect()
}
