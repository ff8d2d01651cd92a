/// Synthetic sensor reading generation.
///
/// Draws each of the six features independently and uniformly from the
/// crop's historical [min, max] envelope. Independence across features is
/// intentional: no covariance between features is modeled, each is sampled
/// on its own marginal range.
///
/// # RNG injection
/// `generate_with` accepts the random generator so tests can pass a seeded
/// `StdRng` and stay deterministic; `generate` is the production wrapper
/// over `thread_rng`.

use rand::Rng;

use crate::model::FeatureVector;

use super::stats::CropStats;

/// Generates a parameter vector for `crop`, or `None` when the crop has no
/// aggregates. An unknown crop is a skippable outcome, never an error.
pub fn generate(stats: &CropStats, crop: &str) -> Option<FeatureVector> {
    generate_with(stats, crop, &mut rand::thread_rng())
}

/// As `generate`, with an explicit RNG.
pub fn generate_with(stats: &CropStats, crop: &str, rng: &mut impl Rng) -> Option<FeatureVector> {
    let agg = stats.get(crop)?;

    let mut values = [0.0; 6];
    for i in 0..6 {
        let drawn = rng.gen_range(agg.min[i]..=agg.max[i]);
        // Rounding can step just past an envelope bound when the bound
        // itself carries more than 3 decimals; clamp to keep the contract
        // that every component lies within [min, max].
        values[i] = round3(drawn).clamp(agg.min[i], agg.max[i]);
    }
    Some(values)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
