/// The in-memory recommendation engine.
///
/// `CropModel` is the immutable context built once at startup from the
/// validated feature table: the label codec, the nearest-neighbor index,
/// and the per-crop aggregates. It is passed by reference into request
/// handlers and is safe for unsynchronized concurrent reads — nothing in
/// it mutates after `fit`.
///
/// Submodules:
/// - `codec` — crop label ↔ dense code mapping.
/// - `neighbors` — Euclidean nearest-neighbor index.
/// - `stats` — per-crop mean and min/max envelope.
/// - `synth` — bounded uniform synthetic readings.

use crate::model::{CropRecord, FeatureVector};

pub mod codec;
pub mod neighbors;
pub mod stats;
pub mod synth;

use codec::LabelCodec;
use neighbors::NeighborIndex;
use stats::CropStats;

/// Neighbors fetched per suggestion query. Larger than the suggestion
/// limit so deduplication still has material to work with.
pub const NEIGHBOR_POOL: usize = 5;

/// Maximum distinct crops returned by a suggestion.
pub const MAX_SUGGESTIONS: usize = 3;

pub struct CropModel {
    records: Vec<CropRecord>,
    codec: LabelCodec,
    index: NeighborIndex,
    stats: CropStats,
}

impl CropModel {
    /// Builds the full model from the validated feature table. An empty
    /// table is valid and produces a model that suggests nothing.
    pub fn fit(records: Vec<CropRecord>) -> Self {
        let codec = LabelCodec::fit(&records);
        let index = NeighborIndex::fit(&records, &codec);
        let stats = CropStats::compute(&records);
        CropModel {
            records,
            codec,
            index,
            stats,
        }
    }

    /// Up to `MAX_SUGGESTIONS` distinct crop names for the given
    /// conditions, ordered by proximity.
    ///
    /// Queries `NEIGHBOR_POOL` nearest neighbors, decodes their labels,
    /// and scans nearest-first, keeping each label once. Returns fewer
    /// than three entries when the neighborhood holds fewer distinct
    /// labels, and none at all only for an empty feature table.
    pub fn suggest(&self, features: &FeatureVector) -> Vec<String> {
        let mut suggestions: Vec<String> = Vec::with_capacity(MAX_SUGGESTIONS);

        for neighbor in self.index.query(features, NEIGHBOR_POOL) {
            let Some(label) = self.codec.decode(neighbor.label_code) else {
                continue;
            };
            if !suggestions.iter().any(|s| s == label) {
                suggestions.push(label.to_string());
            }
            if suggestions.len() == MAX_SUGGESTIONS {
                break;
            }
        }

        suggestions
    }

    /// Synthetic parameter vector for `crop`, or `None` for unknown crops.
    pub fn generate(&self, crop: &str) -> Option<FeatureVector> {
        synth::generate(&self.stats, crop)
    }

    pub fn stats(&self) -> &CropStats {
        &self.stats
    }

    pub fn codec(&self) -> &LabelCodec {
        &self.codec
    }

    /// Rows retained in the feature table.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Distinct crops in the feature table.
    pub fn crop_count(&self) -> usize {
        self.codec.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
