/// Nearest-neighbor index over the 6-dimensional feature space.
///
/// A brute-force Euclidean index: every validated record contributes one
/// (feature vector, label code) entry, and queries scan all of them. The
/// curated dataset is small enough that no spatial structure is needed.
///
/// Distances are computed over raw feature units — no scaling or
/// normalization is applied. Feature scales differ substantially (rainfall
/// in hundreds, humidity in tens), so high-magnitude features dominate the
/// metric. This matches the historical behavior the recommendation outputs
/// were tuned against; normalizing would change the suggestions.

use crate::model::{CropRecord, FeatureVector};

use super::codec::LabelCodec;

/// One stored neighbor, returned in increasing-distance order.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub distance: f64,
    pub label_code: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NeighborIndex {
    points: Vec<(FeatureVector, usize)>,
}

impl NeighborIndex {
    /// Fits the index over all feature table rows. Entry order is table
    /// row order, which defines the tie-break for equal distances.
    pub fn fit(records: &[CropRecord], codec: &LabelCodec) -> Self {
        let points = records
            .iter()
            .filter_map(|r| Some((r.features(), codec.encode(&r.crop_type)?)))
            .collect();
        NeighborIndex { points }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The `k` entries closest to `target`, ordered by increasing distance.
    ///
    /// Ties are broken by insertion order (stable sort over entries kept in
    /// table row order). `k` larger than the index yields every entry.
    pub fn query(&self, target: &FeatureVector, k: usize) -> Vec<Neighbor> {
        let mut ranked: Vec<Neighbor> = self
            .points
            .iter()
            .map(|(features, code)| Neighbor {
                distance: euclidean(features, target),
                label_code: *code,
            })
            .collect();

        // Vec::sort_by is stable, so equal distances keep insertion order.
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked.truncate(k);
        ranked
    }
}

fn euclidean(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
