/// Per-crop aggregate statistics over the feature table.
///
/// For each crop: the arithmetic mean per feature (baseline reporting)
/// and the per-feature (min, max) envelope (bounded synthetic sampling).
/// Computed once per feature table build, never incrementally.

use std::collections::BTreeMap;

use crate::model::{CropRecord, FeatureVector};

/// Aggregates for one crop. Invariant: min ≤ mean ≤ max componentwise.
#[derive(Debug, Clone, PartialEq)]
pub struct CropAggregate {
    pub mean: FeatureVector,
    pub min: FeatureVector,
    pub max: FeatureVector,
    pub count: usize,
}

/// Aggregates for every crop in the table, keyed by crop name.
///
/// A `BTreeMap` keeps report iteration in sorted crop order.
#[derive(Debug, Clone, Default)]
pub struct CropStats {
    by_crop: BTreeMap<String, CropAggregate>,
}

struct Accumulator {
    sum: FeatureVector,
    min: FeatureVector,
    max: FeatureVector,
    count: usize,
}

impl CropStats {
    /// Computes aggregates from the feature table in one pass.
    pub fn compute(records: &[CropRecord]) -> Self {
        let mut acc: BTreeMap<String, Accumulator> = BTreeMap::new();

        for record in records {
            let features = record.features();
            let entry = acc.entry(record.crop_type.clone()).or_insert(Accumulator {
                sum: [0.0; 6],
                min: features,
                max: features,
                count: 0,
            });
            for i in 0..6 {
                entry.sum[i] += features[i];
                entry.min[i] = entry.min[i].min(features[i]);
                entry.max[i] = entry.max[i].max(features[i]);
            }
            entry.count += 1;
        }

        let by_crop = acc
            .into_iter()
            .map(|(crop, a)| {
                let mut mean = [0.0; 6];
                for i in 0..6 {
                    mean[i] = a.sum[i] / a.count as f64;
                }
                (
                    crop,
                    CropAggregate {
                        mean,
                        min: a.min,
                        max: a.max,
                        count: a.count,
                    },
                )
            })
            .collect();

        CropStats { by_crop }
    }

    /// Aggregates for one crop, or `None` if the crop is not in the table.
    pub fn get(&self, crop: &str) -> Option<&CropAggregate> {
        self.by_crop.get(crop)
    }

    /// All aggregates in sorted crop order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CropAggregate)> {
        self.by_crop.iter()
    }

    /// Number of distinct crops.
    pub fn len(&self) -> usize {
        self.by_crop.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_crop.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
