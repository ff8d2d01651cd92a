/// Label codec: bidirectional mapping between crop labels and dense codes.
///
/// Codes are assigned in order of first appearance in the validated
/// feature table, which makes the mapping deterministic within one build.
/// Codes are not stable across rebuilds and must never be persisted or
/// compared between builds.

use std::collections::HashMap;

use crate::model::CropRecord;

#[derive(Debug, Clone, Default)]
pub struct LabelCodec {
    labels: Vec<String>,
    codes: HashMap<String, usize>,
}

impl LabelCodec {
    /// Builds the codec from the feature table in one pass.
    pub fn fit(records: &[CropRecord]) -> Self {
        let mut codec = LabelCodec::default();
        for record in records {
            if !codec.codes.contains_key(&record.crop_type) {
                codec
                    .codes
                    .insert(record.crop_type.clone(), codec.labels.len());
                codec.labels.push(record.crop_type.clone());
            }
        }
        codec
    }

    /// The dense code for a label. `None` if the label was never seen.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.codes.get(label).copied()
    }

    /// The label for a code. Total over codes in `[0, len)`.
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels, in code order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(crop: &str) -> CropRecord {
        CropRecord {
            temperature: 20.0,
            humidity: 80.0,
            rainfall: 200.0,
            nitrogen: 40.0,
            potassium: 30.0,
            phosphorous: 20.0,
            crop_type: crop.to_string(),
        }
    }

    #[test]
    fn test_codes_follow_first_appearance() {
        let records = vec![record("Rice"), record("Wheat"), record("Rice"), record("Maize")];
        let codec = LabelCodec::fit(&records);
        assert_eq!(codec.encode("Rice"), Some(0));
        assert_eq!(codec.encode("Wheat"), Some(1));
        assert_eq!(codec.encode("Maize"), Some(2));
        assert_eq!(codec.len(), 3);
    }

    #[test]
    fn test_decode_is_total_over_valid_codes() {
        let codec = LabelCodec::fit(&[record("Rice"), record("Wheat")]);
        for code in 0..codec.len() {
            assert!(
                codec.decode(code).is_some(),
                "decode must succeed for every code below len()"
            );
        }
        assert_eq!(codec.decode(codec.len()), None);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = LabelCodec::fit(&[record("Rice"), record("Wheat"), record("Maize")]);
        for label in codec.labels() {
            let code = codec.encode(label).expect("seen label must encode");
            assert_eq!(codec.decode(code), Some(label.as_str()));
        }
    }

    #[test]
    fn test_unseen_label_fails_to_encode() {
        let codec = LabelCodec::fit(&[record("Rice")]);
        assert_eq!(codec.encode("Barley"), None);
    }

    #[test]
    fn test_empty_table_yields_empty_codec() {
        let codec = LabelCodec::fit(&[]);
        assert!(codec.is_empty());
        assert_eq!(codec.decode(0), None);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let records = vec![record("Wheat"), record("Rice"), record("Wheat")];
        let a = LabelCodec::fit(&records);
        let b = LabelCodec::fit(&records);
        assert_eq!(a.labels(), b.labels(), "same input must produce same codes");
    }
}
