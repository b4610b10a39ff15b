//! Face embedding vectors and their stored representation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Fixed-length feature vector describing one face.
///
/// Stored as a JSON array in `face_encodings.encoding_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding {
    values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialized form written to `encoding_data`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.values)
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Euclidean distance, or `None` when the vectors have different lengths.
    pub fn euclidean_distance(&self, other: &Embedding) -> Option<f32> {
        if self.values.len() != other.values.len() {
            return None;
        }
        let sum: f32 = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum();
        Some(sum.sqrt())
    }

    /// Similarity in `(0, 1]`: `1 / (1 + distance)`. Identical vectors score 1.
    ///
    /// Vectors of different lengths come from incompatible engines and score 0.
    pub fn similarity(&self, other: &Embedding) -> f32 {
        self.euclidean_distance(other)
            .map(|d| 1.0 / (1.0 + d))
            .unwrap_or(0.0)
    }
}

/// SHA-256 hex digest of a serialized embedding (`encoding_hash`).
pub fn encoding_hash(encoding_data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(encoding_data.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_similarity_one() {
        let a = Embedding::new(vec![0.6, 0.8]);
        assert!((a.similarity(&a.clone()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_unit_vectors() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![0.0, 1.0]);
        let expected = 1.0 / (1.0 + 2f32.sqrt());
        assert!((a.similarity(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn length_mismatch_never_matches() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![1.0, 0.0, 0.0]);
        assert_eq!(a.euclidean_distance(&b), None);
        assert_eq!(a.similarity(&b), 0.0);
    }

    #[test]
    fn json_is_a_plain_array() {
        let a = Embedding::new(vec![0.5, -0.25]);
        let json = a.to_json().unwrap();
        assert_eq!(json, "[0.5,-0.25]");
        assert_eq!(Embedding::from_json(&json).unwrap(), a);
    }

    #[test]
    fn hash_is_stable_hex() {
        let h = encoding_hash("[0.5,-0.25]");
        assert_eq!(h.len(), 64);
        assert_eq!(h, encoding_hash("[0.5,-0.25]"));
        assert_ne!(h, encoding_hash("[0.5,-0.26]"));
    }
}
