use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_B: f32 = 0.75;
pub const DEFAULT_K: f32 = 1.75;

/// BM25 tunables: `b` controls length normalization, `k` term-frequency saturation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    pub b: f32,
    pub k: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { b: DEFAULT_B, k: DEFAULT_K }
    }
}

impl Bm25Params {
    pub fn new(b: f32, k: f32) -> Result<Self> {
        let params = Self { b, k };
        params.validate()?;
        Ok(params)
    }

    /// `b` must lie in [0, 1]; `k` must be non-negative (infinity allowed).
    pub fn validate(&self) -> Result<()> {
        if self.b.is_nan() || !(0.0..=1.0).contains(&self.b) {
            return Err(Error::InvalidParameter { name: "b", value: self.b, reason: "must be within [0, 1]" });
        }
        if self.k.is_nan() || self.k < 0.0 {
            return Err(Error::InvalidParameter { name: "k", value: self.k, reason: "must be >= 0" });
        }
        Ok(())
    }

    /// Saturated, length-normalized term frequency. `k == 0` saturates to 1.
    pub fn tf_weight(&self, tf: u32, doc_len: u32, avgdl: f32) -> f32 {
        if self.k == 0.0 {
            return 1.0;
        }
        let tf = tf as f32;
        let norm = 1.0 - self.b + self.b * doc_len as f32 / avgdl;
        tf * (1.0 + 1.0 / self.k) / (norm + tf / self.k)
    }
}

/// `log2(N / df)`; zero when the term occurs in every record.
pub fn idf(num_records: usize, df: usize) -> f32 {
    (num_records as f32 / df as f32).log2()
}
