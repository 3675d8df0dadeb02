use async_trait::async_trait;
use fxhash::hash64;

use crate::config::EmbedConfig;
use crate::error::EmbedError;
use crate::normalize::l2_normalize_in_place;
use crate::Embedder;

/// Deterministic embedder for tests and local runs.
///
/// Generates sinusoid values derived from a hash of the input text, so the
/// same text always yields the same vector with minimal CPU cost. Not a
/// semantic embedding; similarity of stub vectors only reflects text
/// equality.
pub struct StubEmbedder {
    dim: usize,
    normalize: bool,
}

impl StubEmbedder {
    pub fn new(cfg: &EmbedConfig) -> Self {
        Self {
            dim: cfg.dim,
            normalize: cfg.normalize,
        }
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(&EmbedConfig::default())
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut v = vec![0f32; self.dim];
        let h = hash64(text.as_bytes());
        for (idx, value) in v.iter_mut().enumerate() {
            *value = ((h >> (idx % 32)) as f32 * 0.0001).sin();
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_same_vector() {
        let embedder = StubEmbedder::default();
        let a = embedder.embed("brown leather wallet").await.expect("embed");
        let b = embedder.embed("brown leather wallet").await.expect("embed");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn different_text_different_vector() {
        let embedder = StubEmbedder::default();
        let a = embedder.embed("brown leather wallet").await.expect("embed");
        let b = embedder.embed("steel water bottle").await.expect("embed");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn vector_has_configured_dimension() {
        let cfg = EmbedConfig {
            dim: 16,
            ..EmbedConfig::default()
        };
        let embedder = StubEmbedder::new(&cfg);
        let v = embedder.embed("anything").await.expect("embed");
        assert_eq!(v.len(), 16);
    }

    #[tokio::test]
    async fn normalized_output_has_unit_length() {
        let embedder = StubEmbedder::default();
        let v = embedder.embed("umbrella").await.expect("embed");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }
}
