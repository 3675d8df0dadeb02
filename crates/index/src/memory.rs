use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::IndexError;
use crate::{Neighbor, VectorIndex};

/// Brute-force cosine index over an in-memory map, for tests and local
/// runs.
pub struct InMemoryIndex {
    vectors: RwLock<HashMap<String, Vec<f32>>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self {
            vectors: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn upsert(&self, id: &str, vector: &[f32]) -> Result<(), IndexError> {
        self.vectors
            .write()
            .map_err(|_| IndexError::backend("poisoned lock"))?
            .insert(id.to_string(), vector.to_vec());
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Neighbor>, IndexError> {
        let guard = self
            .vectors
            .read()
            .map_err(|_| IndexError::backend("poisoned lock"))?;

        let mut neighbors: Vec<Neighbor> = guard
            .iter()
            .filter(|(_, stored)| stored.len() == vector.len())
            .map(|(id, stored)| Neighbor {
                id: id.clone(),
                score: cosine_similarity(vector, stored),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        neighbors.truncate(top_k);
        Ok(neighbors)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
