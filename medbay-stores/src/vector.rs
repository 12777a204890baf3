//! Vector store seam and an in-memory cosine-similarity implementation.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Dense embedding vector validated at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Creates an embedding from raw components.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] if the vector is empty or
    /// contains non-finite components.
    pub fn new(components: Vec<f32>) -> StoreResult<Self> {
        if components.is_empty() {
            return Err(StoreError::InvalidInput {
                reason: "embedding cannot be empty".into(),
            });
        }
        if components.iter().any(|c| !c.is_finite()) {
            return Err(StoreError::InvalidInput {
                reason: "embedding components must be finite".into(),
            });
        }
        Ok(Self(components))
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the embedding holds no components.
    ///
    /// Always false for validated embeddings; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn dot(&self, other: &Self) -> f32 {
        self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum()
    }

    fn magnitude(&self) -> f32 {
        self.0.iter().map(|c| c * c).sum::<f32>().sqrt()
    }
}

/// Record stored in a vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPoint {
    id: Uuid,
    embedding: Embedding,
    #[serde(default)]
    metadata: Value,
}

impl VectorPoint {
    /// Creates a point with no metadata.
    #[must_use]
    pub fn new(id: Uuid, embedding: Embedding) -> Self {
        Self {
            id,
            embedding,
            metadata: Value::Null,
        }
    }

    /// Attaches metadata to the point.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the embedding.
    #[must_use]
    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    /// Returns the metadata payload.
    #[must_use]
    pub fn metadata(&self) -> &Value {
        &self.metadata
    }
}

/// Similarity query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorQuery {
    embedding: Embedding,
    top_k: NonZeroUsize,
}

impl VectorQuery {
    /// Creates a query for the `top_k` nearest points.
    #[must_use]
    pub fn new(embedding: Embedding, top_k: NonZeroUsize) -> Self {
        Self { embedding, top_k }
    }

    /// Returns the embedding driving the query.
    #[must_use]
    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    /// Returns the desired number of results.
    #[must_use]
    pub fn top_k(&self) -> usize {
        self.top_k.get()
    }
}

/// Match returned by a similarity query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorMatch {
    id: Uuid,
    score: f32,
    #[serde(default)]
    metadata: Value,
}

impl VectorMatch {
    /// Creates a match structure.
    #[must_use]
    pub fn new(id: Uuid, score: f32, metadata: Value) -> Self {
        Self {
            id,
            score,
            metadata,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the cosine similarity score.
    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Returns the metadata payload.
    #[must_use]
    pub fn metadata(&self) -> &Value {
        &self.metadata
    }
}

/// Interface for vector store handles.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts or updates a vector point.
    async fn upsert(&self, point: VectorPoint) -> StoreResult<()>;

    /// Executes a similarity query, returning matches ordered by descending
    /// score.
    async fn search(&self, query: VectorQuery) -> StoreResult<Vec<VectorMatch>>;
}

/// In-memory vector store using cosine similarity.
#[derive(Debug, Default)]
pub struct LocalVectorStore {
    points: RwLock<HashMap<Uuid, VectorPoint>>,
}

impl LocalVectorStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn upsert(&self, point: VectorPoint) -> StoreResult<()> {
        let mut guard = self.points.write().await;
        guard.insert(point.id(), point);
        Ok(())
    }

    async fn search(&self, query: VectorQuery) -> StoreResult<Vec<VectorMatch>> {
        let guard = self.points.read().await;
        let mut matches: Vec<VectorMatch> = guard
            .values()
            .filter(|point| point.embedding().len() == query.embedding().len())
            .map(|point| {
                VectorMatch::new(
                    point.id(),
                    cosine_similarity(point.embedding(), query.embedding()),
                    point.metadata().clone(),
                )
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(query.top_k());
        Ok(matches)
    }
}

fn cosine_similarity(lhs: &Embedding, rhs: &Embedding) -> f32 {
    let denominator = lhs.magnitude() * rhs.magnitude();
    if denominator == 0.0 {
        0.0
    } else {
        lhs.dot(rhs) / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn nearest_point_wins() {
        let store = LocalVectorStore::new();
        let near = Uuid::new_v4();
        store
            .upsert(
                VectorPoint::new(near, Embedding::new(vec![1.0, 0.0]).unwrap())
                    .with_metadata(json!({"label": "near"})),
            )
            .await
            .unwrap();
        store
            .upsert(VectorPoint::new(
                Uuid::new_v4(),
                Embedding::new(vec![0.0, 1.0]).unwrap(),
            ))
            .await
            .unwrap();

        let query = VectorQuery::new(
            Embedding::new(vec![1.0, 0.0]).unwrap(),
            NonZeroUsize::new(1).unwrap(),
        );
        let matches = store.search(query).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id(), near);
        assert!((matches[0].score() - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn dimension_mismatch_filtered_out() {
        let store = LocalVectorStore::new();
        store
            .upsert(VectorPoint::new(
                Uuid::new_v4(),
                Embedding::new(vec![1.0, 0.0, 0.0]).unwrap(),
            ))
            .await
            .unwrap();

        let query = VectorQuery::new(
            Embedding::new(vec![1.0, 0.0]).unwrap(),
            NonZeroUsize::new(5).unwrap(),
        );
        let matches = store.search(query).await.unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn empty_embedding_rejected() {
        let err = Embedding::new(Vec::new()).expect_err("should fail");
        assert!(matches!(err, StoreError::InvalidInput { .. }));
    }

    #[test]
    fn non_finite_embedding_rejected() {
        let err = Embedding::new(vec![1.0, f32::NAN]).expect_err("should fail");
        assert!(matches!(err, StoreError::InvalidInput { .. }));
    }
}
