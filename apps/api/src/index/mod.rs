//! Persisted vector index over job postings.
//!
//! Layout: `<dir>/index.json` holding the embedding dimension and every stored
//! document with its embedding. The index is append-only: documents are never
//! deduplicated, so re-indexing the same postings accumulates copies.
//!
//! Saves go through a temporary file renamed over `index.json`, so a crash
//! mid-save leaves the previous index intact. Load-modify-save is still not
//! safe with several processes writing the same directory.

pub mod embedder;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::index::embedder::{EmbedError, Embedder};
use crate::models::JobPosting;

const INDEX_FILE: &str = "index.json";
const INDEX_TMP_FILE: &str = "index.json.tmp";
const MISSING: &str = "N/A";
const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("vector index not found at {0}; run a job search first to build it")]
    NotFound(PathBuf),

    #[error("index I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("index file {path} is corrupt: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("embedding failed: {0}")]
    Embed(#[from] EmbedError),

    #[error("embedding dimension mismatch: index has {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub url: String,
}

/// The text blob embedded for a posting, plus its source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl IndexedDocument {
    pub fn from_posting(posting: &JobPosting) -> Self {
        match posting {
            JobPosting::Listing(listing) => {
                let url = listing.url.as_deref().unwrap_or(MISSING);
                Self {
                    text: format!(
                        "Title: {}\nURL: {}\nDescription: {}",
                        listing.title.as_deref().unwrap_or(MISSING),
                        url,
                        listing.content.as_deref().unwrap_or(NO_DESCRIPTION),
                    ),
                    metadata: DocumentMetadata {
                        url: url.to_string(),
                    },
                }
            }
            JobPosting::Raw { raw_result } => Self {
                text: format!("Description: {raw_result}"),
                metadata: DocumentMetadata {
                    url: MISSING.to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    id: Uuid,
    #[serde(flatten)]
    document: IndexedDocument,
    indexed_at: DateTime<Utc>,
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedIndex {
    dimension: usize,
    documents: Vec<StoredDocument>,
}

pub struct VectorIndex {
    dir: PathBuf,
    embedder: Arc<dyn Embedder>,
}

impl VectorIndex {
    pub fn new(dir: impl Into<PathBuf>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            dir: dir.into(),
            embedder,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    pub fn exists(&self) -> bool {
        self.file().is_file()
    }

    /// Number of stored documents; zero if the index has not been created.
    pub async fn len(&self) -> Result<usize, IndexError> {
        if !self.exists() {
            return Ok(0);
        }
        Ok(self.load().await?.documents.len())
    }

    /// Embeds `documents` and appends them, creating the index on first use.
    /// Returns the total number of stored documents.
    pub async fn upsert(&self, documents: Vec<IndexedDocument>) -> Result<usize, IndexError> {
        if documents.is_empty() {
            return self.len().await;
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let embeddings = self.embedder.embed(&texts).await?;
        if embeddings.len() != texts.len() {
            return Err(EmbedError::CountMismatch {
                expected: texts.len(),
                got: embeddings.len(),
            }
            .into());
        }

        let mut index = if self.exists() {
            self.load().await?
        } else {
            let dimension = embeddings.first().map(Vec::len).unwrap_or_default();
            info!("Creating vector index at {} (dimension {dimension})", self.dir.display());
            PersistedIndex {
                dimension,
                documents: Vec::new(),
            }
        };

        let now = Utc::now();
        for (document, embedding) in documents.into_iter().zip(embeddings) {
            if embedding.len() != index.dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: index.dimension,
                    got: embedding.len(),
                });
            }
            index.documents.push(StoredDocument {
                id: Uuid::new_v4(),
                document,
                indexed_at: now,
                embedding,
            });
        }

        self.save(&index).await?;
        info!(
            "Vector index saved at {} ({} documents)",
            self.dir.display(),
            index.documents.len()
        );
        Ok(index.documents.len())
    }

    /// Returns up to `k` documents ranked by cosine similarity to `text`.
    /// Ties keep insertion order. Fails with `NotFound` before embedding
    /// anything if the index has never been created.
    pub async fn query_similar(
        &self,
        text: &str,
        k: usize,
    ) -> Result<Vec<IndexedDocument>, IndexError> {
        if !self.exists() {
            return Err(IndexError::NotFound(self.dir.clone()));
        }

        let index = self.load().await?;
        if k == 0 || index.documents.is_empty() {
            return Ok(Vec::new());
        }

        let query = self
            .embedder
            .embed(&[text.to_string()])
            .await?
            .pop()
            .ok_or(EmbedError::CountMismatch {
                expected: 1,
                got: 0,
            })?;
        if query.len() != index.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: index.dimension,
                got: query.len(),
            });
        }

        let mut scored: Vec<(f32, StoredDocument)> = index
            .documents
            .into_iter()
            .map(|doc| (cosine_similarity(&query, &doc.embedding), doc))
            .collect();
        // Stable sort: equal scores stay in insertion order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        debug!(
            "Similarity query returned {} of {} documents",
            k.min(scored.len()),
            scored.len()
        );

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, stored)| stored.document)
            .collect())
    }

    async fn load(&self) -> Result<PersistedIndex, IndexError> {
        let path = self.file();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| IndexError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| IndexError::Malformed { path, source })
    }

    async fn save(&self, index: &PersistedIndex) -> Result<(), IndexError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| IndexError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let tmp = self.dir.join(INDEX_TMP_FILE);
        let serialized = serde_json::to_vec(index)?;
        tokio::fs::write(&tmp, serialized)
            .await
            .map_err(|source| IndexError::Io {
                path: tmp.clone(),
                source,
            })?;

        let target = self.file();
        tokio::fs::rename(&tmp, &target)
            .await
            .map_err(|source| IndexError::Io {
                path: target.clone(),
                source,
            })
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;
    use crate::testing::KeywordEmbedder;

    fn doc(title: &str, body: &str) -> IndexedDocument {
        IndexedDocument::from_posting(&JobPosting::listing(
            title,
            format!("https://jobs.example/{}", title.to_lowercase().replace(' ', "-")),
            body,
        ))
    }

    #[test]
    fn test_document_text_from_full_listing() {
        let document = IndexedDocument::from_posting(&JobPosting::listing(
            "Backend Engineer",
            "https://jobs.example/be",
            "Build APIs",
        ));
        assert_eq!(
            document.text,
            "Title: Backend Engineer\nURL: https://jobs.example/be\nDescription: Build APIs"
        );
        assert_eq!(document.metadata.url, "https://jobs.example/be");
    }

    #[test]
    fn test_document_text_fills_missing_fields() {
        let document = IndexedDocument::from_posting(&JobPosting::Listing(Listing {
            title: Some("Analyst".to_string()),
            url: None,
            content: None,
        }));
        assert_eq!(
            document.text,
            "Title: Analyst\nURL: N/A\nDescription: No description available."
        );
        assert_eq!(document.metadata.url, "N/A");
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_query_on_missing_index_fails_before_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = VectorIndex::new(dir.path().join("idx"), embedder.clone());

        let err = index.query_similar("rust", 3).await.unwrap_err();

        assert!(matches!(err, IndexError::NotFound(_)));
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_upsert_creates_then_appends_without_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::new(dir.path().join("idx"), Arc::new(KeywordEmbedder::default()));
        assert!(!index.exists());

        let first = index
            .upsert(vec![doc("Rust Developer", "async rust services")])
            .await
            .unwrap();
        assert_eq!(first, 1);
        assert!(index.exists());

        let second = index
            .upsert(vec![
                doc("Rust Developer", "async rust services"),
                doc("Data Analyst", "sql dashboards"),
            ])
            .await
            .unwrap();
        assert_eq!(second, 3);
        assert_eq!(index.len().await.unwrap(), 3);
        assert!(!dir.path().join("idx").join(INDEX_TMP_FILE).exists());
    }

    #[tokio::test]
    async fn test_query_ranks_by_similarity_and_caps_at_k() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::new(dir.path(), Arc::new(KeywordEmbedder::default()));
        index
            .upsert(vec![
                doc("Data Analyst", "sql dashboards reporting"),
                doc("Rust Developer", "rust tokio backend services"),
                doc("Chef", "kitchen cooking menus"),
            ])
            .await
            .unwrap();

        let results = index.query_similar("rust backend", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].text.starts_with("Title: Rust Developer"));
    }

    #[tokio::test]
    async fn test_query_returns_fewer_when_index_is_small() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::new(dir.path(), Arc::new(KeywordEmbedder::default()));
        index.upsert(vec![doc("Chef", "cooking")]).await.unwrap();

        let results = index.query_similar("anything", 5).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::new(dir.path(), Arc::new(KeywordEmbedder::default()));
        let same_text = |url: &str| IndexedDocument {
            text: "Title: Alpha\nDescription: same".to_string(),
            metadata: DocumentMetadata {
                url: url.to_string(),
            },
        };
        index
            .upsert(vec![same_text("first"), same_text("second"), same_text("third")])
            .await
            .unwrap();

        let results = index.query_similar("alpha", 3).await.unwrap();
        let urls: Vec<&str> = results.iter().map(|d| d.metadata.url.as_str()).collect();
        assert_eq!(urls, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        VectorIndex::new(dir.path(), Arc::new(KeywordEmbedder::with_dimension(8)))
            .upsert(vec![doc("Chef", "cooking")])
            .await
            .unwrap();

        let wider = VectorIndex::new(dir.path(), Arc::new(KeywordEmbedder::with_dimension(16)));
        let err = wider.upsert(vec![doc("Baker", "bread")]).await.unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 8,
                got: 16
            }
        ));
    }

    #[tokio::test]
    async fn test_corrupt_index_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE), "garbage").unwrap();
        let index = VectorIndex::new(dir.path(), Arc::new(KeywordEmbedder::default()));

        let err = index.query_similar("rust", 1).await.unwrap_err();
        assert!(matches!(err, IndexError::Malformed { .. }));
    }
}
