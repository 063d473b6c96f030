//! Job Retriever: profile in, postings out.
//!
//! Cache hit: return the cached postings as-is. Miss: primary search, then the
//! fallback provider unless the primary produced structured postings. The
//! result, even an empty one, is cached under the profile key; non-empty
//! results are appended to the vector index on every call.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{CacheError, CacheKey, CacheStore};
use crate::index::{IndexError, IndexedDocument, VectorIndex};
use crate::models::{JobPosting, UserProfile};
use crate::search::{JobSearch, SearchFailure, SearchOutcome};

#[derive(Debug, Error)]
pub enum RetrieverError {
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

/// Where a retrieval's postings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingSource {
    Cache,
    Primary,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    pub postings: Vec<JobPosting>,
    pub source: PostingSource,
    /// Providers that errored on the way. Empty on cache hits.
    pub search_failures: Vec<SearchFailure>,
}

pub struct JobRetriever {
    cache: Arc<CacheStore>,
    index: Arc<VectorIndex>,
    primary: Arc<dyn JobSearch>,
    fallback: Arc<dyn JobSearch>,
}

impl JobRetriever {
    pub fn new(
        cache: Arc<CacheStore>,
        index: Arc<VectorIndex>,
        primary: Arc<dyn JobSearch>,
        fallback: Arc<dyn JobSearch>,
    ) -> Self {
        Self {
            cache,
            index,
            primary,
            fallback,
        }
    }

    pub async fn fetch_or_retrieve(
        &self,
        profile: &UserProfile,
    ) -> Result<Retrieval, RetrieverError> {
        let key = CacheKey::for_profile(profile);

        let retrieval = match self.cache.get(&key).await {
            Some(postings) => {
                info!("[Cache Hit] {} postings for key {key}", postings.len());
                Retrieval {
                    postings,
                    source: PostingSource::Cache,
                    search_failures: Vec::new(),
                }
            }
            None => {
                info!("[Cache Miss] Fetching new results for key {key}");
                let retrieval = self.search(profile).await;
                self.cache.put(key, retrieval.postings.clone()).await?;
                retrieval
            }
        };

        let documents: Vec<IndexedDocument> = retrieval
            .postings
            .iter()
            .filter(|p| p.is_index_worthy())
            .map(IndexedDocument::from_posting)
            .collect();
        if !documents.is_empty() {
            self.index.upsert(documents).await?;
        }

        Ok(retrieval)
    }

    async fn search(&self, profile: &UserProfile) -> Retrieval {
        let mut search_failures = Vec::new();

        match self.primary.search(profile).await {
            SearchOutcome::Structured(postings) if !postings.is_empty() => {
                info!("{} returned {} postings", self.primary.name(), postings.len());
                return Retrieval {
                    postings,
                    source: PostingSource::Primary,
                    search_failures,
                };
            }
            SearchOutcome::Unavailable(reason) => {
                search_failures.push(SearchFailure {
                    provider: self.primary.name().to_string(),
                    reason,
                });
            }
            SearchOutcome::Unstructured(_) => {
                info!("{} answered in free text", self.primary.name());
            }
            SearchOutcome::Structured(_) | SearchOutcome::Empty => {
                info!("{} found nothing", self.primary.name());
            }
        }

        info!("Falling back to {}", self.fallback.name());
        let postings = match self.fallback.search(profile).await {
            SearchOutcome::Structured(postings) => postings,
            SearchOutcome::Unstructured(text) => vec![JobPosting::raw(text)],
            SearchOutcome::Empty => Vec::new(),
            SearchOutcome::Unavailable(reason) => {
                warn!("Both search providers failed; caching an empty result");
                search_failures.push(SearchFailure {
                    provider: self.fallback.name().to_string(),
                    reason,
                });
                Vec::new()
            }
        };

        Retrieval {
            postings,
            source: PostingSource::Fallback,
            search_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::JobType;
    use crate::testing::{KeywordEmbedder, StubSearch};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        cache: Arc<CacheStore>,
        index: Arc<VectorIndex>,
        primary: Arc<StubSearch>,
        fallback: Arc<StubSearch>,
        retriever: JobRetriever,
    }

    async fn fixture(primary: SearchOutcome, fallback: SearchOutcome) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(CacheStore::open(dir.path().join("cache.json")).await.unwrap());
        let index = Arc::new(VectorIndex::new(
            dir.path().join("index"),
            Arc::new(KeywordEmbedder::default()),
        ));
        let primary = Arc::new(StubSearch::new("primary", primary));
        let fallback = Arc::new(StubSearch::new("fallback", fallback));
        let retriever = JobRetriever::new(
            cache.clone(),
            index.clone(),
            primary.clone(),
            fallback.clone(),
        );
        Fixture {
            _dir: dir,
            cache,
            index,
            primary,
            fallback,
            retriever,
        }
    }

    fn profile() -> UserProfile {
        UserProfile::new("Python, SQL", "2 years", "Remote", JobType::FullTime)
    }

    fn postings(n: usize) -> Vec<JobPosting> {
        (1..=n)
            .map(|i| {
                JobPosting::listing(
                    format!("Job {i}"),
                    format!("https://jobs.example/{i}"),
                    "python sql",
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_structured_primary_skips_fallback() {
        let f = fixture(
            SearchOutcome::Structured(postings(2)),
            SearchOutcome::Structured(postings(5)),
        ).await;

        let retrieval = f.retriever.fetch_or_retrieve(&profile()).await.unwrap();

        assert_eq!(retrieval.source, PostingSource::Primary);
        assert_eq!(retrieval.postings, postings(2));
        assert_eq!(f.primary.calls(), 1);
        assert_eq!(f.fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_unstructured_primary_falls_back_exactly_once() {
        let f = fixture(
            SearchOutcome::Unstructured("Here are some jobs...".to_string()),
            SearchOutcome::Structured(postings(3)),
        ).await;

        let retrieval = f.retriever.fetch_or_retrieve(&profile()).await.unwrap();

        assert_eq!(f.fallback.calls(), 1);
        assert_eq!(retrieval.source, PostingSource::Fallback);
        assert_eq!(retrieval.postings, postings(3));
        assert!(retrieval.search_failures.is_empty());
    }

    #[tokio::test]
    async fn test_empty_primary_falls_back() {
        let f = fixture(SearchOutcome::Empty, SearchOutcome::Structured(postings(1))).await;
        let retrieval = f.retriever.fetch_or_retrieve(&profile()).await.unwrap();
        assert_eq!(f.fallback.calls(), 1);
        assert_eq!(retrieval.postings.len(), 1);
    }

    #[tokio::test]
    async fn test_second_call_is_a_cache_hit() {
        let f = fixture(
            SearchOutcome::Structured(postings(2)),
            SearchOutcome::Empty,
        ).await;

        let first = f.retriever.fetch_or_retrieve(&profile()).await.unwrap();
        let second = f.retriever.fetch_or_retrieve(&profile()).await.unwrap();

        assert_eq!(first.postings, second.postings);
        assert_eq!(second.source, PostingSource::Cache);
        assert_eq!(f.primary.calls(), 1);
        assert_eq!(f.cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_cache_hit_reindexes_postings() {
        let f = fixture(
            SearchOutcome::Structured(postings(2)),
            SearchOutcome::Empty,
        ).await;

        f.retriever.fetch_or_retrieve(&profile()).await.unwrap();
        f.retriever.fetch_or_retrieve(&profile()).await.unwrap();

        assert_eq!(f.index.len().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_failures_are_reported_and_empty_result_cached() {
        let f = fixture(
            SearchOutcome::Unavailable("timeout".to_string()),
            SearchOutcome::Unavailable("401 unauthorized".to_string()),
        ).await;

        let retrieval = f.retriever.fetch_or_retrieve(&profile()).await.unwrap();

        assert!(retrieval.postings.is_empty());
        assert_eq!(
            retrieval.search_failures,
            vec![
                SearchFailure {
                    provider: "primary".to_string(),
                    reason: "timeout".to_string(),
                },
                SearchFailure {
                    provider: "fallback".to_string(),
                    reason: "401 unauthorized".to_string(),
                },
            ]
        );
        assert_eq!(
            f.cache.get(&CacheKey::for_profile(&profile())).await,
            Some(Vec::new())
        );
        assert!(!f.index.exists());

        let again = f.retriever.fetch_or_retrieve(&profile()).await.unwrap();
        assert_eq!(again.source, PostingSource::Cache);
        assert!(again.postings.is_empty());
        assert_eq!(f.primary.calls(), 1);
        assert_eq!(f.fallback.calls(), 1);
    }

    #[tokio::test]
    async fn test_primary_failure_then_fallback_success() {
        let f = fixture(
            SearchOutcome::Unavailable("503".to_string()),
            SearchOutcome::Structured(postings(2)),
        ).await;

        let retrieval = f.retriever.fetch_or_retrieve(&profile()).await.unwrap();

        assert_eq!(retrieval.source, PostingSource::Fallback);
        assert_eq!(retrieval.postings.len(), 2);
        assert_eq!(retrieval.search_failures.len(), 1);
        assert_eq!(f.index.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unworthy_postings_are_cached_but_not_indexed() {
        let f = fixture(
            SearchOutcome::Structured(vec![
                JobPosting::Listing(Default::default()),
                JobPosting::listing("Real Job", "https://jobs.example/r", "python"),
            ]),
            SearchOutcome::Empty,
        ).await;

        let retrieval = f.retriever.fetch_or_retrieve(&profile()).await.unwrap();

        assert_eq!(retrieval.postings.len(), 2);
        assert_eq!(f.index.len().await.unwrap(), 1);
    }
}
