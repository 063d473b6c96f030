use std::sync::Arc;

use tokio::sync::Mutex;

use crate::jobs::recommender::Recommender;
use crate::jobs::retriever::JobRetriever;
use crate::resume::extractor::ResumeExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub retriever: Arc<JobRetriever>,
    pub recommender: Arc<Recommender>,
    pub resume_extractor: Arc<ResumeExtractor>,
    /// Held for the whole search pipeline: the cache file and index directory
    /// are read-modify-write without locking of their own.
    pub pipeline: Arc<Mutex<()>>,
    /// Postings handed to the recommender when a request gives no `top_k`.
    pub default_top_k: usize,
}
