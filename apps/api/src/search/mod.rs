//! Job search collaborators.
//!
//! Providers never fail the pipeline: every error is folded into
//! `SearchOutcome::Unavailable` so the retriever can fall back or degrade to
//! an empty result while still knowing why.

pub mod browser;
pub mod prompts;
pub mod tavily;

use async_trait::async_trait;
use serde::Serialize;

use crate::models::{JobPosting, UserProfile};

pub use browser::BrowserSearch;
pub use tavily::TavilySearch;

/// What a search provider produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Postings in the expected `{title, url, content}` shape.
    Structured(Vec<JobPosting>),
    /// A free-text answer that did not follow the structured schema.
    Unstructured(String),
    /// The provider answered but found nothing.
    Empty,
    /// The provider could not be reached or returned an error.
    Unavailable(String),
}

/// A provider that could not be used, kept so callers can tell
/// "no jobs found" from "search service down".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFailure {
    pub provider: String,
    pub reason: String,
}

#[async_trait]
pub trait JobSearch: Send + Sync {
    /// Short provider name used in logs and failure reports.
    fn name(&self) -> &'static str;

    async fn search(&self, profile: &UserProfile) -> SearchOutcome;
}
