//! Fallback search: keyword web search through the Tavily API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::render;
use crate::models::{JobPosting, Listing, UserProfile};
use crate::search::prompts::KEYWORD_QUERY;
use crate::search::{JobSearch, SearchOutcome};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";
const SEARCH_DEPTH: &str = "basic";
/// Result-count cap sent with every query.
pub const MAX_RESULTS: u32 = 5;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum TavilyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tavily API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    include_answer: bool,
    include_images: bool,
    include_raw_content: bool,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
}

impl From<TavilyResult> for JobPosting {
    fn from(result: TavilyResult) -> Self {
        JobPosting::Listing(Listing {
            title: result.title,
            url: result.url,
            content: result.content,
        })
    }
}

pub struct TavilySearch {
    client: Client,
    api_key: String,
}

impl TavilySearch {
    pub fn new(api_key: String) -> Result<Self, TavilyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, api_key })
    }

    pub fn build_query(profile: &UserProfile) -> String {
        render(
            KEYWORD_QUERY,
            &[
                ("job_type", profile.job_type.as_str()),
                ("skills", profile.skills.as_str()),
                ("location", profile.location.as_str()),
                ("experience", profile.experience.as_str()),
            ],
        )
    }

    async fn fetch(&self, query: &str) -> Result<Vec<JobPosting>, TavilyError> {
        let response = self
            .client
            .post(TAVILY_SEARCH_URL)
            .json(&TavilyRequest {
                api_key: &self.api_key,
                query,
                search_depth: SEARCH_DEPTH,
                include_answer: false,
                include_images: false,
                include_raw_content: false,
                max_results: MAX_RESULTS,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TavilyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: TavilyResponse = response.json().await?;
        Ok(into_postings(body))
    }
}

fn into_postings(body: TavilyResponse) -> Vec<JobPosting> {
    body.results
        .into_iter()
        .take(MAX_RESULTS as usize)
        .map(JobPosting::from)
        .collect()
}

#[async_trait]
impl JobSearch for TavilySearch {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn search(&self, profile: &UserProfile) -> SearchOutcome {
        let query = Self::build_query(profile);
        debug!("Tavily query: {query}");

        match self.fetch(&query).await {
            Ok(postings) if postings.is_empty() => SearchOutcome::Empty,
            Ok(postings) => SearchOutcome::Structured(postings),
            Err(e) => {
                warn!("Tavily search failed: {e}");
                SearchOutcome::Unavailable(e.to_string())
            }
        }
    }
}
