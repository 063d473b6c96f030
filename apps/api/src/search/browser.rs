//! Primary search: the language model browses the web with its built-in
//! `browser_search` tool and reports what it found.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{parse_json, CompletionRequest, LanguageModel, SEARCH_MODEL};
use crate::models::{JobPosting, Listing, UserProfile};
use crate::search::prompts::BROWSER_SEARCH_PROMPT;
use crate::search::{JobSearch, SearchOutcome};

const BROWSER_TOOL: &str = "browser_search";
const MAX_TOKENS: u32 = 2048;

pub struct BrowserSearch {
    llm: Arc<dyn LanguageModel>,
}

impl BrowserSearch {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    pub fn build_prompt(profile: &UserProfile) -> String {
        let prompt = render(
            BROWSER_SEARCH_PROMPT,
            &[
                ("skills", profile.skills.as_str()),
                ("experience", profile.experience.as_str()),
                ("location", profile.location.as_str()),
                ("job_type", profile.job_type.as_str()),
            ],
        );
        format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}")
    }
}

#[async_trait]
impl JobSearch for BrowserSearch {
    fn name(&self) -> &'static str {
        BROWSER_TOOL
    }

    async fn search(&self, profile: &UserProfile) -> SearchOutcome {
        let request = CompletionRequest::user(SEARCH_MODEL, Self::build_prompt(profile))
            .temperature(0.7)
            .max_tokens(MAX_TOKENS)
            .require_tool(BROWSER_TOOL);

        match self.llm.complete(&request).await {
            Ok(text) => {
                debug!("Browser search answered with {} chars", text.len());
                classify_reply(&text)
            }
            Err(e) => {
                warn!("Browser search failed: {e}");
                SearchOutcome::Unavailable(e.to_string())
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListingsReply {
    Bare(Vec<Listing>),
    Wrapped { jobs: Vec<Listing> },
}

/// Tags the model's answer: a JSON list of listings is structured, anything
/// else non-empty is kept as raw text.
fn classify_reply(text: &str) -> SearchOutcome {
    let text = text.trim();
    if text.is_empty() {
        return SearchOutcome::Empty;
    }

    match parse_json::<ListingsReply>(text) {
        Ok(reply) => {
            let listings = match reply {
                ListingsReply::Bare(listings) | ListingsReply::Wrapped { jobs: listings } => listings,
            };
            let postings: Vec<JobPosting> = listings
                .into_iter()
                .map(JobPosting::Listing)
                .filter(JobPosting::is_index_worthy)
                .collect();
            if postings.is_empty() {
                SearchOutcome::Empty
            } else {
                SearchOutcome::Structured(postings)
            }
        }
        Err(_) => SearchOutcome::Unstructured(text.to_string()),
    }
}
