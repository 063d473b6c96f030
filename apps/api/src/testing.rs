//! Test doubles for the external collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::index::embedder::{EmbedError, Embedder};
use crate::llm_client::{CompletionRequest, LanguageModel, LlmError};
use crate::models::UserProfile;
use crate::search::{JobSearch, SearchOutcome};

/// Hashed bag-of-words embedder: texts sharing words get similar vectors.
pub struct KeywordEmbedder {
    dimension: usize,
    calls: AtomicUsize,
}

impl Default for KeywordEmbedder {
    fn default() -> Self {
        Self::with_dimension(256)
    }
}

impl KeywordEmbedder {
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let hash = word
                .to_lowercase()
                .bytes()
                .fold(0xcbf29ce484222325_u64, |h, b| {
                    (h ^ b as u64).wrapping_mul(0x100000001b3)
                });
            vector[(hash % self.dimension as u64) as usize] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(inputs.iter().map(|t| self.vectorize(t)).collect())
    }
}

/// Replays scripted replies in order and records every request it receives.
/// Once the script runs out, it echoes the prompt back.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    pub fn replying(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn echo() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(request.prompt().to_string()))
    }
}

/// Search provider returning a fixed outcome and counting calls.
pub struct StubSearch {
    name: &'static str,
    outcome: SearchOutcome,
    calls: AtomicUsize,
}

impl StubSearch {
    pub fn new(name: &'static str, outcome: SearchOutcome) -> Self {
        Self {
            name,
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobSearch for StubSearch {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn search(&self, _profile: &UserProfile) -> SearchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
