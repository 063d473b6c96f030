// Job search pipeline: retrieve (cache → primary search → fallback search),
// index, then recommend from the index with the LLM.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod prompts;
pub mod recommender;
pub mod retriever;
