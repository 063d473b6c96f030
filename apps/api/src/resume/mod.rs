// Resume upload: PDF text extraction + LLM field extraction.
// All LLM calls go through llm_client.

pub mod extractor;
pub mod handlers;
pub mod prompts;
