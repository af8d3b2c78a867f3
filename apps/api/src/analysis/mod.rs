// AI analysis endpoints: already-computed calculator numbers go in, a Korean
// markdown narrative comes out verbatim. Completions are not post-processed.
// All model calls go through llm_client.

pub mod handlers;
pub mod prompts;
