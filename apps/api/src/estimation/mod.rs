// AI estimation endpoints: a seed (product name, keyword, goal, business
// description) goes in, a normalized numeric record comes out.
// Shared pipeline: seed validation, prompt build, model chain, JSON recovery,
// field validation. All model calls go through llm_client.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod recovery;
pub mod schema;
