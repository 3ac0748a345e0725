// Candidate interview: session records, prompts, scoring and the engine that
// drives a session through initial -> in_progress -> done.
// All remote model calls go through llm_client::retry.

pub mod engine;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod scoring;
pub mod store;
