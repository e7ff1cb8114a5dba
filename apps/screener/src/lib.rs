//! Candidate screening: skill matching, evidence-backed scoring, and
//! rate-limited batch ranking of candidates against one job description.

pub mod cache;
pub mod config;
pub mod errors;
pub mod evidence;
pub mod extraction;
pub mod links;
pub mod llm_client;
pub mod pipeline;
pub mod rate_limiter;
pub mod routes;
pub mod scoring;
pub mod skills;
pub mod state;
