pub mod config;
pub mod errors;
pub mod lighthouse;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod reporting;
pub mod storage;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
