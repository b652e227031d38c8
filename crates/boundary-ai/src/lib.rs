//! Extraction layer: prompt building, the LLM extraction client, and the
//! transcript → decision analysis pipeline.

pub mod analyzer;
pub mod client;
mod error;
pub mod prompt;

pub use analyzer::Analyzer;
pub use client::{ExtractionClient, ExtractionConfig, LiveClient};
pub use error::{ApiError, ExtractionError};
pub use prompt::{Prompts, build_prompts};
