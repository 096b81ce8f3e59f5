//! # fittrack-inference
//!
//! LLM-backed parsing for fittrack.
//!
//! This crate provides:
//! - OpenAI-compatible chat completion backend (feature `openai`, default)
//! - Prompt templates for food, workout and meal suggestion requests
//! - JSON recovery from free-form model replies
//! - [`NutritionParser`], the entry point used by the API
//! - A deterministic mock backend (feature `mock`)

pub mod extract;
pub mod parser;
pub mod prompts;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use fittrack_core::{GenerationBackend, GenerationOptions};

#[cfg(feature = "openai")]
pub use openai::{OpenAIBackend, OpenAIConfig};

pub use parser::NutritionParser;
