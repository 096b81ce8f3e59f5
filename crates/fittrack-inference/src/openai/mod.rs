//! OpenAI-compatible chat completion backend.
//!
//! Works with any endpoint that speaks the `/chat/completions` protocol
//! (OpenAI cloud, Azure OpenAI, Ollama in compatibility mode, vLLM).
//!
//! # Example
//!
//! ```rust,no_run
//! use fittrack_core::{GenerationBackend, GenerationOptions};
//! use fittrack_inference::openai::OpenAIBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::from_env().unwrap();
//!     let reply = backend
//!         .generate_with_system(
//!             "You are a nutrition expert.",
//!             "How much protein is in an egg?",
//!             GenerationOptions::with_temperature(0.3),
//!         )
//!         .await
//!         .unwrap();
//!     println!("{reply}");
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    OpenAIBackend, OpenAIConfig, DEFAULT_GEN_MODEL, DEFAULT_OPENAI_URL, DEFAULT_TIMEOUT_SECS,
};
pub use error::{to_fittrack_error, OpenAIErrorCode};
pub use types::*;
