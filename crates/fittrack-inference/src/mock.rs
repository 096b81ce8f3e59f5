//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fittrack_inference::mock::MockGenerationBackend;
//!
//! let backend = MockGenerationBackend::new()
//!     .with_fixed_response("[]")
//!     .with_response_mapping("toast", "[{\"name\": \"Toast\"}]");
//! assert_eq!(backend.call_count(), 0);
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use fittrack_core::{Error, GenerationBackend, GenerationOptions, Result};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    /// (substring of the prompt, reply) pairs checked in insertion order.
    mappings: Vec<(String, String)>,
    default_response: String,
    failure: Option<String>,
}

/// One recorded `generate_with_system` call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
    pub temperature: Option<f32>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            mappings: Vec::new(),
            default_response: "[]".to_string(),
            failure: None,
        }
    }
}

impl MockGenerationBackend {
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply returned when no mapping matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Reply with `output` whenever the prompt contains `needle`.
    pub fn with_response_mapping(
        mut self,
        needle: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .mappings
            .push((needle.into(), output.into()));
        self
    }

    /// Fail every call with `Error::Inference(message)`.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String> {
        self.call_log.lock().unwrap().push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            temperature: options.temperature,
        });

        if let Some(message) = &self.config.failure {
            return Err(Error::Inference(message.clone()));
        }

        Ok(self
            .config
            .mappings
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.config.default_response.clone()))
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mapping_takes_precedence() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response("default")
            .with_response_mapping("eggs", "mapped");

        let reply = backend
            .generate_with_system("sys", "two eggs", GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, "mapped");

        let reply = backend
            .generate_with_system("sys", "toast", GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, "default");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_call_log() {
        let backend = MockGenerationBackend::new();
        let clone = backend.clone();
        clone
            .generate_with_system("s", "p", GenerationOptions::with_temperature(0.5))
            .await
            .unwrap();
        let calls = backend.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, Some(0.5));
    }
}
