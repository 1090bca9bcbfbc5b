//! LLM prompt generation against a local Ollama-style HTTP endpoint.

use crate::error::{GlyphcardError, GlyphcardResult};

/// Anything that can turn a system + user instruction into prompt text.
pub trait PromptSource {
    fn generate(&self, system: &str, user: &str) -> GlyphcardResult<String>;
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub keep_alive_minutes: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434".to_string(),
            model: "qwen3:32b".to_string(),
            keep_alive_minutes: 5,
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    think: bool,
    keep_alive: String,
}

#[derive(Debug, serde::Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Blocking client for the `/api/generate` endpoint. One completion per call;
/// streaming, thinking, and context retention are all disabled so the reply
/// is a single plain-text prompt.
pub struct OllamaClient {
    config: OllamaConfig,
    http: reqwest::blocking::Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            config,
            http: reqwest::blocking::Client::new(),
        }
    }

    fn request_body<'a>(&'a self, system: &'a str, user: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.config.model,
            system,
            prompt: user,
            stream: false,
            think: false,
            keep_alive: format!("{}m", self.config.keep_alive_minutes),
        }
    }
}

impl PromptSource for OllamaClient {
    fn generate(&self, system: &str, user: &str) -> GlyphcardResult<String> {
        let url = format!("{}/api/generate", self.config.url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .json(&self.request_body(system, user))
            .send()
            .map_err(|e| GlyphcardError::backend(format!("ollama request to '{url}': {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GlyphcardError::backend(format!(
                "ollama returned {status} from '{url}'"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| GlyphcardError::backend(format!("parse ollama response: {e}")))?;
        Ok(parsed.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_pins_generation_options() {
        let client = OllamaClient::new(OllamaConfig::default());
        let body = serde_json::to_value(client.request_body("sys", "make a prompt")).unwrap();
        assert_eq!(body["model"], "qwen3:32b");
        assert_eq!(body["system"], "sys");
        assert_eq!(body["prompt"], "make a prompt");
        assert_eq!(body["stream"], false);
        assert_eq!(body["think"], false);
        assert_eq!(body["keep_alive"], "5m");
    }

    #[test]
    fn unreachable_endpoint_is_a_backend_error() {
        let client = OllamaClient::new(OllamaConfig {
            // Reserved port on localhost; connection is refused immediately.
            url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        });
        let err = client.generate("sys", "user").unwrap_err();
        assert!(err.to_string().contains("backend error:"));
    }
}
