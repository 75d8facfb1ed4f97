use serde::{Deserialize, Serialize};

use super::EnhancementError;

/// Configuration for an AI enhancement endpoint. Absence of a config
/// means the pipeline runs baseline-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Base URL of the generation service, e.g. http://localhost:11434
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    /// Hard bound on the blocking round trip; on expiry the pipeline
    /// falls back to the baseline extraction.
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature: 0.1,
            timeout_secs: 120,
        }
    }
}

/// AI enhancement client abstraction (allows mocking).
pub trait AiClient {
    /// One blocking round trip: full prompt in, raw response text out.
    fn enhance(&self, prompt: &str, system: &str) -> Result<String, EnhancementError>;
}

/// HTTP client for an Ollama-compatible generation endpoint.
pub struct HttpAiClient {
    config: AiConfig,
    client: reqwest::blocking::Client,
}

impl HttpAiClient {
    pub fn new(config: AiConfig) -> Result<Self, EnhancementError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EnhancementError::HttpClient(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

/// Request body for an Ollama-style /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

/// Response body from /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl AiClient for HttpAiClient {
    fn enhance(&self, prompt: &str, system: &str) -> Result<String, EnhancementError> {
        let url = format!("{}/api/generate", self.config.endpoint);
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            system,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                EnhancementError::Connection(self.config.endpoint.clone())
            } else if e.is_timeout() {
                EnhancementError::Timeout(self.config.timeout_secs)
            } else {
                EnhancementError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(EnhancementError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| EnhancementError::MalformedResponse(e.to_string()))?;

        Ok(parsed.response)
    }
}

/// Mock AI client for testing — canned response or forced failure.
pub struct MockAiClient {
    response: Result<String, fn() -> EnhancementError>,
}

impl MockAiClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
        }
    }

    /// A client whose every call times out.
    pub fn timing_out() -> Self {
        Self {
            response: Err(|| EnhancementError::Timeout(120)),
        }
    }

    /// A client whose every call fails to connect.
    pub fn unreachable() -> Self {
        Self {
            response: Err(|| EnhancementError::Connection("http://localhost:11434".into())),
        }
    }
}

impl AiClient for MockAiClient {
    fn enhance(&self, _prompt: &str, _system: &str) -> Result<String, EnhancementError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(make_err) => Err(make_err()),
        }
    }
}
