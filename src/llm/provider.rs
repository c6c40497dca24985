//! LLM Provider implementations

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::conversation::{ChatTurn, Sender};
use crate::error::{BotError, Result};

/// Generic LLM provider trait
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a reply to `prompt`, given the earlier turns of the conversation
    async fn generate(&self, prompt: &str, history: &[ChatTurn]) -> Result<String>;
    fn name(&self) -> &str;
}

async fn checked_json<T: for<'de> Deserialize<'de>>(
    provider: &str,
    response: reqwest::Response,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(BotError::Provider(format!("{} API error ({}): {}", provider, status, body)));
    }
    Ok(response.json().await?)
}

/// Google Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
    safety_settings: Vec<GeminiSafetySetting>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct GeminiSafetySetting {
    category: &'static str,
    threshold: &'static str,
}

const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

/// History plus the new prompt as Gemini `contents`
fn gemini_contents<'a>(prompt: &'a str, history: &'a [ChatTurn]) -> Vec<GeminiContent<'a>> {
    history
        .iter()
        .map(|turn| GeminiContent {
            role: match turn.sender {
                Sender::User => "user",
                Sender::Bot => "model",
            },
            parts: vec![GeminiPart {
                text: &turn.content,
            }],
        })
        .chain(std::iter::once(GeminiContent {
            role: "user",
            parts: vec![GeminiPart { text: prompt }],
        }))
        .collect()
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str, history: &[ChatTurn]) -> Result<String> {
        let request = GeminiRequest {
            contents: gemini_contents(prompt, history),
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature.unwrap_or(0.9),
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: self.config.max_tokens.unwrap_or(512),
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| GeminiSafetySetting {
                    category,
                    threshold: "BLOCK_MEDIUM_AND_ABOVE",
                })
                .collect(),
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let body: GeminiResponse = checked_json("Gemini", response).await?;

        let text: String = body
            .candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(BotError::Provider("No response from Gemini".to_string()));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}

/// Ollama provider (local)
pub struct OllamaProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str, history: &[ChatTurn]) -> Result<String> {
        let messages = history
            .iter()
            .map(|turn| OllamaMessage {
                role: match turn.sender {
                    Sender::User => "user",
                    Sender::Bot => "assistant",
                },
                content: &turn.content,
            })
            .chain(std::iter::once(OllamaMessage {
                role: "user",
                content: prompt,
            }))
            .collect();

        let request = OllamaRequest {
            model: &self.config.model,
            messages,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let url = format!("{}/api/chat", self.config.endpoint.trim_end_matches('/'));
        let response = self.client.post(&url).json(&request).send().await?;
        let body: OllamaResponse = checked_json("Ollama", response).await?;

        Ok(body.message.content)
    }

    fn name(&self) -> &str {
        "Ollama"
    }
}

/// Factory function to create provider from config
pub fn create_provider(
    provider_name: &str,
    config: ProviderConfig,
    api_key: Option<String>,
) -> Result<Box<dyn LlmProvider>> {
    match provider_name {
        "gemini" => {
            let key = api_key.ok_or_else(|| BotError::MissingApiKey("gemini".to_string()))?;
            Ok(Box::new(GeminiProvider::new(config, key)))
        }
        "ollama" => Ok(Box::new(OllamaProvider::new(config))),
        _ => Err(BotError::Config(format!("Unknown provider: {}", provider_name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_config(endpoint: String, model: &str) -> ProviderConfig {
        ProviderConfig {
            endpoint,
            api_key: String::new(),
            model: model.to_string(),
            enabled: true,
            max_tokens: Some(128),
            temperature: Some(0.5),
        }
    }

    fn gemini(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new(provider_config(server.uri(), "gemini-test"), "secret".to_string())
    }

    #[test]
    fn test_gemini_contents_roles() {
        let history = vec![
            ChatTurn::new(Sender::User, "hi"),
            ChatTurn::new(Sender::Bot, "Hello!"),
        ];
        let contents = gemini_contents("what is rust", &history);

        let roles: Vec<&str> = contents.iter().map(|c| c.role).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(contents[2].parts[0].text, "what is rust");
    }

    #[tokio::test]
    async fn test_gemini_generate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "Rust is " }, { "text": "a language." }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let provider = gemini(&server);
        let reply = provider.generate("what is rust", &[]).await.unwrap();

        assert_eq!(reply, "Rust is a language.");
    }

    #[tokio::test]
    async fn test_gemini_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let provider = gemini(&server);
        let err = provider.generate("hello", &[]).await.unwrap_err();

        assert!(matches!(err, BotError::Provider(ref msg) if msg.contains("quota exceeded")));
    }

    #[tokio::test]
    async fn test_gemini_no_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let provider = gemini(&server);
        assert!(provider.generate("hello", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_ollama_generate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.2",
                "message": { "role": "assistant", "content": "Hello from Ollama" },
                "done": true
            })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(provider_config(server.uri(), "llama3.2"));
        let history = vec![ChatTurn::new(Sender::User, "hi")];

        assert_eq!(provider.generate("hello", &history).await.unwrap(), "Hello from Ollama");
    }

    #[test]
    fn test_create_provider() {
        let config = provider_config("http://localhost".to_string(), "m");

        assert_eq!(create_provider("ollama", config.clone(), None).unwrap().name(), "Ollama");
        assert!(matches!(
            create_provider("gemini", config.clone(), None),
            Err(BotError::MissingApiKey(_))
        ));
        assert_eq!(
            create_provider("gemini", config.clone(), Some("k".to_string())).unwrap().name(),
            "Gemini"
        );
        assert!(matches!(create_provider("nope", config, None), Err(BotError::Config(_))));
    }
}
