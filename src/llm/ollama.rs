use crate::llm::client::{http_client, LLMClient, OutputSchema};
use crate::llm::structured::extract_json;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Local Ollama client using the `/api/chat` endpoint with a schema `format`.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, temperature: f32) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature,
        })
    }

    fn build_request(&self, system: &str, prompt: &str, schema: &OutputSchema) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ],
            "format": schema.parameters,
            "stream": false,
            "options": {
                "temperature": self.temperature
            }
        })
    }

    fn parse_response(response: &Value) -> Result<Value> {
        // ChatMessageResponse carries the JSON document as the message content
        let content = response
            .pointer("/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::LLM("No message in Ollama response".to_string()))?;

        extract_json(content)
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate_object(
        &self,
        system: &str,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<Value> {
        let url = format!("{}/api/chat", self.base_url);
        let body = self.build_request(system, prompt, schema);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("Ollama error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "Ollama request failed ({}): {}",
                status, text
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| AppError::LLM(format!("Failed to parse response: {}", e)))?;

        Self::parse_response(&response_json)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}
