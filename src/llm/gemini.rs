//! Google Gemini client
//!
//! Gemini receives the output schema as a plain-language description inside
//! the prompt and is asked for the bare JSON object. Any code fences the model
//! still adds are stripped before parsing.

use crate::llm::client::{http_client, LLMClient, OutputSchema};
use crate::llm::structured::{describe_schema, extract_json};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: String, api_base: String, model: String, temperature: f32) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            temperature,
        })
    }

    fn endpoint_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Fold system prompt, schema instructions and user prompt into one turn.
    fn build_prompt(system: &str, prompt: &str, schema: &OutputSchema) -> String {
        format!(
            "System: {}\n\nYou must respond with a valid JSON object that matches this exact schema:\n{}\n\nUser: {}\n\nPlease respond with ONLY the JSON object, no additional text or formatting.",
            system,
            describe_schema(&schema.parameters),
            prompt
        )
    }

    fn build_request(&self, full_prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": full_prompt}]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "candidateCount": 1,
                "responseMimeType": "application/json"
            }
        })
    }

    fn parse_response(response: &Value) -> Result<Value> {
        let parts = response
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::LLM("No candidates in Gemini response".to_string()))?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();

        extract_json(&text)
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate_object(
        &self,
        system: &str,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<Value> {
        let full_prompt = Self::build_prompt(system, prompt, schema);
        let body = self.build_request(&full_prompt);

        tracing::debug!(model = self.model.as_str(), "Sending Gemini request");

        let response = self
            .client
            .post(self.endpoint_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("Request to Gemini API failed: {}", e)))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| AppError::LLM(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::LLM(format!(
                "Gemini request failed ({}): {}",
                status, body_text
            )));
        }

        let response_json: Value = serde_json::from_str(&body_text)
            .map_err(|e| AppError::LLM(format!("Invalid JSON in response: {}", e)))?;

        Self::parse_response(&response_json)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
