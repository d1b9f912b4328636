use crate::llm::client::{http_client, LLMClient, OutputSchema};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

/// OpenAI chat-completions client (works with any compatible endpoint).
///
/// Structured output is obtained by offering a single function whose
/// parameters are the output schema and forcing the model to call it.
pub struct OpenAIClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String, temperature: f32) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
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
            "tools": [{
                "type": "function",
                "function": {
                    "name": schema.name,
                    "description": schema.description,
                    "parameters": schema.parameters
                }
            }],
            "tool_choice": {
                "type": "function",
                "function": {"name": schema.name}
            },
            "temperature": self.temperature
        })
    }

    /// Pull the forced function call's arguments out of a completion.
    fn parse_response(response: &Value) -> Result<Value> {
        let message = response
            .pointer("/choices/0/message")
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))?;

        let arguments = message
            .pointer("/tool_calls/0/function/arguments")
            .or_else(|| message.pointer("/function_call/arguments"))
            .and_then(Value::as_str);

        match arguments {
            Some(args) => serde_json::from_str(args)
                .map_err(|e| AppError::LLM(format!("Invalid function arguments: {}", e))),
            None => Ok(json!({})),
        }
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate_object(
        &self,
        system: &str,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<Value> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = self.build_request(system, prompt, schema);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "OpenAI request failed ({}): {}",
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
        "openai"
    }
}
