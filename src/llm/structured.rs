//! Typed structured generation
//!
//! Every research call site asks the model for one concrete Rust type. This
//! module is the boundary where provider JSON becomes that type: the schema is
//! derived from the type, the response is validated by deserializing it, and
//! any failure along the way degrades to `T::default()`.

use crate::llm::client::{LLMClient, OutputSchema};
use crate::types::{AppError, Result};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Generate a `T`, returning `T::default()` on any provider or parse failure.
pub async fn generate<T>(client: &dyn LLMClient, system: &str, prompt: &str) -> T
where
    T: DeserializeOwned + JsonSchema + Default,
{
    match try_generate::<T>(client, system, prompt).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                provider = client.provider_name(),
                model = client.model_name(),
                "Structured generation failed, using empty result: {}",
                e
            );
            T::default()
        }
    }
}

/// Generate a `T`, surfacing failures to the caller.
pub async fn try_generate<T>(client: &dyn LLMClient, system: &str, prompt: &str) -> Result<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema = OutputSchema::for_type::<T>();
    let raw = client.generate_object(system, prompt, &schema).await?;

    serde_json::from_value(raw)
        .map_err(|e| AppError::LLM(format!("Response did not match schema: {}", e)))
}

/// Parse a JSON object out of free-form model text.
///
/// Handles markdown code fences and leading/trailing chatter around the object.
pub fn extract_json(text: &str) -> Result<Value> {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    let body = body.trim();

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return Ok(value);
    }

    // Fall back to the outermost braces
    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&body[start..=end])
            .map_err(|e| AppError::LLM(format!("Failed to parse JSON response: {}", e))),
        _ => Err(AppError::LLM(
            "Response did not contain a JSON object".to_string(),
        )),
    }
}

/// Render a JSON Schema as a compact, human-readable shape description.
///
/// `{"learnings": ["string"], "queries": [{"query": string, "research_goal": string}]}`
pub fn describe_schema(schema: &Value) -> String {
    let props = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, def)| format!("\"{}\": {}", name, describe_property(def)))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    format!("{{{}}}", props)
}

fn describe_property(def: &Value) -> String {
    match type_of(def) {
        Some("array") => match def.get("items") {
            Some(items) if type_of(items) == Some("object") && items.get("properties").is_some() => {
                format!("[{}]", describe_schema(items))
            }
            Some(items) => format!("[\"{}\"]", type_of(items).unwrap_or("object")),
            None => "array".to_string(),
        },
        Some("string") => "string".to_string(),
        Some("number") | Some("integer") => "number".to_string(),
        Some("boolean") => "boolean".to_string(),
        _ => "object".to_string(),
    }
}

/// Schema `type`, tolerating the `["string", "null"]` form.
fn type_of(def: &Value) -> Option<&str> {
    match def.get("type") {
        Some(Value::String(t)) => Some(t.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SerpDigest;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedClient(Result<Value>);

    #[async_trait]
    impl LLMClient for FixedClient {
        async fn generate_object(
            &self,
            _system: &str,
            _prompt: &str,
            _schema: &OutputSchema,
        ) -> Result<Value> {
            match &self.0 {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(AppError::LLM(e.to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "fixed"
        }

        fn provider_name(&self) -> &'static str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_generate_parses_typed_response() {
        let client = FixedClient(Ok(json!({
            "learnings": ["Rust 1.0 shipped on 2015-05-15"],
            "follow_up_questions": ["What changed in edition 2018?"]
        })));

        let digest: SerpDigest = generate(&client, "sys", "prompt").await;
        assert_eq!(digest.learnings.len(), 1);
        assert_eq!(digest.follow_up_questions.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_degrades_on_provider_error() {
        let client = FixedClient(Err(AppError::LLM("quota exceeded".into())));
        let digest: SerpDigest = generate(&client, "sys", "prompt").await;
        assert!(digest.is_empty());
    }

    #[tokio::test]
    async fn test_generate_degrades_on_malformed_shape() {
        let client = FixedClient(Ok(json!({"learnings": "not a list"})));
        let digest: SerpDigest = generate(&client, "sys", "prompt").await;
        assert_eq!(digest, SerpDigest::default());

        let strict = try_generate::<SerpDigest>(&client, "sys", "prompt").await;
        assert!(strict.is_err());
    }

    #[test]
    fn test_extract_json_from_fenced_block() {
        let text = "```json\n{\"exact_answer\": \"42\"}\n```";
        assert_eq!(extract_json(text).unwrap(), json!({"exact_answer": "42"}));
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let text = "Sure! Here you go: {\"a\": [1, 2]} Hope this helps.";
        assert_eq!(extract_json(text).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_extract_json_rejects_plain_text() {
        assert!(extract_json("I cannot help with that").is_err());
    }

    #[test]
    fn test_describe_flat_and_nested_schema() {
        let schema = json!({
            "type": "object",
            "properties": {
                "learnings": {"type": "array", "items": {"type": "string"}},
                "queries": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "query": {"type": "string"},
                            "research_goal": {"type": "string"}
                        }
                    }
                },
                "score": {"type": ["number", "null"]}
            }
        });

        assert_eq!(
            describe_schema(&schema),
            r#"{"learnings": ["string"], "queries": [{"query": string, "research_goal": string}], "score": number}"#
        );
    }
}
