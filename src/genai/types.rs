//! Wire types for the Gemini generateContent API.
//!
//! A deliberately small subset of the API surface: text-in, structured
//! JSON or inline-image out. All structs serialize camelCase to match
//! the wire format.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Inline binary payload (base64 data plus MIME type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// One part of a message: text or inline data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), inline_data: None }
    }
}

/// Multi-part message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            parts: Some(vec![Part::text(text)]),
            role: Some("user".to_string()),
        }
    }
}

/// JSON Schema type tags, as the API spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

/// Declared output schema; constrains the model to structured JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
}

impl Schema {
    pub fn string() -> Self {
        Self { schema_type: Some(SchemaType::String), ..Default::default() }
    }

    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    pub fn object(properties: HashMap<String, Schema>) -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            properties: Some(properties),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_required(mut self, required: Vec<String>) -> Self {
        self.required = Some(required);
        self
    }
}

/// Generation parameters; only the structured-output knobs are used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Schema>,
}

/// Request body for generateContent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One response candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
}

/// Response body for generateContent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    pub fn text(&self) -> Option<String> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .filter_map(|p| p.text.clone())
            .reduce(|acc, s| acc + &s)
    }

    /// Base64 payload of the first inline-data part, if any.
    pub fn inline_image_data(&self) -> Option<String> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .find_map(|p| p.inline_data.as_ref()?.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_serializes_to_wire_format() {
        let schema = Schema::array(
            Schema::object(HashMap::from([(
                "term".to_string(),
                Schema::string().with_description("The key term."),
            )]))
            .with_required(vec!["term".to_string()]),
        );

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type"], "ARRAY");
        assert_eq!(json["items"]["type"], "OBJECT");
        assert_eq!(json["items"]["properties"]["term"]["type"], "STRING");
        assert_eq!(json["items"]["required"][0], "term");
    }

    #[test]
    fn response_text_joins_text_parts_only() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "[{\"term\""},
                        {"inlineData": {"data": "QUJD", "mimeType": "image/png"}},
                        {"text": ": \"NPO\"}]"}
                    ],
                    "role": "model"
                }
            }]
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("[{\"term\": \"NPO\"}]"));
        assert_eq!(response.inline_image_data().as_deref(), Some("QUJD"));
    }

    #[test]
    fn empty_response_has_no_text() {
        let response = GenerateContentResponse::default();
        assert!(response.text().is_none());
        assert!(response.inline_image_data().is_none());
    }
}
