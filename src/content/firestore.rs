//! Firestore REST wire format
//!
//! Documents come back as `{ "name": ..., "fields": { key: Value } }` where
//! every value is wrapped in a single-key object naming its type
//! (`{"stringValue": "..."}`, `{"mapValue": {"fields": {...}}}`, ...).
//! These helpers unwrap that encoding into plain JSON so the document can be
//! deserialized straight into [`BlogPost`].

use serde::Deserialize;
use serde_json::{Map, Value};

use super::post::BlogPost;

/// A single document as returned by the REST API
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Full resource name, ending in `/{collection}/{id}`
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// Response of a collection listing request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    pub next_page_token: Option<String>,
}

impl Document {
    /// Document id (last path segment of `name`)
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Plain JSON object of the document fields
    pub fn to_json(&self) -> Value {
        fields_to_json(&self.fields)
    }

    /// Decode into a blog post; the document id becomes the slug
    pub fn into_post(self) -> Result<BlogPost, serde_json::Error> {
        let mut post: BlogPost = serde_json::from_value(self.to_json())?;
        post.slug = self.id().to_string();
        Ok(post)
    }
}

fn fields_to_json(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), decode_value(v)))
            .collect(),
    )
}

/// Unwrap one typed Firestore value
pub fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return value.clone();
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" | "referenceValue"
        | "bytesValue" => inner.clone(),
        // 64-bit integers travel as strings
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| inner.clone()),
            other => other.clone(),
        },
        "geoPointValue" => inner.clone(),
        "mapValue" => match inner.get("fields").and_then(Value::as_object) {
            Some(fields) => fields_to_json(fields),
            None => Value::Object(Map::new()),
        },
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        _ => inner.clone(),
    }
}
