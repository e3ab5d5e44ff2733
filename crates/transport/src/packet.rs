use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client → server. `id` is absent for fire-and-forget events. Clients send
/// `pattern` already normalized to a string; other JSON is normalized on
/// arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPacket {
    pub pattern: Value,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Server → client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePacket {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<Value>,
    #[serde(rename = "isDisposed", default)]
    pub is_disposed: bool,
}

impl ResponsePacket {
    pub fn reply(id: String, response: Value) -> Self {
        Self { id, response: Some(response), err: None, is_disposed: true }
    }

    pub fn error(id: String, message: impl Into<String>) -> Self {
        Self { id, response: None, err: Some(Value::String(message.into())), is_disposed: true }
    }

    /// Human readable form of `err`: a string as is, an object's `message`
    /// field, or the raw JSON.
    pub fn error_message(&self) -> Option<String> {
        self.err.as_ref().map(|err| match err {
            Value::String(s) => s.clone(),
            Value::Object(map) => match map.get("message") {
                Some(Value::String(m)) => m.clone(),
                _ => err.to_string(),
            },
            other => other.to_string(),
        })
    }
}
