//! Object-schema validation.
//!
//! A schema is a list of keys with a type and modifiers. Validation stops at
//! the first problem and reports it in the form `"<key>" is required`, which
//! clients receive verbatim.

use serde_json::Value;

use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    String,
    Number,
    Integer,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    ty: KeyType,
    required: bool,
    email: bool,
    min_len: Option<usize>,
}

impl Key {
    fn of(ty: KeyType) -> Self {
        Self { ty, required: false, email: false, min_len: None }
    }

    pub fn string() -> Self { Self::of(KeyType::String) }
    pub fn number() -> Self { Self::of(KeyType::Number) }
    pub fn integer() -> Self { Self::of(KeyType::Integer) }
    pub fn boolean() -> Self { Self::of(KeyType::Boolean) }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    pub fn min_len(mut self, n: usize) -> Self {
        self.min_len = Some(n);
        self
    }

    fn check(&self, name: &str, value: &Value) -> Option<String> {
        match (self.ty, value) {
            (KeyType::String, Value::String(s)) => {
                if s.is_empty() {
                    return Some(format!("\"{name}\" is not allowed to be empty"));
                }
                if let Some(min) = self.min_len.filter(|min| s.chars().count() < *min) {
                    return Some(format!("\"{name}\" length must be at least {min} characters long"));
                }
                if self.email && !looks_like_email(s) {
                    return Some(format!("\"{name}\" must be a valid email"));
                }
                None
            }
            (KeyType::String, _) => Some(format!("\"{name}\" must be a string")),
            (KeyType::Number, Value::Number(_)) => None,
            (KeyType::Number, _) => Some(format!("\"{name}\" must be a number")),
            (KeyType::Integer, Value::Number(n)) => {
                let integral = n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0);
                (!integral).then(|| format!("\"{name}\" must be an integer"))
            }
            (KeyType::Integer, _) => Some(format!("\"{name}\" must be a number")),
            (KeyType::Boolean, Value::Bool(_)) => None,
            (KeyType::Boolean, _) => Some(format!("\"{name}\" must be a boolean")),
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    keys: Vec<(String, Key)>,
    allow_unknown: bool,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, name: impl Into<String>, key: Key) -> Self {
        self.keys.push((name.into(), key));
        self
    }

    /// Accept keys that the schema does not declare.
    pub fn unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    pub fn validate(&self, value: &Value) -> Result<(), ModelError> {
        self.first_error(value).map_or(Ok(()), |msg| Err(ModelError::Validation(msg)))
    }

    fn first_error(&self, value: &Value) -> Option<String> {
        let Some(object) = value.as_object() else {
            return Some("\"value\" must be of type object".to_string());
        };

        for (name, key) in &self.keys {
            match object.get(name) {
                None if key.required => return Some(format!("\"{name}\" is required")),
                None => {}
                Some(v) => {
                    if let Some(msg) = key.check(name, v) {
                        return Some(msg);
                    }
                }
            }
        }

        if !self.allow_unknown {
            if let Some(extra) = object.keys().find(|k| !self.keys.iter().any(|(n, _)| n == *k)) {
                return Some(format!("\"{extra}\" is not allowed"));
            }
        }
        None
    }
}
