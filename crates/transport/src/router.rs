use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::pattern::normalize_pattern;

/// Error text sent back for a pattern nobody registered.
pub const NO_MATCHING_HANDLER: &str =
    "There is no matching message handler defined in the remote service.";

type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>;
type Handler = Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

/// Pattern → handler table consulted by [`crate::MessageServer`].
#[derive(Clone, Default)]
pub struct MessageRouter {
    handlers: HashMap<String, Handler>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `pattern`. A later registration for the same
    /// pattern replaces the earlier one.
    pub fn route<F, Fut>(mut self, pattern: &Value, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |data| Box::pin(handler(data)));
        self.handlers.insert(normalize_pattern(pattern), handler);
        self
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Run the handler for an already normalized pattern.
    pub async fn dispatch(&self, pattern: &str, data: Value) -> Result<Value, String> {
        let Some(handler) = self.handlers.get(pattern).cloned() else {
            return Err(NO_MATCHING_HANDLER.to_string());
        };
        handler(data).await.map_err(|e| e.to_string())
    }
}
