use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Editing engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of undo levels (0 = unlimited)
    pub max_history: usize,

    /// Window in which an identical add is treated as a duplicate (0 = off)
    pub add_debounce_ms: u64,

    pub canvas_width: f64,

    pub canvas_height: f64,

    /// Seed for element ids. Derived from the clock when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
}

impl EditorConfig {
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = Some(key.into());
        self
    }

    pub(crate) fn resolve_session_key(&self) -> String {
        match &self.session_key {
            Some(key) => key.clone(),
            None => {
                let nanos = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos())
                    .unwrap_or_default();
                format!("session-{}-{}", std::process::id(), nanos)
            }
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: 100,
            add_debounce_ms: 300,
            canvas_width: 1450.0,
            canvas_height: 900.0,
            session_key: None,
        }
    }
}
