use chrono::{DateTime, Utc};
use pagesmith_model::{seed_from_key, tree, Sections};
use serde::{Deserialize, Serialize};

/// A saved project: every section of a document plus bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub sections: Sections,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Anything else the producer attached. Never persisted.
    #[serde(flatten, default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProjectRecord {
    pub fn new(name: impl Into<String>, sections: Sections) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: new_project_id(&name, now),
            name,
            description: String::new(),
            tags: Vec::new(),
            sections,
            created_at: now,
            updated_at: now,
            version: 0,
            thumbnail: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Copy holding only the persisted fields
    pub fn stripped(&self) -> ProjectRecord {
        ProjectRecord {
            extra: serde_json::Map::new(),
            ..self.clone()
        }
    }

    /// Total elements across all sections, nested ones included
    pub fn element_count(&self) -> usize {
        self.sections
            .values()
            .map(|section| tree::count(&section.elements))
            .sum()
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }
}

/// `project-<crc32>` of the name and a timestamp
pub fn new_project_id(name: &str, at: DateTime<Utc>) -> String {
    let nanos = at.timestamp_nanos_opt().unwrap_or_default();
    format!("project-{}", seed_from_key(&format!("{}:{}", name, nanos)))
}
