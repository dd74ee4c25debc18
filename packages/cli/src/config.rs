use pagesmith_compiler_html::{CatalogOptions, ExportOptions};
use pagesmith_editor::EditorConfig;
use pagesmith_store::{FileBackend, ProjectStore, StoreConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagesmith.config.json";

/// Suffix of project files on disk
pub const PROJECT_SUFFIX: &str = ".page.json";

/// Pagesmith configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding `*.page.json` project files
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Where compiled documents are written
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

fn default_src_dir() -> String {
    "pages".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_store_dir() -> String {
    ".pagesmith/store".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    #[serde(default = "default_store_dir")]
    pub dir: String,

    #[serde(flatten)]
    pub limits: StoreConfig,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
            limits: StoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    /// Document title; the project name when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Catalog backend; catalog sections only compile when both are set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_param: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl ExportSettings {
    pub fn options(&self, project_name: &str) -> ExportOptions {
        let defaults = ExportOptions::default();

        let catalog = match (&self.api_base_url, &self.identity) {
            (Some(api_base_url), Some(identity)) => {
                let mut catalog = CatalogOptions::new(api_base_url.as_str(), identity.as_str());
                if let Some(param) = &self.identity_param {
                    catalog.identity_param = param.clone();
                }
                if let Some(currency) = &self.currency {
                    catalog.currency = currency.clone();
                }
                Some(catalog)
            }
            _ => None,
        };

        ExportOptions {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| project_name.to_string()),
            lang: self.lang.clone().unwrap_or(defaults.lang),
            catalog,
            ..ExportOptions::default()
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn get_src_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.src_dir)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }

    pub fn open_store(&self, cwd: &str) -> anyhow::Result<ProjectStore<FileBackend>> {
        let backend = FileBackend::open(PathBuf::from(cwd).join(&self.store.dir))?;
        Ok(ProjectStore::new(backend, self.store.limits.clone()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            out_dir: default_out_dir(),
            editor: EditorConfig::default(),
            store: StoreSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "srcDir": "site",
            "editor": { "maxHistory": 20 },
            "store": { "dir": "data", "byteBudget": 1024, "maxRecords": 5 },
            "export": { "title": "Shop", "apiBaseUrl": "https://api.test", "identity": "7" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.src_dir, "site");
        assert_eq!(config.out_dir, "dist");
        assert_eq!(config.editor.max_history, 20);
        assert_eq!(config.editor.add_debounce_ms, 300);
        assert_eq!(config.store.dir, "data");
        assert_eq!(config.store.limits.byte_budget, 1024);
        assert_eq!(config.store.limits.max_records, 5);
        assert_eq!(config.store.limits.compression_level, 3);

        let options = config.export.options("Ignored");
        assert_eq!(options.title, "Shop");
        assert_eq!(options.catalog.unwrap().identity, "7");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.src_dir, "pages");
        assert_eq!(config.store.dir, ".pagesmith/store");

        let options = config.export.options("My Project");
        assert_eq!(options.title, "My Project");
        assert!(options.catalog.is_none());
    }

    #[test]
    fn test_store_settings_round_trip_flat() {
        let value = serde_json::to_value(StoreSettings::default()).unwrap();
        assert_eq!(value["dir"], ".pagesmith/store");
        assert_eq!(value["maxRecords"], 50);
    }
}
