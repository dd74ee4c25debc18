//! Backups outside the store: export through fallback sinks, import from
//! JSON or a base64 data URI

use crate::error::{StoreError, StoreResult};
use crate::record::{new_project_id, ProjectRecord};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use pagesmith_model::slugify;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const EXPORT_VERSION: &str = "1.0";

const DATA_URI_PREFIX: &str = "data:application/json;base64,";

/// A record as written to a backup file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedProject {
    #[serde(flatten)]
    pub project: ProjectRecord,
    pub exported_at: DateTime<Utc>,
    pub export_version: String,
}

impl ExportedProject {
    pub fn new(record: &ProjectRecord, exported_at: DateTime<Utc>) -> Self {
        Self {
            project: record.stripped(),
            exported_at,
            export_version: EXPORT_VERSION.to_string(),
        }
    }

    /// `<slug>-<yyyymmdd-hhmmss>`, used for file names
    pub fn file_stem(&self) -> String {
        format!(
            "{}-{}",
            slugify(&self.project.name),
            self.exported_at.format("%Y%m%d-%H%M%S")
        )
    }
}

/// Where a delivered export ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub sink: String,
    pub location: String,
    pub bytes: usize,
}

/// One way of getting an export out of the process
pub trait ExportSink {
    fn name(&self) -> &str;

    fn deliver(&mut self, stem: &str, json: &str) -> StoreResult<Delivery>;

    /// Check that a reported delivery actually holds the payload
    fn verify(&self, _delivery: &Delivery, _json: &str) -> bool {
        true
    }
}

/// Pretty JSON file `<dir>/<stem>.json`
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ExportSink for FileSink {
    fn name(&self) -> &str {
        "json-file"
    }

    fn deliver(&mut self, stem: &str, json: &str) -> StoreResult<Delivery> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::ExportFailed(e.to_string()))?;
        let path = self.dir.join(format!("{}.json", stem));
        fs::write(&path, json).map_err(|e| StoreError::ExportFailed(e.to_string()))?;
        Ok(Delivery {
            sink: self.name().to_string(),
            location: path.display().to_string(),
            bytes: json.len(),
        })
    }

    fn verify(&self, delivery: &Delivery, json: &str) -> bool {
        fs::read_to_string(&delivery.location).map_or(false, |written| written == json)
    }
}

/// Base64 data URI in `<dir>/<stem>.b64`
pub struct Base64Sink {
    dir: PathBuf,
}

impl Base64Sink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ExportSink for Base64Sink {
    fn name(&self) -> &str {
        "base64-file"
    }

    fn deliver(&mut self, stem: &str, json: &str) -> StoreResult<Delivery> {
        let uri = to_data_uri(json);
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::ExportFailed(e.to_string()))?;
        let path = self.dir.join(format!("{}.b64", stem));
        fs::write(&path, &uri).map_err(|e| StoreError::ExportFailed(e.to_string()))?;
        Ok(Delivery {
            sink: self.name().to_string(),
            location: path.display().to_string(),
            bytes: uri.len(),
        })
    }

    fn verify(&self, delivery: &Delivery, json: &str) -> bool {
        fs::read_to_string(&delivery.location)
            .ok()
            .and_then(|uri| from_data_uri(&uri).ok())
            .map_or(false, |decoded| decoded == json)
    }
}

/// Raw JSON to any writer, e.g. stdout
pub struct WriterSink<W: Write> {
    writer: W,
    label: String,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, label: impl Into<String>) -> Self {
        Self {
            writer,
            label: label.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ExportSink for WriterSink<W> {
    fn name(&self) -> &str {
        "writer"
    }

    fn deliver(&mut self, _stem: &str, json: &str) -> StoreResult<Delivery> {
        self.writer
            .write_all(json.as_bytes())
            .and_then(|_| self.writer.flush())
            .map_err(|e| StoreError::ExportFailed(e.to_string()))?;
        Ok(Delivery {
            sink: self.name().to_string(),
            location: self.label.clone(),
            bytes: json.len(),
        })
    }
}

/// Tries each sink in order until one delivers and verifies
#[derive(Default)]
pub struct Exporter {
    sinks: Vec<Box<dyn ExportSink>>,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON file, then base64 file, both in `dir`
    pub fn to_dir(dir: impl AsRef<Path>) -> Self {
        Self::new()
            .with_sink(FileSink::new(dir.as_ref()))
            .with_sink(Base64Sink::new(dir.as_ref()))
    }

    pub fn with_sink(mut self, sink: impl ExportSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn export(&mut self, record: &ProjectRecord, now: DateTime<Utc>) -> StoreResult<Delivery> {
        let exported = ExportedProject::new(record, now);
        let json = serde_json::to_string_pretty(&exported)?;
        let stem = exported.file_stem();

        let mut failures = Vec::new();
        for sink in self.sinks.iter_mut() {
            match sink.deliver(&stem, &json) {
                Ok(delivery) if sink.verify(&delivery, &json) => {
                    info!(id = %record.id, sink = %delivery.sink, location = %delivery.location, "Project exported");
                    return Ok(delivery);
                }
                Ok(delivery) => {
                    warn!(sink = %delivery.sink, location = %delivery.location, "Export did not verify, trying next target");
                    failures.push(format!("{}: written data did not verify", delivery.sink));
                }
                Err(e) => {
                    warn!(sink = sink.name(), error = %e, "Export failed, trying next target");
                    failures.push(format!("{}: {}", sink.name(), e));
                }
            }
        }

        if failures.is_empty() {
            failures.push("no export targets configured".to_string());
        }
        Err(StoreError::ExportFailed(failures.join("; ")))
    }
}

pub fn to_data_uri(json: &str) -> String {
    format!("{}{}", DATA_URI_PREFIX, BASE64_STANDARD.encode(json))
}

fn from_data_uri(uri: &str) -> StoreResult<String> {
    let (header, payload) = uri
        .trim()
        .split_once(',')
        .ok_or_else(|| StoreError::InvalidImport("data URI has no payload".to_string()))?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(StoreError::InvalidImport(format!("unsupported data URI header {:?}", header)));
    }
    let bytes = BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| StoreError::InvalidImport(format!("bad base64: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| StoreError::InvalidImport(format!("payload is not UTF-8: {}", e)))
}

/// Read a backup back into a record.
///
/// Accepts the JSON written by [`FileSink`] or the data URI written by
/// [`Base64Sink`]. `name` and `sections` must be present; a missing id is
/// replaced with a fresh one.
pub fn import_project(text: &str) -> StoreResult<ProjectRecord> {
    let text = text.trim();
    let json = if text.starts_with("data:") {
        from_data_uri(text)?
    } else {
        text.to_string()
    };

    let value: serde_json::Value =
        serde_json::from_str(&json).map_err(|e| StoreError::InvalidImport(e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(StoreError::InvalidImport("expected a JSON object".to_string()));
    };
    if !object.get("name").map_or(false, |v| v.is_string()) {
        return Err(StoreError::InvalidImport("missing project name".to_string()));
    }
    if !object.get("sections").map_or(false, |v| v.is_object()) {
        return Err(StoreError::InvalidImport("missing sections".to_string()));
    }

    let mut record: ProjectRecord =
        serde_json::from_value(value).map_err(|e| StoreError::InvalidImport(e.to_string()))?;
    if record.id.trim().is_empty() {
        record.id = new_project_id(&record.name, Utc::now());
    }
    info!(id = %record.id, name = %record.name, "Project imported");
    Ok(record.stripped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pagesmith_model::{Section, Sections};

    fn record() -> ProjectRecord {
        let home = Section::home("home", "Home");
        let sections: Sections = [(home.id.clone(), home)].into_iter().collect();
        ProjectRecord {
            id: "p-1".to_string(),
            ..ProjectRecord::new("My Shop", sections)
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap()
    }

    /// Always reports success without writing anything
    struct BlackHole;

    impl ExportSink for BlackHole {
        fn name(&self) -> &str {
            "black-hole"
        }

        fn deliver(&mut self, stem: &str, json: &str) -> StoreResult<Delivery> {
            Ok(Delivery {
                sink: self.name().to_string(),
                location: format!("/nonexistent/{}.json", stem),
                bytes: json.len(),
            })
        }

        fn verify(&self, _delivery: &Delivery, _json: &str) -> bool {
            false
        }
    }

    struct Broken;

    impl ExportSink for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn deliver(&mut self, _stem: &str, _json: &str) -> StoreResult<Delivery> {
            Err(StoreError::ExportFailed("disk on fire".to_string()))
        }
    }

    #[test]
    fn test_export_adds_metadata() {
        let exported = ExportedProject::new(&record(), at());
        let value = serde_json::to_value(&exported).unwrap();
        assert_eq!(value["name"], "My Shop");
        assert_eq!(value["exportVersion"], EXPORT_VERSION);
        assert_eq!(value["exportedAt"], "2024-03-09T08:30:00Z");
        assert_eq!(exported.file_stem(), "my-shop-20240309-083000");
    }

    #[test]
    fn test_falls_back_past_silent_and_loud_failures() {
        let mut exporter = Exporter::new()
            .with_sink(Broken)
            .with_sink(BlackHole)
            .with_sink(WriterSink::new(Vec::new(), "memory"));

        let delivery = exporter.export(&record(), at()).unwrap();
        assert_eq!(delivery.sink, "writer");
        assert_eq!(delivery.location, "memory");
    }

    #[test]
    fn test_all_sinks_failing_is_an_error() {
        let mut exporter = Exporter::new().with_sink(Broken).with_sink(BlackHole);
        match exporter.export(&record(), at()) {
            Err(StoreError::ExportFailed(reason)) => {
                assert!(reason.contains("disk on fire"));
                assert!(reason.contains("did not verify"));
            }
            other => panic!("expected export failure, got {:?}", other),
        }
        assert!(Exporter::new().export(&record(), at()).is_err());
    }

    #[test]
    fn test_import_json_and_data_uri() {
        let json = serde_json::to_string(&ExportedProject::new(&record(), at())).unwrap();

        let from_json = import_project(&json).unwrap();
        assert_eq!(from_json.id, "p-1");
        assert_eq!(from_json.name, "My Shop");
        assert!(from_json.extra.is_empty());

        let from_uri = import_project(&to_data_uri(&json)).unwrap();
        assert_eq!(from_uri, from_json);
    }

    #[test]
    fn test_import_requires_name_and_sections() {
        assert!(matches!(
            import_project(r#"{"sections": {}}"#),
            Err(StoreError::InvalidImport(_))
        ));
        assert!(matches!(
            import_project(r#"{"name": "x"}"#),
            Err(StoreError::InvalidImport(_))
        ));
        assert!(matches!(import_project("[]"), Err(StoreError::InvalidImport(_))));
        assert!(matches!(
            import_project("data:text/plain,hello"),
            Err(StoreError::InvalidImport(_))
        ));
    }

    #[test]
    fn test_import_assigns_missing_id() {
        let record = import_project(r#"{"name": "Fresh", "sections": {}}"#).unwrap();
        assert!(record.id.starts_with("project-"));
        assert_eq!(record.version, 0);
    }
}
