//! Configuration sources: where raw catalogue records come from.
//!
//! The registry has no opinion on record origin; anything that can produce a
//! list of raw JSON records works. Ships with an in-memory source (tests,
//! embedding applications), a JSON file source, and an HTTP source.

use crate::catalogue::LanguageConfig;
use crate::error::{LanguageError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Supplies raw candidate records to the registry.
///
/// Records are raw JSON values rather than parsed configs so the registry can
/// enforce per-record byte bounds and skip malformed entries individually.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Where the records come from, for log messages.
    fn describe(&self) -> String;

    /// Fetch every candidate record.
    async fn fetch(&self) -> Result<Vec<serde_json::Value>>;
}

/// Accept either a bare JSON array of records or an object wrapping one
/// under a `languages` key.
fn extract_records(value: serde_json::Value) -> Result<Vec<serde_json::Value>> {
    match value {
        serde_json::Value::Array(records) => Ok(records),
        serde_json::Value::Object(mut map) => match map.remove("languages") {
            Some(serde_json::Value::Array(records)) => Ok(records),
            _ => Err(LanguageError::Source(
                "expected a JSON array of records or an object with a 'languages' array"
                    .to_string(),
            )),
        },
        _ => Err(LanguageError::Source(
            "expected a JSON array of records".to_string(),
        )),
    }
}

/// In-memory source backed by a fixed list of records.
pub struct StaticSource {
    records: Vec<serde_json::Value>,
}

impl StaticSource {
    /// Source over raw JSON values.
    pub fn new(records: Vec<serde_json::Value>) -> Self {
        Self { records }
    }

    /// Source over already-typed configs (serialized back to raw records so
    /// they pass through the same validation path as external data).
    pub fn from_configs(configs: &[LanguageConfig]) -> Self {
        let records = configs
            .iter()
            .filter_map(|c| serde_json::to_value(c).ok())
            .collect();
        Self { records }
    }

    /// A source that yields nothing, forcing the baked-in defaults.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

#[async_trait]
impl ConfigSource for StaticSource {
    fn describe(&self) -> String {
        format!("static source ({} records)", self.records.len())
    }

    async fn fetch(&self) -> Result<Vec<serde_json::Value>> {
        Ok(self.records.clone())
    }
}

/// Reads records from a JSON document on disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("file source ({})", self.path.display())
    }

    async fn fetch(&self) -> Result<Vec<serde_json::Value>> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            LanguageError::Source(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
            LanguageError::Source(format!("failed to parse {}: {}", self.path.display(), e))
        })?;

        extract_records(value)
    }
}

/// Fetches records from an HTTP endpoint returning JSON.
pub struct HttpConfigSource {
    client: reqwest::Client,
    url: String,
}

impl HttpConfigSource {
    /// Build a source for the given URL with a bounded request timeout.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LanguageError::Source(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    fn describe(&self) -> String {
        format!("http source ({})", self.url)
    }

    async fn fetch(&self) -> Result<Vec<serde_json::Value>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LanguageError::Source(format!("request to {} failed: {}", self.url, e)))?
            .error_for_status()
            .map_err(|e| LanguageError::Source(format!("{} returned an error: {}", self.url, e)))?;

        let value: serde_json::Value = response.json().await.map_err(|e| {
            LanguageError::Source(format!("invalid JSON from {}: {}", self.url, e))
        })?;

        extract_records(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Static Source Tests ====================

    #[tokio::test]
    async fn test_static_source_returns_records() {
        let source = StaticSource::new(vec![serde_json::json!({"code": "en"})]);
        let records = source.fetch().await.expect("fetch succeeds");
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_static_source_from_configs_round_trips() {
        let configs = vec![LanguageConfig::new("en", "en-US", "English")];
        let source = StaticSource::from_configs(&configs);
        let records = source.fetch().await.expect("fetch succeeds");
        assert_eq!(records[0]["code"], "en");
    }

    #[tokio::test]
    async fn test_empty_source() {
        let records = StaticSource::empty().fetch().await.expect("fetch succeeds");
        assert!(records.is_empty());
    }

    // ==================== File Source Tests ====================

    #[tokio::test]
    async fn test_file_source_reads_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("languages.json");
        std::fs::write(&path, r#"[{"code": "en"}, {"code": "es"}]"#).expect("write");

        let records = JsonFileSource::new(&path).fetch().await.expect("fetch");
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_file_source_reads_wrapped_object() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("languages.json");
        std::fs::write(&path, r#"{"languages": [{"code": "fr"}]}"#).expect("write");

        let records = JsonFileSource::new(&path).fetch().await.expect("fetch");
        assert_eq!(records[0]["code"], "fr");
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_source_error() {
        let result = JsonFileSource::new("/nonexistent/languages.json").fetch().await;
        assert!(matches!(result, Err(LanguageError::Source(_))));
    }

    #[tokio::test]
    async fn test_file_source_malformed_json_is_source_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("languages.json");
        std::fs::write(&path, "not json at all").expect("write");

        let result = JsonFileSource::new(&path).fetch().await;
        assert!(matches!(result, Err(LanguageError::Source(_))));
    }

    #[tokio::test]
    async fn test_scalar_document_is_source_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("languages.json");
        std::fs::write(&path, "42").expect("write");

        let result = JsonFileSource::new(&path).fetch().await;
        assert!(matches!(result, Err(LanguageError::Source(_))));
    }
}
