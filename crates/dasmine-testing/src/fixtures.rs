//! Fixtures for activity-stream test data.
//!
//! Provides utilities to:
//! - Build `databaseActivityEventList` entries fluently
//! - Render them as JSON lines in the decoded stream format
//! - Locate the sample logs shipped with dasmine-providers

use anyhow::Result;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Expand a compact `YYYYMMDDHHMMSS` value into a raw stream timestamp.
///
/// Panics on input that is not 14 characters; fixtures are written by hand.
pub fn raw_log_time(compact: &str, micros: &str) -> String {
    assert_eq!(compact.len(), 14, "compact timestamp must be 14 digits");
    format!(
        "{}-{}-{}T{}:{}:{}.{}Z",
        &compact[0..4],
        &compact[4..6],
        &compact[6..8],
        &compact[8..10],
        &compact[10..12],
        &compact[12..14],
        micros
    )
}

/// Builder for one nested activity entry.
#[derive(Debug, Clone)]
pub struct DasEvent {
    fields: serde_json::Map<String, Value>,
}

impl DasEvent {
    fn record(command: &str, session_id: &str, compact: &str) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("type".into(), json!("record"));
        fields.insert("clientApplication".into(), Value::Null);
        fields.insert("command".into(), json!(command));
        fields.insert("commandText".into(), json!(""));
        fields.insert("databaseName".into(), json!("appdb"));
        fields.insert("dbProtocol".into(), json!("MySQL"));
        fields.insert("dbUserName".into(), json!("app"));
        fields.insert("logTime".into(), json!(raw_log_time(compact, "000000")));
        fields.insert("remoteHost".into(), json!("10.0.1.20"));
        fields.insert("serverHost".into(), json!("10.0.0.5"));
        fields.insert("sessionId".into(), json!(session_id));
        fields.insert("statementId".into(), json!(0));
        Self { fields }
    }

    pub fn connect(session_id: &str, compact: &str) -> Self {
        Self::record("CONNECT", session_id, compact)
    }

    pub fn disconnect(session_id: &str, compact: &str) -> Self {
        Self::record("DISCONNECT", session_id, compact)
    }

    pub fn query(session_id: &str, compact: &str, sql: &str) -> Self {
        Self::record("QUERY", session_id, compact).sql(sql)
    }

    /// Non-record entry, as emitted periodically by the stream
    pub fn heartbeat() -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("type".into(), json!("heartbeat"));
        Self { fields }
    }

    pub fn user(self, name: &str) -> Self {
        self.set("dbUserName", json!(name))
    }

    pub fn sql(self, text: &str) -> Self {
        self.set("commandText", json!(text))
    }

    pub fn micros(self, micros: &str) -> Self {
        let compact = self.fields["logTime"]
            .as_str()
            .map(|raw| raw.chars().filter(char::is_ascii_digit).take(14).collect::<String>())
            .unwrap_or_default();
        self.set("logTime", json!(raw_log_time(&compact, micros)))
    }

    pub fn database(self, name: &str) -> Self {
        self.set("databaseName", json!(name))
    }

    pub fn server_host(self, host: &str) -> Self {
        self.set("serverHost", json!(host))
    }

    pub fn remote_host(self, host: &str) -> Self {
        self.set("remoteHost", json!(host))
    }

    /// Override or add any field
    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Drop a field entirely
    pub fn without(mut self, key: &str) -> Self {
        self.fields.remove(key);
        self
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Render entries as one decoded activity-stream line.
pub fn das_line(events: &[DasEvent]) -> String {
    json!({
        "type": "DatabaseActivityMonitoringRecord",
        "clusterId": "cluster-TESTCLUSTER",
        "instanceId": "db-TESTINSTANCE",
        "databaseActivityEventList": events.iter().map(DasEvent::to_json).collect::<Vec<_>>()
    })
    .to_string()
}

/// Sample file manager for bundled activity logs.
pub struct SampleFiles {
    samples_dir: PathBuf,
}

impl Default for SampleFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleFiles {
    /// Assumes samples are in `crates/dasmine-providers/tests/samples/`.
    pub fn new() -> Self {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let samples_dir = manifest_dir
            .parent()
            .map(|crates| crates.join("dasmine-providers/tests/samples"))
            .unwrap_or_else(|| PathBuf::from("tests/samples"));

        Self { samples_dir }
    }

    pub fn path(&self, sample_name: &str) -> PathBuf {
        self.samples_dir.join(sample_name)
    }

    /// Copy a sample file to a destination.
    pub fn copy_to(&self, sample_name: &str, dest: &Path) -> Result<()> {
        fs::copy(self.path(sample_name), dest)?;
        Ok(())
    }
}
