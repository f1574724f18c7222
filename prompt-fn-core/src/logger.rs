//! The structured logging capability.
//!
//! Prompt functions never log through a global: every definition owns an
//! `Arc<dyn Logger>` built once by [`create_logger`]. The default
//! [`TracingLogger`] forwards events to `tracing`; [`RecordingLogger`] keeps
//! them in memory so tests can assert on them.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// Target used for every event emitted by [`TracingLogger`].
pub const LOG_TARGET: &str = "prompt_fn";

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Normal operation.
    Info,
    /// Something degraded but the call continued.
    Warn,
    /// The call failed.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Leveled, structured logger with scoped children.
///
/// `context` is expected to be a JSON object; other values are nested under a
/// `"context"` key when merged with the logger's bindings.
pub trait Logger: Send + Sync {
    /// Record an event.
    fn log(&self, level: LogLevel, context: JsonValue, message: &str);

    /// Create a logger that adds `bindings` to every event.
    fn child(&self, bindings: JsonValue) -> Arc<dyn Logger>;

    /// Record a debug event.
    fn debug(&self, context: JsonValue, message: &str) {
        self.log(LogLevel::Debug, context, message);
    }

    /// Record an info event.
    fn info(&self, context: JsonValue, message: &str) {
        self.log(LogLevel::Info, context, message);
    }

    /// Record a warning event.
    fn warn(&self, context: JsonValue, message: &str) {
        self.log(LogLevel::Warn, context, message);
    }

    /// Record an error event.
    fn error(&self, context: JsonValue, message: &str) {
        self.log(LogLevel::Error, context, message);
    }
}

impl std::fmt::Debug for dyn Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Logger")
    }
}

/// Resolve the logger a prompt definition will use.
///
/// Reuses `logger` when given, otherwise builds a [`TracingLogger`]. With a
/// module name the result is a child bound to `{"module": name}`; without one
/// the logger is returned unchanged.
pub fn create_logger(logger: Option<Arc<dyn Logger>>, module_name: Option<&str>) -> Arc<dyn Logger> {
    let logger = logger.unwrap_or_else(|| Arc::new(TracingLogger::new()));
    match module_name {
        Some(name) => logger.child(serde_json::json!({ "module": name })),
        None => logger,
    }
}

fn merge_bindings(target: &mut Map<String, JsonValue>, value: JsonValue) {
    match value {
        JsonValue::Object(map) => target.extend(map),
        JsonValue::Null => {}
        other => {
            target.insert("context".to_string(), other);
        }
    }
}

fn merged_context(bindings: &Map<String, JsonValue>, context: JsonValue) -> JsonValue {
    let mut fields = bindings.clone();
    merge_bindings(&mut fields, context);
    JsonValue::Object(fields)
}

// ============================================================================
// TracingLogger
// ============================================================================

/// Logger that emits `tracing` events.
///
/// Bindings and per-event context are merged into one JSON object and attached
/// as the `context` field, so any subscriber (pretty, JSON, OpenTelemetry)
/// receives the full structure.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    bindings: Map<String, JsonValue>,
}

impl TracingLogger {
    /// Create a logger without bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings attached to every event.
    #[must_use]
    pub fn bindings(&self) -> &Map<String, JsonValue> {
        &self.bindings
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, context: JsonValue, message: &str) {
        let context = merged_context(&self.bindings, context);
        match level {
            LogLevel::Debug => tracing::debug!(target: LOG_TARGET, context = %context, "{message}"),
            LogLevel::Info => tracing::info!(target: LOG_TARGET, context = %context, "{message}"),
            LogLevel::Warn => tracing::warn!(target: LOG_TARGET, context = %context, "{message}"),
            LogLevel::Error => tracing::error!(target: LOG_TARGET, context = %context, "{message}"),
        }
    }

    fn child(&self, bindings: JsonValue) -> Arc<dyn Logger> {
        let mut merged = self.bindings.clone();
        merge_bindings(&mut merged, bindings);
        Arc::new(Self { bindings: merged })
    }
}

// ============================================================================
// RecordingLogger
// ============================================================================

/// A single recorded log event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Event severity.
    pub level: LogLevel,
    /// Bindings merged with the event context.
    pub context: JsonValue,
    /// Event message.
    pub message: String,
}

/// In-memory logger for tests.
///
/// Children share the parent's record buffer, so a handle kept by the test
/// sees everything logged through any logger derived from it.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    bindings: Map<String, JsonValue>,
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl RecordingLogger {
    /// Create an empty recording logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in emission order.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Records at a given level.
    #[must_use]
    pub fn records_at(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect()
    }

    /// Whether a record with this level and message exists.
    #[must_use]
    pub fn contains(&self, level: LogLevel, message: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|r| r.level == level && r.message == message)
    }

    /// Drop all records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, context: JsonValue, message: &str) {
        let record = LogRecord {
            level,
            context: merged_context(&self.bindings, context),
            message: message.to_string(),
        };
        self.records.lock().push(record);
    }

    fn child(&self, bindings: JsonValue) -> Arc<dyn Logger> {
        let mut merged = self.bindings.clone();
        merge_bindings(&mut merged, bindings);
        Arc::new(Self {
            bindings: merged,
            records: Arc::clone(&self.records),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(LogLevel::Debug, "debug")]
    #[case(LogLevel::Info, "info")]
    #[case(LogLevel::Warn, "warn")]
    #[case(LogLevel::Error, "error")]
    fn test_log_level_names(#[case] level: LogLevel, #[case] name: &str) {
        assert_eq!(level.to_string(), name);
        assert_eq!(serde_json::to_value(level).unwrap(), json!(name));
    }

    #[test]
    fn test_create_logger_reuses_provided_logger_without_module() {
        let recorder: Arc<dyn Logger> = Arc::new(RecordingLogger::new());
        let logger = create_logger(Some(Arc::clone(&recorder)), None);
        assert!(Arc::ptr_eq(&logger, &recorder));
    }

    #[test]
    fn test_create_logger_binds_module_name() {
        let recorder = RecordingLogger::new();
        let logger = create_logger(Some(Arc::new(recorder.clone())), Some("summarize"));

        logger.info(json!({"step": 1}), "hello");

        let records = recorder.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].context, json!({"module": "summarize", "step": 1}));
        assert_eq!(records[0].message, "hello");
    }

    #[test]
    fn test_create_logger_defaults_to_tracing() {
        let logger = create_logger(None, Some("default"));
        // Emitting without a subscriber installed is a no-op.
        logger.info(json!({}), "no subscriber");
        logger.child(json!({"nested": true})).debug(json!(null), "still fine");
    }

    #[test]
    fn test_child_context_overrides_bindings() {
        let recorder = RecordingLogger::new();
        let child = recorder.child(json!({"module": "a", "scope": "outer"}));
        child.warn(json!({"scope": "inner"}), "overridden");

        let record = &recorder.records_at(LogLevel::Warn)[0];
        assert_eq!(record.context, json!({"module": "a", "scope": "inner"}));
    }

    #[test]
    fn test_non_object_context_is_nested() {
        let recorder = RecordingLogger::new();
        recorder.error(json!("raw text"), "odd context");
        assert_eq!(recorder.records()[0].context, json!({"context": "raw text"}));
    }

    #[test]
    fn test_contains_and_clear() {
        let recorder = RecordingLogger::new();
        recorder.debug(json!({}), "one");
        assert!(recorder.contains(LogLevel::Debug, "one"));
        assert!(!recorder.contains(LogLevel::Info, "one"));
        recorder.clear();
        assert!(recorder.records().is_empty());
    }

    #[test]
    fn test_tracing_logger_child_accumulates_bindings() {
        let logger = TracingLogger::new();
        let child = logger.child(json!({"module": "x"}));
        child.info(json!({"k": "v"}), "message");
        assert!(logger.bindings().is_empty());
    }
}
