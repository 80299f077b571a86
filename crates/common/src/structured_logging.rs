use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Write};
use std::str::FromStr;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Span, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// One JSON log line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredLogEntry {
    /// ISO 8601 timestamp
    pub timestamp: String,
    pub level: String,
    /// Target module
    pub target: String,
    pub message: String,
    /// Remaining event fields
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ExecutionContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Where and for whom an event was emitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub request_id: Option<String>,
    pub user_id: Option<String>,
    pub app_version: String,
    pub hostname: String,
    pub pid: u32,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            request_id: None,
            user_id: None,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            hostname: hostname::get()
                .map(|h| h.to_string_lossy().to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
            pid: std::process::id(),
        }
    }
}

/// Layer that renders every event as a [`StructuredLogEntry`] line.
///
/// Fields of the enclosing spans are merged into each event, innermost span
/// first, so `request_id` and `user_id` reach every line of a request.
pub struct JsonFormatter<W = fn() -> io::Stderr> {
    make_writer: W,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            make_writer: io::stderr,
        }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> JsonFormatter<W> {
    pub fn with_writer<W2>(self, make_writer: W2) -> JsonFormatter<W2>
    where
        W2: for<'w> MakeWriter<'w> + 'static,
    {
        JsonFormatter { make_writer }
    }
}

/// Span fields captured at span creation
struct SpanFields(HashMap<String, Value>);

impl<S, W> Layer<S> for JsonFormatter<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        attrs.record(&mut visitor);
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanFields(visitor.fields));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                if let Some(SpanFields(fields)) = span.extensions().get::<SpanFields>() {
                    for (key, value) in fields {
                        visitor
                            .fields
                            .entry(key.clone())
                            .or_insert_with(|| value.clone());
                    }
                }
            }
        }

        if let Ok(json) = serde_json::to_string(&visitor.into_entry(event)) {
            let mut writer = self.make_writer.make_writer();
            let _ = writeln!(writer, "{}", json);
        }
    }
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: HashMap<String, Value>,
}

impl Visit for JsonVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(
                field.name().to_string(),
                Value::String(format!("{:?}", value)),
            );
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.fields.insert(field.name().to_string(), Value::Number(n));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), Value::Bool(value));
    }
}

impl JsonVisitor {
    fn into_entry(mut self, event: &Event<'_>) -> StructuredLogEntry {
        let level = match *event.metadata().level() {
            Level::ERROR => "ERROR",
            Level::WARN => "WARN",
            Level::INFO => "INFO",
            Level::DEBUG => "DEBUG",
            Level::TRACE => "TRACE",
        };

        let context = ExecutionContext {
            request_id: self.take_string_field("request_id"),
            user_id: self.take_string_field("user_id"),
            ..ExecutionContext::default()
        };
        let duration_ms = self.fields.remove("duration_ms").and_then(|v| v.as_u64());

        StructuredLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            level: level.to_string(),
            target: event.metadata().target().to_string(),
            message: self.message.unwrap_or_default(),
            fields: self.fields,
            context: Some(context),
            duration_ms,
        }
    }

    fn take_string_field(&mut self, name: &str) -> Option<String> {
        match self.fields.remove(name)? {
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level when `RUST_LOG` is not set
    pub level: Level,
    /// JSON lines instead of the human format
    pub json_output: bool,
    /// ANSI colors (human format only)
    pub color_output: bool,
    pub include_line_numbers: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_output: false,
            color_output: true,
            include_line_numbers: cfg!(debug_assertions),
        }
    }
}

impl LoggingConfig {
    /// Parse a level name such as `"debug"`, keeping the default on bad input
    pub fn with_level_str(mut self, level: &str) -> Self {
        if let Ok(parsed) = Level::from_str(level) {
            self.level = parsed;
        }
        self
    }

    pub fn with_json(mut self, json_output: bool) -> Self {
        self.json_output = json_output;
        self
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean.
pub fn init_structured_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    if config.json_output {
        let subscriber = Registry::default()
            .with(env_filter)
            .with(JsonFormatter::new());
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .with_line_number(config.include_line_numbers)
            .with_ansi(config.color_output)
            .with_span_events(FmtSpan::CLOSE);

        let subscriber = Registry::default().with(env_filter).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

/// Measures one operation and logs its duration when finished
pub struct OperationTimer {
    start: std::time::Instant,
    operation_name: String,
    fields: HashMap<String, Value>,
}

impl OperationTimer {
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation_name: operation_name.into(),
            fields: HashMap::new(),
        }
    }

    pub fn add_field(&mut self, key: impl Into<String>, value: impl Serialize) {
        if let Ok(v) = serde_json::to_value(value) {
            self.fields.insert(key.into(), v);
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn finish_with_result<T, E: std::fmt::Display>(self, result: &Result<T, E>) {
        let duration_ms = self.elapsed_ms();

        match result {
            Ok(_) => {
                tracing::info!(
                    operation = %self.operation_name,
                    duration_ms = duration_ms,
                    success = true,
                    fields = ?self.fields,
                    "Operation completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    operation = %self.operation_name,
                    duration_ms = duration_ms,
                    success = false,
                    error = %e,
                    fields = ?self.fields,
                    "Operation failed"
                );
            }
        }
    }
}

/// Per-request identity carried through async calls
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub user_id: Option<String>,
    pub start_time: std::time::Instant,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            user_id: None,
            start_time: std::time::Instant::now(),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Span to instrument the request future with
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "request",
            request_id = %self.request_id,
            user_id = self.user_id.as_deref().unwrap_or("anonymous"),
        )
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_structured_log_entry_serialization() {
        let entry = StructuredLogEntry {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            level: "INFO".to_string(),
            target: "memory::retriever".to_string(),
            message: "Retrieved transactions".to_string(),
            fields: HashMap::from([("results".to_string(), Value::from(3))]),
            context: Some(ExecutionContext::default()),
            duration_ms: Some(100),
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("timestamp"));
        assert!(json.contains("INFO"));
        assert!(json.contains("Retrieved transactions"));
        assert!(json.contains("\"results\":3"));
        assert!(json.contains("duration_ms"));
    }

    #[test]
    fn test_logging_config_level_parsing() {
        let config = LoggingConfig::default().with_level_str("debug");
        assert_eq!(config.level, Level::DEBUG);

        let config = LoggingConfig::default().with_level_str("not-a-level");
        assert_eq!(config.level, Level::INFO);
    }

    #[test]
    fn test_request_context_ids_are_unique() {
        let a = RequestContext::new().with_user("user_1");
        let b = RequestContext::new();
        assert_ne!(a.request_id, b.request_id);
        assert_eq!(a.user_id.as_deref(), Some("user_1"));
        assert!(b.user_id.is_none());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn lines(&self) -> Vec<Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    #[test]
    fn test_json_events_inherit_request_span_fields() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber =
            Registry::default().with(JsonFormatter::new().with_writer(move || sink.clone()));

        let request = RequestContext::new().with_user("user_1");
        tracing::subscriber::with_default(subscriber, || {
            let _entered = request.span().entered();
            tracing::error!(error = "embedding timeout", "Retrieval failed");
        });

        let lines = captured.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line["message"], "Retrieval failed");
        assert_eq!(line["level"], "ERROR");
        assert_eq!(line["error"], "embedding timeout");
        assert_eq!(line["context"]["request_id"], request.request_id.as_str());
        assert_eq!(line["context"]["user_id"], "user_1");
    }

    #[test]
    fn test_event_fields_win_over_span_fields() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber =
            Registry::default().with(JsonFormatter::new().with_writer(move || sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let _entered = RequestContext::new().with_user("outer").span().entered();
            tracing::info!(user_id = "inner", "Chat request finished");
        });

        assert_eq!(captured.lines()[0]["context"]["user_id"], "inner");
    }

    #[test]
    fn test_operation_timer() {
        let mut timer = OperationTimer::new("embed_batch");
        timer.add_field("batch_size", 3);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.elapsed_ms() >= 5);
        timer.finish_with_result::<(), String>(&Err("timeout".to_string()));
    }
}
