use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Context information for log messages
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Component name (e.g., "orchestrator", "nordpool", "cloud")
    pub component: String,
    /// Correlates all lines written during one invocation
    pub invocation_id: Option<String>,
    /// Additional context fields
    pub extra_fields: BTreeMap<String, String>,
}

impl LogContext {
    /// Create a new log context
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            invocation_id: None,
            extra_fields: BTreeMap::new(),
        }
    }

    pub fn with_invocation_id(mut self, invocation_id: String) -> Self {
        self.invocation_id = Some(invocation_id);
        self
    }

    /// Add extra field
    pub fn with_field(mut self, key: &str, value: String) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }
}

/// Structured logger with context
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    pub(crate) context: LogContext,
}

impl StructuredLogger {
    /// Create a new structured logger with context
    pub fn new(context: LogContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    pub fn info(&self, message: &str) {
        let fields = self.format_fields();
        info!(%fields, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        let fields = self.format_fields();
        warn!(%fields, "{}", message);
    }

    pub fn error(&self, message: &str) {
        let fields = self.format_fields();
        error!(%fields, "{}", message);
    }

    pub fn debug(&self, message: &str) {
        let fields = self.format_fields();
        debug!(%fields, "{}", message);
    }

    /// Format context fields for logging
    pub(crate) fn format_fields(&self) -> String {
        let mut fields = vec![format!("component={}", self.context.component)];
        if let Some(ref id) = self.context.invocation_id {
            fields.push(format!("invocation_id={}", id));
        }
        for (key, value) in &self.context.extra_fields {
            fields.push(format!("{}={}", key, value));
        }
        fields.join(",")
    }
}

/// Create a logger for a specific component
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger::new(LogContext::new(component))
}

/// Create a logger with full context
pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}

/// Fresh id for one invocation
pub fn new_invocation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
