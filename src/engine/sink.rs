//! Observability sink injected into the engine.
//!
//! The engine never touches a global logger. It reports what happened through
//! an `EventSink`; the default implementation forwards to `tracing`, whose
//! subscriber is installed by the binary.

use std::sync::Mutex;

use tracing::{debug, info, warn};

/// Something the engine wants to report.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Loaded { records: usize, source: String },
    LoadFailed { source: String, error: String },
    Query { name: &'static str, records: usize },
}

pub trait EventSink: Send + Sync {
    fn log_event(&self, event: &EngineEvent);
}

/// Forwards engine events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn log_event(&self, event: &EngineEvent) {
        match event {
            EngineEvent::Loaded { records, source } => {
                info!(records, source = %source, "sales data loaded");
            }
            EngineEvent::LoadFailed { source, error } => {
                warn!(source = %source, error = %error, "sales data load failed");
            }
            EngineEvent::Query { name, records } => {
                debug!(query = *name, records, "report computed");
            }
        }
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn log_event(&self, _event: &EngineEvent) {}
}

/// Keeps events in memory (handy for tests and embedding).
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<EngineEvent>>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn log_event(&self, event: &EngineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
