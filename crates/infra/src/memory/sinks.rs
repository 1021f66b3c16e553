use std::sync::RwLock;

use remarket_checkout::{AuditLogEntry, AuditSink, NotificationEvent, NotificationSink};
use remarket_core::{StoreError, StoreResult};

/// In-memory audit sink: appends entries to a vector.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries
            .read()
            .map(|e| e.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, entry: AuditLogEntry) -> StoreResult<()> {
        self.entries
            .write()
            .map_err(|_| StoreError::unavailable("audit sink lock poisoned"))?
            .push(entry);
        Ok(())
    }
}

/// In-memory notification sink: appends events to a vector.
#[derive(Debug, Default)]
pub struct InMemoryNotificationSink {
    events: RwLock<Vec<NotificationEvent>>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn emit(&self, event: NotificationEvent) -> StoreResult<()> {
        self.events
            .write()
            .map_err(|_| StoreError::unavailable("notification sink lock poisoned"))?
            .push(event);
        Ok(())
    }
}
