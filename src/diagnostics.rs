use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};

// Giữ tối đa 100 events để không chiếm quá nhiều bộ nhớ
const MAX_EVENTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    ApplicationError,
    TransportError,
    StoreError,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::ApplicationError => "APPLICATION_ERROR",
            DiagnosticKind::TransportError => "TRANSPORT_ERROR",
            DiagnosticKind::StoreError => "STORE_ERROR",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Where error causes go instead of the chat view: the log plus a short
/// history for the debug panel.
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: VecDeque<DiagnosticEvent>,
}

impl Diagnostics {
    pub fn record(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            DiagnosticKind::StoreError => log::warn!("{kind}: {message}"),
            _ => log::error!("{kind}: {message}"),
        }

        self.events.push_back(DiagnosticEvent {
            timestamp: Utc::now(),
            kind,
            message,
        });
        if self.events.len() > MAX_EVENTS {
            self.events.pop_front();
        }
    }

    pub fn events(&self) -> impl DoubleEndedIterator<Item = &DiagnosticEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
