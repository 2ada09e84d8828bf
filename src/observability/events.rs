//! Observable events
//!
//! Every log line the crate emits carries one of these as its `event` field,
//! so log consumers can match on stable names instead of message text.

use std::fmt;

/// Observable events in a browsing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Store opened
    StoreOpened,
    /// Schema descriptors built
    SchemaLoaded,
    /// Browsing session started
    SessionOpen,
    /// Browsing session dismissed
    SessionDismissed,
    /// Session could not start (FATAL)
    SessionFailed,

    // Navigation
    /// Records of a collection fetched
    CollectionOpened,
    /// Fields of a record shown
    RecordOpened,
    /// Linked records of a relation shown
    RelationOpened,
    /// Edit mode toggled
    EditModeToggled,

    // Writes
    /// Field edit committed
    EditCommitted,
    /// Operator input rejected by coercion or the store
    EditRejected,
    /// Write transaction rolled back
    WriteRolledBack,
    /// Record file appended and synced
    StorageCommit,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SessionOpen => "SESSION_OPEN",
            Event::SessionDismissed => "SESSION_DISMISSED",
            Event::SessionFailed => "SESSION_FAILED",

            Event::CollectionOpened => "COLLECTION_OPENED",
            Event::RecordOpened => "RECORD_OPENED",
            Event::RelationOpened => "RELATION_OPENED",
            Event::EditModeToggled => "EDIT_MODE_TOGGLED",

            Event::EditCommitted => "EDIT_COMMITTED",
            Event::EditRejected => "EDIT_REJECTED",
            Event::WriteRolledBack => "WRITE_ROLLED_BACK",
            Event::StorageCommit => "STORAGE_COMMIT",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::SessionFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        let events = [
            Event::SessionOpen,
            Event::CollectionOpened,
            Event::EditCommitted,
            Event::WriteRolledBack,
        ];
        for event in events {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_only_session_failure_is_fatal() {
        assert!(Event::SessionFailed.is_fatal());
        assert!(!Event::EditRejected.is_fatal());
    }
}
