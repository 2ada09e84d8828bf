//! Observability subsystem
//!
//! Structured logging through `tracing`. Every emitted event carries a typed
//! [`Event`] name in its `event` field.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on browsing or writes
//! 3. The library never installs a subscriber; the binary does
//!
//! # Usage
//!
//! ```ignore
//! use recordscope::observability::{init_logging, Event};
//!
//! init_logging(None);
//! tracing::info!(event = Event::SessionOpen.as_str(), "session open");
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{init_logging, resolve_filter, DEFAULT_LOG_FILTER, LOG_ENV_VAR};
