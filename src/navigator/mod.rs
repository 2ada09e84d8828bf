//! Collection navigator
//!
//! State machine behind a browsing session:
//!
//! ```text
//! Collections ──select_collection──▶ Records ──select_record──▶ Fields
//!                                       ▲                          │
//!                                       └────── select_field ──────┘
//!                                          (non-empty list relation)
//! ```
//!
//! `back` pops one frame, `toggle_edit_mode` and `submit_edit` work on the
//! fields view, and `dismiss` ends the session. Output goes to a
//! [`Surface`]; input arrives as indices and raw text.

mod errors;
mod request;
mod session;
mod surface;

pub use errors::{NavigatorError, NavigatorResult};
pub use request::EditRequest;
pub use session::{CollectionNavigator, Location};
pub use surface::{CollectionRow, FieldRow, RecordRow, Surface, View, ViewRecorder};
