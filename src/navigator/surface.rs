//! Presentation surface
//!
//! The navigator only ever pushes rows. How they are drawn (list widgets,
//! JSON lines, a test recorder) is up to the surface.

use serde::Serialize;

/// One row of the collections view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionRow {
    pub name: String,
    pub record_count: usize,
}

/// One row of a records view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    pub summary_label: String,
}

/// One row of a record's fields view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub name: String,
    /// Rendered value, or the operator's rejected input while `error` is set
    pub display: String,
    pub editable: bool,
    pub drillable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Receiver of navigator output.
pub trait Surface {
    fn display_collections(&mut self, rows: &[CollectionRow]);
    fn display_records(&mut self, title: &str, rows: &[RecordRow]);
    fn display_fields(&mut self, title: &str, rows: &[FieldRow]);
}

/// Snapshot of whatever the navigator last pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Collections { rows: Vec<CollectionRow> },
    Records { title: String, rows: Vec<RecordRow> },
    Fields { title: String, rows: Vec<FieldRow> },
}

/// Surface that keeps the latest view in memory.
#[derive(Debug, Default)]
pub struct ViewRecorder {
    last: Option<View>,
}

impl ViewRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&View> {
        self.last.as_ref()
    }

    pub fn take(&mut self) -> Option<View> {
        self.last.take()
    }
}

impl Surface for ViewRecorder {
    fn display_collections(&mut self, rows: &[CollectionRow]) {
        self.last = Some(View::Collections {
            rows: rows.to_vec(),
        });
    }

    fn display_records(&mut self, title: &str, rows: &[RecordRow]) {
        self.last = Some(View::Records {
            title: title.to_string(),
            rows: rows.to_vec(),
        });
    }

    fn display_fields(&mut self, title: &str, rows: &[FieldRow]) {
        self.last = Some(View::Fields {
            title: title.to_string(),
            rows: rows.to_vec(),
        });
    }
}
