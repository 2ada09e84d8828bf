//! Browsing session state machine.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::errors::{NavigatorError, NavigatorResult};
use super::request::EditRequest;
use super::surface::{CollectionRow, FieldRow, RecordRow, Surface};
use crate::codec::{count, parse, render, Value};
use crate::observability::Event;
use crate::records::{Record, RecordStore};
use crate::schema::{CollectionDescriptor, FieldDescriptor, FieldKind, SchemaRegistry};
use crate::store::{RecordId, Store, StoreResult};

/// Where a records frame got its records from.
#[derive(Debug, Clone)]
enum RecordSource {
    Collection,
    Relation { owner: Record, field: FieldDescriptor },
}

#[derive(Debug, Clone)]
enum Frame {
    Collections,
    Records {
        collection: Arc<CollectionDescriptor>,
        source: RecordSource,
        records: Vec<Record>,
    },
    Fields {
        record: Record,
    },
}

impl Frame {
    fn name(&self) -> &'static str {
        match self {
            Frame::Collections => "collections",
            Frame::Records { .. } => "records",
            Frame::Fields { .. } => "fields",
        }
    }
}

/// Rejected input kept on a field row until the next successful submit.
#[derive(Debug, Clone)]
struct EditState {
    field_index: usize,
    input: String,
    error: String,
}

/// Current position of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum Location {
    Collections,
    Records { collection: String },
    Fields { collection: String, record: RecordId },
}

/// Drives the collections → records → fields drill-down over one store.
pub struct CollectionNavigator<S: Store> {
    registry: SchemaRegistry,
    records: RecordStore<S>,
    stack: Vec<Frame>,
    edit_mode: bool,
    editing: Option<EditState>,
    dismissed: bool,
}

impl<S: Store> CollectionNavigator<S> {
    /// Starts a session over `store`.
    ///
    /// Fails only when the store's metadata cannot be read; that failure
    /// is fatal to the session.
    pub fn open(store: S) -> NavigatorResult<Self> {
        let registry = match SchemaRegistry::load(&store) {
            Ok(registry) => registry,
            Err(e) => {
                error!(
                    event = Event::SessionFailed.as_str(),
                    code = e.code().code(),
                    error = %e,
                    "session could not start"
                );
                return Err(e.into());
            }
        };

        info!(
            event = Event::SessionOpen.as_str(),
            collections = registry.list_collections().len(),
            "session open"
        );

        Ok(Self {
            registry,
            records: RecordStore::new(store),
            stack: vec![Frame::Collections],
            edit_mode: false,
            editing: None,
            dismissed: false,
        })
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn record_store(&self) -> &RecordStore<S> {
        &self.records
    }

    /// Number of frames on the navigation stack (1 at the collections view).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn location(&self) -> Location {
        match self.top() {
            Frame::Collections => Location::Collections,
            Frame::Records { collection, .. } => Location::Records {
                collection: collection.name.clone(),
            },
            Frame::Fields { record } => Location::Fields {
                collection: record.collection.name.clone(),
                record: record.id.clone(),
            },
        }
    }

    /// Opens the records of the `index`-th collection.
    pub fn select_collection(&mut self, index: usize) -> NavigatorResult<()> {
        self.ensure_active()?;
        if !matches!(self.top(), Frame::Collections) {
            return Err(self.invalid("select_collection"));
        }

        let collections = self.registry.list_collections();
        let collection = collections
            .get(index)
            .cloned()
            .ok_or(NavigatorError::IndexOutOfRange {
                index,
                len: collections.len(),
            })?;

        let records = self.records.records_in(&collection)?;
        info!(
            event = Event::CollectionOpened.as_str(),
            collection = %collection.name,
            records = records.len(),
            "collection opened"
        );

        self.stack.push(Frame::Records {
            collection,
            source: RecordSource::Collection,
            records,
        });
        Ok(())
    }

    /// Opens the `index`-th record of the current records view.
    ///
    /// No-op when the view is empty.
    pub fn select_record(&mut self, index: usize) -> NavigatorResult<()> {
        self.ensure_active()?;
        let record = match self.top() {
            Frame::Records { records, .. } if records.is_empty() => return Ok(()),
            Frame::Records { records, .. } => {
                records
                    .get(index)
                    .cloned()
                    .ok_or(NavigatorError::IndexOutOfRange {
                        index,
                        len: records.len(),
                    })?
            }
            _ => return Err(self.invalid("select_record")),
        };

        info!(
            event = Event::RecordOpened.as_str(),
            collection = %record.collection.name,
            record = %record.id,
            "record opened"
        );

        self.editing = None;
        self.stack.push(Frame::Fields { record });
        Ok(())
    }

    /// Drills into the `index`-th field of the current record.
    ///
    /// Only a collection-valued relation with at least one linked record
    /// opens a new view; every other field is a no-op.
    pub fn select_field(&mut self, index: usize) -> NavigatorResult<()> {
        self.ensure_active()?;
        let (record, field) = self.field_at(index, "select_field")?;

        if !field.is_collection_valued {
            return Ok(());
        }
        let target = match field
            .target
            .as_deref()
            .and_then(|name| self.registry.collection(name))
        {
            Some(target) => Arc::clone(target),
            None => return Ok(()),
        };

        let linked = self.records.linked_records(&record, &field, &target)?;
        if linked.is_empty() {
            return Ok(());
        }

        info!(
            event = Event::RelationOpened.as_str(),
            collection = %record.collection.name,
            record = %record.id,
            field = %field.name,
            target = %target.name,
            records = linked.len(),
            "relation opened"
        );

        self.editing = None;
        self.stack.push(Frame::Records {
            collection: target,
            source: RecordSource::Relation {
                owner: record,
                field,
            },
            records: linked,
        });
        Ok(())
    }

    /// Flips the session-wide edit mode. Returns the new state.
    pub fn toggle_edit_mode(&mut self) -> NavigatorResult<bool> {
        self.ensure_active()?;
        if !matches!(self.top(), Frame::Fields { .. }) {
            return Err(self.invalid("toggle_edit_mode"));
        }

        self.edit_mode = !self.edit_mode;
        if !self.edit_mode {
            self.editing = None;
        }

        debug!(
            event = Event::EditModeToggled.as_str(),
            edit_mode = self.edit_mode,
            "edit mode toggled"
        );
        Ok(self.edit_mode)
    }

    /// Coerces `raw` into the `index`-th field of the current record and
    /// commits it.
    ///
    /// On a coercion or write failure the record is unchanged and the field
    /// keeps showing `raw` together with the error, ready for a retry.
    pub fn submit_edit(&mut self, index: usize, raw: &str) -> NavigatorResult<()> {
        self.ensure_active()?;
        let (record, field) = self.field_at(index, "submit_edit")?;
        if !self.edit_mode {
            return Err(NavigatorError::NotInEditMode);
        }

        let request = EditRequest::new(record, field, raw)?;
        match self.apply(request) {
            Ok(()) => {
                self.editing = None;
                Ok(())
            }
            Err(e) => {
                warn!(
                    event = Event::EditRejected.as_str(),
                    code = e.code(),
                    error = %e,
                    "edit rejected"
                );
                self.editing = Some(EditState {
                    field_index: index,
                    input: raw.to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn apply(&mut self, request: EditRequest) -> NavigatorResult<()> {
        let (record, field, raw) = request.into_parts();
        let value = parse(&raw, &field)?;
        self.records.commit(&record, &field, value)?;
        Ok(())
    }

    /// Returns to the parent view. A records view that becomes current
    /// again is re-read from the store.
    pub fn back(&mut self) -> NavigatorResult<()> {
        self.ensure_active()?;
        if self.stack.len() == 1 {
            return Err(self.invalid("back"));
        }

        self.stack.pop();
        self.editing = None;

        let refreshed = match self.top() {
            Frame::Records {
                collection, source, ..
            } => Some(self.fetch(collection, source)?),
            _ => None,
        };
        if let (Some(fresh), Some(Frame::Records { records, .. })) =
            (refreshed, self.stack.last_mut())
        {
            *records = fresh;
        }

        debug!(frame = self.top().name(), depth = self.stack.len(), "navigated back");
        Ok(())
    }

    /// Ends the session. Every later call fails with `Dismissed`.
    pub fn dismiss(&mut self) -> NavigatorResult<()> {
        self.ensure_active()?;
        self.dismissed = true;
        self.editing = None;
        info!(event = Event::SessionDismissed.as_str(), "session dismissed");
        Ok(())
    }

    /// Pushes the current view to `surface`.
    pub fn render(&self, surface: &mut impl Surface) -> NavigatorResult<()> {
        self.ensure_active()?;
        match self.top() {
            Frame::Collections => {
                let rows = self
                    .registry
                    .list_collections()
                    .iter()
                    .map(|collection| -> StoreResult<CollectionRow> {
                        Ok(CollectionRow {
                            name: collection.name.clone(),
                            record_count: self.records.record_count(collection)?,
                        })
                    })
                    .collect::<StoreResult<Vec<_>>>()?;
                surface.display_collections(&rows);
            }
            Frame::Records {
                collection,
                source,
                records,
            } => {
                let title = match source {
                    RecordSource::Collection => collection.name.clone(),
                    RecordSource::Relation { owner, field } => {
                        format!("{} of {}", field.name, self.summary_label(owner)?)
                    }
                };
                let rows = records
                    .iter()
                    .map(|record| -> StoreResult<RecordRow> {
                        Ok(RecordRow {
                            summary_label: self.summary_label(record)?,
                        })
                    })
                    .collect::<StoreResult<Vec<_>>>()?;
                surface.display_records(&title, &rows);
            }
            Frame::Fields { record } => {
                let title = format!("{} {}", record.collection.name, self.summary_label(record)?);
                let rows = self
                    .registry
                    .fields_for(&record.collection)
                    .iter()
                    .enumerate()
                    .map(|(index, field)| self.field_row(record, index, field))
                    .collect::<StoreResult<Vec<_>>>()?;
                surface.display_fields(&title, &rows);
            }
        }
        Ok(())
    }

    fn field_row(
        &self,
        record: &Record,
        index: usize,
        field: &FieldDescriptor,
    ) -> StoreResult<FieldRow> {
        let value = self.records.raw_value(record, field)?;
        let linked = match (field.kind, count(&value)) {
            (FieldKind::Relation, Some(_)) => Some(self.linked_count(record, field)?),
            _ => None,
        };

        let display = match linked {
            Some(n) => format!("{} objects", n),
            None => render(&value, field),
        };
        let mut row = FieldRow {
            name: field.name.clone(),
            display,
            editable: self.edit_mode && field.is_editable(),
            drillable: field.is_collection_valued && linked.unwrap_or(0) > 0,
            error: None,
        };

        if let Some(editing) = self.editing.as_ref().filter(|e| e.field_index == index) {
            row.display = editing.input.clone();
            row.error = Some(editing.error.clone());
        }
        Ok(row)
    }

    /// Linked records that still exist, the same set `select_field` opens.
    fn linked_count(&self, record: &Record, field: &FieldDescriptor) -> StoreResult<usize> {
        match field
            .target
            .as_deref()
            .and_then(|name| self.registry.collection(name))
        {
            Some(target) => Ok(self.records.linked_records(record, field, target)?.len()),
            None => Ok(0),
        }
    }

    /// Record id, followed by the value of the first string field if set.
    fn summary_label(&self, record: &Record) -> StoreResult<String> {
        let first_string = record
            .collection
            .field_descriptors
            .iter()
            .find(|f| f.kind == FieldKind::String);

        if let Some(field) = first_string {
            if let Value::String(text) = self.records.raw_value(record, field)? {
                if !text.is_empty() {
                    return Ok(format!("{} ({})", text, record.id));
                }
            }
        }
        Ok(record.id.to_string())
    }

    fn fetch(
        &self,
        collection: &Arc<CollectionDescriptor>,
        source: &RecordSource,
    ) -> StoreResult<Vec<Record>> {
        match source {
            RecordSource::Collection => self.records.records_in(collection),
            RecordSource::Relation { owner, field } => {
                self.records.linked_records(owner, field, collection)
            }
        }
    }

    fn field_at(
        &self,
        index: usize,
        operation: &'static str,
    ) -> NavigatorResult<(Record, FieldDescriptor)> {
        match self.top() {
            Frame::Fields { record } => {
                let fields = self.registry.fields_for(&record.collection);
                let field = fields
                    .get(index)
                    .cloned()
                    .ok_or(NavigatorError::IndexOutOfRange {
                        index,
                        len: fields.len(),
                    })?;
                Ok((record.clone(), field))
            }
            _ => Err(self.invalid(operation)),
        }
    }

    fn top(&self) -> &Frame {
        // The collections frame is never popped.
        self.stack.last().unwrap_or(&Frame::Collections)
    }

    fn invalid(&self, operation: &'static str) -> NavigatorError {
        NavigatorError::InvalidTransition {
            operation,
            frame: self.top().name(),
        }
    }

    fn ensure_active(&self) -> NavigatorResult<()> {
        if self.dismissed {
            return Err(NavigatorError::Dismissed);
        }
        Ok(())
    }
}
