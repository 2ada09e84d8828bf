//! Schema subsystem
//!
//! Turns store metadata into the descriptors the browser walks.
//!
//! # Design Principles
//!
//! - Descriptors are derived once per session and never change
//! - Field order is declaration order
//! - Unknown field types are listed as `Unsupported`, never rejected
//! - Relations to unknown collections are `Unsupported`

mod errors;
mod loader;
mod registry;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::SchemaLoader;
pub use registry::SchemaRegistry;
pub use types::{
    CollectionDescriptor, CollectionSchema, FieldDef, FieldDescriptor, FieldKind, FieldType,
};
pub use validator::SchemaValidator;
