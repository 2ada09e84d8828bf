//! recordscope - a schema-driven browser and editor for typed record stores
//!
//! Layers, leaf first:
//! - `schema`: stored schemas and the session's collection/field descriptors
//! - `codec`: value ↔ display string ↔ operator input
//! - `storage` / `store`: record file format and the injected `Store` handle
//! - `records`: transactional record access
//! - `navigator`: the collections → records → fields state machine
//! - `cli`: the JSON-lines command-line surface

pub mod cli;
pub mod codec;
pub mod navigator;
pub mod observability;
pub mod records;
pub mod schema;
pub mod storage;
pub mod store;
