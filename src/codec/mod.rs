//! Value codec
//!
//! Pure conversions between stored field values, display strings and
//! operator input. No I/O.
//!
//! - `decode` / `encode`: stored JSON ↔ [`Value`] / [`TypedValue`]
//! - `render`: [`Value`] → display string
//! - `parse`: operator text → [`TypedValue`], validated against the field kind

mod errors;
mod parse;
mod render;
mod value;

pub use errors::CoercionError;
pub use parse::parse;
pub use render::{count, render};
pub use value::{decode, encode, TypedValue, Value};
