//! Runtime support for generated table bindings
//!
//! Every binding emitted by `phasegen-codegen` depends on this crate for
//! its field values, coercion rules and error types. Keeping that logic here
//! keeps the generated code small and makes the coercion rules testable
//! without generating anything.

pub mod coerce;
pub mod error;
pub mod record;
pub mod value;

pub use error::{FieldCoercionError, UnknownTableError};
pub use record::{find_descriptor, DecodeFn, DynRecord, TableDescriptor, TableRecord, TableRegistry};
pub use value::{FieldValue, ValueMap, TIMESTAMP_FORMAT};

pub use chrono::NaiveDateTime;
pub use rust_decimal::Decimal;
