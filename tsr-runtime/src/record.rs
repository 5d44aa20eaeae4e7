//! Structured object descriptors.
//!
//! An object descriptor is an ordered list of [`Field`]s. A value satisfies
//! it when the value is a plain object and each listed property satisfies its
//! field descriptor. Missing properties are checked as `undefined`, so a field
//! is optional only if its descriptor accepts `undefined` (see
//! [`optional`](crate::optional)). Unlisted properties are ignored.
//!
//! ```rust
//! use tsr_runtime::{number, object_struct, optional, property, string, Value};
//! use serde_json::json;
//!
//! let person = object_struct([
//!     property("name", string()),
//!     property("age", number()),
//!     property("nickname", optional(string())),
//! ])?;
//!
//! assert!(person.satisfies(&Value::from(json!({ "name": "Bob", "age": 30 }))));
//! assert!(!person.satisfies(&Value::from(json!({ "name": "Bob" }))));
//! # Ok::<(), tsr_runtime::DescriptorError>(())
//! ```

use crate::descriptor::{Descriptor, Field};
use crate::error::Result;

/// A named field for [`object_struct`].
pub fn property(name: impl Into<String>, descriptor: Descriptor) -> Field {
    Field::new(name, descriptor)
}

/// Plain object with at least the given fields.
///
/// # Errors
///
/// [`DescriptorError::DuplicateField`](crate::DescriptorError::DuplicateField)
/// when two fields share a name.
pub fn object_struct<I>(fields: I) -> Result<Descriptor>
where
    I: IntoIterator<Item = Field>,
{
    Descriptor::structured(fields.into_iter().collect())
}
