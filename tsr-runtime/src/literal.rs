//! Literal descriptors: exactly one constant.

use crate::descriptor::Descriptor;
use crate::value::Value;

/// Accepts only `constant`, compared with [`Value::same_value`].
///
/// The name is the constant's display form, so `literal("on")` is named
/// `"on"` and `literal(3)` is named `3`. Generation returns the constant.
pub fn literal(constant: impl Into<Value>) -> Descriptor {
    Descriptor::literal(constant.into())
}
