//! The descriptor contract.
//!
//! A [`Descriptor`] mirrors one structural type shape and answers three
//! questions: its [`name`](Descriptor::name), whether a value
//! [`satisfies`](Descriptor::satisfies) it, and what a conforming value looks
//! like ([`generate`](Descriptor::generate)).
//!
//! Descriptors are immutable and cheap to clone; clones share one node, so
//! the same child can sit under many parents.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::combinator::{Base, Combinator};
use crate::error::{DescriptorError, Result};
use crate::sampler::Sampler;
use crate::validation::{Mismatch, PathSegment};
use crate::value::{DisplayKey, NativeKind, Value};

pub(crate) type LeafGenerator = fn(&mut Sampler) -> Value;

/// A runtime type descriptor.
#[derive(Clone)]
pub struct Descriptor {
    node: Arc<Node>,
}

struct Node {
    name: String,
    shape: Shape,
}

enum Shape {
    Leaf {
        base: Base,
        generator: LeafGenerator,
    },
    Composite {
        combinator: Combinator,
        children: Vec<Descriptor>,
    },
    Literal(Value),
    Object(Vec<Field>),
}

impl Descriptor {
    fn from_shape(name: String, shape: Shape) -> Self {
        Self {
            node: Arc::new(Node { name, shape }),
        }
    }

    pub(crate) fn leaf(name: &str, base: Base, generator: LeafGenerator) -> Self {
        Self::from_shape(name.to_string(), Shape::Leaf { base, generator })
    }

    pub(crate) fn composite(name: String, combinator: Combinator, children: Vec<Descriptor>) -> Self {
        Self::from_shape(
            name,
            Shape::Composite {
                combinator,
                children,
            },
        )
    }

    pub(crate) fn literal(constant: Value) -> Self {
        Self::from_shape(constant.to_string(), Shape::Literal(constant))
    }

    pub(crate) fn structured(fields: Vec<Field>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(DescriptorError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }

        let name = if fields.is_empty() {
            "{}".to_string()
        } else {
            let members: Vec<String> = fields
                .iter()
                .map(|field| {
                    format!("{}: {}", DisplayKey(field.name()), field.descriptor().name())
                })
                .collect();
            format!("{{ {} }}", members.join("; "))
        };
        trace!(descriptor = %name, fields = fields.len(), "built object descriptor");
        Ok(Self::from_shape(name, Shape::Object(fields)))
    }

    /// Display name, derived only from the shape and its children's names.
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Whether `value` conforms to this shape. Total: never panics.
    pub fn satisfies(&self, value: &Value) -> bool {
        match &self.node.shape {
            Shape::Leaf { base, .. } => base.admits(value.kind()),
            Shape::Composite {
                combinator,
                children,
            } => combinator.admits(value, children),
            Shape::Literal(constant) => constant.same_value(value),
            Shape::Object(fields) => {
                value.kind() == NativeKind::Object
                    && fields
                        .iter()
                        .all(|field| field.descriptor.satisfies(value.property(&field.name)))
            }
        }
    }

    /// Generate the canonical conforming value.
    pub fn generate(&self) -> Value {
        self.generate_with(&mut Sampler::canonical())
    }

    /// Generate a conforming value, drawing primitive choices from `sampler`.
    pub fn generate_with(&self, sampler: &mut Sampler) -> Value {
        match &self.node.shape {
            Shape::Leaf { generator, .. } => generator(sampler),
            Shape::Composite {
                combinator,
                children,
            } => combinator.generate(children, sampler),
            Shape::Literal(constant) => constant.clone(),
            Shape::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|field| (field.name.clone(), field.descriptor.generate_with(sampler)))
                    .collect(),
            ),
        }
    }

    /// Arity of a positional composite (Tuple, Arguments); `None` otherwise.
    pub fn length(&self) -> Option<usize> {
        match &self.node.shape {
            Shape::Composite {
                combinator,
                children,
            } if combinator.is_positional() => Some(children.len()),
            _ => None,
        }
    }

    /// Like [`satisfies`](Self::satisfies), but reports where the value failed.
    pub fn check(&self, value: &Value) -> std::result::Result<(), Mismatch> {
        if self.satisfies(value) {
            trace!(descriptor = %self.name(), "value satisfies descriptor");
            return Ok(());
        }
        let mismatch = self.mismatch(value);
        debug!(
            descriptor = %self.name(),
            path = %mismatch.path,
            expected = %mismatch.expected,
            found = %mismatch.found,
            "value does not satisfy descriptor"
        );
        Err(mismatch)
    }

    /// True when both handles share one node.
    pub fn ptr_eq(&self, other: &Descriptor) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    fn mismatch(&self, value: &Value) -> Mismatch {
        self.locate(value)
            .unwrap_or_else(|| Mismatch::new(self.name(), value.kind()))
    }

    fn locate(&self, value: &Value) -> Option<Mismatch> {
        match &self.node.shape {
            Shape::Composite {
                combinator,
                children,
            } if combinator.base().admits(value.kind()) => {
                let (segment, index, inner) = combinator.locate(value, children)?;
                let child = children.get(index)?;
                Some(child.mismatch(inner).within(segment))
            }
            Shape::Object(fields) if value.kind() == NativeKind::Object => {
                fields.iter().find_map(|field| {
                    let inner = value.property(&field.name);
                    (!field.descriptor.satisfies(inner)).then(|| {
                        field
                            .descriptor
                            .mismatch(inner)
                            .within(PathSegment::Field(field.name.clone()))
                    })
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Descriptor").field(&self.name()).finish()
    }
}

/// A named member of a structured object descriptor.
///
/// Fields are never validated or generated on their own.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    descriptor: Descriptor,
}

impl Field {
    pub fn new(name: impl Into<String>, descriptor: Descriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::{number, string, undefined};
    use serde_json::json;

    fn person() -> Descriptor {
        Descriptor::structured(vec![
            Field::new("name", string()),
            Field::new("age", number()),
        ])
        .unwrap()
    }

    #[test]
    fn test_descriptor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Descriptor>();
        assert_send_sync::<Value>();
    }

    #[test]
    fn test_literal_name_is_display_form() {
        assert_eq!(Descriptor::literal(Value::from("hi")).name(), "\"hi\"");
        assert_eq!(Descriptor::literal(Value::from(42)).name(), "42");
        assert_eq!(Descriptor::literal(Value::Null).name(), "null");
    }

    #[test]
    fn test_structured_name_and_order() {
        let d = person();
        assert_eq!(d.name(), "{ name: string; age: number }");
        assert_eq!(Descriptor::structured(Vec::new()).unwrap().name(), "{}");

        let generated = d.generate();
        let keys: Vec<&str> = generated
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["name", "age"]);
    }

    #[test]
    fn test_structured_rejects_duplicates() {
        let err = Descriptor::structured(vec![
            Field::new("a", string()),
            Field::new("a", number()),
        ])
        .unwrap_err();
        assert_eq!(err, DescriptorError::DuplicateField { name: "a".into() });
    }

    #[test]
    fn test_structured_missing_field_is_undefined() {
        let d = Descriptor::structured(vec![Field::new("gone", undefined())]).unwrap();
        assert!(d.satisfies(&Value::from(json!({}))));
        assert!(!d.satisfies(&Value::from(json!({ "gone": 1 }))));
    }

    #[test]
    fn test_check_reports_field_path() {
        let err = person()
            .check(&Value::from(json!({ "name": "Bob", "age": "old" })))
            .unwrap_err();
        assert_eq!(err.path.to_string(), "$.age");
        assert_eq!(err.expected, "number");
        assert_eq!(err.found, NativeKind::String);
    }

    #[test]
    fn test_check_reports_root_for_wrong_kind() {
        let err = person().check(&Value::from(3)).unwrap_err();
        assert!(err.path.is_root());
        assert_eq!(err.expected, "{ name: string; age: number }");
        assert_eq!(err.found, NativeKind::Number);
        assert!(person().check(&person().generate()).is_ok());
    }

    #[test]
    fn test_clones_share_node() {
        let d = person();
        let copy = d.clone();
        assert!(d.ptr_eq(&copy));
        assert!(!d.ptr_eq(&person()));
        assert_eq!(format!("{:?}", d), "Descriptor(\"{ name: string; age: number }\")");
    }
}
