//! The builder namespace: a name-keyed table of every descriptor constructor.
//!
//! A front-end that translates type annotations into descriptor construction
//! calls only needs this table. Leaf entries are called with no arguments;
//! builders take positional [`Arg`]s, i.e. already-built descriptors, fields
//! (for `ObjectStruct`), or raw values (for `Literal` and the field name of
//! `ObjectProperty`).
//!
//! The table is assembled once, on first access, and never changes.
//!
//! ```rust
//! use tsr_runtime::{Arg, Namespace, Value};
//!
//! let ns = Namespace::global();
//! let number = ns.leaf("number")?;
//! let list = ns.invoke("Array", vec![Arg::from(number)])?;
//! let list = list.into_descriptor().expect("Array returns a descriptor");
//! assert_eq!(list.name(), "Array<number>");
//! # Ok::<(), tsr_runtime::DescriptorError>(())
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::trace;

use crate::composite;
use crate::descriptor::{Descriptor, Field};
use crate::error::{DescriptorError, Result};
use crate::leaf;
use crate::literal::literal;
use crate::record::{object_struct, property};
use crate::value::Value;

static GLOBAL: LazyLock<Namespace> = LazyLock::new(Namespace::standard);

/// Positional argument to a namespace builder.
#[derive(Debug, Clone)]
pub enum Arg {
    Descriptor(Descriptor),
    Field(Field),
    Value(Value),
}

impl Arg {
    /// Short description used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Arg::Descriptor(_) => "descriptor",
            Arg::Field(_) => "field",
            Arg::Value(value) => value.kind().as_str(),
        }
    }

    pub fn into_descriptor(self) -> Option<Descriptor> {
        match self {
            Arg::Descriptor(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    pub fn into_field(self) -> Option<Field> {
        match self {
            Arg::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Arg::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Descriptor> for Arg {
    fn from(descriptor: Descriptor) -> Self {
        Arg::Descriptor(descriptor)
    }
}

impl From<Field> for Arg {
    fn from(field: Field) -> Self {
        Arg::Field(field)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

/// Signature shared by every non-leaf entry.
pub type BuilderFn = fn(Vec<Arg>) -> Result<Arg>;

/// One namespace entry.
#[derive(Debug, Clone, Copy)]
pub enum Entry {
    /// Shared leaf descriptor; takes no arguments.
    Leaf(fn() -> Descriptor),
    /// Composite, literal or field builder.
    Builder(BuilderFn),
}

/// Read-only mapping from entry names to constructors.
#[derive(Debug)]
pub struct Namespace {
    entries: HashMap<&'static str, Entry>,
}

impl Namespace {
    /// The process-wide namespace.
    pub fn global() -> &'static Namespace {
        &GLOBAL
    }

    fn standard() -> Self {
        let entries: [(&'static str, Entry); 20] = [
            ("any", Entry::Leaf(leaf::any)),
            ("object", Entry::Leaf(leaf::object)),
            ("number", Entry::Leaf(leaf::number)),
            ("string", Entry::Leaf(leaf::string)),
            ("boolean", Entry::Leaf(leaf::boolean)),
            ("symbol", Entry::Leaf(leaf::symbol)),
            ("null", Entry::Leaf(leaf::null)),
            ("undefined", Entry::Leaf(leaf::undefined)),
            ("Array", Entry::Builder(build_array)),
            ("Tuple", Entry::Builder(build_tuple)),
            ("Arguments", Entry::Builder(build_arguments)),
            ("Function", Entry::Builder(build_function)),
            ("Union", Entry::Builder(build_union)),
            ("Or", Entry::Builder(build_union)),
            ("Intersection", Entry::Builder(build_intersection)),
            ("And", Entry::Builder(build_intersection)),
            ("Literal", Entry::Builder(build_literal)),
            ("ObjectProperty", Entry::Builder(build_property)),
            ("ObjectStruct", Entry::Builder(build_object)),
            ("Object", Entry::Builder(build_object)),
        ];
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Entry> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry names in lexicographic order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch a leaf descriptor by name.
    pub fn leaf(&self, name: &str) -> Result<Descriptor> {
        match self.get(name) {
            Some(Entry::Leaf(make)) => Ok(make()),
            Some(Entry::Builder(_)) => Err(DescriptorError::InvalidArgument {
                builder: self.key(name),
                position: 0,
                expected: "positional operands",
                found: "none",
            }),
            None => Err(DescriptorError::UnknownBuilder(name.to_string())),
        }
    }

    /// Call the entry `name` with positional arguments.
    ///
    /// # Errors
    ///
    /// - [`DescriptorError::UnknownBuilder`] if there is no such entry
    /// - [`DescriptorError::OperandCount`] / [`DescriptorError::InvalidArgument`]
    ///   for a malformed call
    /// - whatever the underlying builder reports
    pub fn invoke(&self, name: &str, args: Vec<Arg>) -> Result<Arg> {
        let (&builder, &entry) = self
            .entries
            .get_key_value(name)
            .ok_or_else(|| DescriptorError::UnknownBuilder(name.to_string()))?;
        trace!(builder, args = args.len(), "invoking namespace entry");

        match entry {
            Entry::Leaf(make) if args.is_empty() => Ok(Arg::Descriptor(make())),
            Entry::Leaf(_) => Err(DescriptorError::OperandCount {
                builder,
                expected: 0,
                actual: args.len(),
            }),
            Entry::Builder(build) => build(args),
        }
    }

    fn key(&self, name: &str) -> &'static str {
        self.entries
            .get_key_value(name)
            .map_or("unknown", |(&key, _)| key)
    }
}

// =============================================================================
// Builder adapters
// =============================================================================

fn invalid(builder: &'static str, position: usize, expected: &'static str, found: &Arg) -> DescriptorError {
    DescriptorError::InvalidArgument {
        builder,
        position,
        expected,
        found: found.kind_name(),
    }
}

fn descriptors(builder: &'static str, args: Vec<Arg>) -> Result<Vec<Descriptor>> {
    args.into_iter()
        .enumerate()
        .map(|(position, arg)| match arg {
            Arg::Descriptor(descriptor) => Ok(descriptor),
            other => Err(invalid(builder, position, "a descriptor", &other)),
        })
        .collect()
}

fn exactly<const N: usize>(builder: &'static str, args: Vec<Arg>) -> Result<[Descriptor; N]> {
    let actual = args.len();
    if actual != N {
        return Err(DescriptorError::OperandCount {
            builder,
            expected: N,
            actual,
        });
    }
    <[Descriptor; N]>::try_from(descriptors(builder, args)?).map_err(|_| {
        DescriptorError::OperandCount {
            builder,
            expected: N,
            actual,
        }
    })
}

fn build_array(args: Vec<Arg>) -> Result<Arg> {
    let [element] = exactly::<1>("Array", args)?;
    Ok(composite::array(element).into())
}

fn build_tuple(args: Vec<Arg>) -> Result<Arg> {
    Ok(composite::tuple(descriptors("Tuple", args)?).into())
}

fn build_arguments(args: Vec<Arg>) -> Result<Arg> {
    Ok(composite::arguments(descriptors("Arguments", args)?).into())
}

fn build_function(args: Vec<Arg>) -> Result<Arg> {
    let [parameters, returns] = exactly::<2>("Function", args)?;
    Ok(composite::function(parameters, returns)?.into())
}

fn build_union(args: Vec<Arg>) -> Result<Arg> {
    Ok(composite::union(descriptors("Union", args)?)?.into())
}

fn build_intersection(args: Vec<Arg>) -> Result<Arg> {
    Ok(composite::intersection(descriptors("Intersection", args)?)?.into())
}

fn build_literal(args: Vec<Arg>) -> Result<Arg> {
    match <[Arg; 1]>::try_from(args) {
        Ok([Arg::Value(constant)]) => Ok(literal(constant).into()),
        Ok([other]) => Err(invalid("Literal", 0, "a raw value", &other)),
        Err(args) => Err(DescriptorError::OperandCount {
            builder: "Literal",
            expected: 1,
            actual: args.len(),
        }),
    }
}

fn build_property(args: Vec<Arg>) -> Result<Arg> {
    let [name, descriptor] = <[Arg; 2]>::try_from(args).map_err(|args| {
        DescriptorError::OperandCount {
            builder: "ObjectProperty",
            expected: 2,
            actual: args.len(),
        }
    })?;
    let name = match name {
        Arg::Value(Value::String(name)) => name,
        other => return Err(invalid("ObjectProperty", 0, "a string field name", &other)),
    };
    let descriptor = match descriptor {
        Arg::Descriptor(descriptor) => descriptor,
        other => return Err(invalid("ObjectProperty", 1, "a descriptor", &other)),
    };
    Ok(property(name, descriptor).into())
}

fn build_object(args: Vec<Arg>) -> Result<Arg> {
    let fields = args
        .into_iter()
        .enumerate()
        .map(|(position, arg)| match arg {
            Arg::Field(field) => Ok(field),
            other => Err(invalid("ObjectStruct", position, "a field", &other)),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(object_struct(fields)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Arg>) -> Result<Descriptor> {
        Namespace::global()
            .invoke(name, args)
            .map(|arg| arg.into_descriptor().expect("builder returns a descriptor"))
    }

    fn leaf(name: &str) -> Arg {
        Arg::from(Namespace::global().leaf(name).unwrap())
    }

    #[test]
    fn test_global_namespace_contents() {
        let ns = Namespace::global();
        assert_eq!(ns.len(), 20);
        assert!(!ns.is_empty());
        for name in ["any", "undefined", "Array", "Or", "And", "ObjectStruct", "Object"] {
            assert!(ns.contains(name), "{}", name);
        }
        assert!(!ns.contains("Enum"));
        assert!(std::ptr::eq(ns, Namespace::global()));
    }

    #[test]
    fn test_names_are_sorted() {
        let names = Namespace::global().names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_leaf_entries_return_shared_descriptors() {
        let ns = Namespace::global();
        assert!(ns.leaf("number").unwrap().ptr_eq(&leaf::number()));
        assert!(matches!(ns.get("string"), Some(Entry::Leaf(_))));
        assert!(matches!(ns.get("Tuple"), Some(Entry::Builder(_))));
    }

    #[test]
    fn test_leaf_rejects_arguments() {
        let err = call("number", vec![leaf("string")]).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::OperandCount {
                builder: "number",
                expected: 0,
                actual: 1
            }
        );
        assert!(matches!(
            Namespace::global().leaf("Array"),
            Err(DescriptorError::InvalidArgument { builder: "Array", .. })
        ));
    }

    #[test]
    fn test_unknown_builder() {
        assert_eq!(
            call("Enum", vec![]).unwrap_err(),
            DescriptorError::UnknownBuilder("Enum".into())
        );
    }

    #[test]
    fn test_array_requires_exactly_one_operand() {
        let d = call("Array", vec![leaf("number")]).unwrap();
        assert_eq!(d.name(), "Array<number>");

        let err = call("Array", vec![leaf("number"), leaf("string")]).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::OperandCount {
                builder: "Array",
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(err.code(), "OPERAND_COUNT");
    }

    #[test]
    fn test_function_requires_both_parts() {
        let params = call("Arguments", vec![leaf("string")]).unwrap();
        let f = call("Function", vec![params.clone().into(), leaf("string")]).unwrap();
        assert_eq!(f.name(), "Function<Arguments<string>, string>");

        assert!(matches!(
            call("Function", vec![params.into()]),
            Err(DescriptorError::OperandCount { expected: 2, actual: 1, .. })
        ));
        assert!(matches!(
            call("Function", vec![leaf("string"), leaf("string")]),
            Err(DescriptorError::NotArguments { .. })
        ));
    }

    #[test]
    fn test_union_aliases_agree() {
        let a = call("Union", vec![leaf("string"), leaf("number")]).unwrap();
        let b = call("Or", vec![leaf("string"), leaf("number")]).unwrap();
        assert_eq!(a.name(), b.name());
        assert!(matches!(
            call("Or", vec![]),
            Err(DescriptorError::EmptyOperands { builder: "Union" })
        ));
        assert!(matches!(
            call("And", vec![]),
            Err(DescriptorError::EmptyOperands {
                builder: "Intersection"
            })
        ));
    }

    #[test]
    fn test_literal_takes_a_raw_value() {
        let d = call("Literal", vec![Value::from("hello").into()]).unwrap();
        assert!(d.satisfies(&Value::from("hello")));

        assert_eq!(
            call("Literal", vec![leaf("string")]).unwrap_err(),
            DescriptorError::InvalidArgument {
                builder: "Literal",
                position: 0,
                expected: "a raw value",
                found: "descriptor"
            }
        );
        assert!(matches!(
            call("Literal", vec![]),
            Err(DescriptorError::OperandCount { builder: "Literal", .. })
        ));
    }

    #[test]
    fn test_object_struct_from_properties() {
        let ns = Namespace::global();
        let name = ns
            .invoke("ObjectProperty", vec![Value::from("name").into(), leaf("string")])
            .unwrap();
        let age = ns
            .invoke("ObjectProperty", vec![Value::from("age").into(), leaf("number")])
            .unwrap();
        assert_eq!(name.kind_name(), "field");

        let person = call("Object", vec![name, age]).unwrap();
        assert_eq!(person.name(), "{ name: string; age: number }");
        assert!(person.satisfies(&person.generate()));
    }

    #[test]
    fn test_object_property_argument_errors() {
        let ns = Namespace::global();
        assert_eq!(
            ns.invoke("ObjectProperty", vec![Value::from(1).into(), leaf("string")])
                .unwrap_err(),
            DescriptorError::InvalidArgument {
                builder: "ObjectProperty",
                position: 0,
                expected: "a string field name",
                found: "number"
            }
        );
        assert!(matches!(
            ns.invoke("ObjectStruct", vec![leaf("string")]),
            Err(DescriptorError::InvalidArgument {
                builder: "ObjectStruct",
                position: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_composite_rejects_raw_values() {
        let err = call("Tuple", vec![leaf("string"), Value::from(3).into()]).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::InvalidArgument {
                builder: "Tuple",
                position: 1,
                expected: "a descriptor",
                found: "number"
            }
        );
    }
}
