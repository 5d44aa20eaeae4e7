//! # tsr-runtime
//!
//! Runtime type descriptors: composable values that mirror structural type
//! shapes and can both validate and generate runtime values.
//!
//! ## Overview
//!
//! Every [`Descriptor`] exposes three operations:
//!
//! - [`name`](Descriptor::name) - a display name built from the shape, e.g.
//!   `Array<number>`
//! - [`satisfies`](Descriptor::satisfies) - whether a [`Value`] conforms
//! - [`generate`](Descriptor::generate) - a value that is guaranteed to conform
//!
//! Descriptors are immutable. Composite descriptors are built from existing
//! ones and share them rather than copying.
//!
//! ## Quick Start
//!
//! ```rust
//! use tsr_runtime::{array, number, object_struct, property, string, tuple, union, Value};
//! use serde_json::json;
//!
//! let person = object_struct([
//!     property("name", string()),
//!     property("age", number()),
//! ])?;
//! assert_eq!(person.name(), "{ name: string; age: number }");
//! assert!(person.satisfies(&Value::from(json!({ "name": "Bob", "age": 30 }))));
//!
//! let row = tuple([string(), union([number(), array(number())])?]);
//! assert!(row.satisfies(&Value::from(json!(["x", [1, 2]]))));
//! assert!(row.satisfies(&row.generate()));
//! # Ok::<(), tsr_runtime::DescriptorError>(())
//! ```
//!
//! ## Descriptor Kinds
//!
//! | Builder | Name | Accepts |
//! |---------|------|---------|
//! | [`any()`] | `any` | everything |
//! | [`object()`] | `object` | plain objects |
//! | [`number()`], [`string()`], [`boolean()`], [`symbol()`] | kind name | values of that kind |
//! | [`null()`], [`undefined()`] | `null`, `undefined` | that exact value |
//! | [`array`] | `Array<T>` | arrays whose elements all satisfy `T` |
//! | [`tuple`], [`arguments`] | `Tuple<A, B>` | arrays matching position by position |
//! | [`function`] | `Function<Arguments<..>, R>` | callables with the right arity |
//! | [`union`], [`intersection`] | `Union<A, B>` | either / both operands |
//! | [`literal`] | display form, e.g. `"on"` | one exact constant |
//! | [`object_struct`] + [`property`] | `{ a: A; b: B }` | plain objects with at least those fields |
//!
//! New composite kinds are made with [`Combinator`].
//!
//! ## Generation
//!
//! [`Descriptor::generate`] returns the canonical instance: `1` for numbers,
//! `""` for strings, `[]` for arrays, the leftmost operand for unions.
//! For property-based testing, pass a random [`Sampler`]:
//!
//! ```rust
//! use tsr_runtime::{array, string, GenerateConfig, Sampler};
//!
//! let words = array(string());
//! let mut sampler = Sampler::new(GenerateConfig::random().with_seed(7).with_collection_len(1, 5))?;
//! let value = words.generate_with(&mut sampler);
//! assert!(words.satisfies(&value));
//! # Ok::<(), tsr_runtime::ConfigValidationError>(())
//! ```
//!
//! Function descriptors only check arity, and their generated stubs always
//! return `undefined`: a callable's behavior cannot be synthesized from its
//! signature.
//!
//! ## Namespace
//!
//! [`Namespace::global`] maps the builder names a type-annotation front-end
//! emits (`number`, `Array`, `Union`/`Or`, `ObjectStruct`, ...) to their
//! constructors. See the [`namespace`] module.

pub mod combinator;
pub mod composite;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod leaf;
pub mod literal;
pub mod namespace;
pub mod record;
pub mod sampler;
pub mod validation;
pub mod value;

pub use combinator::{Base, Combinator, Extension, Generator, Locate};
pub use composite::{arguments, array, function, intersection, optional, tuple, union};
pub use config::{ConfigValidationError, GenerateConfig, GenerationMode, MAX_GENERATION_LIMIT};
pub use descriptor::{Descriptor, Field};
pub use error::{DescriptorError, Result, ValueError};
pub use leaf::{any, boolean, null, number, object, string, symbol, undefined};
pub use literal::literal;
pub use namespace::{Arg, Entry, Namespace};
pub use record::{object_struct, property};
pub use sampler::Sampler;
pub use validation::{Mismatch, Path, PathSegment};
pub use value::{Callable, NativeKind, Object, Symbol, Value};

/// Common imports.
pub mod prelude {
    pub use crate::{
        any, arguments, array, boolean, function, intersection, literal, null, number, object,
        object_struct, optional, property, string, symbol, tuple, undefined, union, Descriptor,
        DescriptorError, Namespace, Sampler, Value,
    };
}
