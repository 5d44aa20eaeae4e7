//! Leaf descriptors: shapes with no children.
//!
//! Each leaf is a process-wide shared value built on first use; every call to
//! e.g. [`number()`] hands out a handle to the same descriptor.

use std::sync::LazyLock;

use crate::combinator::Base;
use crate::descriptor::Descriptor;
use crate::value::{NativeKind, Object, Value};

macro_rules! leaf_descriptors {
    ($($(#[$doc:meta])* $fn_name:ident => $name:literal, $base:expr, $generator:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $fn_name() -> Descriptor {
                static LEAF: LazyLock<Descriptor> =
                    LazyLock::new(|| Descriptor::leaf($name, $base, $generator));
                LEAF.clone()
            }
        )*
    };
}

leaf_descriptors! {
    /// Accepts every value. Generates `1`.
    any => "any", Base::Any, |sampler| Value::Number(sampler.number());

    /// Accepts plain objects (not arrays, not callables). Generates `{}`.
    object => "object", Base::Kind(NativeKind::Object), |_| Value::Object(Object::new());

    number => "number", Base::Kind(NativeKind::Number), |sampler| Value::Number(sampler.number());

    string => "string", Base::Kind(NativeKind::String), |sampler| Value::String(sampler.string());

    boolean => "boolean", Base::Kind(NativeKind::Boolean), |sampler| Value::Boolean(sampler.boolean());

    /// Accepts any symbol. Each generation yields a fresh one.
    symbol => "symbol", Base::Kind(NativeKind::Symbol), |sampler| Value::Symbol(sampler.symbol());

    null => "null", Base::Kind(NativeKind::Null), |_| Value::Null;

    undefined => "undefined", Base::Kind(NativeKind::Undefined), |_| Value::Undefined;
}
