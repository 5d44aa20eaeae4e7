//! Composite descriptors built on [`Combinator`].
//!
//! | Builder | Base | Accepts | Canonical generation |
//! |---------|------|---------|----------------------|
//! | [`array`] | array | every element matches | `[]` |
//! | [`tuple`] / [`arguments`] | array | position `i` matches child `i` | one value per child |
//! | [`function`] | function | declared arity equals the arguments length | stub of that arity |
//! | [`union`] | any | some operand matches | leftmost operand |
//! | [`intersection`] | any | every operand matches | leftmost operand that fits |
//!
//! Union and intersection are left folds of a binary node, so
//! `union([a, b, c])` is named `Union<Union<a, b>, c>`.
//!
//! The combinators behind these builders are crate-private, so a Function
//! without an arguments tuple or an Array with extra operands cannot be built:
//!
//! ```compile_fail
//! use tsr_runtime::{composite::FUNCTION, number};
//!
//! let _ = FUNCTION.build([number()]);
//! ```
//!
//! ```compile_fail
//! use tsr_runtime::{composite::ARRAY, number, string};
//!
//! let _ = ARRAY.build([number(), string()]);
//! ```

use tracing::warn;

use crate::combinator::{Base, Combinator};
use crate::descriptor::Descriptor;
use crate::error::{DescriptorError, Result};
use crate::leaf::undefined;
use crate::sampler::Sampler;
use crate::validation::PathSegment;
use crate::value::{Callable, NativeKind, Value};

pub(crate) const ARRAY: Combinator = Combinator::new(
    "Array",
    Base::Kind(NativeKind::Array),
    every_element,
    sample_elements,
)
.with_locate(first_rejected_element);

pub(crate) const TUPLE: Combinator = Combinator::new(
    "Tuple",
    Base::Kind(NativeKind::Array),
    each_position,
    sample_positions,
)
.with_locate(first_rejected_position)
.positional();

pub(crate) const ARGUMENTS: Combinator = Combinator::new(
    "Arguments",
    Base::Kind(NativeKind::Array),
    each_position,
    sample_positions,
)
.with_locate(first_rejected_position)
.positional();

pub(crate) const FUNCTION: Combinator = Combinator::new(
    "Function",
    Base::Kind(NativeKind::Function),
    arity_matches,
    stub_callable,
);

const UNION: Combinator = Combinator::new("Union", Base::Any, either, leftmost);

const INTERSECTION: Combinator = Combinator::new("Intersection", Base::Any, both, first_fitting);

// =============================================================================
// Builders
// =============================================================================

/// Array whose elements all satisfy `element`.
pub fn array(element: Descriptor) -> Descriptor {
    ARRAY.build([element])
}

/// Fixed-position sequence. Trailing extra elements are not checked.
pub fn tuple<I>(elements: I) -> Descriptor
where
    I: IntoIterator<Item = Descriptor>,
{
    TUPLE.build(elements)
}

/// Parameter list of a function; a tuple under another name.
pub fn arguments<I>(parameters: I) -> Descriptor
where
    I: IntoIterator<Item = Descriptor>,
{
    ARGUMENTS.build(parameters)
}

/// Callable taking `parameters` and returning `returns`.
///
/// Validation only compares the callable's declared arity with
/// `parameters.length()`: a native callable's parameter and return types are
/// not observable. Generation yields a stub with the right arity that always
/// returns `undefined`, so the return type is not honored by generated values.
///
/// # Errors
///
/// [`DescriptorError::NotArguments`] if `parameters` has no length (it was
/// not built by [`arguments`] or [`tuple`]).
pub fn function(parameters: Descriptor, returns: Descriptor) -> Result<Descriptor> {
    if parameters.length().is_none() {
        return Err(DescriptorError::NotArguments {
            found: parameters.name().to_string(),
        });
    }
    Ok(FUNCTION.build([parameters, returns]))
}

/// Accepts a value matching any operand.
///
/// # Errors
///
/// [`DescriptorError::EmptyOperands`] for an empty operand list.
pub fn union<I>(operands: I) -> Result<Descriptor>
where
    I: IntoIterator<Item = Descriptor>,
{
    fold("Union", &UNION, operands)
}

/// Accepts a value matching every operand.
///
/// # Errors
///
/// [`DescriptorError::EmptyOperands`] for an empty operand list.
pub fn intersection<I>(operands: I) -> Result<Descriptor>
where
    I: IntoIterator<Item = Descriptor>,
{
    fold("Intersection", &INTERSECTION, operands)
}

/// `descriptor` or `undefined`: the shape of an optional object field.
pub fn optional(descriptor: Descriptor) -> Descriptor {
    UNION.build([descriptor, undefined()])
}

fn fold<I>(builder: &'static str, node: &Combinator, operands: I) -> Result<Descriptor>
where
    I: IntoIterator<Item = Descriptor>,
{
    let mut operands = operands.into_iter();
    let first = operands
        .next()
        .ok_or(DescriptorError::EmptyOperands { builder })?;
    Ok(operands.fold(first, |left, right| node.build([left, right])))
}

// =============================================================================
// Array
// =============================================================================

// Only the first child is consulted; the builders never pass more.
fn every_element(value: &Value, children: &[Descriptor]) -> bool {
    match (value.as_array(), children.first()) {
        (Some(items), Some(element)) => items.iter().all(|item| element.satisfies(item)),
        (Some(_), None) => true,
        (None, _) => false,
    }
}

fn sample_elements(children: &[Descriptor], sampler: &mut Sampler) -> Value {
    let Some(element) = children.first() else {
        return Value::Array(Vec::new());
    };
    let len = sampler.collection_len();
    Value::Array((0..len).map(|_| element.generate_with(sampler)).collect())
}

fn first_rejected_element<'v>(
    value: &'v Value,
    children: &[Descriptor],
) -> Option<(PathSegment, usize, &'v Value)> {
    let element = children.first()?;
    value
        .as_array()?
        .iter()
        .enumerate()
        .find(|(_, item)| !element.satisfies(item))
        .map(|(i, item)| (PathSegment::Index(i), 0, item))
}

// =============================================================================
// Tuple / Arguments
// =============================================================================

fn each_position(value: &Value, children: &[Descriptor]) -> bool {
    children
        .iter()
        .enumerate()
        .all(|(i, child)| child.satisfies(value.element(i)))
}

fn sample_positions(children: &[Descriptor], sampler: &mut Sampler) -> Value {
    Value::Array(
        children
            .iter()
            .map(|child| child.generate_with(sampler))
            .collect(),
    )
}

fn first_rejected_position<'v>(
    value: &'v Value,
    children: &[Descriptor],
) -> Option<(PathSegment, usize, &'v Value)> {
    children.iter().enumerate().find_map(|(i, child)| {
        let item = value.element(i);
        (!child.satisfies(item)).then_some((PathSegment::Index(i), i, item))
    })
}

// =============================================================================
// Function
// =============================================================================

fn expected_arity(children: &[Descriptor]) -> Option<usize> {
    children.first().and_then(Descriptor::length)
}

fn arity_matches(value: &Value, children: &[Descriptor]) -> bool {
    matches!(
        (value.arity(), expected_arity(children)),
        (Some(actual), Some(expected)) if actual == expected
    )
}

fn stub_callable(children: &[Descriptor], _: &mut Sampler) -> Value {
    let arity = expected_arity(children).unwrap_or(0);
    Value::Function(Callable::new(arity, |_| Value::Undefined))
}

// =============================================================================
// Union / Intersection
// =============================================================================

fn either(value: &Value, children: &[Descriptor]) -> bool {
    children.iter().any(|child| child.satisfies(value))
}

fn both(value: &Value, children: &[Descriptor]) -> bool {
    children.iter().all(|child| child.satisfies(value))
}

fn leftmost(children: &[Descriptor], sampler: &mut Sampler) -> Value {
    children
        .first()
        .map_or(Value::Undefined, |child| child.generate_with(sampler))
}

/// Left sample if the right side accepts it; otherwise the union of both
/// sides' object samples, then the right sample, whichever fits both sides.
fn first_fitting(children: &[Descriptor], sampler: &mut Sampler) -> Value {
    let [left, right] = children else {
        return leftmost(children, sampler);
    };

    let candidate = left.generate_with(sampler);
    if right.satisfies(&candidate) {
        return candidate;
    }

    let alternative = right.generate_with(sampler);
    if let Some(merged) = merge_objects(&candidate, &alternative) {
        if left.satisfies(&merged) && right.satisfies(&merged) {
            return merged;
        }
    }
    if left.satisfies(&alternative) {
        return alternative;
    }

    warn!(
        left = %left,
        right = %right,
        "no generated value satisfies both sides of the intersection"
    );
    candidate
}

/// Key-wise union of two object samples. Objects found under the same key
/// are merged recursively; any other clash keeps the left value.
fn merge_objects(left: &Value, right: &Value) -> Option<Value> {
    let (Value::Object(left), Value::Object(right)) = (left, right) else {
        return None;
    };
    let mut merged = left.clone();
    for (key, value) in right {
        match merged.get_mut(key) {
            Some(existing) => {
                if let Some(nested) = merge_objects(existing, value) {
                    *existing = nested;
                }
            }
            None => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    Some(Value::Object(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::{any, boolean, null, number, object, string};
    use crate::literal::literal;
    use crate::record::{object_struct, property};
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_array_validation() {
        let numbers = array(number());
        assert_eq!(numbers.name(), "Array<number>");
        assert!(numbers.satisfies(&v(json!([1, 2, 3]))));
        assert!(numbers.satisfies(&v(json!([]))));
        assert!(!numbers.satisfies(&v(json!([1, "2", 3]))));
        assert!(!numbers.satisfies(&v(json!({ "0": 1 }))));
        assert!(array(any()).satisfies(&v(json!([1, "2", 3]))));
    }

    #[test]
    fn test_array_generates_empty_sequence() {
        assert_eq!(array(number()).generate(), v(json!([])));
    }

    #[test]
    fn test_array_without_element_accepts_any_elements() {
        let bare = ARRAY.build([]);
        assert!(bare.satisfies(&v(json!([1, "x"]))));
        assert!(!bare.satisfies(&Value::Null));
    }

    #[test]
    fn test_tuple_validation() {
        let pair = tuple([string(), number()]);
        assert_eq!(pair.name(), "Tuple<string, number>");
        assert_eq!(pair.length(), Some(2));
        assert!(pair.satisfies(&v(json!(["Peter", 23]))));
        assert!(pair.satisfies(&v(json!(["Peter", 23, true]))));
        assert!(!pair.satisfies(&v(json!([true, 47]))));
        assert!(!pair.satisfies(&v(json!(23))));
        assert!(!pair.satisfies(&v(json!(["Peter"]))));
    }

    #[test]
    fn test_tuple_missing_position_checked_as_undefined() {
        let tolerant = tuple([string(), optional(number())]);
        assert!(tolerant.satisfies(&v(json!(["Peter"]))));
    }

    #[test]
    fn test_tuple_generation() {
        let pair = tuple([string(), number(), literal("x")]);
        assert_eq!(pair.generate(), v(json!(["", 1, "x"])));
        assert_eq!(tuple([]).generate(), v(json!([])));
    }

    #[test]
    fn test_arguments_is_a_named_tuple() {
        let params = arguments([string()]);
        assert_eq!(params.name(), "Arguments<string>");
        assert_eq!(params.length(), Some(1));
        assert!(params.satisfies(&v(json!(["a"]))));
    }

    #[test]
    fn test_function_checks_arity_only() {
        let f = function(arguments([string()]), string()).unwrap();
        assert_eq!(f.name(), "Function<Arguments<string>, string>");

        let unary = Value::from(Callable::new(1, |_| Value::from(5)));
        let nullary = Value::from(Callable::new(0, |_| Value::from("s")));
        assert!(f.satisfies(&unary));
        assert!(!f.satisfies(&nullary));
        assert!(!f.satisfies(&v(json!("not callable"))));
    }

    #[test]
    fn test_function_stub_has_required_arity() {
        let f = function(arguments([number(), number(), boolean()]), number()).unwrap();
        let stub = f.generate();
        assert_eq!(stub.arity(), Some(3));
        assert!(f.satisfies(&stub));
        assert!(stub.as_callable().unwrap().call(&[]).is_undefined());
    }

    #[test]
    fn test_function_accepts_plain_tuple_parameters() {
        assert!(function(tuple([]), null()).is_ok());
    }

    #[test]
    fn test_function_rejects_non_positional_parameters() {
        let err = function(array(string()), string()).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::NotArguments {
                found: "Array<string>".into()
            }
        );
    }

    #[test]
    fn test_function_rejects_leaf_parameters() {
        let err = function(number(), string()).unwrap_err();
        assert_eq!(err.code(), "NOT_ARGUMENTS");
    }

    #[test]
    fn test_union_validation() {
        let either = union([string(), number()]).unwrap();
        assert_eq!(either.name(), "Union<string, number>");
        assert!(either.satisfies(&v(json!(1))));
        assert!(either.satisfies(&v(json!("1"))));
        assert!(!either.satisfies(&v(json!([1]))));
        assert!(!either.satisfies(&v(json!(false))));
    }

    #[test]
    fn test_union_fold_is_n_ary() {
        let three = union([string(), number(), boolean()]).unwrap();
        assert_eq!(three.name(), "Union<Union<string, number>, boolean>");
        assert!(three.satisfies(&v(json!(false))));
        assert!(three.satisfies(&v(json!("x"))));
        assert!(!three.satisfies(&Value::Null));
    }

    #[test]
    fn test_union_generates_from_leftmost_operand() {
        let three = union([boolean(), number(), string()]).unwrap();
        assert_eq!(three.generate(), Value::from(true));
    }

    #[test]
    fn test_single_operand_is_returned_unchanged() {
        let only = union([number()]).unwrap();
        assert!(only.ptr_eq(&number()));
        assert!(intersection([string()]).unwrap().ptr_eq(&string()));
    }

    #[test]
    fn test_empty_operands_fail_fast() {
        assert_eq!(
            union([]).unwrap_err(),
            DescriptorError::EmptyOperands { builder: "Union" }
        );
        assert_eq!(
            intersection(Vec::new()).unwrap_err(),
            DescriptorError::EmptyOperands {
                builder: "Intersection"
            }
        );
    }

    #[test]
    fn test_intersection_validation() {
        let named = object_struct([property("name", string())]).unwrap();
        let aged = object_struct([property("age", number())]).unwrap();
        let both = intersection([named, aged]).unwrap();
        assert!(both.satisfies(&v(json!({ "name": "Bob", "age": 3 }))));
        assert!(!both.satisfies(&v(json!({ "name": "Bob" }))));
        assert!(!intersection([string(), number()])
            .unwrap()
            .satisfies(&v(json!("1"))));
    }

    #[test]
    fn test_intersection_merges_object_samples() {
        let named = object_struct([property("name", string())]).unwrap();
        let aged = object_struct([property("age", number())]).unwrap();
        let both = intersection([named, aged]).unwrap();
        let generated = both.generate();
        assert_eq!(generated, v(json!({ "name": "", "age": 1 })));
        assert!(both.satisfies(&generated));
    }

    #[test]
    fn test_intersection_merges_nested_object_samples() {
        let left = object_struct([property(
            "x",
            object_struct([property("a", string())]).unwrap(),
        )])
        .unwrap();
        let right = object_struct([
            property("x", object_struct([property("b", number())]).unwrap()),
            property("y", boolean()),
        ])
        .unwrap();
        let both = intersection([left, right]).unwrap();

        assert!(both.satisfies(&v(json!({ "x": { "a": "", "b": 1 }, "y": true }))));
        let generated = both.generate();
        assert_eq!(generated, v(json!({ "x": { "a": "", "b": 1 }, "y": true })));
        assert!(both.satisfies(&generated));

        let mut sampler = Sampler::seeded(11);
        for _ in 0..16 {
            let generated = both.generate_with(&mut sampler);
            assert!(both.satisfies(&generated), "{}", generated);
        }
    }

    #[test]
    fn test_merge_keeps_left_scalar_on_clash() {
        let merged = merge_objects(
            &v(json!({ "k": 1, "o": { "p": "l" } })),
            &v(json!({ "k": "r", "o": { "p": "r", "q": null } })),
        )
        .unwrap();
        assert_eq!(merged, v(json!({ "k": 1, "o": { "p": "l", "q": null } })));
        assert!(merge_objects(&v(json!([1])), &v(json!({}))).is_none());
    }

    #[test]
    fn test_intersection_falls_back_to_fitting_operand() {
        let narrowed = intersection([string(), literal("exact")]).unwrap();
        assert_eq!(narrowed.generate(), Value::from("exact"));
        assert!(narrowed.satisfies(&narrowed.generate()));

        let wide = intersection([object(), object_struct([property("a", number())]).unwrap()])
            .unwrap();
        assert!(wide.satisfies(&wide.generate()));
    }

    #[test]
    fn test_optional_accepts_undefined() {
        let maybe = optional(number());
        assert_eq!(maybe.name(), "Union<number, undefined>");
        assert!(maybe.satisfies(&Value::Undefined));
        assert!(maybe.satisfies(&v(json!(2))));
        assert!(!maybe.satisfies(&Value::Null));
    }

    #[test]
    fn test_check_descends_into_positions() {
        let rows = array(tuple([string(), number()]));
        let err = rows
            .check(&v(json!([["a", 1], ["b", "2"]])))
            .unwrap_err();
        assert_eq!(err.path.to_string(), "$[1][1]");
        assert_eq!(err.expected, "number");
        assert_eq!(err.found, NativeKind::String);
    }

    #[test]
    fn test_check_reports_union_at_its_own_node() {
        let either = union([string(), number()]).unwrap();
        let err = tuple([either]).check(&v(json!([null]))).unwrap_err();
        assert_eq!(err.path.to_string(), "$[0]");
        assert_eq!(err.expected, "Union<string, number>");
        assert_eq!(err.found, NativeKind::Null);
    }

    #[test]
    fn test_shared_children_are_not_copied() {
        let shared = array(number());
        let outer = tuple([shared.clone(), shared.clone()]);
        assert!(outer.satisfies(&v(json!([[1], [2, 3]]))));
        assert_eq!(shared.name(), "Array<number>");
    }
}
