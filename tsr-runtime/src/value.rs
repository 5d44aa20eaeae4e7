//! Dynamic runtime values that descriptors validate and generate.
//!
//! [`Value`] models the values a host runtime hands to a type check:
//! primitives, symbols, arrays, insertion-ordered plain objects and callables
//! with a declared arity. [`NativeKind`] is the closed classification every
//! base check works from.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Property map of a plain object. Iteration follows insertion order.
pub type Object = IndexMap<String, Value>;

static UNDEFINED: Value = Value::Undefined;

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// =============================================================================
// Native kinds
// =============================================================================

/// Intrinsic kind of a runtime value.
///
/// This is the only thing base checks look at; no descriptor inspects a
/// language-specific tag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeKind {
    /// A plain object (neither an array nor a callable).
    Object,
    Array,
    Function,
    Number,
    String,
    Boolean,
    Symbol,
    Null,
    Undefined,
}

impl NativeKind {
    /// Every kind, in declaration order.
    pub const ALL: [NativeKind; 9] = [
        Self::Object,
        Self::Array,
        Self::Function,
        Self::Number,
        Self::String,
        Self::Boolean,
        Self::Symbol,
        Self::Null,
        Self::Undefined,
    ];

    /// Returns the lowercase kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::Function => "function",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Symbol => "symbol",
            Self::Null => "null",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Symbols and callables
// =============================================================================

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique, optionally described token. Two symbols are equal only if they
/// come from the same [`Symbol::new`] call.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    /// Create a fresh symbol.
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.map(Arc::from),
        }
    }

    /// The description given at creation, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

type Body = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A callable value with a declared parameter count.
///
/// The arity is what function descriptors check; the body is opaque.
#[derive(Clone)]
pub struct Callable {
    arity: usize,
    body: Arc<Body>,
}

impl Callable {
    /// Wrap a closure as a callable declaring `arity` parameters.
    pub fn new<F>(arity: usize, body: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            arity,
            body: Arc::new(body),
        }
    }

    /// Declared parameter count.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invoke the body. Missing or surplus arguments are passed through as-is.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.body)(args)
    }

    /// Identity comparison: true when both handles share one body.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Value
// =============================================================================

/// A dynamically typed runtime value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    Array(Vec<Value>),
    Object(Object),
    Function(Callable),
}

impl Value {
    /// Build a plain object from `(key, value)` pairs, keeping their order.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build an array from an iterator of values.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Array(items.into_iter().collect())
    }

    /// Classify this value.
    pub fn kind(&self) -> NativeKind {
        match self {
            Value::Undefined => NativeKind::Undefined,
            Value::Null => NativeKind::Null,
            Value::Boolean(_) => NativeKind::Boolean,
            Value::Number(_) => NativeKind::Number,
            Value::String(_) => NativeKind::String,
            Value::Symbol(_) => NativeKind::Symbol,
            Value::Array(_) => NativeKind::Array,
            Value::Object(_) => NativeKind::Object,
            Value::Function(_) => NativeKind::Function,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Function(callable) => Some(callable),
            _ => None,
        }
    }

    /// Declared arity when this value is callable.
    pub fn arity(&self) -> Option<usize> {
        self.as_callable().map(Callable::arity)
    }

    /// Element at `index`, or `undefined` when out of range or not an array.
    pub fn element(&self, index: usize) -> &Value {
        self.as_array()
            .and_then(|items| items.get(index))
            .unwrap_or(&UNDEFINED)
    }

    /// Property `name`, or `undefined` when absent or not a plain object.
    pub fn property(&self, name: &str) -> &Value {
        self.as_object()
            .and_then(|map| map.get(name))
            .unwrap_or(&UNDEFINED)
    }

    /// Exact equality used by literal descriptors.
    ///
    /// Primitives compare strictly, except that `NaN` equals `NaN`. Arrays and
    /// objects compare element-wise; callables and symbols by identity.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_value(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.same_value(w)))
            }
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Convert to JSON.
    ///
    /// `undefined` object properties are dropped and `undefined` array slots
    /// become `null`; non-finite numbers become `null`. Symbols and callables
    /// have no JSON form.
    pub fn to_json(&self) -> Result<serde_json::Value, ValueError> {
        use serde_json::Value as Json;

        Ok(match self {
            Value::Undefined | Value::Null => Json::Null,
            Value::Boolean(b) => Json::Bool(*b),
            // Integral values stay integers so they compare equal to parsed JSON.
            Value::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => {
                Json::from(*n as i64)
            }
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, value) in map.iter().filter(|(_, v)| !v.is_undefined()) {
                    out.insert(key.clone(), value.to_json()?);
                }
                Json::Object(out)
            }
            Value::Symbol(_) | Value::Function(_) => {
                return Err(ValueError::NotRepresentable { kind: self.kind() })
            }
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.same_value(other)
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        f.write_str("0")
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        write!(f, "{:.0}", n)
    } else {
        write!(f, "{}", n)
    }
}

/// An object key as written in display forms: bare when it reads as an
/// identifier, quoted otherwise.
pub(crate) struct DisplayKey<'a>(pub(crate) &'a str);

impl fmt::Display for DisplayKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.0.chars();
        let is_identifier = chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
        if is_identifier {
            f.write_str(self.0)
        } else {
            write!(f, "{:?}", self.0)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => fmt_number(*n, f),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(symbol) => match symbol.description() {
                Some(desc) => write!(f, "Symbol({})", desc),
                None => f.write_str("Symbol()"),
            },
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(map) if map.is_empty() => f.write_str("{}"),
            Value::Object(map) => {
                f.write_str("{ ")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", DisplayKey(key), value)?;
                }
                f.write_str(" }")
            }
            Value::Function(callable) => write!(f, "[Function/{}]", callable.arity()),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::Object(map)
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Function(callable)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
