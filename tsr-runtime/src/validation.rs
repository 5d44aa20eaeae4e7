//! Mismatch reporting for [`Descriptor::check`](crate::Descriptor::check).
//!
//! `satisfies` answers yes or no. `check` answers the same question but, on a
//! no, says where: the path to the first position that failed, the descriptor
//! expected there, and the native kind actually found.
//!
//! ```rust
//! use tsr_runtime::{array, number, Value};
//! use serde_json::json;
//!
//! let numbers = array(number());
//! let err = numbers.check(&Value::from(json!([1, "2", 3]))).unwrap_err();
//! assert_eq!(err.path.to_string(), "$[1]");
//! assert_eq!(err.expected, "number");
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::value::NativeKind;

/// One step into a composite value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Field(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "[{}]", i),
            Self::Field(name) => write!(f, ".{}", name),
        }
    }
}

/// Location of a value relative to the root being checked. Displays as `$`
/// followed by each segment, e.g. `$.friends[2].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Where and why a value failed a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("expected `{expected}` at {path}, found {found}")]
pub struct Mismatch {
    /// Path to the failing position
    pub path: Path,
    /// Name of the descriptor the value failed at that position
    pub expected: String,
    /// Native kind of the value found there
    pub found: NativeKind,
}

impl Mismatch {
    /// A mismatch at the root.
    pub fn new(expected: impl Into<String>, found: NativeKind) -> Self {
        Self {
            path: Path::root(),
            expected: expected.into(),
            found,
        }
    }

    /// Re-anchor this mismatch one level down from a parent value.
    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        self.path.0.insert(0, segment);
        self
    }
}
