//! The generic composite combinator.
//!
//! Every composite descriptor in this crate (Array, Tuple, Arguments,
//! Function, and the binary Union/Intersection nodes) is a [`Combinator`]
//! applied to a list of child descriptors. A combinator pairs:
//!
//! - a name template, rendered as `Template<child, child, ...>`;
//! - a [`Base`] gate over the value's [`NativeKind`];
//! - an [`Extension`] predicate that sees the value and the children;
//! - a [`Generator`] that builds a conforming value from the children.
//!
//! A composite satisfies `base(kind) && extension(value, children)`. Because
//! a descriptor can only be made through [`Combinator::build`], the base gate
//! and the child list always travel together.
//!
//! # Example
//!
//! ```rust
//! use tsr_runtime::{number, Base, Combinator, Descriptor, NativeKind, Sampler, Value};
//!
//! fn non_empty(value: &Value, children: &[Descriptor]) -> bool {
//!     let items = value.as_array().unwrap_or_default();
//!     !items.is_empty() && children.iter().all(|c| items.iter().all(|v| c.satisfies(v)))
//! }
//!
//! fn one_of_each(children: &[Descriptor], sampler: &mut Sampler) -> Value {
//!     Value::array(children.iter().map(|c| c.generate_with(sampler)))
//! }
//!
//! const NON_EMPTY: Combinator =
//!     Combinator::new("NonEmpty", Base::Kind(NativeKind::Array), non_empty, one_of_each);
//!
//! let d = NON_EMPTY.build([number()]);
//! assert_eq!(d.name(), "NonEmpty<number>");
//! assert!(d.satisfies(&d.generate()));
//! ```

use std::fmt;

use tracing::trace;

use crate::descriptor::Descriptor;
use crate::sampler::Sampler;
use crate::validation::PathSegment;
use crate::value::{NativeKind, Value};

/// Child-aware validation layered on top of a base gate.
pub type Extension = fn(&Value, &[Descriptor]) -> bool;

/// Builds a conforming value from the children.
pub type Generator = fn(&[Descriptor], &mut Sampler) -> Value;

/// Finds the first child position a value fails: the path step, the index of
/// the child descriptor that rejected it, and the offending inner value.
pub type Locate = for<'v> fn(&'v Value, &[Descriptor]) -> Option<(PathSegment, usize, &'v Value)>;

/// The cheap native-kind gate applied before any structural work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    /// Admits every kind.
    Any,
    /// Admits exactly one kind.
    Kind(NativeKind),
}

impl Base {
    pub fn admits(self, kind: NativeKind) -> bool {
        match self {
            Base::Any => true,
            Base::Kind(expected) => expected == kind,
        }
    }
}

/// Constructor for one family of composite descriptors.
#[derive(Clone, Copy)]
pub struct Combinator {
    template: &'static str,
    base: Base,
    extension: Extension,
    generator: Generator,
    locate: Option<Locate>,
    positional: bool,
}

impl Combinator {
    pub const fn new(
        template: &'static str,
        base: Base,
        extension: Extension,
        generator: Generator,
    ) -> Self {
        Self {
            template,
            base,
            extension,
            generator,
            locate: None,
            positional: false,
        }
    }

    /// Attach a locator so [`Descriptor::check`] can descend into children.
    pub const fn with_locate(self, locate: Locate) -> Self {
        Self {
            locate: Some(locate),
            ..self
        }
    }

    /// Mark children as positional: descriptors built by this combinator
    /// report their child count as [`Descriptor::length`].
    pub const fn positional(self) -> Self {
        Self {
            positional: true,
            ..self
        }
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    pub fn base(&self) -> Base {
        self.base
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// Render the display name for a child list.
    pub fn name_for(&self, children: &[Descriptor]) -> String {
        let names: Vec<&str> = children.iter().map(Descriptor::name).collect();
        format!("{}<{}>", self.template, names.join(", "))
    }

    /// Build a composite descriptor over `children`.
    pub fn build<I>(&self, children: I) -> Descriptor
    where
        I: IntoIterator<Item = Descriptor>,
    {
        let children: Vec<Descriptor> = children.into_iter().collect();
        let name = self.name_for(&children);
        trace!(descriptor = %name, children = children.len(), "built composite descriptor");
        Descriptor::composite(name, *self, children)
    }

    pub(crate) fn admits(&self, value: &Value, children: &[Descriptor]) -> bool {
        self.base.admits(value.kind()) && (self.extension)(value, children)
    }

    pub(crate) fn generate(&self, children: &[Descriptor], sampler: &mut Sampler) -> Value {
        (self.generator)(children, sampler)
    }

    pub(crate) fn locate<'v>(
        &self,
        value: &'v Value,
        children: &[Descriptor],
    ) -> Option<(PathSegment, usize, &'v Value)> {
        self.locate.and_then(|locate| locate(value, children))
    }
}

impl fmt::Debug for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combinator")
            .field("template", &self.template)
            .field("base", &self.base)
            .field("positional", &self.positional)
            .finish_non_exhaustive()
    }
}
