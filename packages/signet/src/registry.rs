//! Message-set registries.
//!
//! A [`Registry`] is an ordered mapping from kind name to message kind,
//! frozen at construction. From it two sets are derived: the tag union
//! (every tag any contained kind can produce) and the shape union (a
//! descriptor per kind standing in for the message union). The reducer and
//! projection layers validate their own shapes against these sets.
//!
//! # Invariants
//!
//! - Read-only after `build()`: no kind may be added, removed, or replaced.
//! - Kind names are unique within a registry.
//! - Tags are unique within a registry - duplicate tags would make dispatch
//!   incoherent, so construction rejects them.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use crate::error::SignetError;
use crate::kind::{AnyMessageKind, Arity, MessageKind, PayloadRequirement};

/// Descriptor of one message shape a registry can produce.
///
/// The runtime stand-in for one case of the registry's message union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageShape {
    /// The kind's name within the registry.
    pub name: &'static str,
    /// The tag stamped onto every message of this shape.
    pub tag: &'static str,
    /// Whether the shape carries a payload.
    pub requirement: PayloadRequirement,
}

/// A named, ordered, frozen collection of message kinds.
///
/// Registries are plain values: build one per state slice and pass it by
/// reference to [`ReducerBuilder::build`](crate::ReducerBuilder::build) and
/// [`Projection::new`](crate::Projection::new). There is no ambient global
/// registry.
///
/// # Example
///
/// ```ignore
/// use signet::{kind, Registry};
///
/// let increment = kind::required::<i64>("INC");
/// let reset = kind::no_payload("RESET");
///
/// let registry = Registry::builder("counter")
///     .kind("increment", increment)
///     .kind("reset", reset)
///     .build()?;
///
/// assert_eq!(registry.tag_of("increment"), Some("INC"));
/// assert!(registry.tag_union().contains("RESET"));
/// ```
pub struct Registry {
    name: &'static str,
    kinds: Vec<(&'static str, Arc<dyn AnyMessageKind>)>,
    tags: BTreeSet<&'static str>,
}

impl Registry {
    /// Start building a registry with the given name.
    pub fn builder(name: &'static str) -> RegistryBuilder {
        RegistryBuilder {
            name,
            kinds: Vec::new(),
        }
    }

    /// The registry's name, used in error reporting.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of kinds in the registry.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns true if the registry contains no kinds.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Look up a kind by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn AnyMessageKind>> {
        self.kinds
            .iter()
            .find(|(kind_name, _)| *kind_name == name)
            .map(|(_, kind)| kind)
    }

    /// Read a specific kind's tag by name.
    pub fn tag_of(&self, name: &str) -> Option<&'static str> {
        self.get(name).map(|kind| kind.tag())
    }

    /// Returns true if some kind in the registry produces this tag.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// The derived tag union: every tag any contained kind can produce.
    pub fn tag_union(&self) -> &BTreeSet<&'static str> {
        &self.tags
    }

    /// The derived shape union, in declaration order.
    pub fn shapes(&self) -> Vec<MessageShape> {
        self.kinds
            .iter()
            .map(|&(name, ref kind)| MessageShape {
                name,
                tag: kind.tag(),
                requirement: kind.requirement(),
            })
            .collect()
    }

    /// Iterate over the kinds in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &dyn AnyMessageKind)> + '_ {
        self.kinds
            .iter()
            .map(|(name, kind)| (*name, kind.as_ref()))
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("kinds", &self.kinds.iter().map(|(n, _)| *n).collect::<Vec<_>>())
            .field("tags", &self.tags)
            .finish()
    }
}

/// Builder for a [`Registry`].
///
/// Kinds are collected in declaration order; name and tag uniqueness are
/// validated once, at [`build`](RegistryBuilder::build).
pub struct RegistryBuilder {
    name: &'static str,
    kinds: Vec<(&'static str, Arc<dyn AnyMessageKind>)>,
}

impl RegistryBuilder {
    /// Add a kind under the given name.
    pub fn kind<A: Arity>(mut self, name: &'static str, kind: MessageKind<A>) -> Self {
        self.kinds.push((name, Arc::new(kind)));
        self
    }

    /// Freeze the registry.
    ///
    /// # Errors
    ///
    /// - [`SignetError::DuplicateKindName`] if a name repeats.
    /// - [`SignetError::DuplicateTag`] if two kinds share a tag, naming both.
    pub fn build(self) -> Result<Registry, SignetError> {
        let mut seen_names: BTreeSet<&'static str> = BTreeSet::new();
        let mut seen_tags: BTreeMap<&'static str, &'static str> = BTreeMap::new();

        for &(name, ref kind) in &self.kinds {
            if !seen_names.insert(name) {
                return Err(SignetError::DuplicateKindName {
                    registry: self.name,
                    name,
                });
            }
            if let Some(first) = seen_tags.insert(kind.tag(), name) {
                return Err(SignetError::DuplicateTag {
                    registry: self.name,
                    tag: kind.tag(),
                    first,
                    second: name,
                });
            }
        }

        let tags = seen_tags.into_keys().collect();

        debug!(
            registry = self.name,
            kinds = self.kinds.len(),
            "registry frozen"
        );

        Ok(Registry {
            name: self.name,
            kinds: self.kinds,
            tags,
        })
    }
}
