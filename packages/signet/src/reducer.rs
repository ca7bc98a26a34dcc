//! Exhaustively-checked dispatch tables.
//!
//! A [`ReducerBuilder`] collects `tag -> handler` entries and validates the
//! key set against a registry's tag union at [`build`](ReducerBuilder::build).
//! Construction succeeds only if the two sets are equal - no missing tag, no
//! extra tag - so an incomplete table fails loudly before it is usable, not
//! at first mismatched dispatch.
//!
//! # Unmatched Tags
//!
//! A message whose tag is absent from the table can still arrive at runtime
//! (cross-slice traffic carries tags from other registries). That case is
//! not an error; it is governed by [`UnmatchedPolicy`]. The default
//! reproduces the reference behavior of returning the construction-time
//! initial state rather than passing the incoming state through - see the
//! policy docs before relying on it.
//!
//! # Example
//!
//! ```ignore
//! use signet::{kind, Registry, ReducerBuilder};
//!
//! let registry = Registry::builder("counter")
//!     .kind("increment", kind::required::<i64>("INC"))
//!     .kind("reset", kind::no_payload("RESET"))
//!     .build()?;
//!
//! let reducer = ReducerBuilder::new()
//!     .on("INC", |state: &i64, msg| {
//!         state + msg.payload_as::<i64>().ok().flatten().unwrap_or(0)
//!     })
//!     .on("RESET", |_, _| 0)
//!     .build(&registry, 0)?;
//!
//! let state = reducer.reduce(&0, &increment.build(5)?);
//! assert_eq!(state, 5);
//! ```

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::SignetError;
use crate::message::Message;
use crate::registry::Registry;

/// A state-transition handler: `(state, message) -> state`.
pub type Handler<S> = Box<dyn Fn(&S, &Message) -> S + Send + Sync>;

/// What `reduce` returns when a message's tag has no handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedPolicy {
    /// Return the initial state supplied at construction.
    ///
    /// This reproduces the reference behavior and is the default for
    /// compatibility. Note that it diverges from conventional reducer
    /// semantics: the incoming state is discarded, not passed through.
    #[default]
    ResetToInitial,

    /// Return the incoming state unchanged.
    PassThrough,
}

/// Builder for a [`Reducer`].
pub struct ReducerBuilder<S> {
    handlers: BTreeMap<&'static str, Handler<S>>,
    policy: UnmatchedPolicy,
}

impl<S> ReducerBuilder<S> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
            policy: UnmatchedPolicy::default(),
        }
    }

    /// Register a handler for a tag.
    ///
    /// # Panics
    ///
    /// Panics if a handler is already registered for this tag. Use
    /// [`try_on`](ReducerBuilder::try_on) for a non-panicking version.
    pub fn on<F>(self, tag: &'static str, handler: F) -> Self
    where
        F: Fn(&S, &Message) -> S + Send + Sync + 'static,
    {
        self.try_on(tag, handler).unwrap_or_else(|e| {
            panic!("{}", e);
        })
    }

    /// Register a handler for a tag, returning an error if one is already
    /// registered.
    pub fn try_on<F>(mut self, tag: &'static str, handler: F) -> Result<Self, SignetError>
    where
        F: Fn(&S, &Message) -> S + Send + Sync + 'static,
    {
        if self.handlers.contains_key(tag) {
            return Err(SignetError::HandlerAlreadyRegistered { tag });
        }
        self.handlers.insert(tag, Box::new(handler));
        Ok(self)
    }

    /// Set the policy applied when a message's tag has no handler.
    pub fn unmatched(mut self, policy: UnmatchedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate the table against the registry and produce a [`Reducer`].
    ///
    /// The handler key set must equal the registry's tag union exactly.
    ///
    /// # Errors
    ///
    /// [`SignetError::IncompleteDispatch`] listing the missing and extra
    /// tags, sorted.
    pub fn build(self, registry: &Registry, initial: S) -> Result<Reducer<S>, SignetError> {
        let union = registry.tag_union();

        let missing: Vec<&'static str> = union
            .iter()
            .filter(|tag| !self.handlers.contains_key(*tag))
            .copied()
            .collect();
        let extra: Vec<&'static str> = self
            .handlers
            .keys()
            .filter(|tag| !union.contains(*tag))
            .copied()
            .collect();

        if !missing.is_empty() || !extra.is_empty() {
            return Err(SignetError::IncompleteDispatch {
                registry: registry.name(),
                missing,
                extra,
            });
        }

        debug!(
            registry = registry.name(),
            handlers = self.handlers.len(),
            "dispatch table validated"
        );

        Ok(Reducer {
            handlers: self.handlers,
            initial,
            policy: self.policy,
        })
    }
}

impl<S> Default for ReducerBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for ReducerBuilder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReducerBuilder")
            .field("tags", &self.handlers.keys().collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish()
    }
}

/// A total, validated dispatch table over one registry's tag union.
///
/// The reducer holds no reference to the registry it was validated against;
/// validation happens once, at construction.
pub struct Reducer<S> {
    handlers: BTreeMap<&'static str, Handler<S>>,
    initial: S,
    policy: UnmatchedPolicy,
}

impl<S> Reducer<S> {
    /// The initial state supplied at construction.
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// The unmatched-tag policy in effect.
    pub fn policy(&self) -> UnmatchedPolicy {
        self.policy
    }

    /// The handled tags, sorted.
    pub fn handled_tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}

impl<S: Clone> Reducer<S> {
    /// Apply a message to the given state, returning the next state.
    ///
    /// Looks up `message.tag` in the table and invokes the matching
    /// handler. An unmatched tag is absorbed silently (apart from a warning
    /// log) according to the configured [`UnmatchedPolicy`].
    pub fn reduce(&self, state: &S, message: &Message) -> S {
        match self.handlers.get(message.tag.as_str()) {
            Some(handler) => handler(state, message),
            None => {
                warn!(
                    tag = %message.tag,
                    policy = ?self.policy,
                    "no handler for tag, applying unmatched policy"
                );
                match self.policy {
                    UnmatchedPolicy::ResetToInitial => self.initial.clone(),
                    UnmatchedPolicy::PassThrough => state.clone(),
                }
            }
        }
    }
}

impl<S> std::fmt::Debug for Reducer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reducer")
            .field("tags", &self.handlers.keys().collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{no_payload, optional, required};
    use crate::registry::Registry;

    fn counter_registry() -> Registry {
        Registry::builder("counter")
            .kind("increment", required::<i64>("INC"))
            .kind("decrement", optional::<i64>("DEC"))
            .kind("reset", no_payload("RESET"))
            .build()
            .unwrap()
    }

    fn counter_reducer(registry: &Registry) -> Reducer<i64> {
        ReducerBuilder::new()
            .on("INC", |state: &i64, msg: &Message| {
                state + msg.payload_as::<i64>().ok().flatten().unwrap_or(0)
            })
            .on("DEC", |state: &i64, msg: &Message| {
                state - msg.payload_as::<i64>().ok().flatten().unwrap_or(1)
            })
            .on("RESET", |_: &i64, _: &Message| 0)
            .build(registry, 0)
            .unwrap()
    }

    #[test]
    fn test_reduce_routes_by_tag() {
        let registry = counter_registry();
        let reducer = counter_reducer(&registry);
        let increment = required::<i64>("INC");

        assert_eq!(reducer.reduce(&0, &increment.build(5).unwrap()), 5);
        assert_eq!(reducer.reduce(&10, &no_payload("RESET").build()), 0);
    }

    #[test]
    fn test_every_kind_routes_to_its_own_handler() {
        let registry = counter_registry();
        let reducer = counter_reducer(&registry);

        // Each kind's message must reach the handler under its tag, never
        // another one.
        assert_eq!(
            reducer.reduce(&7, &required::<i64>("INC").build(3).unwrap()),
            10
        );
        assert_eq!(reducer.reduce(&7, &optional::<i64>("DEC").build()), 6);
        assert_eq!(reducer.reduce(&7, &no_payload("RESET").build()), 0);
    }

    #[test]
    fn test_build_rejects_missing_tag() {
        let registry = counter_registry();
        let result = ReducerBuilder::new()
            .on("INC", |state: &i64, _: &Message| *state)
            .build(&registry, 0);

        match result.unwrap_err() {
            SignetError::IncompleteDispatch {
                registry,
                missing,
                extra,
            } => {
                assert_eq!(registry, "counter");
                assert_eq!(missing, vec!["DEC", "RESET"]);
                assert!(extra.is_empty());
            }
            other => panic!("Expected IncompleteDispatch, got {other:?}"),
        }
    }

    #[test]
    fn test_build_rejects_extra_tag() {
        let registry = counter_registry();
        let result = ReducerBuilder::new()
            .on("INC", |state: &i64, _: &Message| *state)
            .on("DEC", |state: &i64, _: &Message| *state)
            .on("RESET", |state: &i64, _: &Message| *state)
            .on("BOGUS", |state: &i64, _: &Message| *state)
            .build(&registry, 0);

        match result.unwrap_err() {
            SignetError::IncompleteDispatch { missing, extra, .. } => {
                assert!(missing.is_empty());
                assert_eq!(extra, vec!["BOGUS"]);
            }
            other => panic!("Expected IncompleteDispatch, got {other:?}"),
        }
    }

    #[test]
    fn test_build_reports_both_sides_of_symmetric_difference() {
        let registry = counter_registry();
        let result = ReducerBuilder::new()
            .on("INC", |state: &i64, _: &Message| *state)
            .on("DEC", |state: &i64, _: &Message| *state)
            .on("BOGUS", |state: &i64, _: &Message| *state)
            .build(&registry, 0);

        match result.unwrap_err() {
            SignetError::IncompleteDispatch { missing, extra, .. } => {
                assert_eq!(missing, vec!["RESET"]);
                assert_eq!(extra, vec!["BOGUS"]);
            }
            other => panic!("Expected IncompleteDispatch, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "handler already registered")]
    fn test_duplicate_handler_panics() {
        let _builder = ReducerBuilder::<i64>::new()
            .on("INC", |state: &i64, _: &Message| *state)
            .on("INC", |state: &i64, _: &Message| *state);
    }

    #[test]
    fn test_try_on_duplicate_errors() {
        let result = ReducerBuilder::<i64>::new()
            .try_on("INC", |state: &i64, _: &Message| *state)
            .unwrap()
            .try_on("INC", |state: &i64, _: &Message| *state);

        assert!(matches!(
            result.unwrap_err(),
            SignetError::HandlerAlreadyRegistered { tag: "INC" }
        ));
    }

    #[test]
    fn test_unmatched_tag_resets_to_initial_by_default() {
        let registry = counter_registry();
        let reducer = counter_reducer(&registry);
        let foreign = no_payload("UNKNOWN").build();

        // Reference behavior: the construction-time initial state comes
        // back, not the incoming state.
        assert_eq!(reducer.policy(), UnmatchedPolicy::ResetToInitial);
        assert_eq!(reducer.reduce(&42, &foreign), 0);
    }

    #[test]
    fn test_unmatched_tag_pass_through_policy() {
        let registry = counter_registry();
        let reducer = ReducerBuilder::new()
            .on("INC", |state: &i64, _: &Message| state + 1)
            .on("DEC", |state: &i64, _: &Message| state - 1)
            .on("RESET", |_: &i64, _: &Message| 0)
            .unmatched(UnmatchedPolicy::PassThrough)
            .build(&registry, 0)
            .unwrap();

        let foreign = no_payload("UNKNOWN").build();
        assert_eq!(reducer.reduce(&42, &foreign), 42);
    }

    #[test]
    fn test_reducer_initial_and_handled_tags() {
        let registry = counter_registry();
        let reducer = counter_reducer(&registry);

        assert_eq!(*reducer.initial(), 0);
        let tags: Vec<_> = reducer.handled_tags().collect();
        assert_eq!(tags, vec!["DEC", "INC", "RESET"]);
    }

    #[test]
    fn test_empty_registry_accepts_empty_table() {
        let registry = Registry::builder("empty").build().unwrap();
        let reducer = ReducerBuilder::<i64>::new().build(&registry, 9).unwrap();

        // Nothing can match, so every dispatch falls back.
        assert_eq!(reducer.reduce(&1, &no_payload("ANY").build()), 9);
    }

    #[test]
    fn test_reducer_with_struct_state() {
        #[derive(Debug, Clone, PartialEq)]
        struct Slice {
            count: i64,
            last_tag: String,
        }

        let registry = Registry::builder("slice")
            .kind("touch", no_payload("TOUCH"))
            .build()
            .unwrap();

        let reducer = ReducerBuilder::new()
            .on("TOUCH", |state: &Slice, msg: &Message| Slice {
                count: state.count + 1,
                last_tag: msg.tag.clone(),
            })
            .build(
                &registry,
                Slice {
                    count: 0,
                    last_tag: String::new(),
                },
            )
            .unwrap();

        let state = Slice {
            count: 3,
            last_tag: "old".to_string(),
        };
        let next = reducer.reduce(&state, &no_payload("TOUCH").build());

        assert_eq!(next.count, 4);
        assert_eq!(next.last_tag, "TOUCH");
    }

    #[test]
    fn test_reducer_debug() {
        let registry = counter_registry();
        let reducer = counter_reducer(&registry);
        let debug = format!("{:?}", reducer);

        assert!(debug.contains("Reducer"));
        assert!(debug.contains("INC"));
    }
}
