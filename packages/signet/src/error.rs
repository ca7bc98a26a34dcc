//! Structured error types for signet.
//!
//! `SignetError` provides pattern-matchable errors instead of generic
//! `anyhow::Error`. Every variant is a declaration-time shape defect or a
//! boundary failure; none of them occur during a successful dispatch.
//!
//! # The Fail-Fast Rule
//!
//! > **Shape defects surface at construction, never at first dispatch.**
//!
//! A registry with a duplicate tag and a dispatch table missing a handler
//! are both rejected before the value exists. The only silent runtime
//! behavior in the crate is the unmatched-tag fallback on `Reducer::reduce`,
//! which is a policy, not an error (see [`crate::UnmatchedPolicy`]).
//!
//! # Example
//!
//! ```ignore
//! use signet::{ReducerBuilder, SignetError};
//!
//! match ReducerBuilder::new().on("INC", inc).build(&registry, 0) {
//!     Ok(reducer) => { /* table is total over the tag union */ }
//!     Err(SignetError::IncompleteDispatch { missing, extra, .. }) => {
//!         eprintln!("unhandled tags: {:?}, stray tags: {:?}", missing, extra);
//!     }
//!     Err(e) => eprintln!("other signet error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Structured error type for signet operations.
///
/// Each variant includes enough context to name the offending kind, tag, or
/// registry in logs and test assertions.
#[derive(Debug, Error)]
pub enum SignetError {
    /// Two kinds were registered under the same name in one registry.
    #[error("registry '{registry}' declares kind name '{name}' more than once")]
    DuplicateKindName {
        /// The registry being built.
        registry: &'static str,
        /// The repeated kind name.
        name: &'static str,
    },

    /// Two kinds in one registry carry the same tag.
    ///
    /// Dispatch would be incoherent: a message carrying this tag could have
    /// been produced by either kind.
    #[error("registry '{registry}' has duplicate tag '{tag}' (kinds '{first}' and '{second}')")]
    DuplicateTag {
        /// The registry being built.
        registry: &'static str,
        /// The shared tag.
        tag: &'static str,
        /// Name of the kind that declared the tag first.
        first: &'static str,
        /// Name of the kind that tried to reuse it.
        second: &'static str,
    },

    /// A handler is already registered for this tag.
    #[error("handler already registered for tag '{tag}'")]
    HandlerAlreadyRegistered {
        /// The tag with a prior handler.
        tag: &'static str,
    },

    /// The handler key set is not set-equal to the registry's tag union.
    ///
    /// This is the completeness defect the dispatch table exists to catch.
    /// Both sides of the symmetric difference are reported, sorted.
    #[error("dispatch table does not cover registry '{registry}': missing tags {missing:?}, extra tags {extra:?}")]
    IncompleteDispatch {
        /// Name of the registry the table was validated against.
        registry: &'static str,
        /// Tags in the registry's union with no handler.
        missing: Vec<&'static str>,
        /// Handler keys that no kind in the registry can produce.
        extra: Vec<&'static str>,
    },

    /// A kind name was not found in the registry (or projected subset).
    #[error("registry '{registry}' has no kind named '{name}'")]
    UnknownKind {
        /// The registry (or the registry behind the projection).
        registry: &'static str,
        /// The name that failed to resolve.
        name: String,
    },

    /// A required payload was not supplied on the type-erased surface.
    #[error("kind with tag '{tag}' requires a payload but none was supplied")]
    MissingPayload {
        /// The tag of the offended kind.
        tag: &'static str,
    },

    /// A payload was supplied to a kind that never carries one.
    #[error("kind with tag '{tag}' does not accept a payload")]
    UnexpectedPayload {
        /// The tag of the offended kind.
        tag: &'static str,
    },

    /// A typed payload failed to serialize into a message.
    #[error("failed to encode payload for tag '{tag}'")]
    PayloadEncode {
        /// The tag being built.
        tag: &'static str,
        /// The underlying serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// A message payload failed to decode into the requested type.
    #[error("failed to decode payload of message tagged '{tag}'")]
    PayloadDecode {
        /// The tag of the message being read.
        tag: String,
        /// The underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
}
