//! # Signet
//!
//! Tagged message kinds, frozen registries, and exhaustively-checked
//! reducers for unidirectional state management.
//!
//! ## Core Concepts
//!
//! Signet separates **declaring** messages from **handling** them:
//! - [`MessageKind`] = a factory that stamps a literal tag onto every
//!   message it builds
//! - [`Registry`] = a frozen, named collection of kinds from which the set
//!   of producible tags is derived
//! - [`Reducer`] = a `tag -> handler` table proven total over that set
//!   before it can be used
//!
//! The key principle: **the set of tags is stated once** - at kind
//! declaration - and every other shape in the system is validated against
//! it rather than restated.
//!
//! ## Architecture
//!
//! ```text
//! kind::required::<i64>("INC") ──┐
//! kind::optional::<i64>("DEC") ──┼─► Registry::builder("counter")
//! kind::no_payload("RESET")    ──┘        │
//!                                         │ freeze (unique names, unique tags)
//!                                         ▼
//!                                     Registry ──► tag_union() / shapes()
//!                                         │
//!                      ┌──────────────────┴──────────────────┐
//!                      ▼                                     ▼
//!        ReducerBuilder::build(&registry, 0)    Projection::new(&registry, subset, sink)
//!            │  key set == tag union?               │  invoke-only surface
//!            ▼                                      ▼
//!        Reducer::reduce(&state, &msg)          invoke("reset") ─► sink(Message)
//! ```
//!
//! ## Key Invariants
//!
//! 1. **Tags are fixed at declaration** - a kind's messages always carry
//!    exactly the tag it was declared with
//! 2. **Registries are frozen** - no kind is added, removed, or replaced
//!    after `build()`
//! 3. **Tags are unique per registry** - duplicates are rejected at
//!    construction
//! 4. **Dispatch tables are total** - handler keys must equal the tag
//!    union exactly, checked before the reducer exists
//! 5. **Construction is pure** - same arguments, structurally equal
//!    messages; no clocks, counters, or hidden ids
//!
//! ## Example
//!
//! ```ignore
//! use signet::{kind, Registry, ReducerBuilder, Message};
//!
//! // 1. Declare kinds (tag stated once, here)
//! let increment = kind::required::<i64>("INC");
//! let decrement = kind::optional::<i64>("DEC");
//! let reset = kind::no_payload("RESET");
//!
//! // 2. Freeze the registry for this state slice
//! let registry = Registry::builder("counter")
//!     .kind("increment", increment)
//!     .kind("decrement", decrement)
//!     .kind("reset", reset)
//!     .build()?;
//!
//! // 3. Build the reducer - fails here if any tag is unhandled
//! let reducer = ReducerBuilder::new()
//!     .on("INC", |s: &i64, m: &Message| s + m.payload_as::<i64>().ok().flatten().unwrap_or(0))
//!     .on("DEC", |s: &i64, m: &Message| s - m.payload_as::<i64>().ok().flatten().unwrap_or(1))
//!     .on("RESET", |_, _| 0)
//!     .build(&registry, 0)?;
//!
//! // 4. The consumer owns the state and applies messages
//! let state = reducer.reduce(&0, &increment.build(5)?);
//! assert_eq!(state, 5);
//! ```
//!
//! ## What This Is Not
//!
//! Signet is **not**:
//! - A store or runtime loop (consumers hold state and call the reducer)
//! - An event bus or effect system
//! - A persistence or replay layer
//!
//! Signet **is**:
//! > A declaration-time scheme for keeping a set of message tags, the
//! > reducer that handles them, and the surfaces that trigger them in
//! > provable agreement.

// Core modules
mod error;
pub mod kind;
mod message;
mod projection;
mod reducer;
mod registry;


// Re-export message types
pub use message::Message;

// Re-export kind types
pub use kind::{
    no_payload, optional, required, AnyMessageKind, Arity, MessageKind, NoPayload, Optional,
    PayloadRequirement, Required,
};

// Re-export registry types
pub use registry::{MessageShape, Registry, RegistryBuilder};

// Re-export reducer types
pub use reducer::{Handler, Reducer, ReducerBuilder, UnmatchedPolicy};

// Re-export projection types
pub use projection::Projection;

// Re-export error types
pub use error::SignetError;
