//! Message kinds: the tagged-message factories.
//!
//! A [`MessageKind`] is a named, callable declaration that (1) builds
//! [`Message`]s whose tag always equals the literal supplied at declaration
//! and (2) exposes that tag as a readable property. The payload requirement
//! is part of the kind's type: a no-payload kind has no way to accept a
//! payload, and a required-payload kind has no way to omit one.
//!
//! # Declaration
//!
//! Declaration is a single call taking the tag; the payload type is an
//! ordinary generic parameter:
//!
//! ```ignore
//! use signet::kind;
//!
//! const INC_TAG: &str = "INC";
//!
//! let increment = kind::required::<i64>(INC_TAG);
//! let decrement = kind::optional::<i64>("DEC");
//! let reset = kind::no_payload("RESET");
//!
//! assert_eq!(increment.tag(), "INC");
//! let msg = increment.build(5)?;
//! ```
//!
//! # Type Erasure
//!
//! Registries hold kinds of mixed payload types, so [`AnyMessageKind`]
//! mirrors the typed surface behind an object-safe trait. The erased
//! `construct` call re-checks the payload requirement at runtime, since the
//! typed guarantee does not survive erasure.

use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;

use crate::error::SignetError;
use crate::message::Message;

/// Arity marker: the kind never carries a payload.
#[derive(Debug)]
pub struct NoPayload;

/// Arity marker: the kind always carries a payload of type `P`.
#[derive(Debug)]
pub struct Required<P>(PhantomData<fn() -> P>);

/// Arity marker: the kind may carry a payload of type `P`.
#[derive(Debug)]
pub struct Optional<P>(PhantomData<fn() -> P>);

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::NoPayload {}
    impl<P> Sealed for super::Required<P> {}
    impl<P> Sealed for super::Optional<P> {}
}

/// The payload-arity contract of a message kind.
///
/// Sealed: the only arities are [`NoPayload`], [`Required`], and
/// [`Optional`].
pub trait Arity: sealed::Sealed + Send + Sync + 'static {
    /// The runtime descriptor of this arity.
    const REQUIREMENT: PayloadRequirement;
}

impl Arity for NoPayload {
    const REQUIREMENT: PayloadRequirement = PayloadRequirement::None;
}

impl<P: 'static> Arity for Required<P> {
    const REQUIREMENT: PayloadRequirement = PayloadRequirement::Required;
}

impl<P: 'static> Arity for Optional<P> {
    const REQUIREMENT: PayloadRequirement = PayloadRequirement::Optional;
}

/// Runtime descriptor of a kind's payload requirement.
///
/// This is the erased form of the [`Arity`] type parameter, used where
/// kinds of mixed payload types live in one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadRequirement {
    /// The kind never carries a payload.
    None,
    /// The kind always carries a payload.
    Required,
    /// The kind may carry a payload.
    Optional,
}

/// A declared message kind.
///
/// Kinds are created once at declaration, immutable thereafter, and cheap
/// to copy (a tag plus a phantom arity). Every message a kind builds
/// carries exactly the tag it was declared with.
pub struct MessageKind<A: Arity> {
    tag: &'static str,
    _arity: PhantomData<A>,
}

impl<A: Arity> MessageKind<A> {
    /// The tag this kind stamps onto every message it builds.
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// The payload requirement of this kind.
    pub fn requirement(&self) -> PayloadRequirement {
        A::REQUIREMENT
    }
}

impl MessageKind<NoPayload> {
    /// Build a message carrying only the tag.
    ///
    /// Attach metadata with [`Message::with_metadata`].
    pub fn build(&self) -> Message {
        Message::bare(self.tag)
    }
}

impl<P: Serialize + 'static> MessageKind<Required<P>> {
    /// Build a message carrying the tag and the given payload.
    pub fn build(&self, payload: P) -> Result<Message, SignetError> {
        let value = encode_payload(self.tag, payload)?;
        Ok(Message::with_payload_value(self.tag, value))
    }
}

impl<P: Serialize + 'static> MessageKind<Optional<P>> {
    /// Build a message with the payload omitted entirely.
    ///
    /// The result is structurally indistinguishable from a message of a
    /// no-payload kind with the same tag.
    pub fn build(&self) -> Message {
        Message::bare(self.tag)
    }

    /// Build a message carrying the tag and the given payload.
    pub fn build_with(&self, payload: P) -> Result<Message, SignetError> {
        let value = encode_payload(self.tag, payload)?;
        Ok(Message::with_payload_value(self.tag, value))
    }
}

fn encode_payload<P: Serialize>(tag: &'static str, payload: P) -> Result<Value, SignetError> {
    serde_json::to_value(payload).map_err(|source| SignetError::PayloadEncode { tag, source })
}

// Kinds are plain values; Copy regardless of the payload type.
impl<A: Arity> Clone for MessageKind<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: Arity> Copy for MessageKind<A> {}

impl<A: Arity> std::fmt::Debug for MessageKind<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageKind")
            .field("tag", &self.tag)
            .field("requirement", &A::REQUIREMENT)
            .finish()
    }
}

/// Declare a kind that never carries a payload.
pub const fn no_payload(tag: &'static str) -> MessageKind<NoPayload> {
    MessageKind {
        tag,
        _arity: PhantomData,
    }
}

/// Declare a kind that always carries a payload of type `P`.
pub const fn required<P: Serialize + 'static>(tag: &'static str) -> MessageKind<Required<P>> {
    MessageKind {
        tag,
        _arity: PhantomData,
    }
}

/// Declare a kind that may carry a payload of type `P`.
pub const fn optional<P: Serialize + 'static>(tag: &'static str) -> MessageKind<Optional<P>> {
    MessageKind {
        tag,
        _arity: PhantomData,
    }
}

/// Type-erased message kind for heterogeneous storage.
///
/// This trait is automatically implemented for every [`MessageKind`]. The
/// registry and projection layers hold kinds through it; typed call sites
/// should prefer the kind's own `build` methods, which enforce the payload
/// requirement at compile time.
pub trait AnyMessageKind: Send + Sync + 'static {
    /// The tag this kind stamps onto every message it builds.
    fn tag(&self) -> &'static str;

    /// The payload requirement of this kind.
    fn requirement(&self) -> PayloadRequirement;

    /// Build a message from already-encoded parts.
    ///
    /// The payload requirement is enforced here at runtime: a required
    /// payload must be supplied, and a no-payload kind rejects any payload.
    /// The payload value itself is trusted; typed validation happens at the
    /// typed `build` call sites.
    fn construct(
        &self,
        payload: Option<Value>,
        metadata: Option<Value>,
    ) -> Result<Message, SignetError>;
}

impl<A: Arity> AnyMessageKind for MessageKind<A> {
    fn tag(&self) -> &'static str {
        self.tag
    }

    fn requirement(&self) -> PayloadRequirement {
        A::REQUIREMENT
    }

    fn construct(
        &self,
        payload: Option<Value>,
        metadata: Option<Value>,
    ) -> Result<Message, SignetError> {
        let message = match (A::REQUIREMENT, payload) {
            (PayloadRequirement::None, Some(_)) => {
                return Err(SignetError::UnexpectedPayload { tag: self.tag })
            }
            (PayloadRequirement::Required, None) => {
                return Err(SignetError::MissingPayload { tag: self.tag })
            }
            (_, Some(value)) => Message::with_payload_value(self.tag, value),
            (_, None) => Message::bare(self.tag),
        };

        Ok(match metadata {
            Some(meta) => message.with_metadata(meta),
            None => message,
        })
    }
}
