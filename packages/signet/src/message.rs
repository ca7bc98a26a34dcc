//! The tagged message record.
//!
//! A [`Message`] is an immutable fact: a discriminant `tag` fixed by the
//! kind that built it, an optional `payload`, and optional free-form
//! `metadata` for cross-cutting concerns (e.g. an originating request id).
//!
//! # Field Presence
//!
//! Absent payload and metadata are omitted from the serialized form
//! entirely. A message built without a payload is structurally equal to a
//! message of a no-payload kind carrying the same tag - serialized or
//! compared messages never carry spurious empty fields.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SignetError;

/// An immutable tagged message.
///
/// Messages are built by a [`MessageKind`](crate::MessageKind), never by
/// hand: the kind guarantees the `tag` equals the literal supplied at
/// declaration. Construction is pure, so building the same message twice
/// yields structurally equal values.
///
/// # Example
///
/// ```ignore
/// let increment = MessageKind::<i64>::required("INC");
/// let msg = increment.build(5)?.with_metadata(json!({ "request_id": rid }));
///
/// assert_eq!(msg.tag, "INC");
/// assert_eq!(msg.payload_as::<i64>()?, Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The discriminant identifying this message's kind.
    pub tag: String,

    /// The payload, if this message's kind carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,

    /// Free-form metadata attached for cross-cutting concerns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Message {
    /// Create a bare message carrying only a tag.
    pub(crate) fn bare(tag: &'static str) -> Self {
        Self {
            tag: tag.to_string(),
            payload: None,
            metadata: None,
        }
    }

    /// Create a message carrying a tag and an already-encoded payload.
    pub(crate) fn with_payload_value(tag: &'static str, payload: Value) -> Self {
        Self {
            tag: tag.to_string(),
            payload: Some(payload),
            metadata: None,
        }
    }

    /// Attach metadata to this message.
    ///
    /// Metadata is always optional; every built message accepts it via this
    /// chaining call regardless of the kind's payload requirement.
    pub fn with_metadata(mut self, metadata: impl Into<Value>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// The discriminant tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns true if a payload is present.
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Decode the payload into a concrete type.
    ///
    /// Returns `Ok(None)` when the message carries no payload, and
    /// [`SignetError::PayloadDecode`] when a payload is present but does not
    /// match the requested type.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<Option<T>, SignetError> {
        self.payload
            .as_ref()
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(|source| SignetError::PayloadDecode {
                tag: self.tag.clone(),
                source,
            })
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{}({})", self.tag, payload),
            None => write!(f, "{}", self.tag),
        }
    }
}
