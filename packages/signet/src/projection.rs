//! Capability-narrowing projections.
//!
//! A [`Projection`] is a reduced view over an explicit subset of a
//! registry's kinds: each entry can only be invoked, and the produced
//! message goes to the projection's sink - never back to the caller. Use it
//! to hand external wiring (event handlers, UI bindings) a surface that can
//! trigger messages but cannot read them.
//!
//! The projection holds no ownership over the registry; it clones the kind
//! handles it needs at construction and validates the subset names then.

use std::sync::Arc;

use serde_json::Value;

use crate::error::SignetError;
use crate::kind::AnyMessageKind;
use crate::message::Message;
use crate::registry::Registry;

/// An invoke-only view over a subset of a registry's kinds.
///
/// # Example
///
/// ```ignore
/// use signet::Projection;
///
/// // Wiring surface for a toolbar that may only increment and reset.
/// let projection = Projection::new(&registry, &["increment", "reset"], move |msg| {
///     let mut state = shared.lock().unwrap();
///     *state = reducer.reduce(&state, &msg);
/// })?;
///
/// projection.invoke_with("increment", json!(5))?;
/// projection.invoke("reset")?;
/// ```
pub struct Projection {
    registry_name: &'static str,
    entries: Vec<(&'static str, Arc<dyn AnyMessageKind>)>,
    sink: Arc<dyn Fn(Message) + Send + Sync>,
}

impl Projection {
    /// Project a subset of the registry's kinds onto the given sink.
    ///
    /// # Errors
    ///
    /// - [`SignetError::UnknownKind`] if a name is not in the registry.
    /// - [`SignetError::DuplicateKindName`] if a name repeats in `names`.
    pub fn new(
        registry: &Registry,
        names: &[&'static str],
        sink: impl Fn(Message) + Send + Sync + 'static,
    ) -> Result<Self, SignetError> {
        let mut entries = Vec::with_capacity(names.len());

        for &name in names {
            if entries.iter().any(|(existing, _)| *existing == name) {
                return Err(SignetError::DuplicateKindName {
                    registry: registry.name(),
                    name,
                });
            }
            let kind = registry
                .get(name)
                .ok_or_else(|| SignetError::UnknownKind {
                    registry: registry.name(),
                    name: name.to_string(),
                })?;
            entries.push((name, Arc::clone(kind)));
        }

        Ok(Self {
            registry_name: registry.name(),
            entries,
            sink: Arc::new(sink),
        })
    }

    /// Project a subset whose invocations build and discard the message.
    ///
    /// For surfaces that must only ever trigger, with nothing listening.
    pub fn invoke_only(
        registry: &Registry,
        names: &[&'static str],
    ) -> Result<Self, SignetError> {
        Self::new(registry, names, |_message| {})
    }

    /// Invoke a kind with no payload and no metadata.
    pub fn invoke(&self, name: &str) -> Result<(), SignetError> {
        self.invoke_full(name, None, None)
    }

    /// Invoke a kind with a payload.
    pub fn invoke_with(&self, name: &str, payload: Value) -> Result<(), SignetError> {
        self.invoke_full(name, Some(payload), None)
    }

    /// Invoke a kind with optional payload and metadata.
    ///
    /// The built message is handed to the sink; the caller never sees it.
    ///
    /// # Errors
    ///
    /// - [`SignetError::UnknownKind`] if the name is outside the projected
    ///   subset.
    /// - [`SignetError::MissingPayload`] / [`SignetError::UnexpectedPayload`]
    ///   if the arguments violate the kind's payload requirement.
    pub fn invoke_full(
        &self,
        name: &str,
        payload: Option<Value>,
        metadata: Option<Value>,
    ) -> Result<(), SignetError> {
        let kind = self
            .entries
            .iter()
            .find(|(entry_name, _)| *entry_name == name)
            .map(|(_, kind)| kind)
            .ok_or_else(|| SignetError::UnknownKind {
                registry: self.registry_name,
                name: name.to_string(),
            })?;

        let message = kind.construct(payload, metadata)?;
        (self.sink)(message);
        Ok(())
    }

    /// The projected kind names, in the order supplied at construction.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Returns true if the projection contains this kind name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(entry_name, _)| *entry_name == name)
    }

    /// Number of projected kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the projection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projection")
            .field("registry", &self.registry_name)
            .field(
                "names",
                &self.entries.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{no_payload, optional, required};
    use serde_json::json;
    use std::sync::Mutex;

    fn counter_registry() -> Registry {
        Registry::builder("counter")
            .kind("increment", required::<i64>("INC"))
            .kind("decrement", optional::<i64>("DEC"))
            .kind("reset", no_payload("RESET"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_projection_restricts_to_subset() {
        let registry = counter_registry();
        let projection = Projection::invoke_only(&registry, &["increment", "reset"]).unwrap();

        assert_eq!(projection.len(), 2);
        assert!(projection.contains("increment"));
        assert!(projection.contains("reset"));
        assert!(!projection.contains("decrement"));
    }

    #[test]
    fn test_projection_preserves_supplied_order() {
        let registry = counter_registry();
        let projection = Projection::invoke_only(&registry, &["reset", "increment"]).unwrap();

        let names: Vec<_> = projection.names().collect();
        assert_eq!(names, vec!["reset", "increment"]);
    }

    #[test]
    fn test_projection_rejects_unknown_name() {
        let registry = counter_registry();
        let result = Projection::invoke_only(&registry, &["increment", "nope"]);

        match result.unwrap_err() {
            SignetError::UnknownKind { registry, name } => {
                assert_eq!(registry, "counter");
                assert_eq!(name, "nope");
            }
            other => panic!("Expected UnknownKind, got {other:?}"),
        }
    }

    #[test]
    fn test_projection_rejects_duplicate_name() {
        let registry = counter_registry();
        let result = Projection::invoke_only(&registry, &["reset", "reset"]);

        assert!(matches!(
            result.unwrap_err(),
            SignetError::DuplicateKindName { name: "reset", .. }
        ));
    }

    #[test]
    fn test_invoke_feeds_sink_and_hides_message() {
        let registry = counter_registry();
        let seen: Arc<Mutex<Vec<Message>>> = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);

        let projection = Projection::new(&registry, &["increment", "reset"], move |msg| {
            sink_seen.lock().unwrap().push(msg);
        })
        .unwrap();

        // The caller gets () back; only the sink sees the message.
        projection.invoke_with("increment", json!(5)).unwrap();
        projection.invoke("reset").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].tag, "INC");
        assert_eq!(seen[0].payload, Some(json!(5)));
        assert_eq!(seen[1].tag, "RESET");
        assert!(seen[1].payload.is_none());
    }

    #[test]
    fn test_invoke_unprojected_name_errors() {
        let registry = counter_registry();
        let projection = Projection::invoke_only(&registry, &["reset"]).unwrap();

        // "increment" exists in the registry but not in this projection.
        let err = projection.invoke_with("increment", json!(1)).unwrap_err();
        assert!(matches!(err, SignetError::UnknownKind { .. }));
    }

    #[test]
    fn test_invoke_enforces_payload_requirement() {
        let registry = counter_registry();
        let projection =
            Projection::invoke_only(&registry, &["increment", "reset"]).unwrap();

        assert!(matches!(
            projection.invoke("increment").unwrap_err(),
            SignetError::MissingPayload { tag: "INC" }
        ));
        assert!(matches!(
            projection.invoke_with("reset", json!(1)).unwrap_err(),
            SignetError::UnexpectedPayload { tag: "RESET" }
        ));
    }

    #[test]
    fn test_invoke_full_with_metadata() {
        let registry = counter_registry();
        let seen: Arc<Mutex<Vec<Message>>> = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);

        let projection = Projection::new(&registry, &["decrement"], move |msg| {
            sink_seen.lock().unwrap().push(msg);
        })
        .unwrap();

        projection
            .invoke_full("decrement", None, Some(json!({"request_id": "r1"})))
            .unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen[0].payload.is_none());
        assert_eq!(seen[0].metadata, Some(json!({"request_id": "r1"})));
    }

    #[test]
    fn test_invoke_only_discards() {
        let registry = counter_registry();
        let projection = Projection::invoke_only(&registry, &["reset"]).unwrap();

        // Nothing observable happens; the call still validates and succeeds.
        assert!(projection.invoke("reset").is_ok());
    }

    #[test]
    fn test_projection_debug() {
        let registry = counter_registry();
        let projection = Projection::invoke_only(&registry, &["reset"]).unwrap();
        let debug = format!("{:?}", projection);

        assert!(debug.contains("Projection"));
        assert!(debug.contains("counter"));
        assert!(debug.contains("reset"));
    }
}
