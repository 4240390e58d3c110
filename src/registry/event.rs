//! Change notifications
//!
//! Events delivered to subscribers whenever the registry's contents change.
//! Every subscriber receives its own copy, in the order changes happened.

use super::binding::Binding;

/// Kind of change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// First binding for an SSRC
    Created,
    /// Any write to a binding, including the first
    Updated,
    /// Binding removed
    Deleted,
}

/// A change to the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A binding was created for a previously unseen SSRC
    Created(Binding),
    /// A binding was written; `previous` is `None` on creation
    Updated {
        previous: Option<Binding>,
        current: Binding,
    },
    /// A binding was removed
    Deleted(Binding),
}

impl RegistryEvent {
    /// Get the kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            RegistryEvent::Created(_) => EventKind::Created,
            RegistryEvent::Updated { .. } => EventKind::Updated,
            RegistryEvent::Deleted(_) => EventKind::Deleted,
        }
    }

    /// The binding as it stands after the change (or as it was, for deletions)
    pub fn binding(&self) -> &Binding {
        match self {
            RegistryEvent::Created(binding) => binding,
            RegistryEvent::Updated { current, .. } => current,
            RegistryEvent::Deleted(binding) => binding,
        }
    }
}
