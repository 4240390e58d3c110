//! Identity registry implementation
//!
//! The central registry that maps SSRCs to participants for one session and
//! notifies interested parties as bindings come and go.

use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use super::binding::{Binding, BindingUpdate, LookupKey};
use super::config::RegistryConfig;
use super::error::RegistryError;
use super::event::RegistryEvent;
use crate::stats::{RegistryCounters, RegistryStats};

/// A pending `resolve` call
struct Waiter {
    id: u64,
    tx: oneshot::Sender<Binding>,
}

/// State guarded by the registry lock
#[derive(Default)]
struct Inner {
    /// Audio SSRC to binding, in insertion order
    bindings: IndexMap<u32, Binding>,

    /// Pending resolutions keyed by participant id
    waiters: HashMap<String, Vec<Waiter>>,

    /// Change notification senders, in registration order
    subscribers: Vec<mpsc::UnboundedSender<RegistryEvent>>,

    next_waiter_id: u64,
}

impl Inner {
    fn find_participant(&self, participant_id: &str) -> Option<&Binding> {
        self.bindings
            .values()
            .find(|binding| binding.participant_id == participant_id)
    }

    fn register_waiter(&mut self, participant_id: &str) -> (u64, oneshot::Receiver<Binding>) {
        let (tx, rx) = oneshot::channel();
        let id = self.next_waiter_id;
        self.next_waiter_id += 1;

        self.waiters
            .entry(participant_id.to_string())
            .or_default()
            .push(Waiter { id, tx });

        (id, rx)
    }

    fn unregister_waiter(&mut self, participant_id: &str, id: u64) {
        if let Some(list) = self.waiters.get_mut(participant_id) {
            list.retain(|waiter| waiter.id != id);
            if list.is_empty() {
                self.waiters.remove(participant_id);
            }
        }
    }

    /// Complete every waiter for the binding's participant
    fn wake_waiters(&mut self, binding: &Binding) -> usize {
        let Some(list) = self.waiters.remove(&binding.participant_id) else {
            return 0;
        };

        let count = list.len();
        for waiter in list {
            // Receiver gone means the caller stopped waiting
            let _ = waiter.tx.send(binding.clone());
        }
        count
    }

    fn pending(&self) -> usize {
        self.waiters.values().map(Vec::len).sum()
    }

    /// Deliver an event to every live subscriber, dropping closed ones
    fn publish(&mut self, event: RegistryEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Unregisters a waiter when its `resolve` call finishes or is dropped
struct WaiterGuard<'a> {
    inner: &'a Mutex<Inner>,
    participant_id: &'a str,
    id: u64,
}

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        self.inner
            .lock()
            .unregister_waiter(self.participant_id, self.id);
    }
}

/// SSRC to participant registry for one session
///
/// Thread-safe via a `Mutex` that is never held across an await point.
/// Share it between the signaling task and media tasks with an `Arc`.
pub struct StreamIdentityRegistry {
    /// Bindings, pending resolutions and subscribers
    inner: Mutex<Inner>,

    /// Activity counters
    counters: RegistryCounters,

    /// Configuration
    config: RegistryConfig,
}

impl StreamIdentityRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            counters: RegistryCounters::default(),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Subscribe to change notifications
    ///
    /// Only events published after this call are delivered. Delivery is
    /// lossless: events queue up until the receiver reads them. Dropping
    /// the receiver unsubscribes.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<RegistryEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().subscribers.push(tx);
        rx
    }

    /// Number of subscribers still holding their receiver
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.subscribers.retain(|tx| !tx.is_closed());
        inner.subscribers.len()
    }

    /// Create or merge a binding
    ///
    /// On first sight of an SSRC, pending resolutions for the participant
    /// are completed and a `Created` event is published, followed by an
    /// `Updated` event with no previous binding. Subsequent calls publish
    /// only `Updated`. Returns the stored binding.
    pub fn update(&self, update: BindingUpdate) -> Result<Binding, RegistryError> {
        let mut inner = self.inner.lock();

        let previous = inner.bindings.get(&update.audio_ssrc).cloned();
        let current = match previous {
            Some(ref existing) => existing.merge(&update),
            None => match Binding::from_update(&update) {
                Some(binding) => binding,
                None => {
                    tracing::warn!(
                        ssrc = update.audio_ssrc,
                        "Rejected new binding without participant id"
                    );
                    return Err(RegistryError::IncompleteBinding(update.audio_ssrc));
                }
            },
        };

        inner.bindings.insert(current.audio_ssrc, current.clone());

        if previous.is_none() {
            RegistryCounters::incr(&self.counters.created);
            let woken = inner.wake_waiters(&current);

            tracing::info!(
                ssrc = current.audio_ssrc,
                participant = %current.participant_id,
                video_ssrc = ?current.video_ssrc,
                waiters = woken,
                "Binding created"
            );

            inner.publish(RegistryEvent::Created(current.clone()));
        } else {
            tracing::debug!(
                ssrc = current.audio_ssrc,
                participant = %current.participant_id,
                video_ssrc = ?current.video_ssrc,
                "Binding updated"
            );
        }

        RegistryCounters::incr(&self.counters.updated);
        inner.publish(RegistryEvent::Updated {
            previous,
            current: current.clone(),
        });

        Ok(current)
    }

    /// Look a binding up by SSRC or participant id
    pub fn get(&self, key: impl Into<LookupKey>) -> Option<Binding> {
        match key.into() {
            LookupKey::Ssrc(ssrc) => self.get_by_ssrc(ssrc),
            LookupKey::Participant(id) => self.get_by_participant(&id),
        }
    }

    /// Look a binding up by audio SSRC
    pub fn get_by_ssrc(&self, ssrc: u32) -> Option<Binding> {
        self.inner.lock().bindings.get(&ssrc).cloned()
    }

    /// Look a binding up by participant id
    ///
    /// If the participant has several bindings, the oldest one wins.
    pub fn get_by_participant(&self, participant_id: &str) -> Option<Binding> {
        self.inner.lock().find_participant(participant_id).cloned()
    }

    /// Find the binding owning a media SSRC, audio or video
    ///
    /// Used by video decoders, whose packets carry the video SSRC.
    pub fn get_by_media_ssrc(&self, ssrc: u32) -> Option<Binding> {
        let inner = self.inner.lock();

        if let Some(binding) = inner.bindings.get(&ssrc) {
            return Some(binding.clone());
        }

        inner
            .bindings
            .values()
            .find(|binding| binding.owns_ssrc(ssrc))
            .cloned()
    }

    /// Remove a binding by SSRC or participant id
    pub fn delete(&self, key: impl Into<LookupKey>) -> Option<Binding> {
        match key.into() {
            LookupKey::Ssrc(ssrc) => self.delete_by_ssrc(ssrc),
            LookupKey::Participant(id) => self.delete_by_participant(&id),
        }
    }

    /// Remove the binding for an audio SSRC
    pub fn delete_by_ssrc(&self, ssrc: u32) -> Option<Binding> {
        let mut inner = self.inner.lock();
        let removed = inner.bindings.shift_remove(&ssrc)?;
        self.on_deleted(&mut inner, &removed);
        Some(removed)
    }

    /// Remove the first binding for a participant
    pub fn delete_by_participant(&self, participant_id: &str) -> Option<Binding> {
        let mut inner = self.inner.lock();
        let ssrc = inner.find_participant(participant_id)?.audio_ssrc;
        let removed = inner.bindings.shift_remove(&ssrc)?;
        self.on_deleted(&mut inner, &removed);
        Some(removed)
    }

    /// Remove every binding and cancel pending resolutions
    ///
    /// Called when the session ends. Publishes `Deleted` for each binding.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();

        let cancelled = inner.pending();
        // Dropping the senders fails the pending resolutions
        inner.waiters.clear();

        let removed: Vec<Binding> = inner.bindings.drain(..).map(|(_, b)| b).collect();
        for binding in &removed {
            self.on_deleted(&mut inner, binding);
        }

        tracing::info!(
            bindings = removed.len(),
            waiters = cancelled,
            "Registry cleared"
        );

        removed.len()
    }

    /// Wait for a participant's binding to become known
    ///
    /// Returns immediately if the participant already has a binding.
    /// Otherwise waits for a binding to be created for it. Only creations
    /// are observed: an existing binding that is later reassigned to this
    /// participant does not complete the wait. With no deadline the wait
    /// may never finish.
    pub async fn resolve(
        &self,
        participant_id: &str,
        deadline: Option<Duration>,
    ) -> Result<Binding, RegistryError> {
        let (id, rx) = {
            let mut inner = self.inner.lock();

            if let Some(binding) = inner.find_participant(participant_id) {
                RegistryCounters::incr(&self.counters.resolved);
                return Ok(binding.clone());
            }

            let (id, rx) = inner.register_waiter(participant_id);
            tracing::debug!(
                participant = %participant_id,
                deadline = ?deadline,
                waiters = inner.pending(),
                "Waiting for binding"
            );
            (id, rx)
        };

        let _guard = WaiterGuard {
            inner: &self.inner,
            participant_id,
            id,
        };

        let received = match deadline {
            Some(deadline) => match tokio::time::timeout(deadline, rx).await {
                Ok(received) => received,
                Err(_) => {
                    RegistryCounters::incr(&self.counters.timed_out);
                    tracing::warn!(
                        participant = %participant_id,
                        deadline = ?deadline,
                        "Binding resolution timed out"
                    );
                    return Err(RegistryError::ResolutionTimeout {
                        participant_id: participant_id.to_string(),
                        deadline,
                    });
                }
            },
            None => rx.await,
        };

        match received {
            Ok(binding) => {
                RegistryCounters::incr(&self.counters.resolved);
                tracing::debug!(
                    participant = %participant_id,
                    ssrc = binding.audio_ssrc,
                    "Binding resolved"
                );
                Ok(binding)
            }
            Err(_) => Err(RegistryError::Cancelled {
                participant_id: participant_id.to_string(),
            }),
        }
    }

    /// Resolve using the configured default deadline
    pub async fn resolve_default(&self, participant_id: &str) -> Result<Binding, RegistryError> {
        self.resolve(participant_id, self.config.resolve_timeout)
            .await
    }

    /// Snapshot of all bindings in insertion order
    pub fn bindings(&self) -> Vec<Binding> {
        self.inner.lock().bindings.values().cloned().collect()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.inner.lock().bindings.len()
    }

    /// Check if the registry holds no bindings
    pub fn is_empty(&self) -> bool {
        self.inner.lock().bindings.is_empty()
    }

    /// Number of `resolve` calls currently waiting
    pub fn pending_resolutions(&self) -> usize {
        self.inner.lock().pending()
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        self.counters.snapshot(self.len())
    }

    fn on_deleted(&self, inner: &mut Inner, removed: &Binding) {
        RegistryCounters::incr(&self.counters.deleted);
        tracing::info!(
            ssrc = removed.audio_ssrc,
            participant = %removed.participant_id,
            "Binding deleted"
        );
        inner.publish(RegistryEvent::Deleted(removed.clone()));
    }
}

impl Default for StreamIdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
