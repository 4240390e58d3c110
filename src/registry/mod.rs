//! SSRC identity registry
//!
//! The registry correlates RTP SSRCs with participant identities for one
//! session. Identity announcements arrive on the signaling channel while
//! media packets only carry an SSRC, so either side may show up first.
//!
//! # Architecture
//!
//! ```text
//!                    Arc<StreamIdentityRegistry>
//!               ┌───────────────────────────────────┐
//!  signaling    │ bindings: IndexMap<Ssrc, Binding> │    packet decoders
//!  update() ───►│ waiters:  HashMap<Id, [oneshot]>  │◄── get() / resolve()
//!               │ subscribers: [mpsc::Unbounded]    │
//!               └─────────────────┬─────────────────┘
//!                                 │
//!              ┌──────────────────┼──────────────────┐
//!              ▼                  ▼                  ▼
//!        [resolve waiter]   [subscriber]       [subscriber]
//!        oneshot (Created)  Created/Updated/   speaking tracker
//!                           Deleted
//! ```
//!
//! # Resolution
//!
//! `resolve` checks for an existing binding and registers its waiter under
//! the same lock that `update` takes, so a binding created concurrently is
//! either seen by the fast path or delivered to the waiter. The waiter and
//! the deadline race inside `tokio::time::timeout`; whichever completes
//! first drops the other, and the waiter is unregistered on every exit path.

pub mod binding;
pub mod config;
pub mod error;
pub mod event;
pub mod store;

pub use binding::{Binding, BindingUpdate, LookupKey};
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use event::{EventKind, RegistryEvent};
pub use store::StreamIdentityRegistry;
