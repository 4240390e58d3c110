//! # ssrc-registry
//!
//! Correlates RTP synchronization sources (SSRCs) with the participants that
//! own them.
//!
//! Media packets only carry an SSRC. The identity of the sender arrives
//! separately, over the session's signaling channel, and may show up before
//! or after the first packet. [`StreamIdentityRegistry`] holds the mapping
//! for one session and lets packet decoders either look a sender up right
//! away or wait for the binding to be announced.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use ssrc_registry::{BindingUpdate, StreamIdentityRegistry};
//!
//! # async fn run() -> Result<(), ssrc_registry::RegistryError> {
//! let registry = StreamIdentityRegistry::new();
//!
//! // Signaling layer
//! registry.update(BindingUpdate::new(1001, "alice").with_video(1002))?;
//!
//! // Packet decoder
//! let _sender = registry.get_by_ssrc(1001);
//! let _bob = registry.resolve("bob", Some(Duration::from_secs(5))).await;
//! # Ok(())
//! # }
//! ```

pub mod registry;
pub mod stats;

pub use registry::{
    Binding, BindingUpdate, LookupKey, RegistryConfig, RegistryError, RegistryEvent,
    StreamIdentityRegistry,
};
pub use stats::RegistryStats;
