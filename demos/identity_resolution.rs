//! Identity resolution example
//!
//! Run with: cargo run --example identity_resolution
//!
//! Simulates one voice session:
//!
//! - A signaling task announces participants a little after their first
//!   packets arrive, then one of them turns on video and another leaves.
//! - A packet decoder receives audio packets tagged only with an SSRC and
//!   waits for the sender's identity when it is not known yet.
//! - A speaking tracker subscribes to change notifications.
//!
//! Set `RUST_LOG=ssrc_registry=debug` to see every registry operation.

use std::sync::Arc;
use std::time::Duration;

use ssrc_registry::{BindingUpdate, RegistryConfig, RegistryEvent, StreamIdentityRegistry};

/// Participants announced by the signaling task: (audio SSRC, id, delay)
const ANNOUNCEMENTS: &[(u32, &str, u64)] = &[
    (1001, "alice", 20),
    (2002, "bob", 80),
    (3003, "carol", 400),
];

fn announce(registry: &StreamIdentityRegistry, update: BindingUpdate) {
    if let Err(e) = registry.update(update) {
        eprintln!("Signaling error: {}", e);
    }
}

async fn signaling(registry: Arc<StreamIdentityRegistry>) {
    for &(ssrc, participant, delay_ms) in ANNOUNCEMENTS {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        announce(&registry, BindingUpdate::new(ssrc, participant));
    }

    // alice turns on her camera
    tokio::time::sleep(Duration::from_millis(50)).await;
    announce(&registry, BindingUpdate::patch(1001).with_video(1011));

    // bob leaves
    tokio::time::sleep(Duration::from_millis(50)).await;
    registry.delete("bob");
}

async fn speaking_tracker(registry: Arc<StreamIdentityRegistry>) {
    let mut rx = registry.subscribe();

    while let Some(event) = rx.recv().await {
        match event {
            RegistryEvent::Created(binding) => println!("[tracker] joined: {}", binding),
            RegistryEvent::Updated {
                previous: Some(previous),
                current,
            } if previous != current => println!("[tracker] changed: {}", current),
            RegistryEvent::Deleted(binding) => println!("[tracker] left: {}", binding),
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ssrc_registry=info".parse()?)
                .add_directive("identity_resolution=info".parse()?),
        )
        .init();

    let config = RegistryConfig::default().resolve_timeout(Duration::from_millis(250));
    let registry = Arc::new(StreamIdentityRegistry::with_config(config));

    let tracker = tokio::spawn(speaking_tracker(Arc::clone(&registry)));
    tokio::task::yield_now().await;
    let announcer = tokio::spawn(signaling(Arc::clone(&registry)));

    // Packet decoder: first packets arrive before the announcements
    for (ssrc, participant) in [(1001, "alice"), (2002, "bob"), (3003, "carol")] {
        match registry.get_by_ssrc(ssrc) {
            Some(binding) => println!("[decoder] ssrc {} -> {}", ssrc, binding.participant_id),
            None => match registry.resolve_default(participant).await {
                Ok(binding) => println!(
                    "[decoder] ssrc {} resolved to {}",
                    ssrc, binding.participant_id
                ),
                Err(e) => println!("[decoder] dropping packets from ssrc {}: {}", ssrc, e),
            },
        }
    }

    announcer.await?;

    for binding in registry.bindings() {
        println!("Bound: {}", binding);
    }
    println!("Stats: {:?}", registry.stats());

    registry.clear();
    tracker.abort();

    Ok(())
}
