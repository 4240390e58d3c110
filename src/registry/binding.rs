//! Binding types for the identity registry
//!
//! This module defines the record that ties a participant to its streams,
//! the partial update the signaling layer submits, and the key used to look
//! bindings up.

/// A participant's known stream ownership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// SSRC of the participant's audio stream (primary key)
    pub audio_ssrc: u32,
    /// SSRC of the participant's video stream, never `Some(0)`
    pub video_ssrc: Option<u32>,
    /// Opaque participant identity
    pub participant_id: String,
}

impl Binding {
    /// Create a binding without a video stream
    pub fn new(audio_ssrc: u32, participant_id: impl Into<String>) -> Self {
        Self {
            audio_ssrc,
            video_ssrc: None,
            participant_id: participant_id.into(),
        }
    }

    /// Merge a partial update for the same audio SSRC into this binding
    ///
    /// Fields present in `update` override, absent fields are preserved.
    /// A video SSRC of 0 clears the video stream.
    pub(super) fn merge(&self, update: &BindingUpdate) -> Binding {
        debug_assert_eq!(self.audio_ssrc, update.audio_ssrc);

        let participant_id = match update.participant_id {
            Some(ref id) => id.clone(),
            None => self.participant_id.clone(),
        };

        let video_ssrc = match update.video_ssrc {
            Some(0) => None,
            Some(ssrc) => Some(ssrc),
            None => self.video_ssrc,
        };

        Binding {
            audio_ssrc: self.audio_ssrc,
            video_ssrc,
            participant_id,
        }
    }

    /// Build a fresh binding from an update naming an unseen SSRC
    ///
    /// Returns `None` if the update carries no participant id.
    pub(super) fn from_update(update: &BindingUpdate) -> Option<Binding> {
        let participant_id = update.participant_id.clone()?;
        Some(Binding {
            audio_ssrc: update.audio_ssrc,
            video_ssrc: update.video_ssrc.filter(|&ssrc| ssrc != 0),
            participant_id,
        })
    }

    /// Check whether this binding owns the given SSRC (audio or video)
    pub fn owns_ssrc(&self, ssrc: u32) -> bool {
        self.audio_ssrc == ssrc || (ssrc != 0 && self.video_ssrc == Some(ssrc))
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.video_ssrc {
            Some(video) => write!(
                f,
                "{} (audio={}, video={})",
                self.participant_id, self.audio_ssrc, video
            ),
            None => write!(f, "{} (audio={})", self.participant_id, self.audio_ssrc),
        }
    }
}

/// Partial binding data submitted by the signaling layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingUpdate {
    /// SSRC of the audio stream, identifies the binding to create or merge
    pub audio_ssrc: u32,
    /// Participant identity, required when the SSRC is new
    pub participant_id: Option<String>,
    /// Video SSRC; `Some(0)` means the participant stopped sending video
    pub video_ssrc: Option<u32>,
}

impl BindingUpdate {
    /// Create an update announcing a participant's audio stream
    pub fn new(audio_ssrc: u32, participant_id: impl Into<String>) -> Self {
        Self {
            audio_ssrc,
            participant_id: Some(participant_id.into()),
            video_ssrc: None,
        }
    }

    /// Create an update that only touches fields set afterwards
    pub fn patch(audio_ssrc: u32) -> Self {
        Self {
            audio_ssrc,
            participant_id: None,
            video_ssrc: None,
        }
    }

    /// Set the video SSRC
    pub fn with_video(mut self, ssrc: u32) -> Self {
        self.video_ssrc = Some(ssrc);
        self
    }

    /// Set the participant id
    pub fn with_participant(mut self, participant_id: impl Into<String>) -> Self {
        self.participant_id = Some(participant_id.into());
        self
    }
}

/// Key used to look a binding up
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    /// Audio SSRC, exact lookup
    Ssrc(u32),
    /// Participant id, first match in insertion order
    Participant(String),
}

impl From<u32> for LookupKey {
    fn from(ssrc: u32) -> Self {
        LookupKey::Ssrc(ssrc)
    }
}

impl From<&str> for LookupKey {
    fn from(participant_id: &str) -> Self {
        LookupKey::Participant(participant_id.to_string())
    }
}

impl From<String> for LookupKey {
    fn from(participant_id: String) -> Self {
        LookupKey::Participant(participant_id)
    }
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKey::Ssrc(ssrc) => write!(f, "ssrc:{}", ssrc),
            LookupKey::Participant(id) => write!(f, "participant:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_video_only_keeps_participant() {
        let binding = Binding::new(1, "u1");
        let merged = binding.merge(&BindingUpdate::patch(1).with_video(2));

        assert_eq!(merged.participant_id, "u1");
        assert_eq!(merged.video_ssrc, Some(2));
        assert_eq!(merged.audio_ssrc, 1);
    }

    #[test]
    fn test_merge_absent_video_preserved() {
        let binding = Binding::new(1, "u1").merge(&BindingUpdate::patch(1).with_video(2));
        let merged = binding.merge(&BindingUpdate::new(1, "u1"));

        assert_eq!(merged.video_ssrc, Some(2));
    }

    #[test]
    fn test_merge_zero_video_clears() {
        let binding = Binding::new(1, "u1").merge(&BindingUpdate::patch(1).with_video(2));
        let merged = binding.merge(&BindingUpdate::patch(1).with_video(0));

        assert_eq!(merged.video_ssrc, None);
    }

    #[test]
    fn test_merge_overrides_participant() {
        let binding = Binding::new(1, "u1");
        let merged = binding.merge(&BindingUpdate::new(1, "u2"));

        assert_eq!(merged.participant_id, "u2");
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_merge_rejects_other_ssrc() {
        Binding::new(1, "u1").merge(&BindingUpdate::new(2, "u2"));
    }

    #[test]
    fn test_from_update_requires_participant() {
        assert!(Binding::from_update(&BindingUpdate::patch(5)).is_none());

        let binding = Binding::from_update(&BindingUpdate::new(5, "p").with_video(0)).unwrap();
        assert_eq!(binding, Binding::new(5, "p"));
    }

    #[test]
    fn test_owns_ssrc() {
        let binding = Binding::new(10, "p").merge(&BindingUpdate::patch(10).with_video(11));

        assert!(binding.owns_ssrc(10));
        assert!(binding.owns_ssrc(11));
        assert!(!binding.owns_ssrc(12));
        assert!(!Binding::new(10, "p").owns_ssrc(0));
    }

    #[test]
    fn test_lookup_key_conversions() {
        assert_eq!(LookupKey::from(7u32), LookupKey::Ssrc(7));
        assert_eq!(LookupKey::from("p"), LookupKey::Participant("p".into()));
        assert_eq!(
            LookupKey::from(String::from("q")),
            LookupKey::Participant("q".into())
        );
        assert_eq!(LookupKey::Ssrc(7).to_string(), "ssrc:7");
    }

    #[test]
    fn test_display() {
        let binding = Binding::new(1, "u1");
        assert_eq!(binding.to_string(), "u1 (audio=1)");

        let binding = binding.merge(&BindingUpdate::patch(1).with_video(2));
        assert_eq!(binding.to_string(), "u1 (audio=1, video=2)");
    }
}
