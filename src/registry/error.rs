//! Registry error types
//!
//! Lookups that find nothing return `None`; only the cases below are errors.

use std::time::Duration;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No binding for the participant appeared before the deadline
    ResolutionTimeout {
        participant_id: String,
        deadline: Duration,
    },
    /// Update names an unseen SSRC but carries no participant id
    IncompleteBinding(u32),
    /// Pending resolution cancelled by `clear`
    Cancelled { participant_id: String },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::ResolutionTimeout {
                participant_id,
                deadline,
            } => write!(
                f,
                "No SSRC binding for participant {} within {}ms",
                participant_id,
                deadline.as_millis()
            ),
            RegistryError::IncompleteBinding(ssrc) => {
                write!(f, "New binding for SSRC {} has no participant id", ssrc)
            }
            RegistryError::Cancelled { participant_id } => write!(
                f,
                "Resolution of participant {} cancelled",
                participant_id
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_participant_and_bound() {
        let err = RegistryError::ResolutionTimeout {
            participant_id: "P".into(),
            deadline: Duration::from_millis(50),
        };

        let msg = err.to_string();
        assert!(msg.contains("P"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn test_incomplete_binding_message() {
        let err = RegistryError::IncompleteBinding(42);
        assert_eq!(err.to_string(), "New binding for SSRC 42 has no participant id");
    }
}
