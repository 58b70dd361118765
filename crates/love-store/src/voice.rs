//! Voice-phrase unlock gate.
//!
//! Speech recognition happens on the client; the gate only checks whether the
//! recognized transcript contains the project's secret phrase.

/// Checks transcripts against a secret phrase.
#[derive(Debug, Clone)]
pub struct VoiceGate {
    phrase: String,
}

/// Result of one recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceAttempt {
    Granted,
    Denied { heard: String },
}

impl VoiceGate {
    pub fn new(phrase: &str) -> Self {
        Self {
            phrase: phrase.trim().to_lowercase(),
        }
    }

    /// Whether the transcript contains the phrase, ignoring case and
    /// surrounding whitespace. An empty phrase never matches.
    pub fn matches(&self, transcript: &str) -> bool {
        if self.phrase.is_empty() {
            return false;
        }
        transcript.trim().to_lowercase().contains(&self.phrase)
    }

    pub fn attempt(&self, transcript: &str) -> VoiceAttempt {
        if self.matches(transcript) {
            log::debug!("Voice phrase matched");
            VoiceAttempt::Granted
        } else {
            VoiceAttempt::Denied {
                heard: transcript.trim().to_lowercase(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_containing_transcript() {
        let gate = VoiceGate::new("  Forever ");
        assert!(gate.matches("forever"));
        assert!(gate.matches("I love you FOREVER and always"));
        assert!(!gate.matches("for ever"));
    }

    #[test]
    fn test_empty_phrase_never_matches() {
        let gate = VoiceGate::new("   ");
        assert!(!gate.matches(""));
        assert!(!gate.matches("anything"));
    }

    #[test]
    fn test_attempt_reports_what_was_heard() {
        let gate = VoiceGate::new("sunshine");
        assert_eq!(gate.attempt("My Sunshine"), VoiceAttempt::Granted);
        assert_eq!(
            gate.attempt(" Moonlight "),
            VoiceAttempt::Denied {
                heard: "moonlight".to_string()
            }
        );
    }
}
