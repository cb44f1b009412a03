use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Processing state of one peer session.
///
/// State transitions:
/// ```text
///   AwaitingConsent
///    ├── consent ─────────► ResolvingPasscode
///    │                        │
///    │                        └── passcode ─┐
///    ├── passcode (cached) ─────────────────┴─► Commissioning
///    │                                            ├── success ─► Succeeded
///    │                                            └── failure ─► Failed
///    └── decline ─────────► Declined
/// ```
///
/// `Commissioning`, `Declined`, `Succeeded` and `Failed` are terminal for the
/// negotiation: no further consent or passcode step is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionProcessingState {
    /// Operator has been asked for yes/no consent.
    #[default]
    AwaitingConsent,

    /// Consent given, looking for a passcode.
    ResolvingPasscode,

    /// Passcode handed to the commissioning engine.
    Commissioning,

    /// Operator declined.
    Declined,

    /// Commissioning engine reported success.
    Succeeded,

    /// Commissioning engine reported failure.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid session transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: SessionProcessingState,
    pub to: SessionProcessingState,
}

impl SessionProcessingState {
    /// Central transition table.
    pub fn can_transition_to(self, next: SessionProcessingState) -> bool {
        use SessionProcessingState::*;
        matches!(
            (self, next),
            (AwaitingConsent, ResolvingPasscode)
                | (AwaitingConsent, Commissioning)
                | (AwaitingConsent, Declined)
                | (ResolvingPasscode, Commissioning)
                | (Commissioning, Succeeded)
                | (Commissioning, Failed)
        )
    }

    pub fn transition(self, next: SessionProcessingState) -> Result<Self, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }

    /// Consent (yes or no) can only be given while the prompt is up.
    pub fn accepts_consent(self) -> bool {
        matches!(self, SessionProcessingState::AwaitingConsent)
    }

    /// Passcode lookup completions are only meaningful while resolving.
    pub fn accepts_passcode_results(self) -> bool {
        matches!(self, SessionProcessingState::ResolvingPasscode)
    }

    /// A passcode can be handed off before or during resolution.
    pub fn accepts_handoff(self) -> bool {
        matches!(
            self,
            SessionProcessingState::AwaitingConsent | SessionProcessingState::ResolvingPasscode
        )
    }

    pub fn is_terminal(self) -> bool {
        !self.accepts_handoff()
    }
}

impl fmt::Display for SessionProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionProcessingState::AwaitingConsent => "awaiting_consent",
            SessionProcessingState::ResolvingPasscode => "resolving_passcode",
            SessionProcessingState::Commissioning => "commissioning",
            SessionProcessingState::Declined => "declined",
            SessionProcessingState::Succeeded => "succeeded",
            SessionProcessingState::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionProcessingState::*;
    use super::*;

    const ALL: [SessionProcessingState; 6] = [
        AwaitingConsent,
        ResolvingPasscode,
        Commissioning,
        Declined,
        Succeeded,
        Failed,
    ];

    #[test]
    fn default_state_is_awaiting_consent() {
        assert_eq!(SessionProcessingState::default(), AwaitingConsent);
    }

    #[test]
    fn transition_table_matches_negotiation_flow() {
        let allowed = [
            (AwaitingConsent, ResolvingPasscode),
            (AwaitingConsent, Commissioning),
            (AwaitingConsent, Declined),
            (ResolvingPasscode, Commissioning),
            (Commissioning, Succeeded),
            (Commissioning, Failed),
        ];
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn rejected_transition_reports_both_ends() {
        let err = Declined.transition(Commissioning).unwrap_err();
        assert_eq!(
            err,
            TransitionError {
                from: Declined,
                to: Commissioning
            }
        );
        assert_eq!(
            err.to_string(),
            "invalid session transition: declined -> commissioning"
        );
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for state in [Commissioning, Declined, Succeeded, Failed] {
            assert!(state.is_terminal());
            assert!(!state.accepts_consent());
            assert!(!state.accepts_passcode_results());
        }
        assert!(ResolvingPasscode.accepts_handoff());
        assert!(!ResolvingPasscode.accepts_consent());
    }
}
