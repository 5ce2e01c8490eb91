use crate::error::WidgetError;
use parking_lot::RwLock;
use std::sync::Arc;

/// The turn-taking mutual-exclusion state.
///
/// Exactly one value holds at any time. `Processing` acts as a software lock:
/// while a captured utterance is being transcribed, answered and spoken, no
/// new capture may begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Idle, VAD armed, waiting for speech.
    Listening,
    /// An active recording session is accumulating chunks.
    Capturing,
    /// A finalized session is in flight through the round-trip pipeline.
    Processing,
}

/// Validated holder of the current [`TurnState`].
///
/// Shared between the recorder (which drives capture transitions) and the
/// coordinator (which drives the processing transitions). Cloning shares the
/// underlying state.
#[derive(Clone)]
pub struct TurnGate {
    state: Arc<RwLock<TurnState>>,
}

impl Default for TurnGate {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnGate {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(TurnState::Listening)),
        }
    }

    /// Apply a transition, rejecting anything outside the turn-taking table.
    pub fn transition(&self, new_state: TurnState) -> Result<(), WidgetError> {
        let mut current = self.state.write();

        let valid = matches!(
            (*current, new_state),
            (TurnState::Listening, TurnState::Capturing)
                | (TurnState::Capturing, TurnState::Processing)
                | (TurnState::Capturing, TurnState::Listening)
                | (TurnState::Processing, TurnState::Listening)
        );

        if !valid {
            return Err(WidgetError::Transition(format!(
                "{:?} -> {:?}",
                *current, new_state
            )));
        }

        tracing::debug!("Turn transition: {:?} -> {:?}", *current, new_state);
        *current = new_state;
        Ok(())
    }

    pub fn current(&self) -> TurnState {
        *self.state.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_listening() {
        let gate = TurnGate::new();
        assert_eq!(gate.current(), TurnState::Listening);
    }

    #[test]
    fn full_turn_cycle_is_valid() {
        let gate = TurnGate::new();
        gate.transition(TurnState::Capturing).unwrap();
        gate.transition(TurnState::Processing).unwrap();
        gate.transition(TurnState::Listening).unwrap();
        assert_eq!(gate.current(), TurnState::Listening);
    }

    #[test]
    fn empty_capture_returns_straight_to_listening() {
        let gate = TurnGate::new();
        gate.transition(TurnState::Capturing).unwrap();
        gate.transition(TurnState::Listening).unwrap();
        assert_eq!(gate.current(), TurnState::Listening);
    }

    #[test]
    fn capture_cannot_start_while_processing() {
        let gate = TurnGate::new();
        gate.transition(TurnState::Capturing).unwrap();
        gate.transition(TurnState::Processing).unwrap();

        let err = gate.transition(TurnState::Capturing);
        assert!(err.is_err());
        assert_eq!(gate.current(), TurnState::Processing);
    }

    #[test]
    fn listening_cannot_jump_to_processing() {
        let gate = TurnGate::new();
        assert!(gate.transition(TurnState::Processing).is_err());
    }

    #[test]
    fn clones_share_the_underlying_state() {
        let gate = TurnGate::new();
        let observer = gate.clone();

        gate.transition(TurnState::Capturing).unwrap();
        assert_eq!(observer.current(), TurnState::Capturing);

        gate.transition(TurnState::Processing).unwrap();
        assert_eq!(observer.current(), TurnState::Processing);
    }
}
