use crate::error::ViewerError;
use serde::{Deserialize, Serialize};

/// Client hydration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HydrationState {
    /// Inert server-rendered output; no interaction possible
    #[default]
    ServerRendered,
    /// Mounted on the client; interactive
    Hydrated,
}

/// Validates a hydration transition.
///
/// The only legal transition is `ServerRendered -> Hydrated`.
pub fn validate_transition(from: HydrationState, to: HydrationState) -> Result<(), ViewerError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(ViewerError::IllegalTransition { from, to })
    }
}

pub fn allowed_transitions(from: HydrationState) -> Vec<HydrationState> {
    use HydrationState::*;
    match from {
        ServerRendered => vec![Hydrated],
        Hydrated => vec![],
    }
}

/// One-shot gate between server-rendered and interactive output
#[derive(Debug, Clone, Copy, Default)]
pub struct HydrationGate {
    state: HydrationState,
}

impl HydrationGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> HydrationState {
        self.state
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.state == HydrationState::Hydrated
    }

    /// Mount: transition to `Hydrated`. Returns `false` if already mounted.
    pub fn mount(&mut self) -> bool {
        match validate_transition(self.state, HydrationState::Hydrated) {
            Ok(()) => {
                tracing::debug!("hydrated");
                self.state = HydrationState::Hydrated;
                true
            }
            Err(_) => false,
        }
    }

    /// Guard for interactions
    pub fn ensure_hydrated(&self) -> Result<(), ViewerError> {
        if self.is_hydrated() {
            Ok(())
        } else {
            Err(ViewerError::NotHydrated)
        }
    }
}
