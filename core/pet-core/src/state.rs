//! Pet states and the timing constants that drive them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::PetError;

/// Silence after the last accepted event before the pet falls asleep.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(300); // 5 minutes

/// How long transient states are shown before returning to idle.
pub const AUTO_RETURN_DELAY: Duration = Duration::from_secs(3);

/// How often the watcher checks the event file's modification time.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// All mutually exclusive states of the pet.
///
/// `Sleeping` is only ever entered through the idle timeout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PetState {
    #[default]
    Idle,
    Thinking,
    Working,
    Happy,
    Sad,
    Celebrating,
    Sleeping,
}

impl PetState {
    pub const ALL: [PetState; 7] = [
        PetState::Idle,
        PetState::Thinking,
        PetState::Working,
        PetState::Happy,
        PetState::Sad,
        PetState::Celebrating,
        PetState::Sleeping,
    ];

    /// Raw value used as the key in persisted resource bindings.
    pub fn as_str(&self) -> &'static str {
        match self {
            PetState::Idle => "idle",
            PetState::Thinking => "thinking",
            PetState::Working => "working",
            PetState::Happy => "happy",
            PetState::Sad => "sad",
            PetState::Celebrating => "celebrating",
            PetState::Sleeping => "sleeping",
        }
    }

    /// Delay after which this state falls back to `Idle`, if it is transient.
    pub fn auto_return_delay(&self) -> Option<Duration> {
        match self {
            PetState::Happy | PetState::Sad | PetState::Celebrating => Some(AUTO_RETURN_DELAY),
            _ => None,
        }
    }
}

impl fmt::Display for PetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetState {
    type Err = PetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        PetState::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| PetError::UnknownState(s.to_string()))
    }
}
