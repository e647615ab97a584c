//! Play mode policy for next/previous selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Play mode used when nothing has been persisted yet
pub const DEFAULT_PLAY_MODE: PlayMode = PlayMode::Sequence;

/// Policy governing next/previous track selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    /// Walk the playlist in order and stop at the end
    #[default]
    Sequence,

    /// Repeat the current track
    Loop,

    /// Pick a random track other than the current one
    Random,
}

impl PlayMode {
    /// All modes in cycling order
    pub const ALL: [PlayMode; 3] = [PlayMode::Sequence, PlayMode::Loop, PlayMode::Random];

    /// The mode that follows this one when cycling
    pub fn next(self) -> Self {
        match self {
            PlayMode::Sequence => PlayMode::Loop,
            PlayMode::Loop => PlayMode::Random,
            PlayMode::Random => PlayMode::Sequence,
        }
    }

    /// Wire / storage name
    pub fn as_str(self) -> &'static str {
        match self {
            PlayMode::Sequence => "sequence",
            PlayMode::Loop => "loop",
            PlayMode::Random => "random",
        }
    }

    /// Human readable label for player controls
    pub fn label(self) -> &'static str {
        match self {
            PlayMode::Sequence => "Sequential",
            PlayMode::Loop => "Repeat one",
            PlayMode::Random => "Shuffle",
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequence" => Ok(PlayMode::Sequence),
            "loop" => Ok(PlayMode::Loop),
            "random" => Ok(PlayMode::Random),
            other => Err(format!("unknown play mode: {other}")),
        }
    }
}
