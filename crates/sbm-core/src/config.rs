//! Configuration for a new run.

use crate::run::GameMode;

/// Settings chosen when a run starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Rule variant for the run.
    pub mode: GameMode,
    /// Whether the player picks the track type instead of rolling for it.
    pub manual_track_type: bool,
    /// RNG seed for reproducible rolls. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,
            manual_track_type: false,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Set the game mode.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Choose track types by hand.
    pub fn with_manual_track_type(mut self, manual: bool) -> Self {
        self.manual_track_type = manual;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The seed to use, drawing a random one when none was configured.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
