/// Replays allowed per listening challenge before playback locks.
pub const MAX_REPLAYS: u32 = 5;

/// Selectable playback rates, slowest first.
pub const PLAYBACK_SPEEDS: [f32; 4] = [0.5, 0.75, 1.0, 1.25];

const DEFAULT_SPEED_INDEX: usize = 2;

/// Tracks reference-audio plays and the chosen speed for one challenge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayCounter {
    plays: u32,
    cap: Option<u32>,
    speed_index: usize,
}

impl ReplayCounter {
    /// Counter locked after `MAX_REPLAYS` plays.
    #[must_use]
    pub fn capped() -> Self {
        Self {
            plays: 0,
            cap: Some(MAX_REPLAYS),
            speed_index: DEFAULT_SPEED_INDEX,
        }
    }

    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            cap: None,
            ..Self::capped()
        }
    }

    #[must_use]
    pub fn plays(&self) -> u32 {
        self.plays
    }

    /// Plays left before the lock, `None` when unlimited.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        self.cap.map(|cap| cap.saturating_sub(self.plays))
    }

    #[must_use]
    pub fn can_play(&self) -> bool {
        self.remaining() != Some(0)
    }

    /// Counts a play and returns the rate to play at, or `None` once locked.
    pub fn register_play(&mut self) -> Option<f32> {
        if !self.can_play() {
            return None;
        }
        self.plays += 1;
        Some(self.speed())
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        PLAYBACK_SPEEDS[self.speed_index]
    }

    /// Picks a speed by index into `PLAYBACK_SPEEDS`, clamping out-of-range values.
    pub fn set_speed_index(&mut self, index: usize) {
        self.speed_index = index.min(PLAYBACK_SPEEDS.len() - 1);
    }

    #[must_use]
    pub fn speed_index(&self) -> usize {
        self.speed_index
    }
}
