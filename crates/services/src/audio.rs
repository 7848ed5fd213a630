//! Scoped reference-audio playback.
//!
//! A challenge view holds an [`AudioLease`] for as long as it is mounted.
//! Acquiring a lease stops whatever the previous holder was playing, and
//! dropping a lease stops its own playback, so at most one clip plays.

use std::sync::{Arc, Mutex, PoisonError};

/// Platform side of audio playback.
pub trait AudioSink: Send + Sync {
    /// Starts `src` at `rate` on behalf of lease `lease`.
    fn play(&self, lease: u64, src: &str, rate: f32);

    /// Stops whatever lease `lease` is playing.
    fn stop(&self, lease: u64);
}

/// Sink that plays nothing; used headless and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudioSink;

impl AudioSink for SilentAudioSink {
    fn play(&self, _lease: u64, _src: &str, _rate: f32) {}

    fn stop(&self, _lease: u64) {}
}

#[derive(Debug, Default)]
struct Slots {
    next: u64,
    active: Option<u64>,
}

#[derive(Clone)]
pub struct AudioSession {
    sink: Arc<dyn AudioSink>,
    slots: Arc<Mutex<Slots>>,
}

impl AudioSession {
    #[must_use]
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self {
            sink,
            slots: Arc::new(Mutex::new(Slots::default())),
        }
    }

    #[must_use]
    pub fn silent() -> Self {
        Self::new(Arc::new(SilentAudioSink))
    }

    /// Takes over playback, stopping the previous lease holder.
    #[must_use]
    pub fn acquire(&self) -> AudioLease {
        let (id, previous) = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.next += 1;
            let id = slots.next;
            (id, slots.active.replace(id))
        };
        if let Some(previous) = previous {
            self.sink.stop(previous);
        }
        AudioLease {
            id,
            session: self.clone(),
        }
    }

    /// Id of the lease currently allowed to play.
    #[must_use]
    pub fn active(&self) -> Option<u64> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
    }
}

/// Right to play reference audio until dropped or superseded.
pub struct AudioLease {
    id: u64,
    session: AudioSession,
}

impl AudioLease {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.active() == Some(self.id)
    }

    /// Plays `src` unless a newer lease took over. Returns whether it played.
    pub fn play(&self, src: &str, rate: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.session.sink.play(self.id, src, rate);
        true
    }

    pub fn stop(&self) {
        self.session.sink.stop(self.id);
    }
}

impl Drop for AudioLease {
    fn drop(&mut self) {
        let was_active = {
            let mut slots = self
                .session
                .slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if slots.active == Some(self.id) {
                slots.active = None;
                true
            } else {
                false
            }
        };
        if was_active {
            self.session.sink.stop(self.id);
        }
    }
}
