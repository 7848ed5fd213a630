use crate::model::ids::CourseId;

/// Upper bound of the hearts counter.
pub const MAX_HEARTS: u32 = 5;

/// Points awarded by the backend for one correct challenge.
pub const POINTS_PER_CHALLENGE: u64 = 10;

//
// ─── USER PROGRESS ─────────────────────────────────────────────────────────────
//

/// Server-owned learner progress. The client only ever holds a cached copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProgress {
    hearts: u32,
    pub points: u64,
    pub active_course: Option<CourseId>,
    pub streak: u32,
}

impl UserProgress {
    /// Creates progress, clamping hearts into `0..=MAX_HEARTS`.
    #[must_use]
    pub fn new(hearts: u32, points: u64, active_course: Option<CourseId>, streak: u32) -> Self {
        Self {
            hearts: hearts.min(MAX_HEARTS),
            points,
            active_course,
            streak,
        }
    }

    #[must_use]
    pub fn hearts(&self) -> u32 {
        self.hearts
    }

    #[must_use]
    pub fn has_hearts(&self) -> bool {
        self.hearts > 0
    }

    #[must_use]
    pub fn hearts_full(&self) -> bool {
        self.hearts >= MAX_HEARTS
    }

    #[must_use]
    pub fn with_hearts(mut self, hearts: u32) -> Self {
        self.hearts = hearts.min(MAX_HEARTS);
        self
    }

    /// Applies a signed change, saturating at both bounds.
    #[must_use]
    pub fn apply(&self, delta: ProgressDelta) -> Self {
        let hearts = i64::from(self.hearts) + i64::from(delta.hearts);
        let hearts = u32::try_from(hearts.clamp(0, i64::from(MAX_HEARTS))).unwrap_or(0);
        let points = if delta.points >= 0 {
            self.points.saturating_add(delta.points.unsigned_abs())
        } else {
            self.points.saturating_sub(delta.points.unsigned_abs())
        };
        Self {
            hearts,
            points,
            ..self.clone()
        }
    }
}

/// Signed hearts/points change applied optimistically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressDelta {
    pub hearts: i32,
    pub points: i64,
}

impl ProgressDelta {
    #[must_use]
    pub fn hearts(hearts: i32) -> Self {
        Self { hearts, points: 0 }
    }

    #[must_use]
    pub fn points(points: i64) -> Self {
        Self { hearts: 0, points }
    }
}

//
// ─── PROGRESS CACHE ────────────────────────────────────────────────────────────
//

/// Client copy of `UserProgress` with optimistic updates.
///
/// The last server value is the source of truth: `reconcile` replaces the
/// optimistic value, `rollback` restores the server value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressCache {
    confirmed: UserProgress,
    optimistic: Option<UserProgress>,
}

impl ProgressCache {
    #[must_use]
    pub fn new(server: UserProgress) -> Self {
        Self {
            confirmed: server,
            optimistic: None,
        }
    }

    /// Value to display: the optimistic one while a change is unconfirmed.
    #[must_use]
    pub fn current(&self) -> &UserProgress {
        self.optimistic.as_ref().unwrap_or(&self.confirmed)
    }

    #[must_use]
    pub fn confirmed(&self) -> &UserProgress {
        &self.confirmed
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.optimistic.is_some()
    }

    /// Stacks `delta` on top of the currently displayed value.
    pub fn apply_optimistic(&mut self, delta: ProgressDelta) -> &UserProgress {
        let next = self.current().apply(delta);
        self.optimistic.insert(next)
    }

    /// Accepts the server's answer as the new truth.
    pub fn reconcile(&mut self, server: UserProgress) {
        self.confirmed = server;
        self.optimistic = None;
    }

    /// Accepts only the hearts/points part of a server answer.
    pub fn reconcile_counters(&mut self, hearts: u32, points: u64) {
        let server = UserProgress {
            points,
            ..self.confirmed.clone()
        }
        .with_hearts(hearts);
        self.reconcile(server);
    }

    /// Discards unconfirmed changes.
    pub fn rollback(&mut self) {
        self.optimistic = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(hearts: u32, points: u64) -> UserProgress {
        UserProgress::new(hearts, points, Some(CourseId::new(1)), 3)
    }

    #[test]
    fn hearts_are_clamped_on_construction() {
        assert_eq!(progress(9, 0).hearts(), MAX_HEARTS);
    }

    #[test]
    fn apply_saturates_at_bounds() {
        let p = progress(1, 5);
        assert_eq!(p.apply(ProgressDelta::hearts(-3)).hearts(), 0);
        assert_eq!(p.apply(ProgressDelta::hearts(10)).hearts(), MAX_HEARTS);
        assert_eq!(p.apply(ProgressDelta::points(-50)).points, 0);
        assert_eq!(p.apply(ProgressDelta::points(10)).points, 15);
    }

    #[test]
    fn optimistic_then_reconcile() {
        let mut cache = ProgressCache::new(progress(5, 0));
        cache.apply_optimistic(ProgressDelta::hearts(-1));
        assert_eq!(cache.current().hearts(), 4);
        assert!(cache.is_pending());

        cache.reconcile(progress(3, 0));
        assert_eq!(cache.current().hearts(), 3);
        assert!(!cache.is_pending());
    }

    #[test]
    fn rollback_restores_server_value() {
        let mut cache = ProgressCache::new(progress(2, 40));
        cache.apply_optimistic(ProgressDelta {
            hearts: 3,
            points: 10,
        });
        assert_eq!(cache.current().hearts(), 5);
        cache.rollback();
        assert_eq!(cache.current(), &progress(2, 40));
    }

    #[test]
    fn reconcile_counters_keeps_course_and_streak() {
        let mut cache = ProgressCache::new(progress(5, 0));
        cache.reconcile_counters(4, 10);
        assert_eq!(cache.current().hearts(), 4);
        assert_eq!(cache.current().points, 10);
        assert_eq!(cache.current().streak, 3);
        assert_eq!(cache.current().active_course, Some(CourseId::new(1)));
    }
}
