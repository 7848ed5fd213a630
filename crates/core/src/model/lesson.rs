use crate::model::challenge::Challenge;
use crate::model::ids::LessonId;

/// Whether a session is a first pass or a replay of a completed lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    FirstPass,
    /// Replaying an already-completed lesson; correct answers regain hearts.
    Practice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    challenges: Vec<Challenge>,
    pub completed: bool,
}

impl Lesson {
    /// Builds a lesson, ordering challenges by their ordinal position.
    #[must_use]
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        mut challenges: Vec<Challenge>,
        completed: bool,
    ) -> Self {
        challenges.sort_by_key(|challenge| challenge.order);
        Self {
            id,
            title: title.into(),
            challenges,
            completed,
        }
    }

    #[must_use]
    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    #[must_use]
    pub fn into_challenges(self) -> Vec<Challenge> {
        self.challenges
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.challenges.len()
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        if self.completed {
            SessionMode::Practice
        } else {
            SessionMode::FirstPass
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::challenge::ChallengeKind;
    use crate::model::ids::ChallengeId;

    fn challenge(id: u64, order: u32) -> Challenge {
        Challenge::new(
            ChallengeId::new(id),
            LessonId::new(1),
            order,
            ChallengeKind::Select,
            format!("Q{id}"),
        )
    }

    #[test]
    fn challenges_are_sorted_by_order() {
        let lesson = Lesson::new(
            LessonId::new(1),
            "Basics",
            vec![challenge(1, 3), challenge(2, 1), challenge(3, 2)],
            false,
        );
        let ids: Vec<u64> = lesson.challenges().iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(lesson.total(), 3);
    }

    #[test]
    fn completed_lessons_replay_in_practice_mode() {
        let lesson = Lesson::new(LessonId::new(1), "Basics", Vec::new(), true);
        assert_eq!(lesson.mode(), SessionMode::Practice);
        let lesson = Lesson::new(LessonId::new(1), "Basics", Vec::new(), false);
        assert_eq!(lesson.mode(), SessionMode::FirstPass);
    }
}
