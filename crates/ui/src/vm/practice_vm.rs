use lingo_core::model::{MAX_HEARTS, SessionMode};
use services::{ChallengeStatus, PracticeSnapshot};

#[derive(Clone, Debug, PartialEq)]
pub struct PracticeHeaderVm {
    pub hearts_label: String,
    pub points_label: String,
    /// CSS width of the progress bar, e.g. `"33%"`.
    pub progress_width: String,
    pub progress_label: String,
    pub practice_badge: Option<&'static str>,
    pub hearts_empty: bool,
}

#[must_use]
pub fn map_practice_header(snapshot: &PracticeSnapshot) -> PracticeHeaderVm {
    let percentage = snapshot.percentage.clamp(0.0, 100.0);
    let shown = (snapshot.index + 1).min(snapshot.total);
    PracticeHeaderVm {
        hearts_label: format!("{}/{MAX_HEARTS}", snapshot.hearts),
        points_label: format!("{} XP", snapshot.points),
        progress_width: format!("{percentage:.0}%"),
        progress_label: format!("{shown} of {}", snapshot.total),
        practice_badge: (snapshot.mode == SessionMode::Practice).then_some("Practice"),
        hearts_empty: snapshot.hearts == 0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FooterTone {
    Neutral,
    Correct,
    Wrong,
}

impl FooterTone {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Neutral => "lesson-footer",
            Self::Correct => "lesson-footer lesson-footer--correct",
            Self::Wrong => "lesson-footer lesson-footer--wrong",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeFooterVm {
    pub label: &'static str,
    pub enabled: bool,
    pub tone: FooterTone,
    pub feedback: Option<&'static str>,
}

/// Primary action for the active challenge: check, retry or continue.
#[must_use]
pub fn map_practice_footer(snapshot: &PracticeSnapshot) -> PracticeFooterVm {
    match snapshot.status {
        ChallengeStatus::None => PracticeFooterVm {
            label: if snapshot.submitting { "Checking…" } else { "Check" },
            enabled: snapshot.has_answer && !snapshot.submitting && !snapshot.hearts_exhausted,
            tone: FooterTone::Neutral,
            feedback: None,
        },
        ChallengeStatus::Wrong => PracticeFooterVm {
            label: "Retry",
            enabled: !snapshot.submitting && !snapshot.hearts_exhausted,
            tone: FooterTone::Wrong,
            feedback: Some("Not quite. Give it another go."),
        },
        ChallengeStatus::Correct => PracticeFooterVm {
            label: if snapshot.index + 1 >= snapshot.total {
                "Finish"
            } else {
                "Continue"
            },
            enabled: !snapshot.submitting,
            tone: FooterTone::Correct,
            feedback: Some("Nicely done!"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::model::LessonId;

    fn snapshot(status: ChallengeStatus) -> PracticeSnapshot {
        PracticeSnapshot {
            lesson_id: LessonId::new(1),
            title: "Basics".into(),
            mode: SessionMode::FirstPass,
            challenge: None,
            index: 0,
            total: 3,
            status,
            percentage: 100.0 / 3.0,
            hearts: 4,
            points: 10,
            has_answer: false,
            submitting: false,
            hearts_exhausted: false,
            last_error: None,
            is_complete: false,
            mount_key: 0,
        }
    }

    #[test]
    fn header_formats_counters_and_progress() {
        let vm = map_practice_header(&snapshot(ChallengeStatus::None));
        assert_eq!(vm.hearts_label, "4/5");
        assert_eq!(vm.points_label, "10 XP");
        assert_eq!(vm.progress_width, "33%");
        assert_eq!(vm.progress_label, "1 of 3");
        assert_eq!(vm.practice_badge, None);
        assert!(!vm.hearts_empty);

        let mut practice = snapshot(ChallengeStatus::None);
        practice.mode = SessionMode::Practice;
        practice.hearts = 0;
        let vm = map_practice_header(&practice);
        assert_eq!(vm.practice_badge, Some("Practice"));
        assert!(vm.hearts_empty);
    }

    #[test]
    fn check_needs_an_answer_and_an_idle_session() {
        let mut snap = snapshot(ChallengeStatus::None);
        assert!(!map_practice_footer(&snap).enabled);
        snap.has_answer = true;
        let vm = map_practice_footer(&snap);
        assert_eq!(vm.label, "Check");
        assert!(vm.enabled);

        snap.submitting = true;
        let vm = map_practice_footer(&snap);
        assert_eq!(vm.label, "Checking…");
        assert!(!vm.enabled);

        snap.submitting = false;
        snap.hearts_exhausted = true;
        assert!(!map_practice_footer(&snap).enabled);
    }

    #[test]
    fn graded_states_offer_retry_or_continue() {
        let vm = map_practice_footer(&snapshot(ChallengeStatus::Wrong));
        assert_eq!((vm.label, vm.tone), ("Retry", FooterTone::Wrong));
        assert!(vm.enabled);

        let vm = map_practice_footer(&snapshot(ChallengeStatus::Correct));
        assert_eq!((vm.label, vm.tone), ("Continue", FooterTone::Correct));

        let mut last = snapshot(ChallengeStatus::Correct);
        last.index = 2;
        assert_eq!(map_practice_footer(&last).label, "Finish");
    }
}
