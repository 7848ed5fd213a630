use lingo_core::input::ChallengeInput;
use lingo_core::model::{Challenge, LessonId};
use services::{
    ChallengeStatus, LessonBootstrap, PracticeController, PracticeService, PracticeSnapshot,
};

use crate::views::ViewError;
use crate::vm::{
    PracticeFooterVm, PracticeHeaderVm, map_practice_footer, map_practice_header,
};

/// Where the lesson page goes after resolving lesson and progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LessonLanding {
    Ready,
    NeedsCourse,
    LessonMissing,
}

/// A running lesson: the controller plus the local input of the mounted
/// challenge.
pub struct PracticeVm {
    controller: PracticeController,
    snapshot: PracticeSnapshot,
    input: ChallengeInput,
    mounted: (usize, u64),
}

impl PracticeVm {
    #[must_use]
    pub fn new(controller: PracticeController) -> Self {
        let snapshot = controller.snapshot();
        let input = build_input(snapshot.challenge.as_ref());
        let mounted = (snapshot.index, snapshot.mount_key);
        Self {
            controller,
            snapshot,
            input,
            mounted,
        }
    }

    #[must_use]
    pub fn controller(&self) -> PracticeController {
        self.controller.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> &PracticeSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn challenge(&self) -> Option<&Challenge> {
        self.snapshot.challenge.as_ref()
    }

    #[must_use]
    pub fn input(&self) -> &ChallengeInput {
        &self.input
    }

    /// Changes whenever the challenge renderer must remount.
    #[must_use]
    pub fn mount_key(&self) -> String {
        format!("{}:{}", self.mounted.0, self.mounted.1)
    }

    #[must_use]
    pub fn header(&self) -> PracticeHeaderVm {
        map_practice_header(&self.snapshot)
    }

    #[must_use]
    pub fn footer(&self) -> PracticeFooterVm {
        map_practice_footer(&self.snapshot)
    }

    #[must_use]
    pub fn status(&self) -> ChallengeStatus {
        self.snapshot.status
    }

    /// Input is frozen once graded, while sending, and after completion.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.snapshot.status != ChallengeStatus::None
            || self.snapshot.submitting
            || self.snapshot.is_complete
    }

    #[must_use]
    pub fn error(&self) -> Option<ViewError> {
        self.snapshot
            .last_error
            .as_ref()
            .map(ViewError::from)
            .filter(|err| *err != ViewError::HeartsExhausted)
    }

    /// Re-reads the controller, rebuilding the input when the challenge
    /// remounted. A retry of the same challenge keeps its replay counter.
    pub fn refresh(&mut self) {
        self.snapshot = self.controller.snapshot();
        let key = (self.snapshot.index, self.snapshot.mount_key);
        if key == self.mounted {
            return;
        }
        let carried = (key.0 == self.mounted.0)
            .then(|| self.input.replays_mut().copied())
            .flatten();
        self.input = build_input(self.snapshot.challenge.as_ref());
        if let (Some(previous), Some(replays)) = (carried, self.input.replays_mut()) {
            *replays = previous;
        }
        self.mounted = key;
    }

    /// Applies an edit to the local input and mirrors the resulting answer
    /// into the controller. Returns `false` while the input is locked.
    pub fn update_input(&mut self, edit: impl FnOnce(&mut ChallengeInput)) -> bool {
        if self.is_locked() {
            return false;
        }
        edit(&mut self.input);
        match self.input.to_answer_payload() {
            Some(answer) => {
                self.controller.select_answer(answer);
            }
            None => self.controller.clear_answer(),
        }
        self.snapshot = self.controller.snapshot();
        true
    }

    /// Counts a reference-audio replay. Returns the rate to play at, or
    /// `None` once the replay cap is reached.
    pub fn register_replay(&mut self) -> Option<f32> {
        match self.input.replays_mut() {
            Some(replays) => replays.register_play(),
            None => Some(1.0),
        }
    }

    /// Sets the replay speed of a listening challenge.
    pub fn set_replay_speed(&mut self, index: usize) {
        if let Some(replays) = self.input.replays_mut() {
            replays.set_speed_index(index);
        }
    }

    pub fn dismiss_error(&mut self) {
        self.controller.dismiss_error();
        self.snapshot = self.controller.snapshot();
    }
}

fn build_input(challenge: Option<&Challenge>) -> ChallengeInput {
    challenge.map_or(ChallengeInput::Unconfigured, |challenge| {
        ChallengeInput::for_challenge(challenge, &mut rand::rng())
    })
}

/// Resolves the lesson page into a ready session or a redirect.
///
/// # Errors
///
/// Returns the `ViewError` class of the failure when lesson or progress
/// cannot be loaded.
pub async fn start_lesson(
    practice: &PracticeService,
    lesson_id: LessonId,
) -> Result<(LessonLanding, Option<PracticeVm>), ViewError> {
    match practice.load_practice(lesson_id).await? {
        LessonBootstrap::Ready(controller) => {
            Ok((LessonLanding::Ready, Some(PracticeVm::new(controller))))
        }
        LessonBootstrap::NeedsCourse => Ok((LessonLanding::NeedsCourse, None)),
        LessonBootstrap::LessonMissing => Ok((LessonLanding::LessonMissing, None)),
    }
}
