mod answer;
mod challenge;
mod ids;
mod lesson;
mod media;
mod progress;

pub use answer::{AnswerPayload, SpeechAnalysis};
pub use challenge::{
    AnswerKey, Challenge, ChallengeError, ChallengeKind, ChallengeOption, ListeningMode,
    DEFAULT_PRONUNCIATION_THRESHOLD,
};
pub use ids::{ChallengeId, CourseId, LessonId, OptionId, ParseIdError};
pub use lesson::{Lesson, SessionMode};
pub use media::{MediaError, MediaSrc};
pub use progress::{MAX_HEARTS, POINTS_PER_CHALLENGE, ProgressCache, ProgressDelta, UserProgress};
