mod components;
mod scripts;
mod view;

pub(crate) use scripts::speech_recognition_script;
#[cfg(test)]
pub(crate) use view::{LessonIntent, LessonTestHandles};
pub use view::LessonView;
