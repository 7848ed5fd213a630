mod lesson_vm;
mod markdown_vm;
mod practice_vm;

pub use lesson_vm::{LessonLanding, PracticeVm, start_lesson};
pub use markdown_vm::{inline_markdown_to_html, markdown_to_html, sanitize_html};
pub use practice_vm::{
    FooterTone, PracticeFooterVm, PracticeHeaderVm, map_practice_footer, map_practice_header,
};
