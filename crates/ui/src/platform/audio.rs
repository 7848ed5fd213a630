use dioxus::document::eval;
use services::AudioSink;

/// Plays reference audio through the webview's `Audio` element.
///
/// One element is shared; it remembers the lease that started it so a stale
/// lease cannot stop a newer clip.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebviewAudioSink;

impl AudioSink for WebviewAudioSink {
    fn play(&self, lease: u64, src: &str, rate: f32) {
        let _ = eval(&play_script(lease, src, rate));
    }

    fn stop(&self, lease: u64) {
        let _ = eval(&stop_script(lease));
    }
}

pub(crate) fn play_script(lease: u64, src: &str, rate: f32) -> String {
    format!(
        r#"(function() {{
            const previous = window.__lingoAudio;
            if (previous) {{
                previous.pause();
            }}
            const el = new Audio({src:?});
            el.playbackRate = {rate};
            el.dataset.lease = "{lease}";
            window.__lingoAudio = el;
            el.play().catch(() => {{}});
        }})();"#
    )
}

pub(crate) fn stop_script(lease: u64) -> String {
    format!(
        r#"(function() {{
            const el = window.__lingoAudio;
            if (el && el.dataset.lease === "{lease}") {{
                el.pause();
                window.__lingoAudio = null;
            }}
        }})();"#
    )
}
