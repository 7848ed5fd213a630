mod audio;

pub use audio::WebviewAudioSink;
