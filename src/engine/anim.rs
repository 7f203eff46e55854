/// Receives fire-and-forget clip triggers from states. Playback, blending,
/// and looping live on the other side; states never wait on a clip.
pub trait AnimationSink: Send + Sync {
    fn play(&mut self, clip: &str);
}

/// Sink that remembers every clip it was asked to play, in order, so tests
/// and tooling can read the triggers back.
#[derive(Debug, Default)]
pub struct ClipRecorder {
    clips: Vec<String>,
}

impl ClipRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.clips.last().map(String::as_str)
    }

    pub fn history(&self) -> &[String] {
        &self.clips
    }

    pub fn count_of(&self, clip: &str) -> usize {
        self.clips.iter().filter(|c| c.as_str() == clip).count()
    }
}

impl AnimationSink for ClipRecorder {
    fn play(&mut self, clip: &str) {
        self.clips.push(clip.to_owned());
    }
}

/// Sink that drops everything. For actors nobody watches.
pub struct NullAnimation;

impl AnimationSink for NullAnimation {
    fn play(&mut self, _clip: &str) {}
}
