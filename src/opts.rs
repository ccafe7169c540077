/// Options that control how a transcription is performed.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input into this type so that:
/// - the library remains reusable outside of a CLI context
/// - other frontends (tests, batch jobs) can construct options programmatically
#[derive(Debug, Clone)]
pub struct Opts {
    /// Language hint for recognition (e.g. `"ru"`, `"en"`).
    ///
    /// When `None`, the engine auto-detects the spoken language.
    pub language: Option<String>,

    /// Maximum characters per subtitle cue, counted in Unicode code points
    /// over the cue text (the render-time leading space is not counted).
    pub max_chars: usize,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            language: None,
            max_chars: 10,
        }
    }
}
