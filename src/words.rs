/// A single recognized word with per-word timing.
///
/// Produced by a [`crate::backend::Transcriber`]; timestamps are seconds from
/// the start of the input. The upstream engine guarantees `start <= end` and
/// non-decreasing ordering across a transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Start time in seconds (whisper returns centiseconds).
    pub start_seconds: f32,
    /// End time in seconds (whisper returns centiseconds).
    pub end_seconds: f32,
    /// Word text, trimmed of surrounding whitespace.
    pub text: String,
}

impl Word {
    pub fn new(text: impl Into<String>, start_seconds: f32, end_seconds: f32) -> Self {
        Self {
            start_seconds,
            end_seconds,
            text: text.into(),
        }
    }
}

/// The full word timeline recognized from one input, plus the language tag
/// reported by the engine (`"auto"` when detection was left to the model).
#[derive(Debug, Clone)]
pub struct Transcript {
    pub language_code: String,
    pub words: Vec<Word>,
}

pub(crate) fn centiseconds_to_seconds(value: i64) -> f32 {
    if value < 0 { 0.0 } else { value as f32 / 100.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centiseconds_clamp_negative_to_zero() {
        assert_eq!(centiseconds_to_seconds(-1), 0.0);
        assert_eq!(centiseconds_to_seconds(0), 0.0);
        assert_eq!(centiseconds_to_seconds(150), 1.5);
    }
}
