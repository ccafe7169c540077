use std::path::Path;

use crate::Result;
use crate::opts::Opts;
use crate::words::Transcript;

/// Pluggable speech-recognition seam used by [`crate::batch`].
///
/// A transcriber turns one media file into an ordered word timeline. This is
/// the only contact point between the batch orchestration and the recognition
/// engine, so tests can drive the batch logic with a mock instead of a model.
///
/// Implementations take `&mut self` because engine state (whisper inference
/// state in particular) requires mutable access.
pub trait Transcriber {
    /// Transcribe a single media file into a word timeline.
    ///
    /// Word timestamps are seconds from the start of the input, ordered and
    /// non-overlapping.
    fn transcribe(&mut self, audio: &Path, opts: &Opts) -> Result<Transcript>;
}
