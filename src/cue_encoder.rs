use crate::Result;
use crate::segmenter::Cue;

/// Streaming sink for segmented cues.
///
/// Encoders write each cue as it is produced so callers never need the whole
/// cue sequence in memory. `close` finalizes and flushes; it must be
/// idempotent, and writing after close is an error.
pub trait CueEncoder {
    fn write_cue(&mut self, cue: &Cue) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
