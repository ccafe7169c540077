use std::io::Write;

use crate::cue_encoder::CueEncoder;
use crate::segmenter::Cue;
use crate::{Error, Result};

/// A `CueEncoder` that writes a plain-text transcript.
///
/// Cue texts are joined with single spaces, so the output reproduces the
/// recognized word sequence regardless of how it was packed into cues. A
/// trailing newline is written on close when anything was emitted.
pub struct TxtEncoder<W: Write> {
    w: W,

    /// Whether the next cue is the first one (controls the joining space).
    first: bool,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> TxtEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            first: true,
            closed: false,
        }
    }
}

impl<W: Write> CueEncoder for TxtEncoder<W> {
    fn write_cue(&mut self, cue: &Cue) -> Result<()> {
        if self.closed {
            return Err(Error::msg("cannot write cue: encoder is already closed"));
        }

        if !self.first {
            self.w.write_all(b" ")?;
        }
        self.first = false;

        self.w.write_all(cue.text.as_bytes())?;

        Ok(())
    }

    /// Terminate the transcript line and flush. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        if !self.first {
            self.w.write_all(b"\n")?;
        }
        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(index: u32, text: &str) -> Cue {
        Cue {
            index,
            start_seconds: 0.0,
            end_seconds: 1.0,
            text: text.to_string(),
        }
    }

    #[test]
    fn txt_close_without_cues_emits_nothing() -> Result<()> {
        let mut out = Vec::new();
        let mut enc = TxtEncoder::new(&mut out);
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "");
        Ok(())
    }

    #[test]
    fn txt_joins_cue_texts_with_single_spaces() -> Result<()> {
        let mut out = Vec::new();
        let mut enc = TxtEncoder::new(&mut out);
        enc.write_cue(&cue(1, "the quick"))?;
        enc.write_cue(&cue(2, "brown fox"))?;
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "the quick brown fox\n");
        Ok(())
    }

    #[test]
    fn txt_write_after_close_errors() -> Result<()> {
        let mut out = Vec::new();
        let mut enc = TxtEncoder::new(&mut out);
        enc.close()?;
        let err = enc.write_cue(&cue(1, "nope")).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
