use std::io::Write;

use crate::cue_encoder::CueEncoder;
use crate::segmenter::Cue;
use crate::{Error, Result};

/// A `CueEncoder` that writes cues in SubRip (SRT) format, styled for
/// DaVinci Resolve.
///
/// Per cue we emit:
/// - the 1-based index on its own line
/// - a timing line (`HH:MM:SS,mmm --> HH:MM:SS,mmm`, comma before the
///   milliseconds as SRT requires)
/// - the cue text prefixed with exactly one space — Resolve's subtitle
///   importer expects this convention
/// - a blank separator line
///
/// Output streams directly to a `Write` implementation; nothing is buffered
/// beyond the writer itself.
pub struct SrtEncoder<W: Write> {
    /// The underlying writer we stream SRT into.
    w: W,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> SrtEncoder<W> {
    /// Create a new SRT encoder that writes to the provided writer.
    pub fn new(w: W) -> Self {
        Self { w, closed: false }
    }
}

impl<W: Write> CueEncoder for SrtEncoder<W> {
    /// Write a single cue as an SRT block.
    fn write_cue(&mut self, cue: &Cue) -> Result<()> {
        if self.closed {
            return Err(Error::msg("cannot write cue: encoder is already closed"));
        }

        validate_timing(cue)?;

        let start = format_timestamp_srt(cue.start_seconds);
        let end = format_timestamp_srt(cue.end_seconds);

        writeln!(&mut self.w, "{}", cue.index)?;
        writeln!(&mut self.w, "{start} --> {end}")?;

        // Leading space is part of the format, not the cue text.
        writeln!(&mut self.w, " {}", cue.text)?;

        // Blank line separates cues.
        writeln!(&mut self.w)?;

        Ok(())
    }

    /// Flush the underlying writer. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}

/// Reject timestamps the SRT format cannot represent.
///
/// We surface these as data-integrity errors instead of clamping: a cue with
/// a negative or inverted interval means something upstream went wrong, and a
/// silently "fixed" subtitle file would hide it.
fn validate_timing(cue: &Cue) -> Result<()> {
    let ok = cue.start_seconds.is_finite()
        && cue.end_seconds.is_finite()
        && cue.start_seconds >= 0.0
        && cue.end_seconds >= cue.start_seconds;

    if ok {
        Ok(())
    } else {
        Err(Error::InvalidCueTiming {
            index: cue.index,
            start_seconds: cue.start_seconds,
            end_seconds: cue.end_seconds,
        })
    }
}

/// Format seconds into an SRT timestamp (`HH:MM:SS,mmm`).
///
/// Rounding policy:
/// - We round to the nearest millisecond to reduce drift when converting from `f32`.
fn format_timestamp_srt(seconds: f32) -> String {
    let total_ms = (seconds as f64 * 1000.0).round() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(index: u32, start: f32, end: f32, text: &str) -> Cue {
        Cue {
            index,
            start_seconds: start,
            end_seconds: end,
            text: text.to_string(),
        }
    }

    #[test]
    fn srt_close_without_cues_emits_nothing() -> Result<()> {
        let mut out = Vec::new();
        let mut enc = SrtEncoder::new(&mut out);
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "");
        Ok(())
    }

    #[test]
    fn srt_formats_blocks_with_leading_space_and_separator() -> Result<()> {
        let mut out = Vec::new();
        let mut enc = SrtEncoder::new(&mut out);

        enc.write_cue(&cue(1, 0.0, 0.8, "Привет"))?;
        enc.write_cue(&cue(2, 0.8, 1.5, "мир!"))?;
        enc.close()?;

        let s = std::str::from_utf8(&out)?;
        assert_eq!(
            s,
            "1\n00:00:00,000 --> 00:00:00,800\n Привет\n\n\
             2\n00:00:00,800 --> 00:00:01,500\n мир!\n\n"
        );
        Ok(())
    }

    #[test]
    fn srt_timestamp_reference_values() {
        assert_eq!(format_timestamp_srt(0.0), "00:00:00,000");
        assert_eq!(format_timestamp_srt(1.0), "00:00:01,000");
        assert_eq!(format_timestamp_srt(3661.5), "01:01:01,500");
    }

    #[test]
    fn srt_timestamp_rounds_to_nearest_millisecond() {
        assert_eq!(format_timestamp_srt(0.0004), "00:00:00,000");
        assert_eq!(format_timestamp_srt(0.0006), "00:00:00,001");
        assert_eq!(format_timestamp_srt(1.9995), "00:00:02,000");
    }

    #[test]
    fn srt_rejects_negative_timestamps() {
        let mut out = Vec::new();
        let mut enc = SrtEncoder::new(&mut out);
        let err = enc.write_cue(&cue(1, -0.5, 1.0, "bad")).unwrap_err();
        assert!(matches!(err, Error::InvalidCueTiming { index: 1, .. }));
        // Nothing partial was written.
        assert!(out.is_empty());
    }

    #[test]
    fn srt_rejects_inverted_intervals() {
        let mut out = Vec::new();
        let mut enc = SrtEncoder::new(&mut out);
        let err = enc.write_cue(&cue(3, 2.0, 1.0, "bad")).unwrap_err();
        assert!(matches!(err, Error::InvalidCueTiming { index: 3, .. }));
    }

    #[test]
    fn srt_rejects_non_finite_timestamps() {
        let mut out = Vec::new();
        let mut enc = SrtEncoder::new(&mut out);
        let err = enc.write_cue(&cue(1, f32::NAN, 1.0, "bad")).unwrap_err();
        assert!(matches!(err, Error::InvalidCueTiming { .. }));
    }

    #[test]
    fn srt_write_after_close_errors() -> Result<()> {
        let mut out = Vec::new();
        let mut enc = SrtEncoder::new(&mut out);
        enc.close()?;
        enc.close()?; // idempotent
        let err = enc.write_cue(&cue(1, 0.0, 1.0, "nope")).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
