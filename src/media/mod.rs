//! Decode media files (audio/video containers) into mono `f32` at the
//! Whisper sample rate.
//!
//! Responsibilities:
//! - Probe the container and select a decodable audio track (Symphonia)
//! - Decode packets into PCM, skipping corrupt frames
//! - Normalize PCM (downmix + resample) via [`pipeline`]
//!
//! Inputs are regular on-disk files, so we hand Symphonia a seekable source;
//! that matters for MP4/MOV layouts that keep their metadata at the end.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use symphonia::core::codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet, Track};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

mod pipeline;

use pipeline::MonoPipeline;

/// The mono sample rate whisper.cpp expects (Hz).
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Decode an entire media file into mono `f32` samples at
/// [`TARGET_SAMPLE_RATE`].
///
/// The batch processes one file at a time and whisper consumes a contiguous
/// buffer, so there is no streaming here: we decode to completion and return
/// the full buffer.
pub fn decode_file(path: &Path) -> Result<Vec<f32>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open media file '{}'", path.display()))?;

    let mss_opts = MediaSourceStreamOptions {
        // Symphonia expects a power-of-two buffer > 32KiB for good probing behavior.
        buffer_len: 256 * 1024,
    };
    let mss = MediaSourceStream::new(Box::new(file), mss_opts);

    // The file extension improves probe accuracy for ambiguous containers.
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let (mut format, track) = probe_and_pick_audio_track(mss, &hint)
        .with_context(|| format!("failed to probe '{}'", path.display()))?;

    let mut decoder = make_decoder_for_track(&track)?;
    let mut pipeline = MonoPipeline::new();

    loop {
        let Some(packet) = next_packet(&mut format)? else {
            break;
        };

        // Ignore packets from non-audio tracks (video frames in particular).
        if packet.track_id() != track.id {
            continue;
        }

        decode_packet(&mut decoder, &packet, &mut pipeline)?;
    }

    pipeline
        .finalize()
        .context("audio pipeline failed during finalize")
}

/// Probe the container and pick a default audio track.
///
/// Track selection policy:
/// - choose the first track that looks decodable (codec != NULL)
/// - and has a known sample rate (required for resampling decisions downstream)
fn probe_and_pick_audio_track(
    mss: MediaSourceStream,
    hint: &Hint,
) -> Result<(Box<dyn FormatReader>, Track)> {
    let format_opts: FormatOptions = Default::default();
    let metadata_opts: MetadataOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(hint, mss, &format_opts, &metadata_opts)
        .map_err(|e| anyhow!(e))
        .context("failed to probe media stream")?;

    let format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.sample_rate.is_some())
        .cloned()
        .ok_or_else(|| anyhow!("no audio track found"))?;

    Ok((format, track))
}

fn make_decoder_for_track(track: &Track) -> Result<Box<dyn Decoder>> {
    let decoder_opts: DecoderOptions = Default::default();

    symphonia::default::get_codecs()
        .make(&track.codec_params, &decoder_opts)
        .map_err(|e| anyhow!(e))
        .context("failed to create decoder for audio track")
}

/// Read the next packet, treating IO errors as "end of stream".
fn next_packet(format: &mut Box<dyn FormatReader>) -> Result<Option<Packet>> {
    match format.next_packet() {
        Ok(p) => Ok(Some(p)),
        Err(SymphoniaError::IoError(_)) => Ok(None),
        Err(e) => Err(anyhow!(e)).context("failed reading packet"),
    }
}

/// Decode one packet into the pipeline.
///
/// Error handling policy:
/// - `DecodeError` → skip bad frame (common with some codecs)
/// - `IoError`     → treat as end-of-stream
/// - other errors  → bubble up with context
fn decode_packet(
    decoder: &mut Box<dyn Decoder>,
    packet: &Packet,
    pipeline: &mut MonoPipeline,
) -> Result<()> {
    match decoder.decode(packet) {
        Ok(buf) => pipeline
            .push_decoded(&buf)
            .context("audio pipeline failed while processing decoded samples"),
        Err(SymphoniaError::DecodeError(_)) => Ok(()),
        Err(SymphoniaError::IoError(_)) => Ok(()),
        Err(e) => Err(anyhow!(e)).context("decoder failure"),
    }
}
