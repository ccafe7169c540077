//! PCM normalization: interleaved source audio → mono 16 kHz `f32`.
//!
//! - Convert Symphonia-decoded PCM into interleaved `f32`
//! - Downmix to mono by equal-weight channel averaging
//! - Resample to the target sample rate with rubato (when needed)
//!
//! `finalize()` must be called at end-of-stream to flush any remaining
//! resampler input and take the accumulated output.

use anyhow::{Context, Result, anyhow, bail};
use rubato::{Resampler, SincFixedIn, WindowFunction};
use symphonia::core::audio::{AudioBufferRef, SampleBuffer};

use super::TARGET_SAMPLE_RATE;

/// How many source frames we feed rubato per `process()` call.
const RESAMPLE_BLOCK_SRC_FRAMES: usize = 2048;

/// A small stateful pipeline that collects decoded audio as mono 16 kHz `f32`.
pub(super) struct MonoPipeline {
    // Scratch buffer used to copy decoded PCM into an interleaved `Vec<f32>`.
    sample_buf_f32: Option<SampleBuffer<f32>>,

    // Lazily initialized resampler (only needed when the source sample rate != 16 kHz).
    resampler: Option<SincFixedIn<f32>>,

    // Accumulator for mono source samples before feeding full blocks into rubato.
    mono_src_acc: Vec<f32>,

    // The normalized output collected so far.
    out: Vec<f32>,
}

impl MonoPipeline {
    pub(super) fn new() -> Self {
        Self {
            sample_buf_f32: None,
            resampler: None,
            mono_src_acc: Vec::new(),
            out: Vec::new(),
        }
    }

    /// Push a decoded Symphonia buffer through the pipeline.
    pub(super) fn push_decoded(&mut self, decoded: &AudioBufferRef<'_>) -> Result<()> {
        let (interleaved, src_rate, channels) =
            decoded_to_interleaved_f32(decoded, &mut self.sample_buf_f32)?;

        let mono_src = downmix_to_mono(&interleaved, channels);

        // Fast path: already at the target sample rate.
        if src_rate == TARGET_SAMPLE_RATE {
            self.out.extend_from_slice(&mono_src);
            return Ok(());
        }

        // Slow path: resample to the target sample rate.
        self.ensure_resampler(src_rate)?;
        self.mono_src_acc.extend_from_slice(&mono_src);
        self.drain_full_blocks()?;
        Ok(())
    }

    /// Flush remaining buffered samples and take the collected output.
    ///
    /// If resampling was never needed, this just hands back what was collected.
    pub(super) fn finalize(mut self) -> Result<Vec<f32>> {
        if let Some(rs) = self.resampler.as_ref() {
            if !self.mono_src_acc.is_empty() {
                // rubato expects exact block sizes; pad the remainder with zeros.
                let in_max = rs.input_frames_max();
                let rem = self.mono_src_acc.len() % in_max;
                if rem != 0 {
                    self.mono_src_acc
                        .resize(self.mono_src_acc.len() + (in_max - rem), 0.0);
                }

                self.drain_full_blocks()?;
            }
        }

        Ok(self.out)
    }

    fn ensure_resampler(&mut self, src_rate: u32) -> Result<()> {
        if self.resampler.is_some() {
            return Ok(());
        }

        let rs = SincFixedIn::<f32>::new(
            TARGET_SAMPLE_RATE as f64 / src_rate as f64,
            2.0,
            rubato::SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: rubato::SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            },
            RESAMPLE_BLOCK_SRC_FRAMES,
            1, // mono
        )
        .map_err(|e| anyhow!(e))
        .context("failed to init resampler")?;

        self.resampler = Some(rs);
        Ok(())
    }

    /// Feed every complete input block through the resampler into `out`.
    fn drain_full_blocks(&mut self) -> Result<()> {
        loop {
            let rs = self
                .resampler
                .as_mut()
                .ok_or_else(|| anyhow!("resampler not initialized"))?;
            let in_max = rs.input_frames_max();

            if self.mono_src_acc.len() < in_max {
                return Ok(());
            }

            // rubato expects one Vec per channel; we are mono.
            let input = vec![self.mono_src_acc.drain(..in_max).collect::<Vec<f32>>()];

            let resampled = rs
                .process(&input, None)
                .map_err(|e| anyhow!(e))
                .context("resampler process failed")?;

            if resampled.len() != 1 {
                bail!("expected mono output from resampler");
            }

            self.out.extend_from_slice(&resampled[0]);
        }
    }
}

fn decoded_to_interleaved_f32(
    decoded: &AudioBufferRef<'_>,
    sample_buf_f32: &mut Option<SampleBuffer<f32>>,
) -> Result<(Vec<f32>, u32, usize)> {
    ensure_sample_buffer(decoded, sample_buf_f32);

    let buf = sample_buf_f32
        .as_mut()
        .ok_or_else(|| anyhow!("sample buffer not initialized"))?;

    // Copy decoded PCM into our interleaved scratch buffer.
    buf.copy_interleaved_ref(decoded.clone());

    let src_rate = decoded.spec().rate;
    let channels = decoded.spec().channels.count();
    if channels == 0 {
        bail!("decoded audio had zero channels");
    }

    Ok((buf.samples().to_vec(), src_rate, channels))
}

fn ensure_sample_buffer(
    decoded: &AudioBufferRef<'_>,
    sample_buf_f32: &mut Option<SampleBuffer<f32>>,
) {
    if sample_buf_f32.is_some() {
        return;
    }

    let spec = *decoded.spec();
    let duration = decoded.capacity() as u64;
    *sample_buf_f32 = Some(SampleBuffer::<f32>::new(duration, spec));
}

/// Downmix interleaved samples into mono by averaging channels.
///
/// Policy: equal-weight average across channels (simple, predictable).
fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }

    let frames = interleaved.len() / channels;
    let mut mono = Vec::with_capacity(frames);

    for f in 0..frames {
        let base = f * channels;
        let mut acc = 0.0;
        for c in 0..channels {
            acc += interleaved[base + c];
        }
        mono.push(acc / channels as f32);
    }

    mono
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_to_mono_single_channel_is_identity() {
        let input = vec![0.0, 1.0, -1.0];
        let mono = downmix_to_mono(&input, 1);
        assert_eq!(mono, input);
    }

    #[test]
    fn downmix_to_mono_averages_channels() {
        // Two frames of stereo: (L=1, R=3), (L=-1, R=1) => mono: 2, 0
        let interleaved = vec![1.0, 3.0, -1.0, 1.0];
        let mono = downmix_to_mono(&interleaved, 2);
        assert_eq!(mono, vec![2.0, 0.0]);
    }

    #[test]
    fn finalize_without_resampler_returns_collected_output() -> Result<()> {
        let mut pipeline = MonoPipeline::new();
        pipeline.out.extend_from_slice(&[0.1, 0.2]);
        assert_eq!(pipeline.finalize()?, vec![0.1, 0.2]);
        Ok(())
    }

    #[test]
    fn resample_path_flushes_remainder_on_finalize() -> Result<()> {
        let mut pipeline = MonoPipeline::new();
        pipeline.ensure_resampler(8_000)?;
        pipeline.ensure_resampler(8_000)?; // idempotent

        let in_max = pipeline
            .resampler
            .as_ref()
            .expect("resampler initialized")
            .input_frames_max();

        // Multiple full blocks plus a remainder that `finalize()` must flush.
        pipeline.mono_src_acc = vec![0.0; (in_max * 2) + 7];
        pipeline.drain_full_blocks()?;
        assert!(pipeline.mono_src_acc.len() < in_max);

        let out = pipeline.finalize()?;
        assert!(!out.is_empty());
        Ok(())
    }
}
