use std::path::Path;

use anyhow::{Context, Result, ensure};
use whisper_rs::{WhisperContext, WhisperContextParameters};

use crate::backend::Transcriber;
use crate::media::decode_file;
use crate::model::{ComputeType, Device, ModelSize, model_path};
use crate::opts::Opts;
use crate::words::Transcript;

mod logging;
mod words;

use words::words_from_samples;

/// Built-in backend powered by `whisper-rs` / `whisper.cpp`.
///
/// The model is loaded once at construction and the context is reused for
/// every file in a batch; loading is by far the most expensive step.
pub struct WhisperBackend {
    ctx: WhisperContext,
}

impl WhisperBackend {
    /// Resolve a ggml model file from the models directory and load it on the
    /// requested device.
    ///
    /// With `Device::Auto`, a GPU initialization failure retries on CPU with
    /// a logged warning instead of failing the run (a dedicated `cuda`
    /// request does not fall back, so the user learns their GPU is broken).
    pub fn load(
        models_dir: &Path,
        size: ModelSize,
        compute_type: ComputeType,
        device: Device,
    ) -> Result<Self> {
        let path = model_path(models_dir, size, compute_type);
        ensure!(
            path.is_file(),
            "model not found at '{}' (download the ggml model into the models directory first)",
            path.display()
        );

        let ctx = match new_context(&path, device.wants_gpu()) {
            Ok(ctx) => ctx,
            Err(err) if device.wants_gpu() && device.allows_cpu_fallback() => {
                tracing::warn!(error = %format!("{err:#}"), "GPU initialization failed, falling back to CPU");
                new_context(&path, false)?
            }
            Err(err) => return Err(err),
        };

        Ok(Self { ctx })
    }

    /// Access the underlying Whisper context.
    pub fn context(&self) -> &WhisperContext {
        &self.ctx
    }
}

impl Transcriber for WhisperBackend {
    fn transcribe(&mut self, audio: &Path, opts: &Opts) -> crate::Result<Transcript> {
        let samples = decode_file(audio)?;

        let words = if samples.is_empty() {
            Vec::new()
        } else {
            words_from_samples(&self.ctx, opts, &samples)?
        };

        Ok(Transcript {
            language_code: opts
                .language
                .clone()
                .unwrap_or_else(|| "auto".to_owned()),
            words,
        })
    }
}

fn new_context(model_path: &Path, use_gpu: bool) -> Result<WhisperContext> {
    // We keep whisper.cpp's C-level logs quiet so callers fully control
    // stdout/stderr. This is idempotent (safe to call multiple times).
    logging::init_whisper_logging();

    let model_path = model_path
        .to_str()
        .context("model path is not valid UTF-8")?;

    let mut ctx_params = WhisperContextParameters::default();
    ctx_params.use_gpu(use_gpu);

    let ctx = WhisperContext::new_with_params(model_path, ctx_params)
        .with_context(|| format!("failed to load model from path: {model_path}"))?;

    Ok(ctx)
}
