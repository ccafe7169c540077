//! Word-timeline extraction from whisper.cpp inference.
//!
//! whisper.cpp gives us per-word timing by combining token timestamps with
//! `split_on_word` and a one-character `max_len`: every emitted segment then
//! covers exactly one word. We convert those segments straight into
//! [`Word`]s, dropping special tokens and empty text.

use anyhow::{Context, Result};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperState};

use crate::opts::Opts;
use crate::words::{Word, centiseconds_to_seconds};

pub(super) fn words_from_samples(
    ctx: &WhisperContext,
    opts: &Opts,
    samples: &[f32],
) -> Result<Vec<Word>> {
    let state = run_whisper_full(ctx, opts, samples)?;

    let mut words = Vec::new();
    for segment in state.as_iter() {
        let text = segment
            .to_str()
            .context("failed to get segment text")?
            .trim()
            .to_owned();

        // Whisper special/control tokens are formatted like `[_BEG_]`, `[_TT_50]`.
        if text.is_empty() || (text.starts_with("[_") && text.ends_with("_]")) {
            continue;
        }

        words.push(Word {
            start_seconds: centiseconds_to_seconds(segment.start_timestamp()),
            end_seconds: centiseconds_to_seconds(segment.end_timestamp()),
            text,
        });
    }

    Ok(words)
}

fn build_full_params(opts: &Opts) -> FullParams<'_, '_> {
    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: 5,
        patience: 1.0,
    });

    params.set_n_threads(num_cpus::get() as i32);
    params.set_translate(false);
    params.set_language(opts.language.as_deref());
    params.set_no_context(true);
    params.set_single_segment(false);

    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    // One word per segment: token timing + word-boundary splitting.
    params.set_token_timestamps(true);
    params.set_split_on_word(true);
    params.set_max_len(1);

    params
}

fn run_whisper_full(ctx: &WhisperContext, opts: &Opts, samples: &[f32]) -> Result<WhisperState> {
    let params = build_full_params(opts);

    let mut state = ctx
        .create_state()
        .context("failed to create whisper state")?;

    state
        .full(params, samples)
        .context("failed to run whisper full()")?;

    Ok(state)
}
