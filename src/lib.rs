//! `cueline` — batch transcription to DaVinci Resolve friendly SRT subtitles.
//!
//! This crate provides:
//! - Media decoding to Whisper's input format
//! - Word-level transcription via whisper.cpp
//! - Greedy word-to-cue segmentation with a per-cue character budget
//! - SRT and plain-text output encoders
//! - Batch orchestration with skip-if-done bookkeeping
//!
//! The deterministic core (segmentation, serialization, batch logic) is kept
//! independent of the recognition engine so it can be tested without a model.

// Batch orchestration (most consumers should start here).
pub mod batch;
pub mod opts;

// Word timeline and cue data structures.
pub mod segmenter;
pub mod words;

// Output encoders that serialize cues into subtitle/transcript formats.
pub mod cue_encoder;
pub mod srt_encoder;
pub mod txt_encoder;

// Recognition engine seam and the built-in whisper.cpp backend.
pub mod backend;
pub mod backends;
pub mod model;

// Media decoding to mono 16 kHz samples.
pub mod media;

// Logging configuration.
pub mod logging;

mod error;

pub use error::{Error, Result};
