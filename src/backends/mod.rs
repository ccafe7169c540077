//! Built-in [`crate::backend::Transcriber`] implementations.

pub mod whisper;
