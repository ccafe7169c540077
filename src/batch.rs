//! Batch orchestration: directory scanning, skip-if-done bookkeeping, and
//! per-file error isolation.
//!
//! Files are processed strictly one at a time, in name order. One failing
//! file never aborts the batch; it is logged, counted, and left without
//! output so a later run retries it. Outputs are written atomically (temp
//! file + rename) so the skip check never sees a half-written file.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tempfile::NamedTempFile;

use crate::Result;
use crate::backend::Transcriber;
use crate::cue_encoder::CueEncoder;
use crate::opts::Opts;
use crate::segmenter::{Cue, segment_words};
use crate::srt_encoder::SrtEncoder;
use crate::txt_encoder::TxtEncoder;

/// Video container extensions we accept, matched case-insensitively.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "webm", "flv", "wmv", "m4v", "mpg", "mpeg",
];

/// Audio extensions we accept, matched case-insensitively.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "m4a", "flac", "aac", "ogg", "wma", "opus",
];

/// Final counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files transcribed and written this run.
    pub processed: usize,
    /// Files whose outputs already existed.
    pub skipped: usize,
    /// Files that failed; they left no output and will be retried next run.
    pub errored: usize,
}

/// Transcribe every supported media file in `input_dir` into `output_dir`.
///
/// For each input `<stem>.<ext>` we write `<stem>.srt` and `<stem>.txt`; a
/// file is skipped when both outputs already exist. Both directories are
/// created when missing.
pub fn run_batch(
    engine: &mut dyn Transcriber,
    input_dir: &Path,
    output_dir: &Path,
    opts: &Opts,
) -> Result<BatchSummary> {
    fs::create_dir_all(input_dir)
        .with_context(|| format!("failed to create input directory '{}'", input_dir.display()))?;
    fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory '{}'", output_dir.display())
    })?;

    let files = supported_files(input_dir)?;
    if files.is_empty() {
        tracing::warn!(input_dir = %input_dir.display(), "no audio/video files found");
        return Ok(BatchSummary::default());
    }

    tracing::info!(count = files.len(), input_dir = %input_dir.display(), "found files to process");

    let bar = progress_bar(files.len() as u64);
    let mut summary = BatchSummary::default();

    for file_path in &files {
        let name = file_name_lossy(file_path);
        bar.set_message(name.clone());

        let srt_path = derived_output(output_dir, file_path, "srt");
        let txt_path = derived_output(output_dir, file_path, "txt");

        if srt_path.exists() && txt_path.exists() {
            summary.skipped += 1;
            tracing::info!(file = %name, "skipped (already processed)");
            bar.inc(1);
            continue;
        }

        match process_file(engine, file_path, output_dir, &srt_path, &txt_path, opts) {
            Ok(cue_count) => {
                summary.processed += 1;
                tracing::info!(file = %name, cues = cue_count, "completed");
            }
            Err(err) => {
                summary.errored += 1;
                tracing::error!(file = %name, error = %err, "failed");
            }
        }
        bar.inc(1);
    }

    bar.finish_and_clear();
    Ok(summary)
}

/// Enumerate supported media files in `dir`, non-recursively, sorted by name.
pub fn supported_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read input directory '{}'", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read directory entry in '{}'", dir.display()))?
            .path();
        if path.is_file() && has_supported_extension(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str()) || AUDIO_EXTENSIONS.contains(&ext.as_str())
}

fn derived_output(output_dir: &Path, input: &Path, extension: &str) -> PathBuf {
    // Append rather than `with_extension`: a dotted stem like `clip.backup`
    // must become `clip.backup.srt`, not `clip.srt`.
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".");
    name.push(extension);
    output_dir.join(name)
}

/// Transcribe one file and write both outputs atomically.
///
/// Both renders go to temp files inside the output directory first and are
/// persisted only after both fully succeed, so a failure at any point leaves
/// no output and keeps the skip check truthful.
fn process_file(
    engine: &mut dyn Transcriber,
    file_path: &Path,
    output_dir: &Path,
    srt_path: &Path,
    txt_path: &Path,
    opts: &Opts,
) -> Result<usize> {
    let transcript = engine.transcribe(file_path, opts)?;
    tracing::debug!(
        file = %file_name_lossy(file_path),
        language = %transcript.language_code,
        words = transcript.words.len(),
        "transcribed"
    );

    let cues = segment_words(&transcript.words, opts.max_chars);

    let mut srt_tmp = NamedTempFile::new_in(output_dir)
        .context("failed to create temporary output file")?;
    let mut txt_tmp = NamedTempFile::new_in(output_dir)
        .context("failed to create temporary output file")?;

    write_cues(SrtEncoder::new(BufWriter::new(srt_tmp.as_file_mut())), &cues)?;
    write_cues(TxtEncoder::new(BufWriter::new(txt_tmp.as_file_mut())), &cues)?;

    srt_tmp
        .persist(srt_path)
        .with_context(|| format!("failed to persist '{}'", srt_path.display()))?;
    if let Err(err) = txt_tmp.persist(txt_path) {
        // Keep the pair consistent: without the .txt the skip rule would
        // reprocess this file anyway, so don't leave the .srt behind.
        let _ = fs::remove_file(srt_path);
        return Err(anyhow::Error::from(err)
            .context(format!("failed to persist '{}'", txt_path.display()))
            .into());
    }

    Ok(cues.len())
}

fn write_cues(mut encoder: impl CueEncoder, cues: &[Cue]) -> Result<()> {
    for cue in cues {
        encoder.write_cue(cue)?;
    }
    encoder.close()
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert!(has_supported_extension(Path::new("clip.MP4")));
        assert!(has_supported_extension(Path::new("take.wav")));
        assert!(has_supported_extension(Path::new("take.Opus")));
        assert!(!has_supported_extension(Path::new("notes.txt")));
        assert!(!has_supported_extension(Path::new("no_extension")));
    }

    #[test]
    fn derived_output_replaces_extension() {
        let out = derived_output(Path::new("out"), Path::new("in/clip.mp4"), "srt");
        assert_eq!(out, Path::new("out").join("clip.srt"));
    }

    #[test]
    fn derived_output_keeps_dotted_stems_intact() {
        let out = derived_output(Path::new("out"), Path::new("in/clip.backup.mp4"), "txt");
        assert_eq!(out, Path::new("out").join("clip.backup.txt"));
    }
}
