use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cueline::backends::whisper::WhisperBackend;
use cueline::batch::run_batch;
use cueline::model::{ComputeType, Device, ModelSize};
use cueline::opts::Opts;

#[derive(Parser, Debug)]
#[command(name = "cueline")]
#[command(about = "Batch transcribe audio/video files into DaVinci Resolve friendly SRT subtitles")]
struct Cli {
    /// Input directory with audio/video files.
    #[arg(short = 'i', long = "input-dir", default_value = "in")]
    input_dir: PathBuf,

    /// Output directory for SRT and TXT files.
    #[arg(short = 'o', long = "output-dir", default_value = "out")]
    output_dir: PathBuf,

    /// Whisper model size.
    #[arg(short = 'm', long = "model", value_enum, default_value_t = ModelSize::LargeV3)]
    model: ModelSize,

    /// Directory containing ggml model files.
    #[arg(long = "model-dir", default_value = "models")]
    model_dir: PathBuf,

    /// Maximum characters per subtitle cue.
    #[arg(short = 'c', long = "max-chars", default_value_t = 10)]
    max_chars: usize,

    /// Language code ("auto" enables detection).
    #[arg(short = 'l', long = "language", default_value = "ru")]
    language: String,

    /// Device to use for inference.
    #[arg(short = 'd', long = "device", value_enum, default_value_t = Device::Auto)]
    device: Device,

    /// Numeric precision for inference (int8 selects the quantized model file).
    #[arg(long = "compute-type", value_enum, default_value_t = ComputeType::Auto)]
    compute_type: ComputeType,
}

fn main() -> ExitCode {
    cueline::logging::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fatal error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let opts = Opts {
        language: language_hint(&cli.language),
        max_chars: cli.max_chars.max(1),
    };

    println!("Loading Whisper model: {:?}", cli.model);
    let mut backend = WhisperBackend::load(&cli.model_dir, cli.model, cli.compute_type, cli.device)?;

    let summary = run_batch(&mut backend, &cli.input_dir, &cli.output_dir, &opts)?;

    println!("Batch complete.");
    println!("  processed: {:>3}", summary.processed);
    println!("  skipped:   {:>3}", summary.skipped);
    println!("  errored:   {:>3}", summary.errored);

    Ok(())
}

fn language_hint(language: &str) -> Option<String> {
    let language = language.trim();
    if language.is_empty() || language.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(language.to_owned())
    }
}
