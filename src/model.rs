//! Model, device, and compute-type selectors.
//!
//! Why these exist:
//! - We want a single, strongly-typed representation of each selector across
//!   the CLI and library code.
//! - Using enums avoids stringly-typed conditionals and keeps selection
//!   explicit and discoverable.
//!
//! Integration notes:
//! - `ValueEnum` allows each enum to be used directly as a CLI flag with `clap`.
//! - ggml model files bake their numeric precision in, so the compute-type
//!   selector picks a model *file variant* rather than a runtime switch:
//!   `int8` maps to the `-q8_0` quantized file, everything else to the stock
//!   (f16) file.

use std::path::{Path, PathBuf};

use clap::ValueEnum;

/// Whisper model size selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelSize {
    #[value(name = "large-v3")]
    LargeV3,
    Medium,
    Small,
    Base,
    Tiny,
}

impl ModelSize {
    fn file_stem(self) -> &'static str {
        match self {
            Self::LargeV3 => "ggml-large-v3",
            Self::Medium => "ggml-medium",
            Self::Small => "ggml-small",
            Self::Base => "ggml-base",
            Self::Tiny => "ggml-tiny",
        }
    }
}

/// Compute device selector.
///
/// `Auto` prefers the GPU when one is available and falls back to CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Device {
    Auto,
    Cpu,
    Cuda,
}

impl Device {
    /// Whether this selector asks for GPU inference.
    pub fn wants_gpu(self) -> bool {
        matches!(self, Self::Auto | Self::Cuda)
    }

    /// Whether a GPU initialization failure may silently retry on CPU.
    pub fn allows_cpu_fallback(self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// Numeric precision selector for inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComputeType {
    Auto,
    Int8,
    Float16,
    Float32,
}

/// Resolve the on-disk ggml model file for a size/precision pair.
///
/// Stock whisper.cpp model files are f16; `float32` has no separate release
/// file, so it resolves to the stock file as well.
pub fn model_path(models_dir: &Path, size: ModelSize, compute_type: ComputeType) -> PathBuf {
    let file_name = match compute_type {
        ComputeType::Int8 => format!("{}-q8_0.bin", size.file_stem()),
        ComputeType::Auto | ComputeType::Float16 | ComputeType::Float32 => {
            format!("{}.bin", size.file_stem())
        }
    };
    models_dir.join(file_name)
}
