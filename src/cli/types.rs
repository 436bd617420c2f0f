use anyhow::{Context, Result};
use assetembed::{EmbedOptions, Encoding};
use clap::{Args, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use super::config::EmbedConfig;

pub const DEFAULT_PACKAGE: &str = "assets";
pub const DEFAULT_FUNCTION: &str = "load_assets";
pub const DEFAULT_OUTPUT: &str = "assets_generated.rs";

/// Embed a directory of files into a generated Rust source file
///
/// The generated file declares a module with one loader function:
///
///     pub fn load_assets() -> Result<HashMap<&'static str, Vec<u8>>, Box<dyn Error + Send + Sync>>
///
/// Keys are file paths relative to the embedded directory, starting with "/"
/// and using "/" as separator on every platform.
///
/// Available encodings:
/// - quote: escaped byte string
/// - hex: hex-encoded
/// - base64: base64-encoded
/// - zhex: zlib-compressed, hex-encoded
/// - zbase64: zlib-compressed, base64-encoded
#[derive(Parser, Debug)]
#[command(name = "assetembed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a Rust source file embedding every file under DIRECTORY
    Generate(GenerateArgs),

    /// Check that a generated file decodes to the files under DIRECTORY
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory whose files are embedded
    pub directory: PathBuf,

    /// Module name of the generated file (default: assets)
    ///
    /// Can also be set via `ASSETEMBED_PACKAGE`, which build scripts can use
    /// to pass the target module name.
    #[arg(short, long, env = "ASSETEMBED_PACKAGE")]
    pub package: Option<String>,

    /// Name of the loading function (default: load_assets)
    #[arg(short = 'f', long = "func", value_name = "NAME")]
    pub function: Option<String>,

    /// Generated file path, or "-" for stdout (default: assets_generated.rs)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Embedding algorithm (default: quote)
    #[arg(short, long, value_enum)]
    pub encoding: Option<Encoding>,

    /// Encode files on a worker pool instead of one at a time
    #[arg(short, long)]
    pub concurrent: bool,

    /// Worker pool size for --concurrent (default: number of CPUs)
    #[arg(short, long, value_name = "COUNT")]
    pub jobs: Option<NonZeroUsize>,

    /// Load settings from a JSON file
    ///
    /// JSON format (every field optional, flags take precedence):
    /// ```json
    /// {
    ///   "package": "assets",
    ///   "function": "load_assets",
    ///   "output": "src/assets_generated.rs",
    ///   "encoding": "zbase64",
    ///   "concurrent": true,
    ///   "jobs": 4
    /// }
    /// ```
    ///
    /// If not specified, ./assetembed.json is used when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Generated file to check
    pub generated: PathBuf,

    /// Directory the file was generated from
    pub directory: PathBuf,

    /// Only report through the exit status
    #[arg(short, long)]
    pub quiet: bool,
}

/// Fully resolved settings for one generate run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSettings {
    pub directory: PathBuf,
    pub package: String,
    pub function: String,
    pub output: PathBuf,
    pub options: EmbedOptions,
}

impl GenerateSettings {
    /// True when the generated file goes to stdout
    pub fn to_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}

impl GenerateArgs {
    /// Merge flags, config file and defaults
    ///
    /// Priority: explicit flag, then config file, then built-in default.
    pub fn resolve(self) -> Result<GenerateSettings> {
        let config = match self.config {
            Some(ref path) => EmbedConfig::from_file(path)?,
            None => EmbedConfig::discover()
                .context("Failed to load default config file")?
                .unwrap_or_default(),
        };

        let defaults = EmbedOptions::default();
        let options = EmbedOptions {
            encoding: self.encoding.or(config.encoding).unwrap_or(defaults.encoding),
            concurrent: self.concurrent || config.concurrent.unwrap_or(defaults.concurrent),
            workers: self.jobs.or(config.jobs).unwrap_or(defaults.workers),
        };

        Ok(GenerateSettings {
            directory: self.directory,
            package: self
                .package
                .or(config.package)
                .unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
            function: self
                .function
                .or(config.function)
                .unwrap_or_else(|| DEFAULT_FUNCTION.to_string()),
            output: self
                .output
                .or(config.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            options,
        })
    }
}
