use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lux_renderer::{tonemap::DEFAULT_KEY, DEFAULT_THREADS};

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lux")]
#[command(about = "Render JSON scene files to PPM images")]
pub struct Args {
    /// Scene files to render, in order
    #[arg(required = true)]
    pub scenes: Vec<PathBuf>,

    /// Directory for rendered images (defaults to the current directory)
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Directory textures are resolved against (defaults to each scene's directory)
    #[arg(long)]
    pub texture_dir: Option<PathBuf>,

    /// Number of render threads, one row chunk each
    #[arg(short = 'j', long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Samples per pixel
    #[arg(short, long, default_value_t = 10)]
    pub samples: u32,

    /// Base random seed
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Reinhard key value for the tone-mapped copy
    #[arg(long, default_value_t = DEFAULT_KEY)]
    pub key: f32,

    /// Skip writing the tone-mapped copy
    #[arg(long)]
    pub no_tonemap: bool,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
