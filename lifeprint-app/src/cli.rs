//! Command-line surface and the merge of flags over loaded settings.
use std::path::PathBuf;

use clap::Parser;
use lifeprint_common::ExtractStrategy;
use lifeprint_common::observability::LogFormat;
use lifeprint_config::{ConfigError, DEFAULT_SETTINGS_FILE, IndexSettings, IndexSettingsLoader};
use lifeprint_extract::{ExtractOptions, IndexJob};

#[derive(Debug, Parser)]
#[command(
    name = "lifeprint-index",
    version,
    about = "Extract a title → video id index from a saved Lifeprint page"
)]
pub struct Cli {
    /// Saved page source to read.
    #[arg(long = "in", value_name = "PATH", env = "LIFEPRINT_SOURCE_FILE")]
    pub input: PathBuf,

    /// Where to write the JSON index. Without it a preview is printed instead.
    #[arg(long = "out", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Extra copy of the index (repeatable).
    #[arg(long = "mirror", value_name = "PATH", requires = "output")]
    pub mirrors: Vec<PathBuf>,

    /// Settings file; defaults to ./lifeprint.yaml when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// `id` of the list container.
    #[arg(long, value_name = "ID")]
    pub container_id: Option<String>,

    /// Value for each item's `source` field.
    #[arg(long, value_name = "LABEL")]
    pub source_label: Option<String>,

    /// auto, structural or pattern.
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<ExtractStrategy>,

    /// Items to print when no --out is given.
    #[arg(long = "preview", value_name = "N")]
    pub preview_limit: Option<usize>,

    /// Mirror log events to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory for the rolling log file. Falls back to $LIFEPRINT_LOG_DIR,
    /// then ~/.local/share/lifeprint-index.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// text or json.
    #[arg(
        long,
        value_name = "FORMAT",
        env = "LIFEPRINT_LOG_FORMAT",
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn load_settings(&self) -> Result<IndexSettings, ConfigError> {
        let loader = match &self.config {
            Some(path) => IndexSettingsLoader::new().with_file(path),
            None => IndexSettingsLoader::new().with_optional_file(DEFAULT_SETTINGS_FILE),
        };
        loader.load()
    }

    /// Flags win over settings. Mirrors only apply when an output is given.
    pub fn into_job(self, settings: IndexSettings) -> IndexJob {
        let mirrors = match (&self.output, self.mirrors.is_empty()) {
            (None, _) => Vec::new(),
            (Some(_), true) => settings.mirrors,
            (Some(_), false) => self.mirrors,
        };

        IndexJob {
            input: self.input,
            output: self.output,
            mirrors,
            extract: ExtractOptions {
                container_id: self.container_id.unwrap_or(settings.container_id),
                strategy: self.strategy.unwrap_or(settings.strategy),
            },
            source_label: self.source_label.unwrap_or(settings.source_label),
            preview_limit: self.preview_limit.unwrap_or(settings.preview_limit),
        }
    }
}
