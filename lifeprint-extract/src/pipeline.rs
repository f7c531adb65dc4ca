//! The whole run: load, extract, dedupe/sort, then write or preview.
use std::io::Write;
use std::path::PathBuf;

use lifeprint_common::{DEFAULT_PREVIEW_LIMIT, DEFAULT_SOURCE_LABEL, IndexError, Result};
use tracing::{info, warn};

use crate::extract::{ExtractOptions, extract_entries};
use crate::index::{IndexItem, build_index};
use crate::loader::load_document;
use crate::writer::{render_json, write_json_all, write_preview};

/// Everything a single run needs, already merged from CLI, env and file.
#[derive(Debug, Clone)]
pub struct IndexJob {
    pub input: PathBuf,
    /// `None` means preview only; nothing is written to disk.
    pub output: Option<PathBuf>,
    /// Extra copies written next to `output`. Ignored in preview mode.
    pub mirrors: Vec<PathBuf>,
    pub extract: ExtractOptions,
    pub source_label: String,
    pub preview_limit: usize,
}

impl IndexJob {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            mirrors: Vec::new(),
            extract: ExtractOptions::default(),
            source_label: DEFAULT_SOURCE_LABEL.to_string(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub items: usize,
    pub written: Vec<PathBuf>,
    pub previewed: usize,
}

/// Extract and build the index from an in-memory document.
pub fn build_index_from_html(
    html: &str,
    extract: &ExtractOptions,
    source_label: &str,
) -> Result<Vec<IndexItem>> {
    let entries = extract_entries(html, extract)?;
    Ok(build_index(entries, source_label))
}

/// Run a job. JSON previews go to `data`; `[ok]` lines go to `status`.
pub fn run<D, S>(job: &IndexJob, data: &mut D, status: &mut S) -> Result<RunSummary>
where
    D: Write,
    S: Write,
{
    let html = load_document(&job.input)?;
    let items = build_index_from_html(&html, &job.extract, &job.source_label)?;
    writeln!(status, "[ok] extracted {} unique video mappings", items.len())
        .map_err(IndexError::Channel)?;

    let mut summary = RunSummary {
        items: items.len(),
        ..RunSummary::default()
    };

    match &job.output {
        Some(output) => {
            let json = render_json(&items)?;
            let destinations = std::iter::once(output)
                .chain(job.mirrors.iter())
                .map(PathBuf::as_path);
            summary.written = write_json_all(destinations, &json)?;
            for path in &summary.written {
                writeln!(status, "[ok] wrote JSON → {}", path.display())
                    .map_err(IndexError::Channel)?;
            }
        }
        None => {
            if !job.mirrors.is_empty() {
                warn!(mirrors = job.mirrors.len(), "pipeline.mirrors_ignored");
            }
            summary.previewed = write_preview(data, &items, job.preview_limit)?;
        }
    }

    info!(
        input = %job.input.display(),
        items = summary.items,
        written = summary.written.len(),
        previewed = summary.previewed,
        "pipeline.done"
    );
    Ok(summary)
}
