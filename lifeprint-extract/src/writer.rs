//! JSON output: full index to disk, or a short preview to the data channel.
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use lifeprint_common::{IndexError, Result};
use tracing::{info, warn};

use crate::index::IndexItem;

/// Pretty JSON with two-space indentation; non-ASCII is written as-is.
pub fn render_json(items: &[IndexItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Write already rendered JSON, creating parent directories first.
pub fn write_json(path: &Path, json: &str) -> Result<()> {
    write_json_all([path], json).map(|_| ())
}

/// Write the same JSON to every destination, or to none of them.
///
/// Each copy is staged as `<name>.tmp` beside its destination. Destinations are
/// replaced only after every copy has been staged; on a staging failure the
/// temp files are removed and existing destinations are left untouched.
pub fn write_json_all<'a, I>(paths: I, json: &str) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut staged: Vec<(PathBuf, &Path)> = Vec::new();
    for path in paths {
        // A repeated destination would share its temp file with the first copy.
        if staged.iter().any(|(_, seen)| *seen == path) {
            continue;
        }
        match stage(path, json) {
            Ok(tmp) => staged.push((tmp, path)),
            Err(err) => {
                discard(&staged);
                return Err(err);
            }
        }
    }

    let mut written = Vec::with_capacity(staged.len());
    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(source) = fs::rename(tmp, path) {
            discard(&staged[i..]);
            return Err(IndexError::Output {
                path: path.to_path_buf(),
                source,
            });
        }
        info!(path = %path.display(), bytes = json.len(), "writer.wrote");
        written.push(path.to_path_buf());
    }
    Ok(written)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("lifeprint-index.json"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn stage(path: &Path, json: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| IndexError::Output {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let tmp = temp_path(path);
    fs::write(&tmp, json).map_err(|source| IndexError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(tmp)
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        if let Err(err) = fs::remove_file(tmp) {
            warn!(path = %tmp.display(), error = %err, "writer.discard_failed");
        }
    }
}

pub fn write_index(path: &Path, items: &[IndexItem]) -> Result<()> {
    write_json(path, &render_json(items)?)
}

/// Print at most `limit` items; returns how many were printed.
pub fn write_preview<W: Write>(out: &mut W, items: &[IndexItem], limit: usize) -> Result<usize> {
    let shown = &items[..items.len().min(limit)];
    let json = render_json(shown)?;
    writeln!(out, "{json}").map_err(IndexError::Channel)?;
    Ok(shown.len())
}
