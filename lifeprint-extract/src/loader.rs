//! Reads the saved page from disk.
use std::fs;
use std::path::Path;

use lifeprint_common::{IndexError, Result};
use tracing::{debug, warn};

/// Read `path` as text. Invalid UTF-8 sequences become U+FFFD instead of
/// failing the run.
pub fn load_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| IndexError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                path = %path.display(),
                valid_up_to = err.utf8_error().valid_up_to(),
                "loader.lossy_decode"
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };
    debug!(path = %path.display(), bytes = text.len(), "loader.read");
    Ok(text)
}
