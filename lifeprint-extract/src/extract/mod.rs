//! Anchor extraction from a saved Lifeprint page.
//!
//! Two extractors implement [`AnchorExtractor`]:
//!
//! - [`StructuralExtractor`] parses the document into a DOM and selects the
//!   container by its `id` (cargo feature `structural`, on by default).
//! - [`PatternExtractor`] isolates the container with a regex and scans the
//!   anchors inside it. When the container is missing it scans the whole
//!   document, so it always yields a result.
//!
//! [`extract_entries`] runs the chain picked by [`ExtractStrategy`] and keeps
//! the anchors that carry an embed id and a non-empty cleaned label.
use std::sync::LazyLock;

#[cfg(not(feature = "structural"))]
use lifeprint_common::IndexError;
use lifeprint_common::{DEFAULT_CONTAINER_ID, ExtractStrategy, Result};
use regex::Regex;
use tracing::{debug, warn};

use crate::normalize::clean_label;

mod pattern;
#[cfg(feature = "structural")]
mod structural;

pub use pattern::PatternExtractor;
#[cfg(feature = "structural")]
pub use structural::StructuralExtractor;

static EMBED_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/embed//?([A-Za-z0-9_-]{6,})").expect("embed id pattern compiles")
});

/// An `(href, text)` pair as found in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnchor {
    pub href: String,
    pub text: String,
}

/// A cleaned label paired with the video it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub label: String,
    pub video_id: String,
}

/// Source of anchors scoped to the list container.
pub trait AnchorExtractor {
    fn name(&self) -> &'static str;

    /// Anchors inside the container, or `None` when the container is absent
    /// and this extractor has no fallback of its own.
    fn anchors(&self, html: &str) -> Option<Vec<RawAnchor>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub container_id: String,
    pub strategy: ExtractStrategy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            strategy: ExtractStrategy::Auto,
        }
    }
}

/// Pull the id out of a `/embed/<id>` or `/embed//<id>` link.
///
/// ```
/// use lifeprint_extract::extract::extract_video_id;
///
/// let href = "https://www.youtube.com/embed//IvRwNLNR4_w?rel=0;autoplay=1";
/// assert_eq!(extract_video_id(href), Some("IvRwNLNR4_w"));
/// assert_eq!(extract_video_id("https://www.lifeprint.com/asl101/"), None);
/// ```
pub fn extract_video_id(href: &str) -> Option<&str> {
    EMBED_ID
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Turn an anchor into an entry, dropping it when the link has no embed id
/// or the label cleans to nothing.
pub fn to_entry(anchor: &RawAnchor) -> Option<Entry> {
    let video_id = extract_video_id(&anchor.href)?;
    let label = clean_label(&anchor.text);
    if label.is_empty() {
        return None;
    }
    Some(Entry {
        label,
        video_id: video_id.to_string(),
    })
}

/// Extractors to try in order for the configured strategy.
pub fn extractor_chain(options: &ExtractOptions) -> Result<Vec<Box<dyn AnchorExtractor>>> {
    let mut chain: Vec<Box<dyn AnchorExtractor>> = Vec::new();
    match options.strategy {
        ExtractStrategy::Auto => {
            #[cfg(feature = "structural")]
            chain.push(Box::new(StructuralExtractor::new(&options.container_id)?));
            chain.push(Box::new(PatternExtractor::new(&options.container_id)?));
        }
        ExtractStrategy::Structural => {
            #[cfg(feature = "structural")]
            chain.push(Box::new(StructuralExtractor::new(&options.container_id)?));
            #[cfg(not(feature = "structural"))]
            return Err(IndexError::StrategyUnavailable("structural"));
        }
        ExtractStrategy::Pattern => {
            chain.push(Box::new(PatternExtractor::new(&options.container_id)?));
        }
    }
    Ok(chain)
}

/// Collect the raw anchors from the first extractor that finds the container.
pub fn extract_anchors(html: &str, options: &ExtractOptions) -> Result<Vec<RawAnchor>> {
    let chain = extractor_chain(options)?;
    for extractor in &chain {
        match extractor.anchors(html) {
            Some(anchors) => {
                debug!(
                    extractor = extractor.name(),
                    anchors = anchors.len(),
                    "extract.strategy"
                );
                return Ok(anchors);
            }
            None => debug!(
                extractor = extractor.name(),
                container = %options.container_id,
                "extract.container_missing"
            ),
        }
    }
    warn!(
        container = %options.container_id,
        strategy = %options.strategy,
        "extract.no_anchors"
    );
    Ok(Vec::new())
}

pub fn extract_entries(html: &str, options: &ExtractOptions) -> Result<Vec<Entry>> {
    let anchors = extract_anchors(html, options)?;
    let entries: Vec<Entry> = anchors.iter().filter_map(to_entry).collect();
    debug!(
        anchors = anchors.len(),
        entries = entries.len(),
        "extract.entries"
    );
    Ok(entries)
}
