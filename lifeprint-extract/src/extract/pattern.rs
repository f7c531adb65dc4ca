//! Regex scan used when no DOM is available or the DOM lookup misses.
//!
//! The container block is the first non-greedy `<ul id=...>...</ul>` match,
//! so a nested `<ul>` ends the block early. Anchors split across odd markup
//! may be missed. Both are accepted limitations of this extractor.
use std::sync::LazyLock;

use lifeprint_common::Result;
use regex::Regex;
use tracing::debug;

use super::{AnchorExtractor, RawAnchor};
use crate::normalize::strip_tags;

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a[^>]*href=["']([^"']+)["'][^>]*>(.*?)</a>"#)
        .expect("anchor pattern compiles")
});

pub struct PatternExtractor {
    container: Regex,
}

impl PatternExtractor {
    pub fn new(container_id: &str) -> Result<Self> {
        let container = Regex::new(&format!(
            r#"(?is)<ul[^>]*id=["']{}["'][^>]*>(.*?)</ul>"#,
            regex::escape(container_id)
        ))?;
        Ok(Self { container })
    }

    /// Inner markup of the first container match, if any.
    fn container_block<'h>(&self, html: &'h str) -> Option<&'h str> {
        self.container
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

impl AnchorExtractor for PatternExtractor {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn anchors(&self, html: &str) -> Option<Vec<RawAnchor>> {
        let block = match self.container_block(html) {
            Some(block) => block,
            None => {
                debug!("extract.pattern.whole_document");
                html
            }
        };

        let anchors = ANCHOR
            .captures_iter(block)
            .map(|caps| RawAnchor {
                href: caps[1].to_string(),
                text: strip_tags(&caps[2]),
            })
            .collect();
        Some(anchors)
    }
}
