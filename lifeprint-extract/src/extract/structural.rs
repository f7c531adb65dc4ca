//! DOM-backed extractor built on `scraper`.
use lifeprint_common::{IndexError, Result};
use scraper::{Html, Selector};

use super::{AnchorExtractor, RawAnchor};

pub struct StructuralExtractor {
    container: Selector,
    anchor: Selector,
}

impl StructuralExtractor {
    pub fn new(container_id: &str) -> Result<Self> {
        let css = format!("ul[id=\"{}\"]", escape_css_string(container_id));
        let container = parse_selector(&css)?;
        let anchor = parse_selector("a[href]")?;
        Ok(Self { container, anchor })
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| IndexError::Selector(format!("{css}: {e:?}")))
}

fn escape_css_string(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

impl AnchorExtractor for StructuralExtractor {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn anchors(&self, html: &str) -> Option<Vec<RawAnchor>> {
        let document = Html::parse_document(html);
        let container = document.select(&self.container).next()?;

        let anchors = container
            .select(&self.anchor)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                Some(RawAnchor {
                    href: href.to_string(),
                    text: a.text().collect(),
                })
            })
            .collect();
        Some(anchors)
    }
}
