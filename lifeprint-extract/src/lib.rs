//! Builds a title → video id index from a saved Lifeprint page.
//!
//! - Document loading with lossy UTF-8 recovery (`loader`)
//! - DOM and regex anchor extractors behind one trait (`extract`)
//! - Label cleanup (`normalize`)
//! - Shortest-label dedup and title sort (`index`)
//! - JSON file output and stdout preview (`writer`)
//! - The linear run tying them together (`pipeline`)
//!
//! ```
//! use lifeprint_extract::extract::ExtractOptions;
//! use lifeprint_extract::pipeline::build_index_from_html;
//!
//! let html = r#"<ul id="myUL">
//!   <li><a href="https://www.youtube.com/embed/abcdef123456">0242 book mp4</a></li>
//! </ul>"#;
//! let items = build_index_from_html(html, &ExtractOptions::default(), "Lifeprint").unwrap();
//! assert_eq!(items[0].title, "0242 book");
//! assert_eq!(items[0].video_id, "abcdef123456");
//! ```

pub mod extract;
pub mod index;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod writer;

pub use extract::{Entry, ExtractOptions, RawAnchor};
pub use index::IndexItem;
pub use pipeline::{IndexJob, RunSummary, run};
