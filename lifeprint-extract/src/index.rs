//! Deduplication and ordering of extracted entries into the published index.
use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::extract::Entry;

/// One row of `lifeprint-index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexItem {
    pub title: String,
    pub video_id: String,
    /// Never filled in here; consumers must treat it as optional.
    pub duration_sec: Option<u32>,
    pub source: String,
}

/// Keep the shortest label per video id, then sort by case-insensitive title.
///
/// Equal-length labels keep the first one seen. Grouping preserves first-seen
/// order, so items with equal titles come out in extraction order.
pub fn build_index<I>(entries: I, source_label: &str) -> Vec<IndexItem>
where
    I: IntoIterator<Item = Entry>,
{
    let mut by_video: IndexMap<String, String> = IndexMap::new();
    let mut seen = 0usize;

    for Entry { label, video_id } in entries {
        seen += 1;
        match by_video.entry(video_id) {
            MapEntry::Occupied(mut kept) => {
                if label.chars().count() < kept.get().chars().count() {
                    kept.insert(label);
                }
            }
            MapEntry::Vacant(slot) => {
                slot.insert(label);
            }
        }
    }

    let mut items: Vec<IndexItem> = by_video
        .into_iter()
        .map(|(video_id, title)| IndexItem {
            title,
            video_id,
            duration_sec: None,
            source: source_label.to_string(),
        })
        .collect();
    sort_by_title(&mut items);

    info!(entries = seen, items = items.len(), "index.built");
    items
}

/// Stable sort on lowercased title.
pub fn sort_by_title(items: &mut [IndexItem]) {
    items.sort_by_cached_key(|item| item.title.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, video_id: &str) -> Entry {
        Entry {
            label: label.to_string(),
            video_id: video_id.to_string(),
        }
    }

    #[test]
    fn shortest_label_wins_per_video() {
        let items = build_index(
            vec![
                entry("Hello (long version)", "HeLLo_vid01"),
                entry("Hello", "HeLLo_vid01"),
                entry("Hello there", "HeLLo_vid01"),
            ],
            "Lifeprint",
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Hello");
        assert_eq!(items[0].video_id, "HeLLo_vid01");
        assert_eq!(items[0].duration_sec, None);
        assert_eq!(items[0].source, "Lifeprint");
    }

    #[test]
    fn equal_length_keeps_first_seen() {
        let items = build_index(
            vec![entry("cat", "abcdef123456"), entry("dog", "abcdef123456")],
            "Lifeprint",
        );
        assert_eq!(items[0].title, "cat");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let items = build_index(
            vec![entry("café", "abcdef123456"), entry("cafes", "abcdef123456")],
            "Lifeprint",
        );
        assert_eq!(items[0].title, "café");
    }

    #[test]
    fn sorted_case_insensitively() {
        let items = build_index(
            vec![
                entry("thank you", "video000001"),
                entry("Apple", "video000002"),
                entry("banana", "video000003"),
                entry("0242 book", "video000004"),
            ],
            "Lifeprint",
        );
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["0242 book", "Apple", "banana", "thank you"]);
    }

    #[test]
    fn equal_titles_keep_extraction_order() {
        let items = build_index(
            vec![
                entry("Sign", "second00001"),
                entry("sign", "first000001"),
            ],
            "Lifeprint",
        );
        let ids: Vec<_> = items.iter().map(|i| i.video_id.as_str()).collect();
        assert_eq!(ids, vec!["second00001", "first000001"]);
    }

    #[test]
    fn serializes_with_camel_case_and_null_duration() {
        let item = IndexItem {
            title: "book".into(),
            video_id: "abcdef123456".into(),
            duration_sec: None,
            source: "Lifeprint".into(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"title":"book","videoId":"abcdef123456","durationSec":null,"source":"Lifeprint"}"#
        );
    }
}
