use std::collections::HashSet;

use lifeprint_extract::Entry;
use lifeprint_extract::index::{build_index, sort_by_title};
use lifeprint_extract::normalize::clean_label;
use proptest::prelude::*;

fn entries() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec(
        ("[A-Za-z ]{1,12}", "[a-d]{6}").prop_map(|(label, video_id)| Entry { label, video_id }),
        0..40,
    )
}

proptest! {
    #[test]
    fn video_ids_are_unique(input in entries()) {
        let items = build_index(input.clone(), "Lifeprint");
        let ids: HashSet<_> = items.iter().map(|i| i.video_id.as_str()).collect();
        prop_assert_eq!(ids.len(), items.len());

        let distinct_inputs: HashSet<_> = input.iter().map(|e| e.video_id.as_str()).collect();
        prop_assert_eq!(items.len(), distinct_inputs.len());
    }

    #[test]
    fn output_is_sorted_and_resorting_is_a_no_op(input in entries()) {
        let items = build_index(input, "Lifeprint");
        for pair in items.windows(2) {
            prop_assert!(pair[0].title.to_lowercase() <= pair[1].title.to_lowercase());
        }
        let mut again = items.clone();
        sort_by_title(&mut again);
        prop_assert_eq!(again, items);
    }

    #[test]
    fn winning_title_is_a_shortest_label(input in entries()) {
        let items = build_index(input.clone(), "Lifeprint");
        for item in &items {
            let shortest = input
                .iter()
                .filter(|e| e.video_id == item.video_id)
                .map(|e| e.label.chars().count())
                .min()
                .unwrap();
            prop_assert_eq!(item.title.chars().count(), shortest);
        }
    }

    #[test]
    fn cleaned_labels_have_single_spaces(raw in "[a-z]{1,6}( +[a-z]{1,6}){0,4}") {
        let once = clean_label(&raw);
        prop_assert!(!once.contains("  "));
        prop_assert_eq!(once.trim(), once.as_str());
    }
}
