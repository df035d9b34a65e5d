//! Property-based tests for recorded timelines.
//!
//! 1. **Sorting**: every sort ends on the sorted input with all positions
//!    marked sorted.
//! 2. **Totality**: any budget yields a non-empty timeline of at most
//!    `budget + 1` snapshots ending in a terminal status.
//! 3. **Matching**: naive search and KMP report exactly the brute-force
//!    set of (possibly overlapping) match offsets.
//! 4. **Determinism**: recording twice gives identical timelines.

use algoscope::recorder::{record, AlgorithmId, Params, RecordConfig};
use algoscope::snapshot::{Payload, Role, Status, Timeline};
use proptest::prelude::*;

const SORTS: [AlgorithmId; 5] = [
    AlgorithmId::BubbleSort,
    AlgorithmId::InsertionSort,
    AlgorithmId::SelectionSort,
    AlgorithmId::QuickSort,
    AlgorithmId::MergeSort,
];

fn small_array() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50i64..50, 1..=16)
}

fn ab_string(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just('A'), Just('B')], 1..=max)
        .prop_map(|chars| chars.into_iter().collect())
}

fn brute_force_matches(text: &str, pattern: &str) -> Vec<usize> {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    (0..=text.len() - pattern.len())
        .filter(|&s| text[s..s + pattern.len()] == pattern[..])
        .collect()
}

fn reported_matches(timeline: &Timeline) -> Vec<usize> {
    match timeline.last().map(|s| &s.payload) {
        Some(Payload::Text { matches, .. }) => matches.clone(),
        other => panic!("expected a text payload, got {:?}", other),
    }
}

proptest! {
    #[test]
    fn every_sort_sorts(values in small_array(), which in 0usize..SORTS.len()) {
        let algorithm = SORTS[which];
        let timeline = record(
            algorithm,
            &Params::Array { values: values.clone() },
            &RecordConfig::default(),
        );
        let mut expected = values.clone();
        expected.sort_unstable();

        let last = timeline.last().unwrap();
        prop_assert_eq!(&last.payload, &Payload::Array { values: expected });
        prop_assert_eq!(last.status, Status::Done);
        let all: Vec<usize> = (0..values.len()).collect();
        prop_assert_eq!(last.marked(Role::Sorted), all.as_slice());
    }
}

proptest! {
    #[test]
    fn sorting_only_permutes_values(values in small_array(), which in 0usize..SORTS.len()) {
        let timeline = record(
            SORTS[which],
            &Params::Array { values: values.clone() },
            &RecordConfig::default(),
        );
        let mut expected = values.clone();
        expected.sort_unstable();
        for snapshot in &timeline {
            // Merge sort shows its scratch writes in place, so only the
            // length is stable for it.
            if let Payload::Array { values: shown } = &snapshot.payload {
                prop_assert_eq!(shown.len(), values.len());
                if SORTS[which] != AlgorithmId::MergeSort {
                    let mut sorted = shown.clone();
                    sorted.sort_unstable();
                    prop_assert_eq!(&sorted, &expected);
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn queens_timeline_is_total(n in 1usize..=8, budget in 1usize..200) {
        let timeline = record(
            AlgorithmId::NQueens,
            &Params::Board { n },
            &RecordConfig { step_budget: budget },
        );
        prop_assert!(!timeline.is_empty());
        prop_assert!(timeline.len() <= budget + 1);
        prop_assert!(timeline.outcome().is_terminal());
        prop_assert_eq!(timeline.is_truncated(), timeline.outcome() == Status::Truncated);
    }
}

proptest! {
    #[test]
    fn any_algorithm_respects_budget(
        which in 0usize..AlgorithmId::ALL.len(),
        budget in 1usize..64,
    ) {
        let algorithm = AlgorithmId::ALL[which];
        let timeline = record(
            algorithm,
            &algorithm.default_params(),
            &RecordConfig { step_budget: budget },
        );
        prop_assert!(timeline.len() <= budget + 1);
        prop_assert!(timeline.outcome().is_terminal());
        let only_last_is_abnormal = timeline
            .iter()
            .take(timeline.len() - 1)
            .all(|s| s.status != Status::Truncated && s.status != Status::Error);
        prop_assert!(only_last_is_abnormal);
    }
}

proptest! {
    #[test]
    fn matchers_agree_with_brute_force(text in ab_string(24), pattern in ab_string(4)) {
        prop_assume!(pattern.chars().count() <= text.chars().count());
        let expected = brute_force_matches(&text, &pattern);
        let params = Params::Text { text, pattern };
        for algorithm in [AlgorithmId::NaiveSearch, AlgorithmId::Kmp] {
            let timeline = record(algorithm, &params, &RecordConfig::default());
            prop_assert_eq!(reported_matches(&timeline), expected.clone());
            let outcome = if expected.is_empty() { Status::NotFound } else { Status::Found };
            prop_assert_eq!(timeline.outcome(), outcome);
        }
    }
}

proptest! {
    #[test]
    fn recording_is_deterministic(values in small_array(), seed in any::<u64>()) {
        let config = RecordConfig::default();
        let array = Params::Array { values };
        prop_assert_eq!(
            record(AlgorithmId::QuickSort, &array, &config),
            record(AlgorithmId::QuickSort, &array, &config)
        );
        let maze = Params::Maze { rows: 5, cols: 7, seed };
        prop_assert_eq!(
            record(AlgorithmId::MazeGeneration, &maze, &config),
            record(AlgorithmId::MazeGeneration, &maze, &config)
        );
    }
}
