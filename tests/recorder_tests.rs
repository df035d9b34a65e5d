// Integration tests for recording algorithm timelines

use algoscope::recorder::{record, AlgorithmId, Params, RecordConfig};
use algoscope::snapshot::{Payload, Role, Status, Timeline, VarValue};

fn run(algorithm: AlgorithmId, params: Params) -> Timeline {
    record(algorithm, &params, &RecordConfig::default())
}

#[test]
fn test_every_sort_ends_sorted() {
    let sorts = [
        AlgorithmId::BubbleSort,
        AlgorithmId::InsertionSort,
        AlgorithmId::SelectionSort,
        AlgorithmId::QuickSort,
        AlgorithmId::MergeSort,
    ];
    for algorithm in sorts {
        let timeline = run(
            algorithm,
            Params::Array {
                values: vec![5, 3, 8, 1],
            },
        );
        let last = timeline.last().expect("timeline is never empty");
        assert_eq!(
            last.payload,
            Payload::Array {
                values: vec![1, 3, 5, 8]
            },
            "{} left the array unsorted",
            algorithm.name()
        );
        assert_eq!(last.marked(Role::Sorted), &[0, 1, 2, 3]);
        assert_eq!(last.status, Status::Done);
    }
}

#[test]
fn test_linear_search_reports_one_hit() {
    let timeline = run(
        AlgorithmId::LinearSearch,
        Params::Search {
            values: vec![9, 4, 7, 2],
            target: 7,
        },
    );
    let found: Vec<_> = timeline
        .iter()
        .filter(|s| s.status == Status::Found)
        .collect();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].marked(Role::Found), &[2]);
    assert_eq!(timeline.outcome(), Status::Found);
}

#[test]
fn test_linear_search_miss() {
    let timeline = run(
        AlgorithmId::LinearSearch,
        Params::Search {
            values: vec![9, 4, 7, 2],
            target: 5,
        },
    );
    assert_eq!(timeline.outcome(), Status::NotFound);
    assert!(timeline.iter().all(|s| s.marked(Role::Found).is_empty()));
}

#[test]
fn test_binary_search_window_shrinks() {
    let timeline = run(
        AlgorithmId::BinarySearch,
        Params::Search {
            values: vec![1, 3, 5, 7, 9, 11],
            target: 7,
        },
    );

    let int = |v: Option<&VarValue>| match v {
        Some(VarValue::Int(n)) => *n,
        other => panic!("expected an integer, got {:?}", other),
    };
    let bounds: Vec<(i64, i64)> = timeline
        .iter()
        .map(|s| (int(s.variable("low")), int(s.variable("high"))))
        .collect();
    for pair in bounds.windows(2) {
        assert!(pair[1].0 >= pair[0].0, "low moved left: {:?}", pair);
        assert!(pair[1].1 <= pair[0].1, "high moved right: {:?}", pair);
    }

    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Found);
    assert_eq!(last.marked(Role::Found), &[3]);
    assert_eq!(last.variable("mid"), Some(&VarValue::Int(3)));
}

#[test]
fn test_binary_search_rejects_unsorted_input() {
    let timeline = run(
        AlgorithmId::BinarySearch,
        Params::Search {
            values: vec![1, 5, 3],
            target: 3,
        },
    );
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.outcome(), Status::Error);
}

#[test]
fn test_gcd_of_48_and_18() {
    let timeline = run(AlgorithmId::Gcd, Params::Pair { a: 48, b: 18 });
    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Done);
    assert_eq!(last.variable("result"), Some(&VarValue::Int(6)));
}

#[test]
fn test_gcd_of_zeroes_is_invalid() {
    let timeline = run(AlgorithmId::Gcd, Params::Pair { a: 0, b: 0 });
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.outcome(), Status::Error);
}

#[test]
fn test_naive_search_finds_both_matches() {
    let timeline = run(
        AlgorithmId::NaiveSearch,
        Params::Text {
            text: "CABAB".to_string(),
            pattern: "AB".to_string(),
        },
    );
    match &timeline.last().unwrap().payload {
        Payload::Text { matches, .. } => assert_eq!(matches, &vec![1, 3]),
        other => panic!("unexpected payload {:?}", other),
    }
    assert_eq!(timeline.outcome(), Status::Found);
    let announced = timeline
        .iter()
        .filter(|s| s.narration.starts_with("Match at index"))
        .count();
    assert_eq!(announced, 2);
}

#[test]
fn test_invalid_text_input_yields_single_error_snapshot() {
    let cases = [("AB", "ABC"), ("", "A"), ("ABC", "")];
    for (text, pattern) in cases {
        for algorithm in [AlgorithmId::NaiveSearch, AlgorithmId::Kmp] {
            let timeline = run(
                algorithm,
                Params::Text {
                    text: text.to_string(),
                    pattern: pattern.to_string(),
                },
            );
            assert_eq!(timeline.len(), 1);
            let only = timeline.first().unwrap();
            assert_eq!(only.status, Status::Error);
            assert!(only.narration.starts_with("Invalid input"));
            assert_eq!(only.payload, Payload::Empty);
        }
    }
}

#[test]
fn test_mismatched_params_are_reported() {
    let timeline = run(AlgorithmId::BubbleSort, Params::Board { n: 4 });
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.outcome(), Status::Error);
    assert!(timeline.first().unwrap().narration.contains("Bubble sort"));
}

#[test]
fn test_recording_is_deterministic() {
    for algorithm in AlgorithmId::ALL {
        let params = algorithm.default_params();
        assert_eq!(
            run(algorithm, params.clone()),
            run(algorithm, params),
            "{} differs between runs",
            algorithm.name()
        );
    }
}

#[test]
fn test_samples_finish_within_budget() {
    let config = RecordConfig::default();
    for algorithm in AlgorithmId::ALL {
        let timeline = record(algorithm, &algorithm.default_params(), &config);
        assert!(timeline.len() <= config.step_budget + 1);
        assert!(
            timeline.outcome().is_terminal(),
            "{} ended without a terminal status",
            algorithm.name()
        );
        assert_ne!(
            timeline.outcome(),
            Status::Error,
            "{} rejected its own sample",
            algorithm.name()
        );
        for snapshot in &timeline {
            if let Some(line) = snapshot.source_line {
                assert!(line < algorithm.pseudocode().len());
            }
        }
    }
}

#[test]
fn test_eight_queens_solved_within_budget() {
    let timeline = run(AlgorithmId::NQueens, Params::Board { n: 8 });
    assert!(!timeline.is_truncated());
    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Found);
    assert_eq!(last.marked(Role::Found).len(), 8);
}

#[test]
fn test_small_budget_truncates_search() {
    let config = RecordConfig { step_budget: 50 };
    let timeline = record(AlgorithmId::NQueens, &Params::Board { n: 8 }, &config);
    assert!(timeline.is_truncated());
    assert_eq!(timeline.len(), 51);
    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Truncated);
    assert!(last.narration.contains("step budget"));
    assert_eq!(last.variable("steps"), Some(&VarValue::Int(50)));
}

#[test]
fn test_three_queens_has_no_solution() {
    let timeline = run(AlgorithmId::NQueens, Params::Board { n: 3 });
    assert_eq!(timeline.outcome(), Status::NotFound);
}

#[test]
fn test_maze_is_reproducible_per_seed() {
    let maze = |seed| {
        run(
            AlgorithmId::MazeGeneration,
            Params::Maze {
                rows: 6,
                cols: 10,
                seed,
            },
        )
    };
    assert_eq!(maze(7), maze(7));
    assert_ne!(
        maze(7).last().unwrap().payload,
        maze(8).last().unwrap().payload
    );
}

#[test]
fn test_dijkstra_finds_cheapest_path() {
    let timeline = run(AlgorithmId::Dijkstra, AlgorithmId::Dijkstra.default_params());
    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Found);
    assert_eq!(last.variable("distance"), Some(&VarValue::Int(16)));
    assert_eq!(last.marked(Role::Path), &[0, 2, 4, 5, 6, 7]);
}

#[test]
fn test_graph_with_dangling_edge_is_invalid() {
    let timeline = run(
        AlgorithmId::BreadthFirst,
        Params::Graph {
            nodes: 2,
            edges: vec![algoscope::snapshot::Edge {
                from: 0,
                to: 5,
                weight: 1,
            }],
            start: 0,
            target: None,
        },
    );
    assert_eq!(timeline.outcome(), Status::Error);
}

#[test]
fn test_dynamic_programming_results() {
    let fib = run(AlgorithmId::Fibonacci, Params::Fibonacci { n: 12 });
    assert_eq!(fib.last().unwrap().variable("result"), Some(&VarValue::Int(144)));

    let knapsack = run(AlgorithmId::Knapsack, AlgorithmId::Knapsack.default_params());
    assert_eq!(knapsack.last().unwrap().variable("best"), Some(&VarValue::Int(9)));

    let lcs = run(AlgorithmId::Lcs, AlgorithmId::Lcs.default_params());
    match lcs.last().unwrap().variable("lcs") {
        Some(VarValue::Text(s)) => assert_eq!(s.chars().count(), 4),
        other => panic!("unexpected lcs variable {:?}", other),
    }
}

#[test]
fn test_sieve_and_mod_pow() {
    let sieve = run(AlgorithmId::Sieve, Params::Bound { limit: 20 });
    let last = sieve.last().unwrap();
    assert_eq!(last.marked(Role::Prime), &[2, 3, 5, 7, 11, 13, 17, 19]);
    assert_eq!(last.variable("count"), Some(&VarValue::Int(8)));

    let power = run(
        AlgorithmId::ModPow,
        Params::Power {
            base: 2,
            exponent: 10,
            modulus: 1000,
        },
    );
    assert_eq!(
        power.last().unwrap().variable("result"),
        Some(&VarValue::Int(24))
    );
}

#[test]
fn test_convex_hull_of_a_square() {
    use algoscope::snapshot::Point;
    let timeline = run(
        AlgorithmId::ConvexHull,
        Params::Points {
            points: vec![
                Point::new(1.0, 1.0),
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(2.0, 2.0),
                Point::new(0.0, 2.0),
            ],
        },
    );
    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Done);
    assert_eq!(last.marked(Role::Hull), &[1, 2, 3, 4]);
    assert_eq!(last.variable("hull size"), Some(&VarValue::Int(4)));
}

fn graph_order(timeline: &Timeline) -> Vec<usize> {
    match &timeline.last().unwrap().payload {
        Payload::Graph { order, .. } => order.clone(),
        other => panic!("unexpected payload {:?}", other),
    }
}

#[test]
fn test_oversized_edge_weight_is_invalid() {
    use algoscope::algorithms::graph::MAX_WEIGHT;
    use algoscope::snapshot::Edge;
    for weight in [MAX_WEIGHT + 1, u64::MAX] {
        let timeline = run(
            AlgorithmId::Dijkstra,
            Params::Graph {
                nodes: 3,
                edges: vec![
                    Edge {
                        from: 0,
                        to: 1,
                        weight: 1,
                    },
                    Edge {
                        from: 1,
                        to: 2,
                        weight,
                    },
                ],
                start: 0,
                target: Some(2),
            },
        );
        assert_eq!(timeline.len(), 1);
        let only = timeline.first().unwrap();
        assert_eq!(only.status, Status::Error);
        assert!(only.narration.contains("edge weight"));
    }
}

#[test]
fn test_heaviest_allowed_weights_still_sum() {
    use algoscope::algorithms::graph::MAX_WEIGHT;
    use algoscope::snapshot::Edge;
    let edges = (0..25)
        .map(|n| Edge {
            from: n,
            to: n + 1,
            weight: MAX_WEIGHT,
        })
        .collect();
    let timeline = run(
        AlgorithmId::Dijkstra,
        Params::Graph {
            nodes: 26,
            edges,
            start: 0,
            target: Some(25),
        },
    );
    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Found);
    assert_eq!(
        last.variable("distance"),
        Some(&VarValue::Int(25 * MAX_WEIGHT as i64))
    );
}

#[test]
fn test_breadth_first_visits_level_by_level() {
    let timeline = run(
        AlgorithmId::BreadthFirst,
        AlgorithmId::BreadthFirst.default_params(),
    );
    assert_eq!(graph_order(&timeline), vec![0, 1, 2, 3, 4, 5, 6, 7]);
    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Found);
    assert_eq!(last.marked(Role::Path), &[0, 1, 3, 5, 7]);
}

#[test]
fn test_depth_first_follows_lowest_neighbour_first() {
    let timeline = run(
        AlgorithmId::DepthFirst,
        AlgorithmId::DepthFirst.default_params(),
    );
    assert_eq!(graph_order(&timeline), vec![0, 1, 2, 4, 3, 5, 6, 7]);
    assert_eq!(timeline.outcome(), Status::Found);
}

#[test]
fn test_disconnected_target_is_not_found() {
    use algoscope::snapshot::Edge;
    for algorithm in [
        AlgorithmId::BreadthFirst,
        AlgorithmId::DepthFirst,
        AlgorithmId::Dijkstra,
    ] {
        let timeline = run(
            algorithm,
            Params::Graph {
                nodes: 3,
                edges: vec![Edge {
                    from: 0,
                    to: 1,
                    weight: 2,
                }],
                start: 0,
                target: Some(2),
            },
        );
        let last = timeline.last().unwrap();
        assert_eq!(last.status, Status::NotFound, "{}", algorithm.name());
        assert!(last.narration.contains("unreachable"));
        assert!(last.marked(Role::Path).is_empty());
        assert_eq!(graph_order(&timeline), vec![0, 1]);
    }
}

#[test]
fn test_subset_sum_found_and_not_found() {
    let found = run(
        AlgorithmId::SubsetSum,
        AlgorithmId::SubsetSum.default_params(),
    );
    let last = found.last().unwrap();
    assert_eq!(last.status, Status::Found);
    assert_eq!(last.marked(Role::Found), &[0, 2, 5]);
    assert_eq!(last.variable("sum"), Some(&VarValue::Int(9)));
    assert_eq!(last.narration, "3 + 4 + 2 = 9");

    let missing = run(
        AlgorithmId::SubsetSum,
        Params::SubsetSum {
            values: vec![2, 4, 6],
            target: 5,
        },
    );
    assert_eq!(missing.outcome(), Status::NotFound);
    assert!(missing.last().unwrap().marked(Role::Found).is_empty());
}

#[test]
fn test_subset_sum_of_zero_uses_the_empty_subset() {
    let timeline = run(
        AlgorithmId::SubsetSum,
        Params::SubsetSum {
            values: vec![3, 5],
            target: 0,
        },
    );
    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Found);
    assert!(last.marked(Role::Found).is_empty());
    assert!(last.narration.starts_with("The empty subset"));
}

#[test]
fn test_subset_sum_truncates_on_small_budget() {
    let config = RecordConfig { step_budget: 20 };
    let timeline = record(
        AlgorithmId::SubsetSum,
        &Params::SubsetSum {
            values: vec![1; 20],
            target: 1_000,
        },
        &config,
    );
    assert!(timeline.is_truncated());
    assert_eq!(timeline.len(), 21);
    assert_eq!(timeline.outcome(), Status::Truncated);
}

#[test]
fn test_hard_sudoku_stops_at_the_budget() {
    let puzzle = "000000010400000000020000000000050407008000300001090000300400200050100000000806000";
    let cells = puzzle.bytes().map(|b| b - b'0').collect();
    let config = RecordConfig::default();
    let timeline = record(AlgorithmId::Sudoku, &Params::Sudoku { cells }, &config);
    assert!(timeline.is_truncated());
    assert_eq!(timeline.len(), config.step_budget + 1);
    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Truncated);
    assert_eq!(
        last.narration,
        format!("Stopped after {} steps (step budget reached)", config.step_budget)
    );
}

#[test]
fn test_truncated_sort_keeps_its_array() {
    let config = RecordConfig { step_budget: 5 };
    let timeline = record(
        AlgorithmId::BubbleSort,
        &AlgorithmId::BubbleSort.default_params(),
        &config,
    );
    let last = timeline.last().unwrap();
    assert_eq!(last.status, Status::Truncated);
    assert!(matches!(last.payload, Payload::Array { .. }));
    assert!(!last.narration.contains("solution"));
}

#[test]
fn test_kmp_reports_overlapping_matches() {
    let timeline = run(
        AlgorithmId::Kmp,
        Params::Text {
            text: "ABABABA".to_string(),
            pattern: "ABA".to_string(),
        },
    );
    match &timeline.last().unwrap().payload {
        Payload::Text { matches, .. } => assert_eq!(matches, &vec![0, 2, 4]),
        other => panic!("unexpected payload {:?}", other),
    }
    assert_eq!(timeline.outcome(), Status::Found);
}
