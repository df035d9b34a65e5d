//! Recording entrypoint
//!
//! [`record`] is the single door between the presentation layer and the
//! instrumented algorithms. It is total: whatever the parameters, it returns
//! a non-empty [`Timeline`].
//!
//! - valid parameters run the algorithm to completion, one snapshot per
//!   meaningful transition
//! - invalid parameters yield a one-snapshot timeline with `Status::Error`
//! - runs that hit the step budget end with one `Status::Truncated`
//!   snapshot

pub mod errors;

use crate::algorithms::{
    backtracking, dynamic, geometry, graph, number_theory, searching, sorting, strings,
};
use crate::snapshot::{Edge, Point, Recorder, Snapshot, StepBudgetExceeded, Timeline};
pub use errors::InputError;
use tracing::{info, info_span, warn};

/// Default cap on recorded snapshots per run
pub const DEFAULT_STEP_BUDGET: usize = 10_000;

/// Algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Sorting,
    Searching,
    Graph,
    DynamicProgramming,
    Backtracking,
    StringMatching,
    NumberTheory,
    Geometry,
}

impl Family {
    pub fn name(self) -> &'static str {
        match self {
            Family::Sorting => "Sorting",
            Family::Searching => "Searching",
            Family::Graph => "Graph traversal",
            Family::DynamicProgramming => "Dynamic programming",
            Family::Backtracking => "Backtracking",
            Family::StringMatching => "String matching",
            Family::NumberTheory => "Number theory",
            Family::Geometry => "Geometry",
        }
    }
}

/// Every algorithm that can be recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AlgorithmId {
    BubbleSort,
    InsertionSort,
    SelectionSort,
    QuickSort,
    MergeSort,
    LinearSearch,
    BinarySearch,
    BreadthFirst,
    DepthFirst,
    Dijkstra,
    Fibonacci,
    Lcs,
    Knapsack,
    NQueens,
    SubsetSum,
    Sudoku,
    MazeGeneration,
    NaiveSearch,
    Kmp,
    Gcd,
    Sieve,
    ModPow,
    ConvexHull,
}

impl AlgorithmId {
    /// Cycling order used by the UI
    pub const ALL: [AlgorithmId; 23] = [
        AlgorithmId::BubbleSort,
        AlgorithmId::InsertionSort,
        AlgorithmId::SelectionSort,
        AlgorithmId::QuickSort,
        AlgorithmId::MergeSort,
        AlgorithmId::LinearSearch,
        AlgorithmId::BinarySearch,
        AlgorithmId::BreadthFirst,
        AlgorithmId::DepthFirst,
        AlgorithmId::Dijkstra,
        AlgorithmId::Fibonacci,
        AlgorithmId::Lcs,
        AlgorithmId::Knapsack,
        AlgorithmId::NQueens,
        AlgorithmId::SubsetSum,
        AlgorithmId::Sudoku,
        AlgorithmId::MazeGeneration,
        AlgorithmId::NaiveSearch,
        AlgorithmId::Kmp,
        AlgorithmId::Gcd,
        AlgorithmId::Sieve,
        AlgorithmId::ModPow,
        AlgorithmId::ConvexHull,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmId::BubbleSort => "Bubble sort",
            AlgorithmId::InsertionSort => "Insertion sort",
            AlgorithmId::SelectionSort => "Selection sort",
            AlgorithmId::QuickSort => "Quick sort",
            AlgorithmId::MergeSort => "Merge sort",
            AlgorithmId::LinearSearch => "Linear search",
            AlgorithmId::BinarySearch => "Binary search",
            AlgorithmId::BreadthFirst => "Breadth-first search",
            AlgorithmId::DepthFirst => "Depth-first search",
            AlgorithmId::Dijkstra => "Dijkstra",
            AlgorithmId::Fibonacci => "Fibonacci table",
            AlgorithmId::Lcs => "Longest common subsequence",
            AlgorithmId::Knapsack => "0/1 knapsack",
            AlgorithmId::NQueens => "N-Queens",
            AlgorithmId::SubsetSum => "Subset sum",
            AlgorithmId::Sudoku => "Sudoku",
            AlgorithmId::MazeGeneration => "Maze generation",
            AlgorithmId::NaiveSearch => "Naive string search",
            AlgorithmId::Kmp => "Knuth-Morris-Pratt",
            AlgorithmId::Gcd => "Euclid's gcd",
            AlgorithmId::Sieve => "Sieve of Eratosthenes",
            AlgorithmId::ModPow => "Modular exponentiation",
            AlgorithmId::ConvexHull => "Convex hull",
        }
    }

    pub fn family(self) -> Family {
        use AlgorithmId::*;
        match self {
            BubbleSort | InsertionSort | SelectionSort | QuickSort | MergeSort => Family::Sorting,
            LinearSearch | BinarySearch => Family::Searching,
            BreadthFirst | DepthFirst | Dijkstra => Family::Graph,
            Fibonacci | Lcs | Knapsack => Family::DynamicProgramming,
            NQueens | SubsetSum | Sudoku | MazeGeneration => Family::Backtracking,
            NaiveSearch | Kmp => Family::StringMatching,
            Gcd | Sieve | ModPow => Family::NumberTheory,
            ConvexHull => Family::Geometry,
        }
    }

    /// Pseudocode listing indexed by `Snapshot::source_line`
    pub fn pseudocode(self) -> &'static [&'static str] {
        use AlgorithmId::*;
        match self {
            BubbleSort => sorting::BUBBLE_SORT_CODE,
            InsertionSort => sorting::INSERTION_SORT_CODE,
            SelectionSort => sorting::SELECTION_SORT_CODE,
            QuickSort => sorting::QUICK_SORT_CODE,
            MergeSort => sorting::MERGE_SORT_CODE,
            LinearSearch => searching::LINEAR_SEARCH_CODE,
            BinarySearch => searching::BINARY_SEARCH_CODE,
            BreadthFirst => graph::BFS_CODE,
            DepthFirst => graph::DFS_CODE,
            Dijkstra => graph::DIJKSTRA_CODE,
            Fibonacci => dynamic::FIBONACCI_CODE,
            Lcs => dynamic::LCS_CODE,
            Knapsack => dynamic::KNAPSACK_CODE,
            NQueens => backtracking::N_QUEENS_CODE,
            SubsetSum => backtracking::SUBSET_SUM_CODE,
            Sudoku => backtracking::SUDOKU_CODE,
            MazeGeneration => backtracking::MAZE_CODE,
            NaiveSearch => strings::NAIVE_CODE,
            Kmp => strings::KMP_CODE,
            Gcd => number_theory::GCD_CODE,
            Sieve => number_theory::SIEVE_CODE,
            ModPow => number_theory::MOD_POW_CODE,
            ConvexHull => geometry::HULL_CODE,
        }
    }

    /// Sample parameters shown when an algorithm is first selected
    pub fn default_params(self) -> Params {
        use AlgorithmId::*;
        match self {
            BubbleSort | InsertionSort | SelectionSort | QuickSort | MergeSort => Params::Array {
                values: vec![38, 27, 43, 3, 9, 82, 10, 15],
            },
            LinearSearch => Params::Search {
                values: vec![9, 4, 7, 2, 11, 5],
                target: 2,
            },
            BinarySearch => Params::Search {
                values: vec![1, 3, 5, 7, 9, 11, 13, 15],
                target: 11,
            },
            BreadthFirst | DepthFirst | Dijkstra => graph::sample_graph(),
            Fibonacci => Params::Fibonacci { n: 12 },
            Lcs => Params::Strings {
                a: "ABCBDAB".to_string(),
                b: "BDCABA".to_string(),
            },
            Knapsack => Params::Knapsack {
                weights: vec![1, 3, 4, 5],
                values: vec![1, 4, 5, 7],
                capacity: 7,
            },
            NQueens => Params::Board { n: 8 },
            SubsetSum => Params::SubsetSum {
                values: vec![3, 34, 4, 12, 5, 2],
                target: 9,
            },
            Sudoku => Params::Sudoku {
                cells: backtracking::SAMPLE_SUDOKU.to_vec(),
            },
            MazeGeneration => Params::Maze {
                rows: 6,
                cols: 10,
                seed: 42,
            },
            NaiveSearch | Kmp => Params::Text {
                text: "ABABDABACDABABCABAB".to_string(),
                pattern: "ABABCABAB".to_string(),
            },
            Gcd => Params::Pair { a: 48, b: 18 },
            Sieve => Params::Bound { limit: 60 },
            ModPow => Params::Power {
                base: 7,
                exponent: 13,
                modulus: 11,
            },
            ConvexHull => Params::RandomPoints { count: 16, seed: 42 },
        }
    }
}

/// Algorithm-specific parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Array {
        values: Vec<i64>,
    },
    Search {
        values: Vec<i64>,
        target: i64,
    },
    Graph {
        nodes: usize,
        edges: Vec<Edge>,
        start: usize,
        target: Option<usize>,
    },
    Fibonacci {
        n: usize,
    },
    Strings {
        a: String,
        b: String,
    },
    Knapsack {
        weights: Vec<u64>,
        values: Vec<u64>,
        capacity: u64,
    },
    Board {
        n: usize,
    },
    SubsetSum {
        values: Vec<i64>,
        target: i64,
    },
    Sudoku {
        cells: Vec<u8>,
    },
    Maze {
        rows: usize,
        cols: usize,
        seed: u64,
    },
    Text {
        text: String,
        pattern: String,
    },
    Pair {
        a: u64,
        b: u64,
    },
    Bound {
        limit: usize,
    },
    Power {
        base: u64,
        exponent: u64,
        modulus: u64,
    },
    Points {
        points: Vec<Point>,
    },
    RandomPoints {
        count: usize,
        seed: u64,
    },
}

impl Params {
    /// Human-readable name of the parameter shape
    pub fn kind(&self) -> &'static str {
        match self {
            Params::Array { .. } => "array",
            Params::Search { .. } => "array + target",
            Params::Graph { .. } => "graph",
            Params::Fibonacci { .. } => "n",
            Params::Strings { .. } => "two strings",
            Params::Knapsack { .. } => "knapsack",
            Params::Board { .. } => "board size",
            Params::SubsetSum { .. } => "values + target",
            Params::Sudoku { .. } => "sudoku grid",
            Params::Maze { .. } => "maze size + seed",
            Params::Text { .. } => "text + pattern",
            Params::Pair { .. } => "two operands",
            Params::Bound { .. } => "upper bound",
            Params::Power { .. } => "base, exponent, modulus",
            Params::Points { .. } | Params::RandomPoints { .. } => "point set",
        }
    }

    /// Whether the parameters draw on a random source
    pub fn is_random(&self) -> bool {
        matches!(self, Params::Maze { .. } | Params::RandomPoints { .. })
    }

    /// Copy with the random seed replaced; non-random parameters are unchanged
    pub fn reseeded(&self, new_seed: u64) -> Params {
        match self {
            Params::Maze { rows, cols, .. } => Params::Maze {
                rows: *rows,
                cols: *cols,
                seed: new_seed,
            },
            Params::RandomPoints { count, .. } => Params::RandomPoints {
                count: *count,
                seed: new_seed,
            },
            other => other.clone(),
        }
    }
}

/// Recording options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordConfig {
    pub step_budget: usize,
}

impl Default for RecordConfig {
    fn default() -> Self {
        RecordConfig {
            step_budget: DEFAULT_STEP_BUDGET,
        }
    }
}

/// Why a run stopped early
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Budget(#[from] StepBudgetExceeded),
}

/// Run `algorithm` on `params` and return its frozen timeline
pub fn record(algorithm: AlgorithmId, params: &Params, config: &RecordConfig) -> Timeline {
    let span = info_span!("record", algorithm = algorithm.name());
    let _enter = span.enter();

    let mut recorder = Recorder::new(config.step_budget);
    match run(algorithm, params, &mut recorder) {
        Ok(()) => {
            info!(snapshots = recorder.len(), "recording complete");
        }
        Err(RunError::Budget(exceeded)) => {
            warn!(limit = exceeded.limit, "step budget exhausted, truncating");
            let terminal = truncation_snapshot(&recorder, exceeded);
            recorder.truncate(terminal);
        }
        Err(RunError::Input(err)) => {
            warn!(error = %err, "rejected parameters");
            return Timeline::new(
                algorithm,
                vec![Snapshot::error(format!("Invalid input: {}", err))],
                false,
            );
        }
    }
    recorder.finish(algorithm)
}

fn truncation_snapshot(recorder: &Recorder, exceeded: StepBudgetExceeded) -> Snapshot {
    let narration = format!("Stopped after {} steps (step budget reached)", exceeded.limit);
    match recorder.last() {
        Some(last) => {
            let mut snapshot = Snapshot::new(last.payload.clone(), narration);
            snapshot.variables = last.variables.clone();
            snapshot.var("steps", exceeded.limit)
        }
        None => Snapshot::error(narration),
    }
}

fn run(algorithm: AlgorithmId, params: &Params, rec: &mut Recorder) -> Result<(), RunError> {
    use AlgorithmId::*;
    match (algorithm, params) {
        (BubbleSort, Params::Array { values }) => {
            sorting::validate(values)?;
            sorting::bubble_sort(values, rec)?;
        }
        (InsertionSort, Params::Array { values }) => {
            sorting::validate(values)?;
            sorting::insertion_sort(values, rec)?;
        }
        (SelectionSort, Params::Array { values }) => {
            sorting::validate(values)?;
            sorting::selection_sort(values, rec)?;
        }
        (QuickSort, Params::Array { values }) => {
            sorting::validate(values)?;
            sorting::quick_sort(values, rec)?;
        }
        (MergeSort, Params::Array { values }) => {
            sorting::validate(values)?;
            sorting::merge_sort(values, rec)?;
        }
        (LinearSearch, Params::Search { values, target }) => {
            searching::validate(values, false)?;
            searching::linear_search(values, *target, rec)?;
        }
        (BinarySearch, Params::Search { values, target }) => {
            searching::validate(values, true)?;
            searching::binary_search(values, *target, rec)?;
        }
        (
            BreadthFirst | DepthFirst | Dijkstra,
            Params::Graph {
                nodes,
                edges,
                start,
                target,
            },
        ) => {
            let g = graph::Graph::build(*nodes, edges, *start, *target)?;
            match algorithm {
                BreadthFirst => graph::breadth_first(&g, rec)?,
                DepthFirst => graph::depth_first(&g, rec)?,
                _ => graph::dijkstra(&g, rec)?,
            }
        }
        (Fibonacci, Params::Fibonacci { n }) => {
            dynamic::validate_fibonacci(*n)?;
            dynamic::fibonacci(*n, rec)?;
        }
        (Lcs, Params::Strings { a, b }) => {
            dynamic::validate_lcs(a, b)?;
            dynamic::lcs(a, b, rec)?;
        }
        (
            Knapsack,
            Params::Knapsack {
                weights,
                values,
                capacity,
            },
        ) => {
            dynamic::validate_knapsack(weights, values, *capacity)?;
            dynamic::knapsack(weights, values, *capacity, rec)?;
        }
        (NQueens, Params::Board { n }) => {
            backtracking::validate_queens(*n)?;
            backtracking::n_queens(*n, rec)?;
        }
        (SubsetSum, Params::SubsetSum { values, target }) => {
            backtracking::validate_subset_sum(values)?;
            backtracking::subset_sum(values, *target, rec)?;
        }
        (Sudoku, Params::Sudoku { cells }) => {
            backtracking::validate_sudoku(cells)?;
            backtracking::sudoku(cells, rec)?;
        }
        (MazeGeneration, Params::Maze { rows, cols, seed }) => {
            backtracking::validate_maze(*rows, *cols)?;
            backtracking::generate_maze(*rows, *cols, *seed, rec)?;
        }
        (NaiveSearch, Params::Text { text, pattern }) => {
            strings::validate(text, pattern)?;
            strings::naive_search(text, pattern, rec)?;
        }
        (Kmp, Params::Text { text, pattern }) => {
            strings::validate(text, pattern)?;
            strings::kmp_search(text, pattern, rec)?;
        }
        (Gcd, Params::Pair { a, b }) => {
            number_theory::validate_gcd(*a, *b)?;
            number_theory::gcd(*a, *b, rec)?;
        }
        (Sieve, Params::Bound { limit }) => {
            number_theory::validate_sieve(*limit)?;
            number_theory::sieve(*limit, rec)?;
        }
        (
            ModPow,
            Params::Power {
                base,
                exponent,
                modulus,
            },
        ) => {
            number_theory::validate_mod_pow(*exponent, *modulus)?;
            number_theory::mod_pow(*base, *exponent, *modulus, rec)?;
        }
        (ConvexHull, Params::Points { points }) => {
            geometry::validate_points(points)?;
            geometry::convex_hull(points, rec)?;
        }
        (ConvexHull, Params::RandomPoints { count, seed }) => {
            geometry::validate_random(*count)?;
            let points = geometry::random_points(*count, *seed);
            geometry::convex_hull(&points, rec)?;
        }
        (algorithm, _) => {
            return Err(InputError::ParamsMismatch {
                algorithm: algorithm.name(),
                expected: algorithm.default_params().kind(),
            }
            .into());
        }
    }
    Ok(())
}
