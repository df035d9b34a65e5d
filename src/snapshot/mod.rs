//! Recorded algorithm state
//!
//! This module defines the immutable records an instrumented algorithm
//! leaves behind:
//! - [`Snapshot`]: one observable instant (payload, highlights, narration,
//!   variables, pseudocode line, status)
//! - [`Payload`]: the family-specific deep copy of the working structure
//! - [`Timeline`]: the frozen, ordered sequence handed to the player
//! - [`Recorder`]: the append-only, step-budgeted sink that builds a timeline
//!
//! # Ownership
//!
//! An algorithm owns exactly one mutable working structure. At every
//! instrumentation point it clones the relevant part into a fresh
//! [`Payload`] and hands the finished [`Snapshot`] to the [`Recorder`]. The
//! live structure never leaves the algorithm, so nothing can reach back and
//! change a snapshot once it has been pushed.

mod recorder;

pub use recorder::{Recorder, StepBudgetExceeded};

use crate::recorder::AlgorithmId;
use rustc_hash::FxHashMap;
use std::fmt;

/// Role a position plays at one instant, used to colour the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Comparing,
    Swapped,
    Sorted,
    Pivot,
    Active,
    Range,
    Eliminated,
    Found,
    Visited,
    Frontier,
    Path,
    Match,
    Mismatch,
    Conflict,
    Candidate,
    Chosen,
    Hull,
    Prime,
    Composite,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Comparing => "comparing",
            Role::Swapped => "swapped",
            Role::Sorted => "sorted",
            Role::Pivot => "pivot",
            Role::Active => "active",
            Role::Range => "range",
            Role::Eliminated => "eliminated",
            Role::Found => "found",
            Role::Visited => "visited",
            Role::Frontier => "frontier",
            Role::Path => "path",
            Role::Match => "match",
            Role::Mismatch => "mismatch",
            Role::Conflict => "conflict",
            Role::Candidate => "candidate",
            Role::Chosen => "chosen",
            Role::Hull => "hull",
            Role::Prime => "prime",
            Role::Composite => "composite",
        }
    }
}

/// Highlighted positions keyed by role; every list is sorted and deduplicated
pub type Highlights = FxHashMap<Role, Vec<usize>>;

/// Outcome carried by a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Found,
    NotFound,
    Done,
    /// The run hit its step budget and was cut short
    Truncated,
    /// The parameters were rejected before the algorithm ran
    Error,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Running)
    }
}

/// Scalar shown in the variables pane
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    Int(i64),
    Bool(bool),
    Text(String),
    Missing,
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Int(n) => write!(f, "{}", n),
            VarValue::Bool(b) => write!(f, "{}", b),
            VarValue::Text(s) => write!(f, "\"{}\"", s),
            VarValue::Missing => write!(f, "-"),
        }
    }
}

impl From<i64> for VarValue {
    fn from(n: i64) -> Self {
        VarValue::Int(n)
    }
}

impl From<u64> for VarValue {
    fn from(n: u64) -> Self {
        VarValue::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<usize> for VarValue {
    fn from(n: usize) -> Self {
        VarValue::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<bool> for VarValue {
    fn from(b: bool) -> Self {
        VarValue::Bool(b)
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::Text(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::Text(s)
    }
}

impl<T: Into<VarValue>> From<Option<T>> for VarValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(VarValue::Missing, Into::into)
    }
}

/// Weighted, undirected edge between two node ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: u64,
}

/// Cell of a board-shaped payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Empty,
    Queen,
    /// Sudoku digit; `given` marks clues that were part of the puzzle
    Digit { value: u8, given: bool },
    Wall,
    Open,
}

/// Point in the plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Family-specific deep copy of the structure an algorithm operates on
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Flat array: sorting, searching, sieve, subset-sum
    Array { values: Vec<i64> },
    /// Graph view with the current best distance and visit order per node
    Graph {
        nodes: usize,
        edges: Vec<Edge>,
        distances: Vec<Option<u64>>,
        order: Vec<usize>,
    },
    /// Labelled table: DP tables and number-theory ledgers
    Table {
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        cells: Vec<Vec<Option<i64>>>,
    },
    /// Board: N-Queens, Sudoku, maze
    Grid {
        rows: usize,
        cols: usize,
        cells: Vec<GridCell>,
    },
    /// Pattern aligned under text at `offset`
    Text {
        text: String,
        pattern: String,
        offset: usize,
        matches: Vec<usize>,
    },
    /// Point set with the hull chain built so far
    Points { points: Vec<Point>, hull: Vec<usize> },
    /// Nothing to draw; used for rejected input
    Empty,
}

/// One immutable recorded instant of an algorithm run
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub payload: Payload,
    pub highlights: Highlights,
    pub narration: String,
    pub variables: Vec<(String, VarValue)>,
    pub source_line: Option<usize>,
    pub status: Status,
}

impl Snapshot {
    pub fn new(payload: Payload, narration: impl Into<String>) -> Self {
        Snapshot {
            payload,
            highlights: Highlights::default(),
            narration: narration.into(),
            variables: Vec::new(),
            source_line: None,
            status: Status::Running,
        }
    }

    /// Single-snapshot description of rejected input
    pub fn error(narration: impl Into<String>) -> Self {
        Snapshot::new(Payload::Empty, narration).status(Status::Error)
    }

    /// Mark `positions` with `role`, merging with anything already marked
    pub fn highlight(mut self, role: Role, positions: impl IntoIterator<Item = usize>) -> Self {
        let entry = self.highlights.entry(role).or_default();
        entry.extend(positions);
        entry.sort_unstable();
        entry.dedup();
        if entry.is_empty() {
            self.highlights.remove(&role);
        }
        self
    }

    pub fn var(mut self, name: &str, value: impl Into<VarValue>) -> Self {
        let value = value.into();
        if let Some(slot) = self.variables.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.variables.push((name.to_string(), value));
        }
        self
    }

    pub fn line(mut self, line: usize) -> Self {
        self.source_line = Some(line);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Positions marked with `role`, empty when the role is absent
    pub fn marked(&self, role: Role) -> &[usize] {
        self.highlights.get(&role).map_or(&[], Vec::as_slice)
    }

    /// Look up a variable by name
    pub fn variable(&self, name: &str) -> Option<&VarValue> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Frozen, ordered, non-empty sequence of snapshots for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    algorithm: AlgorithmId,
    snapshots: Box<[Snapshot]>,
    truncated: bool,
}

impl Timeline {
    pub(crate) fn new(algorithm: AlgorithmId, snapshots: Vec<Snapshot>, truncated: bool) -> Self {
        Timeline {
            algorithm,
            snapshots: snapshots.into_boxed_slice(),
            truncated,
        }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn first(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    /// Whether the run stopped at its step budget
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Status of the final snapshot
    pub fn outcome(&self) -> Status {
        self.last().map_or(Status::Error, |s| s.status)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
