//! Dynamic programming tables: Fibonacci, LCS, 0/1 knapsack
//!
//! Each algorithm fills a [`DpTable`] cell by cell. For every cell two
//! snapshots are recorded: one showing the cells the recurrence reads, one
//! showing the value written. Highlight positions address cells as
//! `row * cols + col`.

use crate::recorder::errors::{check_len, check_range, InputError};
use crate::snapshot::{Payload, Recorder, Role, Snapshot, Status, StepBudgetExceeded};

/// F(92) is the last Fibonacci number that fits an i64; stay a little below
pub const MAX_FIBONACCI: usize = 90;
pub const MAX_LCS_LEN: usize = 16;
pub const MAX_ITEMS: usize = 12;
pub const MAX_CAPACITY: u64 = 50;

pub const FIBONACCI_CODE: &[&str] = &[
    "F[0] = 0; F[1] = 1",
    "for i in 2..=n:",
    "  F[i] = F[i-1] + F[i-2]",
    "return F[n]",
];

pub const LCS_CODE: &[&str] = &[
    "L[i][0] = L[0][j] = 0",
    "for i in 1..=m, j in 1..=n:",
    "  if a[i-1] == b[j-1]:",
    "    L[i][j] = L[i-1][j-1] + 1",
    "  else:",
    "    L[i][j] = max(L[i-1][j], L[i][j-1])",
    "walk back from L[m][n] to read the subsequence",
];

pub const KNAPSACK_CODE: &[&str] = &[
    "K[0][c] = 0 for every capacity c",
    "for i in 1..=n, c in 0..=C:",
    "  skip = K[i-1][c]",
    "  take = K[i-1][c - w[i]] + v[i] if w[i] <= c",
    "  K[i][c] = max(skip, take)",
    "walk back to find the chosen items",
];

/// Working table; cloned into a [`Payload::Table`] at every snapshot
struct DpTable {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    cells: Vec<Vec<Option<i64>>>,
}

impl DpTable {
    fn new(row_labels: Vec<String>, col_labels: Vec<String>) -> Self {
        let cells = vec![vec![None; col_labels.len()]; row_labels.len()];
        DpTable {
            row_labels,
            col_labels,
            cells,
        }
    }

    fn pos(&self, row: usize, col: usize) -> usize {
        row * self.col_labels.len() + col
    }

    fn get(&self, row: usize, col: usize) -> i64 {
        self.cells[row][col].unwrap_or(0)
    }

    fn set(&mut self, row: usize, col: usize, value: i64) {
        self.cells[row][col] = Some(value);
    }

    fn payload(&self) -> Payload {
        Payload::Table {
            row_labels: self.row_labels.clone(),
            col_labels: self.col_labels.clone(),
            cells: self.cells.clone(),
        }
    }
}

pub fn validate_fibonacci(n: usize) -> Result<(), InputError> {
    check_range("n", n as i64, 0, MAX_FIBONACCI as i64)
}

pub fn fibonacci(n: usize, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut t = DpTable::new(
        vec!["F".to_string()],
        (0..=n).map(|i| i.to_string()).collect(),
    );
    t.set(0, 0, 0);
    if n >= 1 {
        t.set(0, 1, 1);
    }
    rec.push(
        Snapshot::new(t.payload(), "Seed the table with F[0] = 0 and F[1] = 1")
            .highlight(Role::Chosen, (0..=n.min(1)).map(|c| t.pos(0, c)))
            .line(0)
            .var("n", n),
    )?;

    for i in 2..=n {
        rec.push(
            Snapshot::new(
                t.payload(),
                format!(
                    "F[{}] needs F[{}] = {} and F[{}] = {}",
                    i, i - 1, t.get(0, i - 1), i - 2, t.get(0, i - 2)
                ),
            )
            .highlight(Role::Comparing, [t.pos(0, i - 1), t.pos(0, i - 2)])
            .highlight(Role::Active, [t.pos(0, i)])
            .line(2)
            .var("i", i),
        )?;
        let value = t.get(0, i - 1) + t.get(0, i - 2);
        t.set(0, i, value);
        rec.push(
            Snapshot::new(t.payload(), format!("F[{}] = {}", i, value))
                .highlight(Role::Chosen, [t.pos(0, i)])
                .line(2)
                .var("i", i)
                .var("F[i]", value),
        )?;
    }

    let result = t.get(0, n);
    rec.push(
        Snapshot::new(t.payload(), format!("F({}) = {}", n, result))
            .highlight(Role::Found, [t.pos(0, n)])
            .line(3)
            .var("n", n)
            .var("result", result)
            .status(Status::Done),
    )
}

pub fn validate_lcs(a: &str, b: &str) -> Result<(), InputError> {
    check_len("first string", a.chars().count(), MAX_LCS_LEN)?;
    check_len("second string", b.chars().count(), MAX_LCS_LEN)
}

fn header(s: &[char]) -> Vec<String> {
    std::iter::once("-".to_string())
        .chain(s.iter().map(|c| c.to_string()))
        .collect()
}

pub fn lcs(a: &str, b: &str, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());
    let mut t = DpTable::new(header(&a), header(&b));
    for i in 0..=m {
        t.set(i, 0, 0);
    }
    for j in 0..=n {
        t.set(0, j, 0);
    }
    rec.push(
        Snapshot::new(t.payload(), "An empty prefix has an LCS of length 0")
            .line(0)
            .var("m", m)
            .var("n", n),
    )?;

    for i in 1..=m {
        for j in 1..=n {
            let same = a[i - 1] == b[j - 1];
            let reads = if same {
                vec![t.pos(i - 1, j - 1)]
            } else {
                vec![t.pos(i - 1, j), t.pos(i, j - 1)]
            };
            rec.push(
                Snapshot::new(
                    t.payload(),
                    if same {
                        format!("'{}' == '{}': extend the diagonal", a[i - 1], b[j - 1])
                    } else {
                        format!("'{}' != '{}': take the better neighbour", a[i - 1], b[j - 1])
                    },
                )
                .highlight(Role::Comparing, reads)
                .highlight(Role::Active, [t.pos(i, j)])
                .line(if same { 2 } else { 4 })
                .var("i", i)
                .var("j", j),
            )?;
            let value = if same {
                t.get(i - 1, j - 1) + 1
            } else {
                t.get(i - 1, j).max(t.get(i, j - 1))
            };
            t.set(i, j, value);
            rec.push(
                Snapshot::new(t.payload(), format!("L[{}][{}] = {}", i, j, value))
                    .highlight(if same { Role::Match } else { Role::Chosen }, [t.pos(i, j)])
                    .line(if same { 3 } else { 5 })
                    .var("i", i)
                    .var("j", j)
                    .var("L[i][j]", value),
            )?;
        }
    }

    let (mut i, mut j) = (m, n);
    let mut path = Vec::new();
    let mut subsequence = Vec::new();
    while i > 0 && j > 0 {
        path.push(t.pos(i, j));
        if a[i - 1] == b[j - 1] {
            subsequence.push(a[i - 1]);
            i -= 1;
            j -= 1;
        } else if t.get(i - 1, j) >= t.get(i, j - 1) {
            i -= 1;
        } else {
            j -= 1;
        }
        let so_far: String = subsequence.iter().rev().collect();
        rec.push(
            Snapshot::new(t.payload(), format!("Trace back through L[{}][{}]", i, j))
                .highlight(Role::Path, path.iter().copied())
                .line(6)
                .var("i", i)
                .var("j", j)
                .var("lcs", so_far),
        )?;
    }

    let result: String = subsequence.iter().rev().collect();
    rec.push(
        Snapshot::new(
            t.payload(),
            format!(
                "Longest common subsequence: \"{}\" (length {})",
                result, result.chars().count()
            ),
        )
        .highlight(Role::Path, path.iter().copied())
        .highlight(Role::Found, [t.pos(m, n)])
        .line(6)
        .var("length", t.get(m, n))
        .var("lcs", result)
        .status(Status::Done),
    )
}

pub fn validate_knapsack(weights: &[u64], values: &[u64], capacity: u64) -> Result<(), InputError> {
    check_len("items", weights.len(), MAX_ITEMS)?;
    if weights.len() != values.len() {
        return Err(InputError::LengthMismatch {
            what: "knapsack items",
            left: weights.len(),
            right: values.len(),
        });
    }
    if let Some(&v) = values.iter().find(|&&v| v > 1_000_000) {
        return Err(InputError::OutOfRange {
            what: "item value",
            value: i64::try_from(v).unwrap_or(i64::MAX),
            min: 0,
            max: 1_000_000,
        });
    }
    check_range("capacity", capacity as i64, 0, MAX_CAPACITY as i64)
}

pub fn knapsack(
    weights: &[u64],
    values: &[u64],
    capacity: u64,
    rec: &mut Recorder,
) -> Result<(), StepBudgetExceeded> {
    let items = weights.len();
    let cap = capacity as usize;
    let rows = std::iter::once("none".to_string())
        .chain((0..items).map(|k| format!("#{} w{} v{}", k + 1, weights[k], values[k])))
        .collect();
    let mut t = DpTable::new(rows, (0..=cap).map(|c| c.to_string()).collect());
    for c in 0..=cap {
        t.set(0, c, 0);
    }
    rec.push(
        Snapshot::new(t.payload(), "With no items every capacity is worth 0")
            .line(0)
            .var("items", items)
            .var("capacity", capacity),
    )?;

    for i in 1..=items {
        let (w, v) = (weights[i - 1] as usize, values[i - 1] as i64);
        for c in 0..=cap {
            let skip = t.get(i - 1, c);
            let fits = w <= c;
            let mut reads = vec![t.pos(i - 1, c)];
            if fits {
                reads.push(t.pos(i - 1, c - w));
            }
            rec.push(
                Snapshot::new(
                    t.payload(),
                    if fits {
                        format!(
                            "Item {} fits in {}: skip = {}, take = {} + {}",
                            i, c, skip, t.get(i - 1, c - w), v
                        )
                    } else {
                        format!("Item {} (w={}) does not fit in {}", i, w, c)
                    },
                )
                .highlight(Role::Comparing, reads)
                .highlight(Role::Active, [t.pos(i, c)])
                .line(if fits { 3 } else { 2 })
                .var("i", i)
                .var("c", c)
                .var("skip", skip),
            )?;
            let take = if fits { Some(t.get(i - 1, c - w) + v) } else { None };
            let best = take.map_or(skip, |tk| tk.max(skip));
            t.set(i, c, best);
            rec.push(
                Snapshot::new(t.payload(), format!("K[{}][{}] = {}", i, c, best))
                    .highlight(Role::Chosen, [t.pos(i, c)])
                    .line(4)
                    .var("i", i)
                    .var("c", c)
                    .var("skip", skip)
                    .var("take", take),
            )?;
        }
    }

    let mut c = cap;
    let mut chosen = Vec::new();
    let mut path = Vec::new();
    for i in (1..=items).rev() {
        path.push(t.pos(i, c));
        let taken = t.get(i, c) != t.get(i - 1, c);
        if taken {
            chosen.push(i);
            c -= weights[i - 1] as usize;
        }
        rec.push(
            Snapshot::new(
                t.payload(),
                if taken {
                    format!("K[{}] changed when item {} was allowed: it is in the bag", i, i)
                } else {
                    format!("Item {} is not needed", i)
                },
            )
            .highlight(Role::Path, path.iter().copied())
            .line(5)
            .var("i", i)
            .var("c", c),
        )?;
    }
    chosen.reverse();
    let best = t.get(items, cap);
    let listing = chosen
        .iter()
        .map(|i| format!("#{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    rec.push(
        Snapshot::new(t.payload(), format!("Best value {} using items [{}]", best, listing))
            .highlight(Role::Path, path.iter().copied())
            .highlight(Role::Found, [t.pos(items, cap)])
            .line(5)
            .var("best", best)
            .var("items", listing)
            .status(Status::Done),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fibonacci_fills_every_column() {
        let mut rec = Recorder::new(1_000);
        fibonacci(10, &mut rec).unwrap();
        let last = rec.last().unwrap();
        assert_eq!(last.variable("result"), Some(&crate::snapshot::VarValue::Int(55)));
        match &last.payload {
            Payload::Table { cells, .. } => assert!(cells[0].iter().all(Option::is_some)),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn knapsack_rejects_mismatched_items() {
        assert!(matches!(
            validate_knapsack(&[1, 2], &[3], 5),
            Err(InputError::LengthMismatch { left: 2, right: 1, .. })
        ));
    }
}
