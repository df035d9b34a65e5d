//! Backtracking searches: N-Queens, subset sum, Sudoku, maze carving
//!
//! These are the algorithms whose search trees can explode, so they lean on
//! the recorder's step budget. Recursion is ordinary Rust recursion; every
//! entry, branch and backtrack pushes a snapshot and a budget overrun
//! unwinds the whole search through `?`.

use crate::recorder::errors::{check_len, check_range, InputError};
use crate::snapshot::{GridCell, Payload, Recorder, Role, Snapshot, Status, StepBudgetExceeded};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub const MAX_QUEENS: usize = 12;
pub const MAX_SUBSET_LEN: usize = 20;
pub const MAX_MAZE_SIDE: usize = 30;

pub const N_QUEENS_CODE: &[&str] = &[
    "place(row):",
    "  if row == n: solution found",
    "  for col in 0..n:",
    "    if safe(row, col):",
    "      put queen at (row, col)",
    "      if place(row + 1): return true",
    "      remove queen (backtrack)",
    "  return false",
];

pub const SUBSET_SUM_CODE: &[&str] = &[
    "search(i, sum):",
    "  if sum == target: found",
    "  if i == n or sum > target: return false",
    "  include a[i]: search(i + 1, sum + a[i])",
    "  exclude a[i]: search(i + 1, sum)",
    "  return false",
];

pub const SUDOKU_CODE: &[&str] = &[
    "solve():",
    "  pick the empty cell with the fewest candidates",
    "  if none: solved",
    "  for d in 1..=9:",
    "    if d is allowed in row, column and box:",
    "      write d; if solve(): return true",
    "      erase d (backtrack)",
    "  return false",
];

pub const MAZE_CODE: &[&str] = &[
    "start at the top-left cell, mark it visited",
    "carve(cell):",
    "  for each neighbour in random order:",
    "    if neighbour not visited:",
    "      knock down the wall between them",
    "      carve(neighbour)",
    "  dead end: backtrack",
];

/// A puzzle many solvers use as a demo
pub const SAMPLE_SUDOKU: [u8; 81] = [
    5, 3, 0, 0, 7, 0, 0, 0, 0, //
    6, 0, 0, 1, 9, 5, 0, 0, 0, //
    0, 9, 8, 0, 0, 0, 0, 6, 0, //
    8, 0, 0, 0, 6, 0, 0, 0, 3, //
    4, 0, 0, 8, 0, 3, 0, 0, 1, //
    7, 0, 0, 0, 2, 0, 0, 0, 6, //
    0, 6, 0, 0, 0, 0, 2, 8, 0, //
    0, 0, 0, 4, 1, 9, 0, 0, 5, //
    0, 0, 0, 0, 8, 0, 0, 7, 9, //
];

// ---------------------------------------------------------------------------
// N-Queens

pub fn validate_queens(n: usize) -> Result<(), InputError> {
    check_range("board size", n as i64, 1, MAX_QUEENS as i64)
}

struct Queens {
    n: usize,
    /// Column of the queen in each placed row
    cols: Vec<usize>,
}

impl Queens {
    fn payload(&self) -> Payload {
        let mut cells = vec![GridCell::Empty; self.n * self.n];
        for (row, &col) in self.cols.iter().enumerate() {
            cells[row * self.n + col] = GridCell::Queen;
        }
        Payload::Grid {
            rows: self.n,
            cols: self.n,
            cells,
        }
    }

    fn queens(&self) -> Vec<usize> {
        self.cols
            .iter()
            .enumerate()
            .map(|(row, &col)| row * self.n + col)
            .collect()
    }

    /// Placed queens that attack `(row, col)`
    fn attackers(&self, row: usize, col: usize) -> Vec<usize> {
        self.cols
            .iter()
            .enumerate()
            .filter(|&(r, &c)| c == col || row - r == col.abs_diff(c))
            .map(|(r, &c)| r * self.n + c)
            .collect()
    }

    fn place(&mut self, row: usize, rec: &mut Recorder) -> Result<bool, StepBudgetExceeded> {
        if row == self.n {
            return Ok(true);
        }
        for col in 0..self.n {
            let square = row * self.n + col;
            let attackers = self.attackers(row, col);
            if !attackers.is_empty() {
                rec.push(
                    Snapshot::new(
                        self.payload(),
                        format!("({}, {}) is attacked by {} queen(s)", row, col, attackers.len()),
                    )
                    .highlight(Role::Chosen, self.queens())
                    .highlight(Role::Comparing, [square])
                    .highlight(Role::Conflict, attackers)
                    .line(3)
                    .var("row", row)
                    .var("col", col),
                )?;
                continue;
            }
            self.cols.push(col);
            rec.push(
                Snapshot::new(self.payload(), format!("Place a queen at ({}, {})", row, col))
                    .highlight(Role::Chosen, self.queens())
                    .highlight(Role::Active, [square])
                    .line(4)
                    .var("row", row)
                    .var("col", col)
                    .var("placed", self.cols.len()),
            )?;
            if self.place(row + 1, rec)? {
                return Ok(true);
            }
            self.cols.pop();
            rec.push(
                Snapshot::new(
                    self.payload(),
                    format!(
                        "Row {} has no safe square left, remove the queen at ({}, {})",
                        row + 1, row, col
                    ),
                )
                .highlight(Role::Chosen, self.queens())
                .highlight(Role::Eliminated, [square])
                .line(6)
                .var("row", row)
                .var("col", col)
                .var("placed", self.cols.len()),
            )?;
        }
        Ok(false)
    }
}

pub fn n_queens(n: usize, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut q = Queens {
        n,
        cols: Vec::with_capacity(n),
    };
    rec.push(
        Snapshot::new(q.payload(), format!("Place {} queens so that none attack each other", n))
            .line(0)
            .var("n", n),
    )?;
    let solved = q.place(0, rec)?;
    let snapshot = if solved {
        Snapshot::new(q.payload(), format!("All {} queens placed", n))
            .highlight(Role::Found, q.queens())
            .line(1)
            .status(Status::Found)
    } else {
        Snapshot::new(q.payload(), format!("No arrangement exists for n = {}", n))
            .line(7)
            .status(Status::NotFound)
    };
    rec.push(snapshot.var("n", n))
}

// ---------------------------------------------------------------------------
// Subset sum

pub fn validate_subset_sum(values: &[i64]) -> Result<(), InputError> {
    check_len("values", values.len(), MAX_SUBSET_LEN)?;
    values
        .iter()
        .try_for_each(|&v| check_range("subset sum value", v, 0, 1_000_000))
}

struct Subset<'a> {
    values: &'a [i64],
    target: i64,
    chosen: Vec<usize>,
}

impl Subset<'_> {
    fn frame(&self, i: usize, sum: i64, narration: String) -> Snapshot {
        Snapshot::new(super::array(self.values), narration)
            .highlight(Role::Chosen, self.chosen.iter().copied())
            .highlight(Role::Eliminated, (0..i).filter(|k| !self.chosen.contains(k)))
            .var("i", i)
            .var("sum", sum)
            .var("target", self.target)
    }

    fn search(
        &mut self,
        i: usize,
        sum: i64,
        rec: &mut Recorder,
    ) -> Result<bool, StepBudgetExceeded> {
        if sum == self.target {
            return Ok(true);
        }
        if i == self.values.len() || sum > self.target {
            rec.push(
                self.frame(
                    i,
                    sum,
                    if sum > self.target {
                        format!("Sum {} overshoots {}, backtrack", sum, self.target)
                    } else {
                        format!("No values left and sum {} falls short, backtrack", sum)
                    },
                )
                .line(2),
            )?;
            return Ok(false);
        }

        self.chosen.push(i);
        rec.push(
            self.frame(i, sum + self.values[i], format!("Include a[{}] = {}", i, self.values[i]))
                .highlight(Role::Active, [i])
                .line(3),
        )?;
        if self.search(i + 1, sum + self.values[i], rec)? {
            return Ok(true);
        }
        self.chosen.pop();

        rec.push(
            self.frame(i, sum, format!("Exclude a[{}] = {}", i, self.values[i]))
                .highlight(Role::Eliminated, [i])
                .line(4),
        )?;
        self.search(i + 1, sum, rec)
    }
}

pub fn subset_sum(
    values: &[i64],
    target: i64,
    rec: &mut Recorder,
) -> Result<(), StepBudgetExceeded> {
    let mut s = Subset {
        values,
        target,
        chosen: Vec::new(),
    };
    rec.push(s.frame(0, 0, format!("Find a subset adding up to {}", target)).line(0))?;
    let found = s.search(0, 0, rec)?;
    let snapshot = if found {
        let picked: Vec<String> = s.chosen.iter().map(|&k| values[k].to_string()).collect();
        let sum: i64 = s.chosen.iter().map(|&k| values[k]).sum();
        let narration = if picked.is_empty() {
            format!("The empty subset already adds up to {}", target)
        } else {
            format!("{} = {}", picked.join(" + "), target)
        };
        Snapshot::new(super::array(values), narration)
            .highlight(Role::Found, s.chosen.iter().copied())
            .var("sum", sum)
            .var("target", target)
            .line(1)
            .status(Status::Found)
    } else {
        Snapshot::new(super::array(values), format!("No subset adds up to {}", target))
            .var("target", target)
            .line(5)
            .status(Status::NotFound)
    };
    rec.push(snapshot)
}

// ---------------------------------------------------------------------------
// Sudoku

pub fn validate_sudoku(cells: &[u8]) -> Result<(), InputError> {
    if cells.len() != 81 {
        return Err(InputError::InvalidPuzzle {
            reason: format!("expected 81 cells, got {}", cells.len()),
        });
    }
    if let Some(pos) = cells.iter().position(|&d| d > 9) {
        return Err(InputError::InvalidPuzzle {
            reason: format!("cell {} holds {}, digits are 0-9", pos, cells[pos]),
        });
    }
    for pos in 0..81 {
        let digit = cells[pos];
        if digit != 0 && peers(pos).any(|p| cells[p] == digit) {
            return Err(InputError::InvalidPuzzle {
                reason: format!("{} repeats at row {} column {}", digit, pos / 9 + 1, pos % 9 + 1),
            });
        }
    }
    Ok(())
}

/// Cells sharing a row, column or box with `pos`, excluding `pos` itself
fn peers(pos: usize) -> impl Iterator<Item = usize> {
    let (row, col) = (pos / 9, pos % 9);
    let (br, bc) = (row / 3 * 3, col / 3 * 3);
    (0..81).filter(move |&p| {
        p != pos && (p / 9 == row || p % 9 == col || (p / 9 / 3 * 3 == br && p % 9 / 3 * 3 == bc))
    })
}

struct Sudoku {
    digits: [u8; 81],
    given: [bool; 81],
}

impl Sudoku {
    fn payload(&self) -> Payload {
        let cells = (0..81)
            .map(|p| match self.digits[p] {
                0 => GridCell::Empty,
                value => GridCell::Digit {
                    value,
                    given: self.given[p],
                },
            })
            .collect();
        Payload::Grid {
            rows: 9,
            cols: 9,
            cells,
        }
    }

    fn conflicts(&self, pos: usize, digit: u8) -> Vec<usize> {
        peers(pos).filter(|&p| self.digits[p] == digit).collect()
    }

    fn candidates(&self, pos: usize) -> usize {
        (1..=9u8)
            .filter(|&d| peers(pos).all(|p| self.digits[p] != d))
            .count()
    }

    /// Empty cell with the fewest legal digits, lowest index on ties
    fn most_constrained(&self) -> Option<usize> {
        (0..81)
            .filter(|&p| self.digits[p] == 0)
            .min_by_key(|&p| (self.candidates(p), p))
    }

    fn solve(&mut self, rec: &mut Recorder) -> Result<bool, StepBudgetExceeded> {
        let Some(pos) = self.most_constrained() else {
            return Ok(true);
        };
        let (row, col) = (pos / 9, pos % 9);
        for digit in 1..=9u8 {
            let conflicts = self.conflicts(pos, digit);
            if !conflicts.is_empty() {
                rec.push(
                    Snapshot::new(
                        self.payload(),
                        format!("{} cannot go at ({}, {})", digit, row + 1, col + 1),
                    )
                    .highlight(Role::Comparing, [pos])
                    .highlight(Role::Conflict, conflicts)
                    .line(4)
                    .var("row", row + 1)
                    .var("col", col + 1)
                    .var("digit", i64::from(digit)),
                )?;
                continue;
            }
            self.digits[pos] = digit;
            rec.push(
                Snapshot::new(
                    self.payload(),
                    format!("Try {} at ({}, {})", digit, row + 1, col + 1),
                )
                .highlight(Role::Active, [pos])
                .line(5)
                .var("row", row + 1)
                .var("col", col + 1)
                .var("digit", i64::from(digit)),
            )?;
            if self.solve(rec)? {
                return Ok(true);
            }
            self.digits[pos] = 0;
            rec.push(
                Snapshot::new(
                    self.payload(),
                    format!(
                        "{} at ({}, {}) leads to a dead end, erase it",
                        digit, row + 1, col + 1
                    ),
                )
                .highlight(Role::Eliminated, [pos])
                .line(6)
                .var("row", row + 1)
                .var("col", col + 1)
                .var("digit", i64::from(digit)),
            )?;
        }
        Ok(false)
    }
}

pub fn sudoku(cells: &[u8], rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut digits = [0u8; 81];
    digits.copy_from_slice(&cells[..81]);
    let mut given = [false; 81];
    for (flag, &d) in given.iter_mut().zip(digits.iter()) {
        *flag = d != 0;
    }
    let mut s = Sudoku { digits, given };
    let blanks = digits.iter().filter(|&&d| d == 0).count();
    rec.push(
        Snapshot::new(s.payload(), format!("Fill {} empty cells", blanks))
            .line(0)
            .var("blanks", blanks),
    )?;
    let solved = s.solve(rec)?;
    let snapshot = if solved {
        Snapshot::new(s.payload(), "Every cell is filled: puzzle solved")
            .line(2)
            .status(Status::Found)
    } else {
        Snapshot::new(s.payload(), "Every digit failed somewhere: the puzzle has no solution")
            .line(7)
            .status(Status::NotFound)
    };
    rec.push(snapshot)
}

// ---------------------------------------------------------------------------
// Maze generation

pub fn validate_maze(rows: usize, cols: usize) -> Result<(), InputError> {
    check_range("maze rows", rows as i64, 2, MAX_MAZE_SIDE as i64)?;
    check_range("maze columns", cols as i64, 2, MAX_MAZE_SIDE as i64)
}

/// Maze of `rows x cols` rooms laid out on a `(2r+1) x (2c+1)` wall grid
struct Maze {
    rows: usize,
    cols: usize,
    grid: Vec<GridCell>,
    visited: Vec<bool>,
}

impl Maze {
    fn width(&self) -> usize {
        2 * self.cols + 1
    }

    /// Grid index of a room
    fn room(&self, cell: usize) -> usize {
        let (r, c) = (cell / self.cols, cell % self.cols);
        (2 * r + 1) * self.width() + 2 * c + 1
    }

    /// Grid index of the wall between two adjacent rooms
    fn wall(&self, a: usize, b: usize) -> usize {
        (self.room(a) + self.room(b)) / 2
    }

    fn neighbours(&self, cell: usize) -> Vec<usize> {
        let (r, c) = (cell / self.cols, cell % self.cols);
        let mut out = Vec::with_capacity(4);
        if r > 0 {
            out.push(cell - self.cols);
        }
        if r + 1 < self.rows {
            out.push(cell + self.cols);
        }
        if c > 0 {
            out.push(cell - 1);
        }
        if c + 1 < self.cols {
            out.push(cell + 1);
        }
        out
    }

    fn payload(&self) -> Payload {
        Payload::Grid {
            rows: 2 * self.rows + 1,
            cols: self.width(),
            cells: self.grid.clone(),
        }
    }

    fn frame(&self, stack: &[usize], narration: String) -> Snapshot {
        Snapshot::new(self.payload(), narration)
            .highlight(Role::Path, stack.iter().map(|&c| self.room(c)))
            .var("depth", stack.len())
            .var(
                "visited",
                self.visited.iter().filter(|&&v| v).count(),
            )
    }
}

pub fn generate_maze(
    rows: usize,
    cols: usize,
    seed: u64,
    rec: &mut Recorder,
) -> Result<(), StepBudgetExceeded> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = Maze {
        rows,
        cols,
        grid: vec![GridCell::Wall; (2 * rows + 1) * (2 * cols + 1)],
        visited: vec![false; rows * cols],
    };
    let entry = m.room(0);
    m.grid[entry] = GridCell::Open;
    m.visited[0] = true;
    let mut stack = vec![0usize];
    rec.push(
        m.frame(&stack, format!("Carve a {}x{} maze from the top-left room", rows, cols))
            .highlight(Role::Active, [entry])
            .line(0)
            .var("seed", seed),
    )?;

    // Depth-first carving with an explicit stack of rooms
    while let Some(&cell) = stack.last() {
        let mut options: Vec<usize> = m
            .neighbours(cell)
            .into_iter()
            .filter(|&n| !m.visited[n])
            .collect();
        if options.is_empty() {
            stack.pop();
            rec.push(
                m.frame(&stack, "Dead end: every neighbour is visited, backtrack".to_string())
                    .highlight(Role::Eliminated, [m.room(cell)])
                    .line(6),
            )?;
            continue;
        }
        options.shuffle(&mut rng);
        let next = options[0];
        rec.push(
            m.frame(&stack, format!("Pick a random unvisited neighbour of room {}", cell))
                .highlight(Role::Active, [m.room(cell)])
                .highlight(Role::Candidate, options.iter().map(|&n| m.room(n)))
                .line(2),
        )?;
        let wall = m.wall(cell, next);
        m.grid[wall] = GridCell::Open;
        let room = m.room(next);
        m.grid[room] = GridCell::Open;
        m.visited[next] = true;
        stack.push(next);
        rec.push(
            m.frame(&stack, format!("Knock down the wall into room {}", next))
                .highlight(Role::Swapped, [wall, room])
                .line(4),
        )?;
    }

    rec.push(
        m.frame(&stack, "Every room is reachable: maze complete".to_string())
            .line(6)
            .status(Status::Done),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peers_cover_row_column_and_box() {
        let p: Vec<usize> = peers(0).collect();
        assert_eq!(p.len(), 20);
        assert!(p.contains(&8));
        assert!(p.contains(&72));
        assert!(p.contains(&20));
        assert!(!p.contains(&0));
    }

    #[test]
    fn duplicate_givens_are_rejected() {
        let mut cells = [0u8; 81];
        cells[0] = 4;
        cells[8] = 4;
        assert!(matches!(
            validate_sudoku(&cells),
            Err(InputError::InvalidPuzzle { .. })
        ));
    }

    #[test]
    fn maze_walls_sit_between_rooms() {
        let m = Maze {
            rows: 2,
            cols: 2,
            grid: Vec::new(),
            visited: Vec::new(),
        };
        assert_eq!(m.room(0), 6);
        assert_eq!(m.room(1), 8);
        assert_eq!(m.wall(0, 1), 7);
        assert_eq!(m.wall(0, 2), 11);
    }
}
