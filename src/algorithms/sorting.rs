//! Comparison sorts on a small integer array

use super::array;
use crate::recorder::errors::{check_len, InputError};
use crate::snapshot::{Recorder, Role, Snapshot, Status, StepBudgetExceeded};

/// Largest array the payload pane can lay out
pub const MAX_SORT_LEN: usize = 64;

pub const BUBBLE_SORT_CODE: &[&str] = &[
    "for i in 0..n-1:",
    "  swapped = false",
    "  for j in 0..n-1-i:",
    "    if a[j] > a[j+1]:",
    "      swap(a[j], a[j+1]); swapped = true",
    "  a[n-1-i] is in place",
    "  if not swapped: break",
    "return a",
];

pub const INSERTION_SORT_CODE: &[&str] = &[
    "for i in 1..n:",
    "  j = i",
    "  while j > 0 and a[j-1] > a[j]:",
    "    swap(a[j-1], a[j])",
    "    j = j - 1",
    "return a",
];

pub const SELECTION_SORT_CODE: &[&str] = &[
    "for i in 0..n-1:",
    "  min = i",
    "  for j in i+1..n:",
    "    if a[j] < a[min]: min = j",
    "  swap(a[i], a[min])",
    "return a",
];

pub const QUICK_SORT_CODE: &[&str] = &[
    "quicksort(lo, hi):",
    "  if lo >= hi: return",
    "  pivot = a[hi]; i = lo",
    "  for j in lo..hi:",
    "    if a[j] < pivot:",
    "      swap(a[i], a[j]); i = i + 1",
    "  swap(a[i], a[hi])",
    "  quicksort(lo, i-1); quicksort(i+1, hi)",
];

pub const MERGE_SORT_CODE: &[&str] = &[
    "mergesort(lo, hi):",
    "  if lo >= hi: return",
    "  mid = (lo + hi) / 2",
    "  mergesort(lo, mid); mergesort(mid+1, hi)",
    "  while both halves have items: compare heads",
    "    a[k] = smaller head; k = k + 1",
    "  copy the remaining half",
];

pub fn validate(values: &[i64]) -> Result<(), InputError> {
    check_len("array", values.len(), MAX_SORT_LEN)
}

/// Snapshot of the working array with the settled positions marked
fn frame(a: &[i64], sorted: &[usize], narration: String) -> Snapshot {
    Snapshot::new(array(a), narration).highlight(Role::Sorted, sorted.iter().copied())
}

fn finish(a: &[i64], line: usize, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    rec.push(
        Snapshot::new(array(a), format!("Sorted: {:?}", a))
            .highlight(Role::Sorted, 0..a.len())
            .line(line)
            .status(Status::Done),
    )
}

pub fn bubble_sort(input: &[i64], rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut a = input.to_vec();
    let n = a.len();
    let mut sorted: Vec<usize> = Vec::new();
    rec.push(frame(&a, &sorted, format!("Bubble sort on {} elements", n)).line(0).var("n", n))?;

    for i in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..n - 1 - i {
            rec.push(
                frame(
                    &a,
                    &sorted,
                    format!("Compare a[{}] = {} with a[{}] = {}", j, a[j], j + 1, a[j + 1]),
                )
                .highlight(Role::Comparing, [j, j + 1])
                .line(3)
                .var("i", i)
                .var("j", j)
                .var("swapped", swapped),
            )?;
            if a[j] > a[j + 1] {
                a.swap(j, j + 1);
                swapped = true;
                rec.push(
                    frame(
                        &a,
                        &sorted,
                        format!("{} > {}, so swap them", a[j + 1], a[j]),
                    )
                    .highlight(Role::Swapped, [j, j + 1])
                    .line(4)
                    .var("i", i)
                    .var("j", j)
                    .var("swapped", swapped),
                )?;
            }
        }
        sorted.push(n - 1 - i);
        rec.push(
            frame(
                &a,
                &sorted,
                format!("Pass {} done: {} has bubbled to index {}", i + 1, a[n - 1 - i], n - 1 - i),
            )
            .line(5)
            .var("i", i)
            .var("swapped", swapped),
        )?;
        if !swapped {
            rec.push(
                frame(
                    &a,
                    &sorted,
                    "No swaps in this pass, the rest is already in order".to_string(),
                )
                .highlight(Role::Sorted, 0..n)
                .line(6)
                .var("i", i)
                .var("swapped", swapped),
            )?;
            break;
        }
    }
    finish(&a, 7, rec)
}

pub fn insertion_sort(input: &[i64], rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut a = input.to_vec();
    let n = a.len();
    rec.push(frame(&a, &[0], format!("Insertion sort on {} elements", n)).line(0).var("n", n))?;

    for i in 1..n {
        let prefix: Vec<usize> = (0..i).collect();
        rec.push(
            frame(&a, &prefix, format!("Insert a[{}] = {} into the sorted prefix", i, a[i]))
                .highlight(Role::Active, [i])
                .line(1)
                .var("i", i)
                .var("j", i),
        )?;
        let mut j = i;
        while j > 0 {
            rec.push(
                frame(
                    &a,
                    &prefix,
                    format!("Compare a[{}] = {} with a[{}] = {}", j - 1, a[j - 1], j, a[j]),
                )
                .highlight(Role::Comparing, [j - 1, j])
                .line(2)
                .var("i", i)
                .var("j", j),
            )?;
            if a[j - 1] <= a[j] {
                break;
            }
            a.swap(j - 1, j);
            rec.push(
                frame(&a, &prefix, format!("{} > {}, shift it right", a[j], a[j - 1]))
                    .highlight(Role::Swapped, [j - 1, j])
                    .line(3)
                    .var("i", i)
                    .var("j", j),
            )?;
            j -= 1;
        }
        rec.push(
            frame(&a, &(0..=i).collect::<Vec<_>>(), format!("{} settles at index {}", a[j], j))
                .highlight(Role::Active, [j])
                .line(4)
                .var("i", i)
                .var("j", j),
        )?;
    }
    finish(&a, 5, rec)
}

pub fn selection_sort(input: &[i64], rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut a = input.to_vec();
    let n = a.len();
    rec.push(frame(&a, &[], format!("Selection sort on {} elements", n)).line(0).var("n", n))?;

    for i in 0..n.saturating_sub(1) {
        let sorted: Vec<usize> = (0..i).collect();
        let mut min = i;
        rec.push(
            frame(&a, &sorted, format!("Assume a[{}] = {} is the minimum", i, a[i]))
                .highlight(Role::Candidate, [min])
                .line(1)
                .var("i", i)
                .var("min", min),
        )?;
        for j in i + 1..n {
            rec.push(
                frame(
                    &a,
                    &sorted,
                    format!("Compare a[{}] = {} with current minimum {}", j, a[j], a[min]),
                )
                .highlight(Role::Comparing, [j])
                .highlight(Role::Candidate, [min])
                .line(3)
                .var("i", i)
                .var("j", j)
                .var("min", min),
            )?;
            if a[j] < a[min] {
                min = j;
                rec.push(
                    frame(&a, &sorted, format!("New minimum {} at index {}", a[min], min))
                        .highlight(Role::Candidate, [min])
                        .line(3)
                        .var("i", i)
                        .var("j", j)
                        .var("min", min),
                )?;
            }
        }
        a.swap(i, min);
        rec.push(
            frame(
                &a,
                &(0..=i).collect::<Vec<_>>(),
                if min == i {
                    format!("{} is already in place at index {}", a[i], i)
                } else {
                    format!("Swap the minimum {} into index {}", a[i], i)
                },
            )
            .highlight(Role::Swapped, [i, min])
            .line(4)
            .var("i", i)
            .var("min", min),
        )?;
    }
    finish(&a, 5, rec)
}

struct QuickSort {
    a: Vec<i64>,
    settled: Vec<bool>,
}

impl QuickSort {
    fn sorted(&self) -> Vec<usize> {
        (0..self.a.len()).filter(|&k| self.settled[k]).collect()
    }

    fn frame(&self, narration: String) -> Snapshot {
        frame(&self.a, &self.sorted(), narration)
    }

    fn sort(&mut self, lo: usize, hi: usize, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
        rec.push(
            self.frame(format!("quicksort({}, {})", lo, hi))
                .highlight(Role::Range, lo..=hi)
                .line(0)
                .var("lo", lo)
                .var("hi", hi),
        )?;
        if lo >= hi {
            self.settled[lo] = true;
            return rec.push(
                self.frame(format!("Range of one element: a[{}] is in place", lo))
                    .line(1)
                    .var("lo", lo)
                    .var("hi", hi),
            );
        }

        let pivot = self.a[hi];
        let mut i = lo;
        rec.push(
            self.frame(format!("Pivot is a[{}] = {}", hi, pivot))
                .highlight(Role::Range, lo..=hi)
                .highlight(Role::Pivot, [hi])
                .line(2)
                .var("lo", lo)
                .var("hi", hi)
                .var("pivot", pivot)
                .var("i", i),
        )?;
        for j in lo..hi {
            rec.push(
                self.frame(format!("Compare a[{}] = {} with pivot {}", j, self.a[j], pivot))
                    .highlight(Role::Range, lo..=hi)
                    .highlight(Role::Pivot, [hi])
                    .highlight(Role::Comparing, [j])
                    .line(4)
                    .var("pivot", pivot)
                    .var("i", i)
                    .var("j", j),
            )?;
            if self.a[j] < pivot {
                self.a.swap(i, j);
                rec.push(
                    self.frame(format!(
                        "{} < {}, move it to the low side at index {}",
                        self.a[i], pivot, i
                    ))
                    .highlight(Role::Range, lo..=hi)
                    .highlight(Role::Pivot, [hi])
                    .highlight(Role::Swapped, [i, j])
                    .line(5)
                    .var("pivot", pivot)
                    .var("i", i)
                    .var("j", j),
                )?;
                i += 1;
            }
        }
        self.a.swap(i, hi);
        self.settled[i] = true;
        rec.push(
            self.frame(format!("Place pivot {} at its final index {}", pivot, i))
                .highlight(Role::Range, lo..=hi)
                .highlight(Role::Swapped, [i, hi])
                .line(6)
                .var("pivot", pivot)
                .var("i", i),
        )?;

        if i > lo {
            self.sort(lo, i - 1, rec)?;
        }
        if i < hi {
            self.sort(i + 1, hi, rec)?;
        }
        Ok(())
    }
}

pub fn quick_sort(input: &[i64], rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut qs = QuickSort {
        a: input.to_vec(),
        settled: vec![false; input.len()],
    };
    if let Some(hi) = input.len().checked_sub(1) {
        qs.sort(0, hi, rec)?;
    }
    finish(&qs.a, 7, rec)
}

fn merge_range(
    a: &mut [i64],
    lo: usize,
    hi: usize,
    rec: &mut Recorder,
) -> Result<(), StepBudgetExceeded> {
    rec.push(
        Snapshot::new(array(a), format!("mergesort({}, {})", lo, hi))
            .highlight(Role::Range, lo..=hi)
            .line(0)
            .var("lo", lo)
            .var("hi", hi),
    )?;
    if lo >= hi {
        return Ok(());
    }
    let mid = (lo + hi) / 2;
    rec.push(
        Snapshot::new(array(a), format!("Split into [{}..{}] and [{}..{}]", lo, mid, mid + 1, hi))
            .highlight(Role::Range, lo..=mid)
            .highlight(Role::Candidate, mid + 1..=hi)
            .line(2)
            .var("lo", lo)
            .var("mid", mid)
            .var("hi", hi),
    )?;
    merge_range(a, lo, mid, rec)?;
    merge_range(a, mid + 1, hi, rec)?;

    let left = a[lo..=mid].to_vec();
    let right = a[mid + 1..=hi].to_vec();
    let (mut i, mut j, mut k) = (0, 0, lo);
    while i < left.len() && j < right.len() {
        rec.push(
            Snapshot::new(
                array(a),
                format!("Compare left head {} with right head {}", left[i], right[j]),
            )
            .highlight(Role::Range, lo..=hi)
            .highlight(Role::Active, [k])
            .line(4)
            .var("lo", lo)
            .var("mid", mid)
            .var("hi", hi)
            .var("k", k),
        )?;
        let value = if left[i] <= right[j] {
            i += 1;
            left[i - 1]
        } else {
            j += 1;
            right[j - 1]
        };
        a[k] = value;
        rec.push(
            Snapshot::new(array(a), format!("Write {} to a[{}]", value, k))
                .highlight(Role::Range, lo..=hi)
                .highlight(Role::Swapped, [k])
                .line(5)
                .var("lo", lo)
                .var("mid", mid)
                .var("hi", hi)
                .var("k", k),
        )?;
        k += 1;
    }
    for &value in left[i..].iter().chain(right[j..].iter()) {
        a[k] = value;
        rec.push(
            Snapshot::new(array(a), format!("Copy remaining {} to a[{}]", value, k))
                .highlight(Role::Range, lo..=hi)
                .highlight(Role::Swapped, [k])
                .line(6)
                .var("k", k),
        )?;
        k += 1;
    }
    Ok(())
}

pub fn merge_sort(input: &[i64], rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut a = input.to_vec();
    if let Some(hi) = a.len().checked_sub(1) {
        merge_range(&mut a, 0, hi, rec)?;
    }
    finish(&a, 6, rec)
}
