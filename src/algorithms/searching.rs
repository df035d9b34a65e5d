//! Linear and binary search

use super::array;
use crate::recorder::errors::{check_len, InputError};
use crate::snapshot::{Recorder, Role, Snapshot, Status, StepBudgetExceeded};

pub const MAX_SEARCH_LEN: usize = 64;

pub const LINEAR_SEARCH_CODE: &[&str] = &[
    "for i in 0..n:",
    "  if a[i] == target:",
    "    return i",
    "return not found",
];

pub const BINARY_SEARCH_CODE: &[&str] = &[
    "low = 0; high = n - 1",
    "while low <= high:",
    "  mid = (low + high) / 2",
    "  if a[mid] == target: return mid",
    "  if a[mid] < target: low = mid + 1",
    "  else: high = mid - 1",
    "return not found",
];

pub fn validate(values: &[i64], needs_sorted: bool) -> Result<(), InputError> {
    check_len("array", values.len(), MAX_SEARCH_LEN)?;
    if needs_sorted {
        if let Some(index) = values.windows(2).position(|w| w[0] > w[1]) {
            return Err(InputError::Unsorted { index: index + 1 });
        }
    }
    Ok(())
}

pub fn linear_search(
    values: &[i64],
    target: i64,
    rec: &mut Recorder,
) -> Result<(), StepBudgetExceeded> {
    rec.push(
        Snapshot::new(array(values), format!("Scan left to right for {}", target))
            .line(0)
            .var("target", target),
    )?;

    for (i, &value) in values.iter().enumerate() {
        rec.push(
            Snapshot::new(array(values), format!("Is a[{}] = {} equal to {}?", i, value, target))
                .highlight(Role::Comparing, [i])
                .highlight(Role::Eliminated, 0..i)
                .line(1)
                .var("target", target)
                .var("i", i),
        )?;
        if value == target {
            return rec.push(
                Snapshot::new(array(values), format!("Found {} at index {}", target, i))
                    .highlight(Role::Found, [i])
                    .highlight(Role::Eliminated, 0..i)
                    .line(2)
                    .var("target", target)
                    .var("i", i)
                    .status(Status::Found),
            );
        }
        rec.push(
            Snapshot::new(array(values), format!("{} != {}, move on", value, target))
                .highlight(Role::Eliminated, 0..=i)
                .line(1)
                .var("target", target)
                .var("i", i),
        )?;
    }

    rec.push(
        Snapshot::new(array(values), format!("{} is not in the array", target))
            .highlight(Role::Eliminated, 0..values.len())
            .line(3)
            .var("target", target)
            .status(Status::NotFound),
    )
}

/// Binary search snapshot with everything outside `[low, high]` greyed out
fn window(values: &[i64], low: i64, high: i64, narration: String) -> Snapshot {
    let n = values.len();
    let live = |k: &usize| (*k as i64) >= low && (*k as i64) <= high;
    Snapshot::new(array(values), narration)
        .highlight(Role::Range, (0..n).filter(live))
        .highlight(Role::Eliminated, (0..n).filter(|k| !live(k)))
        .var("low", low)
        .var("high", high)
}

pub fn binary_search(
    values: &[i64],
    target: i64,
    rec: &mut Recorder,
) -> Result<(), StepBudgetExceeded> {
    let mut low: i64 = 0;
    let mut high: i64 = values.len() as i64 - 1;
    rec.push(
        window(values, low, high, format!("Search for {} in the whole array", target))
            .line(0)
            .var("target", target),
    )?;

    while low <= high {
        let mid = (low + high) / 2;
        let m = mid as usize;
        rec.push(
            window(values, low, high, format!("Probe the middle: a[{}] = {}", mid, values[m]))
                .highlight(Role::Comparing, [m])
                .line(2)
                .var("mid", mid)
                .var("target", target),
        )?;
        if values[m] == target {
            return rec.push(
                window(values, low, high, format!("Found {} at index {}", target, mid))
                    .highlight(Role::Found, [m])
                    .line(3)
                    .var("mid", mid)
                    .var("target", target)
                    .status(Status::Found),
            );
        }
        let (narration, line) = if values[m] < target {
            low = mid + 1;
            (format!("{} < {}, discard the left half", values[m], target), 4)
        } else {
            high = mid - 1;
            (format!("{} > {}, discard the right half", values[m], target), 5)
        };
        rec.push(
            window(values, low, high, narration)
                .line(line)
                .var("mid", mid)
                .var("target", target),
        )?;
    }

    rec.push(
        window(values, low, high, format!("Window is empty: {} is not in the array", target))
            .line(6)
            .var("target", target)
            .status(Status::NotFound),
    )
}
