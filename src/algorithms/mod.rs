//! Instrumented algorithms, one module per family
//!
//! Every algorithm here follows the same discipline:
//! - copy its input into one private working structure
//! - at each transition worth seeing, clone the structure into a
//!   [`Snapshot`](crate::snapshot::Snapshot) and push it to the
//!   [`Recorder`](crate::snapshot::Recorder)
//! - record both the "about to act" and the "after acting" moments
//! - propagate [`StepBudgetExceeded`](crate::snapshot::StepBudgetExceeded)
//!   with `?` so recursion unwinds as soon as the budget runs out
//!
//! Input validation lives next to each algorithm as a `validate*` function
//! that [`record`](crate::recorder::record) calls before running it.

pub mod backtracking;
pub mod dynamic;
pub mod geometry;
pub mod graph;
pub mod number_theory;
pub mod searching;
pub mod sorting;
pub mod strings;

use crate::snapshot::Payload;

/// Array payload copied from the working slice
pub(crate) fn array(values: &[i64]) -> Payload {
    Payload::Array {
        values: values.to_vec(),
    }
}
