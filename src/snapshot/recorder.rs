// Append-only snapshot sink with a step budget

use super::{Snapshot, Status, Timeline};
use crate::recorder::AlgorithmId;

/// Returned by [`Recorder::push`] once the budget is used up.
///
/// Instrumented algorithms propagate it with `?` so that deep recursion
/// unwinds straight back to the recording entrypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("step budget of {limit} snapshots exhausted")]
pub struct StepBudgetExceeded {
    pub limit: usize,
}

/// Collects the snapshots of one algorithm run
#[derive(Debug)]
pub struct Recorder {
    snapshots: Vec<Snapshot>,
    budget: usize,
    truncated: bool,
}

impl Recorder {
    pub fn new(budget: usize) -> Self {
        Recorder {
            snapshots: Vec::new(),
            budget: budget.max(1),
            truncated: false,
        }
    }

    /// Append a snapshot to the timeline
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), StepBudgetExceeded> {
        if self.snapshots.len() >= self.budget {
            return Err(StepBudgetExceeded { limit: self.budget });
        }
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Append the terminal snapshot of a run cut short by the budget.
    ///
    /// This is the only append allowed past the budget.
    pub fn truncate(&mut self, snapshot: Snapshot) {
        if self.truncated {
            return;
        }
        self.truncated = true;
        self.snapshots.push(snapshot.status(Status::Truncated));
    }

    /// Most recently recorded snapshot
    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Freeze the recording into a timeline.
    ///
    /// A run that recorded nothing still yields one snapshot so the player
    /// always has something to show.
    pub fn finish(mut self, algorithm: AlgorithmId) -> Timeline {
        if self.is_empty() {
            self.snapshots
                .push(Snapshot::error("The algorithm recorded no steps"));
        }
        Timeline::new(algorithm, self.snapshots, self.truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Payload;

    fn step(n: usize) -> Snapshot {
        Snapshot::new(Payload::Empty, format!("step {}", n))
    }

    #[test]
    fn push_refuses_past_budget() {
        let mut recorder = Recorder::new(2);
        assert!(recorder.push(step(0)).is_ok());
        assert!(recorder.push(step(1)).is_ok());
        assert_eq!(
            recorder.push(step(2)),
            Err(StepBudgetExceeded { limit: 2 })
        );
        assert_eq!(recorder.len(), 2);
    }

    #[test]
    fn truncate_appends_once_past_budget() {
        let mut recorder = Recorder::new(1);
        recorder.push(step(0)).unwrap();
        recorder.truncate(step(1));
        recorder.truncate(step(2));
        let timeline = recorder.finish(AlgorithmId::NQueens);
        assert_eq!(timeline.len(), 2);
        assert!(timeline.is_truncated());
        assert_eq!(timeline.outcome(), Status::Truncated);
    }

    #[test]
    fn empty_recording_still_yields_a_snapshot() {
        let timeline = Recorder::new(10).finish(AlgorithmId::BubbleSort);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.outcome(), Status::Error);
    }
}
