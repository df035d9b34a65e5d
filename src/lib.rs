//! # Introduction
//!
//! algoscope runs classic algorithms once, capturing a snapshot of their
//! working state at every step a learner should see. The resulting timeline
//! is then played, paused, stepped and scrubbed through a terminal UI built
//! with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Params → record() → instrumented algorithm → Recorder → Timeline → Player → TUI
//!                                                                   ↑
//!                                                          Scheduler ticks
//! ```
//!
//! 1. [`recorder`]: the total, deterministic [`recorder::record`] entrypoint,
//!    parameter validation and the algorithm catalogue.
//! 2. [`algorithms`]: one module per family; each algorithm owns its working
//!    structure and pushes copies of it into a [`snapshot::Recorder`].
//! 3. [`snapshot`]: the immutable [`snapshot::Snapshot`] and
//!    [`snapshot::Timeline`] types and the step-budgeted recorder.
//! 4. [`player`]: the playback state machine and the cooperative tick
//!    source.
//! 5. [`session`]: ties one player and one scheduler to the selected
//!    algorithm and swaps them atomically when the selection changes.
//! 6. [`config`]: command-line flags.
//! 7. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Families
//!
//! Sorting, searching, graph traversal, dynamic programming, backtracking,
//! string matching, number theory and computational geometry.

pub mod algorithms;
pub mod config;
pub mod player;
pub mod recorder;
pub mod session;
pub mod snapshot;
pub mod ui;
