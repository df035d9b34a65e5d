//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`payload`]: the working structure of the current snapshot (bars, graph,
//!   table, board, text alignment, point canvas)
//! - [`source`]: pseudocode listing with the current line indicator
//! - [`variables`]: named scalars captured with the snapshot
//! - [`narration`]: log of narrations up to the current snapshot
//! - [`status`]: status bar with keybindings and playback state
//! - `utils`: shared helpers for block styling, role colours and values
//!
//! Each pane module exports a `render_*` function; panes are stateless apart
//! from the scroll state the app passes in.

mod utils;

pub mod narration;
pub mod payload;
pub mod source;
pub mod status;
pub mod variables;

pub use narration::render_narration_pane;
pub use payload::render_payload_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use variables::render_variables_pane;
