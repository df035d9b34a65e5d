//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, scheduler pumping
//! - **[`panes`]**: stateless render functions for each visible pane (payload,
//!   pseudocode, variables, narration, status bar)
//! - **[`theme`]**: centralized color palette, including one colour per
//!   highlight role
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`Session`] and call [`App::run`] to start the event loop.
//!
//! [`Session`]: crate::session::Session
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
