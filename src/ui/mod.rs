//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, the keyboard event loop and the pacer
//!   that animates runs
//! - **[`panes`]**: stateless render functions for each visible pane (program,
//!   board, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a [`Runner`] and
//! a [`Workspace`] and call [`App::run`] to start the event loop.
//!
//! [`Runner`]: crate::interpreter::Runner
//! [`Workspace`]: crate::program::Workspace
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
