//! # Introduction
//!
//! tily is a small block-programming toy: a program of `move`, `fill` and
//! `repeat` blocks drives a piece around a grid board and colors cells. A
//! terminal UI built with [ratatui](https://docs.rs/ratatui) shows the
//! program, animates the run and exports the result as a portable bitmap.
//!
//! ## Execution pipeline
//!
//! ```text
//! Workspace → compile → Steps → Runner → Board → TUI / bitmap
//! ```
//!
//! 1. [`program`]: the block arena ([`program::Workspace`]) and the compiler
//!    that flattens the tree under the start block into [`program::Step`]s.
//! 2. [`interpreter`]: the [`interpreter::Runner`] drains the step queue
//!    against the board, pausing through a host-supplied
//!    [`interpreter::Pacer`] so runs can be animated and stopped.
//! 3. [`board`]: grid geometry with wrap-around moves, the color overlay and
//!    PBM/PGM/PPM export.
//! 4. [`project`]: JSON project files holding the block tree and settings.
//! 5. [`config`] and [`logging`]: TOML configuration and `env_logger` setup
//!    for the binary.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.

pub mod board;
pub mod config;
pub mod interpreter;
pub mod logging;
pub mod program;
pub mod project;
pub mod ui;
