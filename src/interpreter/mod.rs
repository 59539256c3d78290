//! Program execution
//!
//! This module provides the runner that drives a board from a flattened
//! program:
//! - [`runner`]: the [`Runner`](runner::Runner) state machine (run, single
//!   step, stop, reset)
//! - [`pacer`]: the [`Pacer`](pacer::Pacer) suspension point plus headless
//!   implementations
//! - [`speed`]: the live speed setting and its delay formula
//! - [`errors`]: refusal reasons
//!
//! # Execution Model
//!
//! A run compiles the workspace into a queue of steps, resets the board to
//! its start position and drains the queue one step at a time. Between steps
//! the runner hands control to the pacer for the step's delay; the pacer
//! redraws, gathers input and may ask the runner to stop. The runner checks
//! its state before taking each step, so a stop always lands before the next
//! step executes.

pub mod constants;
pub mod errors;
pub mod pacer;
pub mod runner;
pub mod speed;

pub use errors::RunError;
pub use pacer::{Interrupt, NoDelay, Notice, Pacer, Sleeper};
pub use runner::{RunOutcome, RunState, RunView, Runner};
pub use speed::SpeedControl;
