//! Suspension between steps
//!
//! The runner never sleeps on its own. Wherever a step calls for a pause it
//! calls [`Pacer::pause`] with a read-only view of the run and the delay; the
//! pacer decides how to spend that time and whether the run may go on.

use super::runner::RunView;
use std::time::Duration;

/// What the runner should do after a pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Resume,
    /// Cancel the run: the queue is dropped and the board returns to start
    Stop,
}

/// Messages for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The queue ran dry
    Finished,
    /// A run was cancelled before it finished
    Stopped,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::Finished => "The program has finished.",
            Notice::Stopped => "The program was stopped.",
        }
    }
}

/// Host side of a run: pacing, redraws and notices
pub trait Pacer {
    /// Yield for `delay`. Only called with a non-zero delay.
    fn pause(&mut self, view: &RunView<'_>, delay: Duration) -> Interrupt;

    fn notify(&mut self, _notice: Notice) {}
}

/// Runs without waiting
#[derive(Debug, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&mut self, _view: &RunView<'_>, _delay: Duration) -> Interrupt {
        Interrupt::Resume
    }
}

/// Blocks the thread for every delay; used by the headless runner
#[derive(Debug, Default)]
pub struct Sleeper {
    pub notices: Vec<Notice>,
}

impl Pacer for Sleeper {
    fn pause(&mut self, _view: &RunView<'_>, delay: Duration) -> Interrupt {
        std::thread::sleep(delay);
        Interrupt::Resume
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
