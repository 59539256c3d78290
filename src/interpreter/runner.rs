// Step runner: drains a flattened program against a board

use super::errors::RunError;
use super::pacer::{Interrupt, Notice, Pacer};
use super::speed::SpeedControl;
use crate::board::Board;
use crate::program::{compile, BlockId, Step, Workspace};
use std::collections::VecDeque;
use std::time::Duration;

/// Runner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    /// Cancelled by [`Runner::stop`]; behaves like `Idle` for new requests
    Stopped,
}

/// How a run or step request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The queue is empty
    Completed,
    /// One step executed and more are queued
    Stepped,
    /// The pacer asked for a stop
    Stopped,
    /// A run was already in progress; nothing happened
    Busy,
}

/// Read-only snapshot of a run handed to the pacer and the UI
#[derive(Debug, Clone, Copy)]
pub struct RunView<'a> {
    pub board: &'a Board,
    pub highlighted: Option<&'a BlockId>,
    pub pending: &'a VecDeque<Step>,
    pub state: RunState,
    /// Steps executed since the program was (re)loaded
    pub executed: usize,
}

/// Executes step queues against the board it owns
#[derive(Debug)]
pub struct Runner {
    board: Board,
    queue: VecDeque<Step>,
    state: RunState,

    /// Block whose step is executing
    highlighted: Option<BlockId>,

    speed: SpeedControl,
    executed: usize,
}

impl Runner {
    pub fn new(board: Board, speed: SpeedControl) -> Self {
        Runner {
            board,
            queue: VecDeque::new(),
            state: RunState::Idle,
            highlighted: None,
            speed,
            executed: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board for settings changes; refused while running
    pub fn board_mut(&mut self) -> Result<&mut Board, RunError> {
        if self.state == RunState::Running {
            return Err(RunError::Busy);
        }
        Ok(&mut self.board)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn pending(&self) -> &VecDeque<Step> {
        &self.queue
    }

    pub fn highlighted(&self) -> Option<&BlockId> {
        self.highlighted.as_ref()
    }

    pub fn speed(&self) -> &SpeedControl {
        &self.speed
    }

    pub fn view(&self) -> RunView<'_> {
        RunView {
            board: &self.board,
            highlighted: self.highlighted.as_ref(),
            pending: &self.queue,
            state: self.state,
            executed: self.executed,
        }
    }

    /// Compile the workspace into a fresh queue and put the board at start.
    /// On error nothing is touched.
    fn load(&mut self, workspace: &Workspace) -> Result<(), RunError> {
        let steps = compile(workspace)?;
        self.board.apply_start(true);
        self.queue = steps.into();
        self.executed = 0;
        self.highlighted = None;
        self.state = RunState::Idle;
        Ok(())
    }

    /// Run the workspace's program to completion or until the pacer stops it
    pub fn run<P: Pacer + ?Sized>(
        &mut self,
        workspace: &Workspace,
        pacer: &mut P,
    ) -> Result<RunOutcome, RunError> {
        if self.state == RunState::Running {
            log::debug!("run requested while running, ignoring");
            return Ok(RunOutcome::Busy);
        }
        self.load(workspace)?;
        self.state = RunState::Running;
        log::info!("running program of {} steps", self.queue.len());

        while self.state == RunState::Running {
            let Some(step) = self.queue.pop_front() else {
                break;
            };
            if self.execute(step, pacer) == Interrupt::Stop {
                self.stop();
            }
        }

        Ok(self.finish(pacer))
    }

    /// Execute one step, loading the program first if the queue is empty
    pub fn single_step<P: Pacer + ?Sized>(
        &mut self,
        workspace: &Workspace,
        pacer: &mut P,
    ) -> Result<RunOutcome, RunError> {
        if self.state == RunState::Running {
            return Ok(RunOutcome::Busy);
        }
        if self.queue.is_empty() {
            self.load(workspace)?;
        }

        if let Some(step) = self.queue.pop_front() {
            self.state = RunState::Running;
            if self.execute(step, pacer) == Interrupt::Stop {
                self.stop();
            }
        }

        if self.queue.is_empty() || self.state == RunState::Stopped {
            Ok(self.finish(pacer))
        } else {
            self.state = RunState::Idle;
            Ok(RunOutcome::Stepped)
        }
    }

    /// Leave the running state and tell the pacer how the run ended
    fn finish<P: Pacer + ?Sized>(&mut self, pacer: &mut P) -> RunOutcome {
        if self.state == RunState::Stopped {
            pacer.notify(Notice::Stopped);
            RunOutcome::Stopped
        } else {
            self.state = RunState::Idle;
            log::info!("program finished after {} steps", self.executed);
            pacer.notify(Notice::Finished);
            RunOutcome::Completed
        }
    }

    /// Cancel: drop the queue, clear the highlight and return the board to start
    pub fn stop(&mut self) {
        if !self.queue.is_empty() {
            log::info!("stopping with {} steps pending", self.queue.len());
        }
        self.queue.clear();
        self.state = RunState::Stopped;
        self.highlighted = None;
        self.board.apply_start(true);
    }

    /// Stop, throw the program away and start over with an empty start block
    pub fn reset(&mut self, workspace: &mut Workspace) {
        self.stop();
        workspace.clear();
        workspace.ensure_start_block();
        self.board.apply_start(true);
        self.executed = 0;
        self.state = RunState::Idle;
    }

    fn execute<P: Pacer + ?Sized>(&mut self, step: Step, pacer: &mut P) -> Interrupt {
        // Read live so slider changes apply to the very next step
        let delay = self.speed.delay();
        log::debug!("step {}: {}", self.executed, step);
        self.executed += 1;

        match step {
            Step::Highlight(id) => {
                self.highlighted = Some(id);
                self.pause(pacer, delay / 2)
            }
            Step::Unhighlight(_) => {
                self.highlighted = None;
                Interrupt::Resume
            }
            Step::Move(direction) => {
                let mut signal = Interrupt::Resume;
                let highlighted = self.highlighted.as_ref();
                let pending = &self.queue;
                let (state, executed) = (self.state, self.executed);
                self.board.go(direction, 1, delay, |board, d| {
                    let view = RunView {
                        board,
                        highlighted,
                        pending,
                        state,
                        executed,
                    };
                    signal = pacer.pause(&view, d);
                });
                signal
            }
            Step::Fill(color) => {
                self.board.fill_current(&color);
                self.pause(pacer, delay / 2)
            }
        }
    }

    fn pause<P: Pacer + ?Sized>(&self, pacer: &mut P, delay: Duration) -> Interrupt {
        if delay.is_zero() {
            return Interrupt::Resume;
        }
        pacer.pause(&self.view(), delay)
    }
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new(Board::default(), SpeedControl::default())
    }
}
