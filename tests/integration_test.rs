// Integration tests for running block programs

use std::time::Duration;

use tily::board::{Board, Direction};
use tily::interpreter::{
    Interrupt, NoDelay, Notice, Pacer, RunError, RunOutcome, RunState, RunView, Runner,
    SpeedControl,
};
use tily::program::{compile, BlockId, BlockKind, Step, Workspace};

fn mv(direction: &str) -> BlockKind {
    BlockKind::Move {
        direction: direction.to_string(),
    }
}

fn fill(color: &str) -> BlockKind {
    BlockKind::Fill {
        color: color.to_string(),
    }
}

/// `move RIGHT; fill #ff0000; repeat 2 { move DOWN }`
fn scenario_workspace() -> Workspace {
    let mut ws = Workspace::new();
    let start = ws.ensure_start_block();
    ws.push(&start, mv("RIGHT")).unwrap();
    ws.push(&start, fill("#ff0000")).unwrap();
    let repeat = ws.push(&start, BlockKind::Repeat { times: 2 }).unwrap();
    ws.push(&repeat, mv("DOWN")).unwrap();
    ws
}

fn scenario_runner(speed: i64) -> Runner {
    let mut board = Board::new(3, 3);
    board.set_start_pos(1, 1);
    Runner::new(board, SpeedControl::new(speed))
}

/// Records every pause and stops after `stop_after` of them
#[derive(Default)]
struct Recorder {
    delays: Vec<Duration>,
    positions: Vec<(usize, usize)>,
    highlighted: Vec<Option<BlockId>>,
    notices: Vec<Notice>,
    stop_after: Option<usize>,
}

impl Pacer for Recorder {
    fn pause(&mut self, view: &RunView<'_>, delay: Duration) -> Interrupt {
        self.delays.push(delay);
        self.positions.push(view.board.position());
        self.highlighted.push(view.highlighted.cloned());
        assert_eq!(view.state, RunState::Running);
        match self.stop_after {
            Some(n) if self.delays.len() >= n => Interrupt::Stop,
            _ => Interrupt::Resume,
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[test]
fn test_scenario_final_state() {
    let ws = scenario_workspace();
    let mut runner = scenario_runner(50);

    let outcome = runner.run(&ws, &mut NoDelay).unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(runner.board().position(), (0, 2));
    assert_eq!(runner.board().fill_colors().len(), 1);
    assert_eq!(runner.board().color_at(1, 2), Some("#ff0000"));
    assert_eq!(runner.state(), RunState::Idle);
    assert!(runner.pending().is_empty());
    assert!(runner.highlighted().is_none());
}

#[test]
fn test_scenario_step_sequence() {
    let ws = scenario_workspace();
    let steps = compile(&ws).unwrap();
    let actions: Vec<&Step> = steps
        .iter()
        .filter(|s| !matches!(s, Step::Highlight(_) | Step::Unhighlight(_)))
        .collect();
    assert_eq!(
        actions,
        vec![
            &Step::Move(Some(Direction::Right)),
            &Step::Fill("#ff0000".to_string()),
            &Step::Move(Some(Direction::Down)),
            &Step::Move(Some(Direction::Down)),
        ]
    );
    // Each action is bracketed by its block's highlight
    assert_eq!(steps.len(), actions.len() * 3);
    assert_eq!(compile(&ws).unwrap(), steps);
}

#[test]
fn test_pauses_follow_step_timing() {
    let ws = scenario_workspace();
    let mut runner = scenario_runner(50);
    let mut pacer = Recorder::default();

    runner.run(&ws, &mut pacer).unwrap();

    let half = Duration::from_millis(50);
    let full = Duration::from_millis(100);
    // highlight, move, highlight, fill, then (highlight, move) twice
    assert_eq!(
        pacer.delays,
        vec![half, full, half, half, half, full, half, full]
    );
    assert_eq!(pacer.positions[1], (1, 2));
    assert!(pacer.highlighted.iter().all(Option::is_some));
    assert_eq!(pacer.notices, vec![Notice::Finished]);
}

#[test]
fn test_stop_mid_run_restores_start() {
    let ws = scenario_workspace();
    let mut runner = scenario_runner(50);
    // Stop during the pause after the fill
    let mut pacer = Recorder {
        stop_after: Some(4),
        ..Recorder::default()
    };

    let outcome = runner.run(&ws, &mut pacer).unwrap();

    assert_eq!(outcome, RunOutcome::Stopped);
    assert_eq!(pacer.delays.len(), 4);
    assert_eq!(runner.board().position(), (1, 1));
    assert!(runner.board().fill_colors().is_empty());
    assert!(runner.pending().is_empty());
    assert!(runner.highlighted().is_none());
    assert_eq!(runner.state(), RunState::Stopped);
    assert_eq!(pacer.notices, vec![Notice::Stopped]);

    // A stopped runner accepts a fresh run
    assert_eq!(runner.run(&ws, &mut NoDelay), Ok(RunOutcome::Completed));
    assert_eq!(runner.board().position(), (0, 2));
}

#[test]
fn test_speed_change_applies_to_next_step() {
    let ws = scenario_workspace();
    let mut runner = scenario_runner(50);
    let slider = runner.speed().clone();

    struct Throttle {
        slider: SpeedControl,
        delays: Vec<Duration>,
    }
    impl Pacer for Throttle {
        fn pause(&mut self, _view: &RunView<'_>, delay: Duration) -> Interrupt {
            self.delays.push(delay);
            self.slider.set(90);
            Interrupt::Resume
        }
    }

    let mut pacer = Throttle {
        slider,
        delays: Vec::new(),
    };
    runner.run(&ws, &mut pacer).unwrap();

    assert_eq!(pacer.delays[0], Duration::from_millis(50));
    assert_eq!(pacer.delays[1], Duration::from_millis(20));
}

#[test]
fn test_full_speed_never_pauses() {
    let ws = scenario_workspace();
    let mut runner = scenario_runner(100);
    let mut pacer = Recorder::default();
    runner.run(&ws, &mut pacer).unwrap();
    assert!(pacer.delays.is_empty());
    assert_eq!(pacer.notices, vec![Notice::Finished]);
}

#[test]
fn test_single_step_walks_the_queue() {
    let ws = scenario_workspace();
    let mut runner = scenario_runner(100);

    let mut outcomes = Vec::new();
    loop {
        let outcome = runner.single_step(&ws, &mut NoDelay).unwrap();
        outcomes.push(outcome);
        if outcome == RunOutcome::Completed {
            break;
        }
    }

    assert_eq!(outcomes.len(), 12);
    assert!(outcomes[..11].iter().all(|o| *o == RunOutcome::Stepped));
    assert_eq!(runner.board().position(), (0, 2));

    // The next step starts the program over
    runner.single_step(&ws, &mut NoDelay).unwrap();
    assert_eq!(runner.board().position(), (1, 1));
    assert!(runner.board().fill_colors().is_empty());
    assert_eq!(runner.pending().len(), 11);
}

#[test]
fn test_reset_program() {
    let mut ws = scenario_workspace();
    let mut runner = scenario_runner(100);
    runner.run(&ws, &mut NoDelay).unwrap();

    runner.reset(&mut ws);

    assert_eq!(ws.len(), 1);
    assert!(ws.find_start().is_some());
    assert_eq!(runner.board().position(), (1, 1));
    assert!(runner.board().fill_colors().is_empty());
    assert_eq!(runner.state(), RunState::Idle);
    assert_eq!(runner.run(&ws, &mut NoDelay), Ok(RunOutcome::Completed));
}

#[test]
fn test_missing_start_is_reported() {
    let mut ws = Workspace::empty();
    ws.add(mv("UP"));
    let mut runner = Runner::default();
    assert_eq!(runner.run(&ws, &mut NoDelay), Err(RunError::MissingStart));
    assert_eq!(
        runner.single_step(&ws, &mut NoDelay),
        Err(RunError::MissingStart)
    );
}

#[test]
fn test_unknown_direction_pauses_nothing() {
    let mut ws = Workspace::new();
    let start = ws.ensure_start_block();
    ws.push(&start, mv("sideways")).unwrap();

    let mut runner = scenario_runner(50);
    let mut pacer = Recorder::default();
    runner.run(&ws, &mut pacer).unwrap();

    // Only the highlight pauses; the move itself does nothing
    assert_eq!(pacer.delays, vec![Duration::from_millis(50)]);
    assert_eq!(runner.board().position(), (1, 1));
}
