//! Property-based invariant tests for the board and the program compiler.
//!
//! 1. `set_start_pos` then `reset` puts the piece at the (clamped) start with
//!    no fills.
//! 2. Moves wrap around at every edge and keep the piece in bounds.
//! 3. A direction followed by its opposite returns to the same cell.
//! 4. Repeat `n` over a body of `k` blocks yields `n * k` bracketed steps,
//!    with `n` clamped to `[0, 200]`.
//! 5. Compiling twice yields identical sequences.

use proptest::prelude::*;
use std::time::Duration;
use tily::board::{Board, Direction};
use tily::program::{compile, BlockKind, Step, Workspace, MAX_REPEAT};

// ── Helpers ─────────────────────────────────────────────────────────────

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn opposite(direction: Direction) -> Direction {
    match direction {
        Direction::Up => Direction::Down,
        Direction::Down => Direction::Up,
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
    }
}

fn step(board: &mut Board, direction: Direction) {
    board.go(Some(direction), 1, Duration::ZERO, |_, _| {});
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Start position survives reset
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reset_returns_to_start(
        rows in -3i64..40,
        cols in -3i64..40,
        row in -10i64..50,
        col in -10i64..50,
        moves in prop::collection::vec(direction_strategy(), 0..20),
    ) {
        let mut board = Board::new(rows, cols);
        board.set_start_pos(row, col);
        for direction in moves {
            step(&mut board, direction);
            board.fill_current("#123456");
        }
        board.reset();

        let expected = (
            row.clamp(0, board.rows() as i64 - 1) as usize,
            col.clamp(0, board.cols() as i64 - 1) as usize,
        );
        prop_assert_eq!(board.position(), expected);
        prop_assert_eq!(board.start_position(), expected);
        prop_assert!(board.fill_colors().is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Wrap-around keeps the piece in bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn moves_stay_in_bounds(
        rows in 1i64..20,
        cols in 1i64..20,
        moves in prop::collection::vec(direction_strategy(), 0..60),
    ) {
        let mut board = Board::new(rows, cols);
        for direction in moves {
            step(&mut board, direction);
            let (r, c) = board.position();
            prop_assert!(r < board.rows() && c < board.cols());
        }
    }

    #[test]
    fn edges_wrap(rows in 1i64..20, cols in 1i64..20) {
        let mut board = Board::new(rows, cols);
        board.set_start_pos(0, cols - 1);
        step(&mut board, Direction::Right);
        prop_assert_eq!(board.position(), (0, 0));
        step(&mut board, Direction::Up);
        prop_assert_eq!(board.position(), (board.rows() - 1, 0));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Opposite moves cancel
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn opposite_moves_cancel(
        rows in 1i64..20,
        cols in 1i64..20,
        row in 0i64..20,
        col in 0i64..20,
        direction in direction_strategy(),
    ) {
        let mut board = Board::new(rows, cols);
        board.set_start_pos(row, col);
        let before = board.position();
        step(&mut board, direction);
        step(&mut board, opposite(direction));
        prop_assert_eq!(board.position(), before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Repeat multiplies its body
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn repeat_multiplies_body(
        times in -50i64..400,
        body in prop::collection::vec(direction_strategy(), 0..6),
    ) {
        let mut ws = Workspace::new();
        let start = ws.ensure_start_block();
        let repeat = ws.push(&start, BlockKind::Repeat { times }).unwrap();
        for direction in &body {
            ws.push(&repeat, BlockKind::Move { direction: direction.name().to_string() }).unwrap();
        }

        let steps = compile(&ws).unwrap();
        let n = times.clamp(0, MAX_REPEAT) as usize;
        prop_assert_eq!(steps.len(), n * body.len() * 3);
        let moves = steps.iter().filter(|s| matches!(s, Step::Move(_))).count();
        prop_assert_eq!(moves, n * body.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Compilation is deterministic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compile_is_idempotent(
        outer in 0i64..5,
        inner in 0i64..5,
        directions in prop::collection::vec(direction_strategy(), 1..4),
    ) {
        let mut ws = Workspace::new();
        let start = ws.ensure_start_block();
        let repeat = ws.push(&start, BlockKind::Repeat { times: outer }).unwrap();
        let nested = ws.push(&repeat, BlockKind::Repeat { times: inner }).unwrap();
        for direction in &directions {
            ws.push(&nested, BlockKind::Move { direction: direction.name().to_string() }).unwrap();
        }
        ws.push(&repeat, BlockKind::Fill { color: String::new() }).unwrap();

        let first = compile(&ws).unwrap();
        prop_assert_eq!(compile(&ws).unwrap(), first.clone());
        let expected = outer as usize * (inner as usize * directions.len() + 1) * 3;
        prop_assert_eq!(first.len(), expected);
    }
}
