//! TUI pane rendering modules
//!
//! - [`program`]: the block tree, with the executing block marked
//! - [`board`]: the grid with its color overlay, the piece and the start cell
//! - [`status`]: status bar with run state, speed and keybindings
//!
//! Each module exports one `render_*` function taking the frame, its area and
//! whatever it displays. None of them hold state beyond scroll offsets owned
//! by the caller.

pub mod board;
pub mod program;
pub mod status;

pub use board::render_board_pane;
pub use program::{program_lines, render_program_pane};
pub use status::render_status_bar;
