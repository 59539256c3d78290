use super::blocks::BlockId;
use crate::board::Direction;
use std::fmt;

/// One directly executable instruction of a flattened program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Mark a block as the one currently executing
    Highlight(BlockId),
    Unhighlight(BlockId),
    /// Move one cell; `None` is an unrecognised direction field and does nothing
    Move(Option<Direction>),
    /// Color the current cell
    Fill(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Highlight(id) => write!(f, "highlight {}", id),
            Step::Unhighlight(id) => write!(f, "unhighlight {}", id),
            Step::Move(Some(direction)) => write!(f, "move {}", direction),
            Step::Move(None) => write!(f, "move ?"),
            Step::Fill(color) => write!(f, "fill {}", color),
        }
    }
}
