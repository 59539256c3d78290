// Flattening of block trees into step sequences

use super::blocks::{Block, BlockId, BlockKind, Workspace, MAX_DEPTH};
use super::step::Step;
use crate::board::color::DEFAULT_FILL;
use crate::board::Direction;

/// Largest repeat count a repeat block honors
pub const MAX_REPEAT: i64 = 200;

/// Upper bound on the length of a flattened program
pub const MAX_STEPS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("no start block in the program")]
    MissingStart,
}

/// Flatten the program rooted at the workspace's start block.
///
/// Move and fill blocks become `Highlight`, the action, `Unhighlight`.
/// Repeat blocks expand their body `times` times (clamped to
/// `[0, MAX_REPEAT]`) without highlighting themselves; the start block
/// contributes only its body. Blocks outside the start block's tree are
/// ignored.
///
/// The result never exceeds `MAX_STEPS` steps and bodies nested deeper than
/// `MAX_DEPTH` are dropped; both cuts are logged.
pub fn compile(workspace: &Workspace) -> Result<Vec<Step>, CompileError> {
    let start = workspace.find_start().ok_or(CompileError::MissingStart)?;

    let mut flattener = Flattener {
        workspace,
        truncated: false,
        too_deep: false,
    };
    let mut steps = Vec::new();
    flattener.sequence(start.body.as_ref(), 0, MAX_STEPS, &mut steps);

    if flattener.truncated {
        log::warn!("program truncated at {} steps", MAX_STEPS);
    }
    if flattener.too_deep {
        log::warn!("blocks nested deeper than {} levels were skipped", MAX_DEPTH);
    }
    log::debug!("compiled {} steps", steps.len());
    Ok(steps)
}

struct Flattener<'a> {
    workspace: &'a Workspace,
    truncated: bool,
    too_deep: bool,
}

impl Flattener<'_> {
    /// Append `step` unless `out` already holds `budget` steps
    fn emit(&mut self, out: &mut Vec<Step>, budget: usize, step: Step) {
        if out.len() >= budget {
            self.truncated = true;
            return;
        }
        out.push(step);
    }

    /// Flatten a statement list into `out`, which may grow to `budget` steps.
    ///
    /// `budget` is what is left of `MAX_STEPS` once every enclosing list's
    /// steps are counted, so the buffers alive at any time sum to at most
    /// `MAX_STEPS`.
    fn sequence(
        &mut self,
        first: Option<&BlockId>,
        depth: usize,
        budget: usize,
        out: &mut Vec<Step>,
    ) {
        if first.is_none() {
            return;
        }
        if depth > MAX_DEPTH {
            self.too_deep = true;
            return;
        }
        let workspace = self.workspace;
        for block in workspace.sequence(first) {
            if self.truncated {
                break;
            }
            self.block(block, depth, budget, out);
        }
    }

    fn block(&mut self, block: &Block, depth: usize, budget: usize, out: &mut Vec<Step>) {
        match &block.kind {
            BlockKind::Move { direction } => {
                let direction = direction.parse::<Direction>().ok();
                if direction.is_none() {
                    log::warn!("move block '{}' has an unknown direction", block.id);
                }
                self.bracketed(out, budget, &block.id, Step::Move(direction));
            }
            BlockKind::Fill { color } => {
                let color = if color.trim().is_empty() {
                    DEFAULT_FILL.to_string()
                } else {
                    color.clone()
                };
                self.bracketed(out, budget, &block.id, Step::Fill(color));
            }
            BlockKind::Repeat { times } => {
                let times = (*times).clamp(0, MAX_REPEAT);
                if times == 0 {
                    return;
                }
                // The body is flattened once and copied, so an empty body
                // costs nothing however deep the repeats are stacked
                let mut body = Vec::new();
                self.sequence(block.body.as_ref(), depth + 1, budget - out.len(), &mut body);
                if body.is_empty() {
                    return;
                }
                for _ in 0..times {
                    let room = budget - out.len();
                    if room < body.len() {
                        out.extend_from_slice(&body[..room]);
                        self.truncated = true;
                        break;
                    }
                    out.extend_from_slice(&body);
                }
            }
            // A nested start block only runs its body, like the top-level one
            BlockKind::Start => self.sequence(block.body.as_ref(), depth + 1, budget, out),
        }
    }

    fn bracketed(&mut self, out: &mut Vec<Step>, budget: usize, id: &BlockId, action: Step) {
        self.emit(out, budget, Step::Highlight(id.clone()));
        self.emit(out, budget, action);
        self.emit(out, budget, Step::Unhighlight(id.clone()));
    }
}
