//! Block programs
//!
//! - [`blocks`]: the block tree a program is assembled from
//! - [`step`]: the flat instructions the runner executes
//! - [`compiler`]: turns the tree rooted at the start block into steps
//!
//! ```text
//! Workspace (tree) → compile → Vec<Step> → Runner
//! ```

pub mod blocks;
pub mod compiler;
pub mod step;

pub use blocks::{Block, BlockId, BlockKind, Workspace, WorkspaceError, MAX_DEPTH};
pub use compiler::{compile, CompileError, MAX_REPEAT, MAX_STEPS};
pub use step::Step;
