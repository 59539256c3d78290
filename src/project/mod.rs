//! Project files
//!
//! A project is the block program plus the board settings, stored as JSON:
//!
//! ```json
//! {
//!   "blocks": [
//!     [
//!       { "id": "b0_1700000000000", "type": "start", "body": [
//!         { "id": "b1_1700000000000", "type": "move", "direction": "RIGHT" },
//!         { "id": "b2_1700000000000", "type": "repeat", "times": 2, "body": [] }
//!       ] }
//!     ]
//!   ],
//!   "settings": { "rows": 15, "cols": 15, "startrow": 0, "startcol": 0 }
//! }
//! ```
//!
//! Each entry of `blocks` is a stack: a top-level block followed by its
//! successors. Bodies are lists in the same sense. Block ids are regenerated
//! on every save so files saved at different times never share ids.
//!
//! Loading is all-or-nothing: the file is parsed and the block tree rebuilt
//! off to the side, and only then are the workspace and board replaced.

pub mod settings;

use crate::board::Board;
use crate::program::{Block, BlockId, BlockKind, Workspace, WorkspaceError, MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub use settings::{Settings, StartCorner};

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Cannot parse project file: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Invalid block structure: {0}")]
    Structure(#[from] WorkspaceError),

    #[error("Cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// On-disk form of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default)]
    pub blocks: Vec<Vec<BlockNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNode {
    pub id: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Start {
        #[serde(default)]
        body: Vec<BlockNode>,
    },
    Move {
        #[serde(default)]
        direction: String,
    },
    Fill {
        #[serde(default)]
        color: String,
    },
    Repeat {
        #[serde(default)]
        times: i64,
        #[serde(default)]
        body: Vec<BlockNode>,
    },
}

/// Hands out `b<index>_<millis>` ids for one save
struct IdGenerator {
    stamp: u128,
    index: usize,
}

impl IdGenerator {
    fn new() -> Self {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        IdGenerator { stamp, index: 0 }
    }

    fn next_id(&mut self) -> String {
        let id = format!("b{}_{}", self.index, self.stamp);
        self.index += 1;
        id
    }
}

fn to_node(workspace: &Workspace, block: &Block, depth: usize, ids: &mut IdGenerator) -> BlockNode {
    let id = ids.next_id();
    let body = |ids: &mut IdGenerator| -> Vec<BlockNode> {
        if depth >= MAX_DEPTH {
            if block.body.is_some() {
                log::warn!("not saving blocks nested below '{}'", block.id);
            }
            return Vec::new();
        }
        workspace
            .sequence(block.body.as_ref())
            .map(|child| to_node(workspace, child, depth + 1, ids))
            .collect()
    };
    let kind = match &block.kind {
        BlockKind::Start => NodeKind::Start { body: body(ids) },
        BlockKind::Move { direction } => NodeKind::Move {
            direction: direction.clone(),
        },
        BlockKind::Fill { color } => NodeKind::Fill {
            color: color.clone(),
        },
        BlockKind::Repeat { times } => NodeKind::Repeat {
            times: *times,
            body: body(ids),
        },
    };
    BlockNode { id, kind }
}

/// Snapshot the workspace and board settings as a document with fresh ids
pub fn to_document(workspace: &Workspace, board: &Board) -> ProjectDocument {
    let mut ids = IdGenerator::new();
    let blocks: Vec<Vec<BlockNode>> = workspace
        .top_blocks()
        .map(|top| {
            workspace
                .sequence(Some(&top.id))
                .map(|block| to_node(workspace, block, 0, &mut ids))
                .collect::<Vec<_>>()
        })
        .collect();
    ProjectDocument {
        blocks,
        settings: Some(Settings::from_board(board)),
    }
}

/// Insert one list of nodes, chained, under `parent` or at the top level
fn insert_list(
    workspace: &mut Workspace,
    nodes: &[BlockNode],
    parent: Option<&BlockId>,
) -> Result<(), WorkspaceError> {
    let mut prev: Option<BlockId> = None;
    for node in nodes {
        let id = BlockId::new(node.id.clone());
        let (kind, body) = match &node.kind {
            NodeKind::Start { body } => (BlockKind::Start, Some(body)),
            NodeKind::Move { direction } => (
                BlockKind::Move {
                    direction: direction.clone(),
                },
                None,
            ),
            NodeKind::Fill { color } => (
                BlockKind::Fill {
                    color: color.clone(),
                },
                None,
            ),
            NodeKind::Repeat { times, body } => (BlockKind::Repeat { times: *times }, Some(body)),
        };
        workspace.insert(id.clone(), kind)?;

        match (&prev, parent) {
            (Some(p), _) => workspace.set_next(p, &id)?,
            (None, Some(parent)) => workspace.append_to_body(parent, &id)?,
            (None, None) => {}
        }

        if let Some(body) = body {
            insert_list(workspace, body, Some(&id))?;
        }
        prev = Some(id);
    }
    Ok(())
}

/// Rebuild a workspace from a document. A start block is added if missing.
pub fn build_workspace(document: &ProjectDocument) -> Result<Workspace, WorkspaceError> {
    let mut workspace = Workspace::empty();
    for stack in &document.blocks {
        insert_list(&mut workspace, stack, None)?;
    }
    workspace.ensure_start_block();
    Ok(workspace)
}

/// Serialize the project as pretty-printed JSON
pub fn save(workspace: &Workspace, board: &Board) -> Result<String, ProjectError> {
    let document = to_document(workspace, board);
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn save_to_file(
    path: &Path,
    workspace: &Workspace,
    board: &Board,
) -> Result<(), ProjectError> {
    let text = save(workspace, board)?;
    std::fs::write(path, text).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("saved project to {}", path.display());
    Ok(())
}

pub fn parse(text: &str) -> Result<ProjectDocument, ProjectError> {
    Ok(serde_json::from_str(text)?)
}

/// Replace the workspace and board settings with a project's contents.
///
/// Nothing is modified unless the whole file is valid. Returns the settings
/// that were applied (defaults when the file has none).
pub fn load(
    text: &str,
    workspace: &mut Workspace,
    board: &mut Board,
) -> Result<Settings, ProjectError> {
    let document = parse(text)?;
    let rebuilt = build_workspace(&document)?;
    let settings = document.settings.unwrap_or_default();

    *workspace = rebuilt;
    settings.apply(board);
    log::info!(
        "loaded {} blocks on a {}x{} board",
        workspace.len(),
        board.rows(),
        board.cols()
    );
    Ok(settings)
}

pub fn load_from_file(
    path: &Path,
    workspace: &mut Workspace,
    board: &mut Board,
) -> Result<Settings, ProjectError> {
    let text = std::fs::read_to_string(path).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load(&text, workspace, board)
}
