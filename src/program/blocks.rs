//! Block tree storage
//!
//! Blocks live in an arena keyed by [`BlockId`]. A block owns two links:
//! `body`, the first block of its nested statement list (start and repeat
//! only), and `next`, its successor in the list it belongs to. Blocks that are
//! nobody's body or successor are top-level; their order is kept in
//! insertion order.
//!
//! The workspace refuses edits that would give a block two parents, attach a
//! block to itself or put a start block anywhere but the top level, so every
//! structure reachable from a start block is a tree.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a block, unique within a workspace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        BlockId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Block type together with its field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Program entry point; only its body runs
    Start,
    /// One unit move; the field holds `UP`, `DOWN`, `LEFT` or `RIGHT`
    Move { direction: String },
    /// Colors the current cell; an empty field means the default fill color
    Fill { color: String },
    /// Runs its body `times` times
    Repeat { times: i64 },
}

impl BlockKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Start => "start",
            BlockKind::Move { .. } => "move",
            BlockKind::Fill { .. } => "fill",
            BlockKind::Repeat { .. } => "repeat",
        }
    }

    /// Whether blocks of this kind hold a nested statement list
    pub fn has_body(&self) -> bool {
        matches!(self, BlockKind::Start | BlockKind::Repeat { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    /// First block of the nested statement list
    pub body: Option<BlockId>,
    /// Successor in the enclosing statement list
    pub next: Option<BlockId>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceError {
    #[error("unknown block '{0}'")]
    UnknownBlock(BlockId),

    #[error("block id '{0}' is already in use")]
    DuplicateId(BlockId),

    #[error("{kind} block '{id}' has no body")]
    NoBody { id: BlockId, kind: &'static str },

    #[error("block '{0}' is already attached")]
    AlreadyAttached(BlockId),

    #[error("block '{0}' already has a successor")]
    SuccessorTaken(BlockId),

    #[error("start block '{0}' can only be top-level")]
    StartNotAttachable(BlockId),

    #[error("block '{0}' cannot be attached to itself")]
    SelfAttachment(BlockId),
}

/// Deepest body nesting that is compiled, saved or drawn; deeper bodies are cut
pub const MAX_DEPTH: usize = 64;

/// Arena of blocks plus the ordered list of top-level blocks
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    blocks: FxHashMap<BlockId, Block>,
    top: Vec<BlockId>,
    next_id: u64,
}

impl Workspace {
    /// A workspace holding a single empty start block
    pub fn new() -> Self {
        let mut workspace = Workspace::empty();
        workspace.ensure_start_block();
        workspace
    }

    pub fn empty() -> Self {
        Workspace::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    fn get_or_err(&self, id: &BlockId) -> Result<&Block, WorkspaceError> {
        self.blocks
            .get(id)
            .ok_or_else(|| WorkspaceError::UnknownBlock(id.clone()))
    }

    fn fresh_id(&mut self) -> BlockId {
        loop {
            let id = BlockId(format!("blk{}", self.next_id));
            self.next_id += 1;
            if !self.blocks.contains_key(&id) {
                return id;
            }
        }
    }

    /// Add a top-level block with a generated id
    pub fn add(&mut self, kind: BlockKind) -> BlockId {
        let id = self.fresh_id();
        self.blocks.insert(
            id.clone(),
            Block {
                id: id.clone(),
                kind,
                body: None,
                next: None,
            },
        );
        self.top.push(id.clone());
        id
    }

    /// Add a top-level block under a caller-chosen id
    pub fn insert(&mut self, id: BlockId, kind: BlockKind) -> Result<(), WorkspaceError> {
        if self.blocks.contains_key(&id) {
            return Err(WorkspaceError::DuplicateId(id));
        }
        self.blocks.insert(
            id.clone(),
            Block {
                id: id.clone(),
                kind,
                body: None,
                next: None,
            },
        );
        self.top.push(id);
        Ok(())
    }

    /// Checks that `child` is a free, non-start block other than `anchor`
    fn check_attachable(&self, anchor: &BlockId, child: &BlockId) -> Result<(), WorkspaceError> {
        if anchor == child {
            return Err(WorkspaceError::SelfAttachment(child.clone()));
        }
        let block = self.get_or_err(child)?;
        if block.kind == BlockKind::Start {
            return Err(WorkspaceError::StartNotAttachable(child.clone()));
        }
        if !self.top.contains(child) {
            return Err(WorkspaceError::AlreadyAttached(child.clone()));
        }
        Ok(())
    }

    fn detach_from_top(&mut self, id: &BlockId) {
        self.top.retain(|t| t != id);
    }

    /// Append a free block at the end of `parent`'s body
    pub fn append_to_body(
        &mut self,
        parent: &BlockId,
        child: &BlockId,
    ) -> Result<(), WorkspaceError> {
        let parent_block = self.get_or_err(parent)?;
        if !parent_block.kind.has_body() {
            return Err(WorkspaceError::NoBody {
                id: parent.clone(),
                kind: parent_block.kind.type_name(),
            });
        }
        self.check_attachable(parent, child)?;

        match parent_block.body.clone() {
            None => {
                if let Some(p) = self.blocks.get_mut(parent) {
                    p.body = Some(child.clone());
                }
            }
            Some(first) => {
                let last = self
                    .sequence(Some(&first))
                    .last()
                    .map(|b| b.id.clone())
                    .unwrap_or(first);
                if let Some(tail) = self.blocks.get_mut(&last) {
                    tail.next = Some(child.clone());
                }
            }
        }
        self.detach_from_top(child);
        Ok(())
    }

    /// Make `next` the successor of `block`
    pub fn set_next(&mut self, block: &BlockId, next: &BlockId) -> Result<(), WorkspaceError> {
        if self.get_or_err(block)?.next.is_some() {
            return Err(WorkspaceError::SuccessorTaken(block.clone()));
        }
        self.check_attachable(block, next)?;
        if let Some(b) = self.blocks.get_mut(block) {
            b.next = Some(next.clone());
        }
        self.detach_from_top(next);
        Ok(())
    }

    /// Create a block and append it to `parent`'s body in one go
    pub fn push(&mut self, parent: &BlockId, kind: BlockKind) -> Result<BlockId, WorkspaceError> {
        self.get_or_err(parent)?;
        let id = self.add(kind);
        if let Err(e) = self.append_to_body(parent, &id) {
            self.blocks.remove(&id);
            self.detach_from_top(&id);
            return Err(e);
        }
        Ok(id)
    }

    /// Top-level blocks in order
    pub fn top_blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.top.iter().filter_map(|id| self.blocks.get(id))
    }

    /// The first top-level start block
    pub fn find_start(&self) -> Option<&Block> {
        self.top_blocks().find(|b| b.kind == BlockKind::Start)
    }

    /// Id of the start block, creating one if the workspace has none
    pub fn ensure_start_block(&mut self) -> BlockId {
        if let Some(start) = self.find_start() {
            return start.id.clone();
        }
        log::debug!("creating start block");
        self.add(BlockKind::Start)
    }

    /// Remove every block
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.top.clear();
    }

    /// Walk a statement list from `first` along successor links.
    ///
    /// The walk stops after as many blocks as the workspace holds, so a
    /// malformed successor cycle cannot loop forever.
    pub fn sequence<'a>(&'a self, first: Option<&BlockId>) -> Sequence<'a> {
        Sequence {
            workspace: self,
            current: first.cloned(),
            remaining: self.blocks.len(),
        }
    }
}

/// Iterator over a statement list, see [`Workspace::sequence`]
pub struct Sequence<'a> {
    workspace: &'a Workspace,
    current: Option<BlockId>,
    remaining: usize,
}

impl<'a> Iterator for Sequence<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let block = self.workspace.get(self.current.as_ref()?)?;
        self.remaining -= 1;
        self.current = block.next.clone();
        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(direction: &str) -> BlockKind {
        BlockKind::Move {
            direction: direction.to_string(),
        }
    }

    #[test]
    fn test_new_workspace_has_start() {
        let ws = Workspace::new();
        assert_eq!(ws.len(), 1);
        assert!(ws.find_start().is_some());
    }

    #[test]
    fn test_push_builds_ordered_body() {
        let mut ws = Workspace::new();
        let start = ws.ensure_start_block();
        let a = ws.push(&start, mv("UP")).unwrap();
        let b = ws.push(&start, mv("DOWN")).unwrap();

        let body = ws.get(&start).unwrap().body.clone();
        let ids: Vec<&BlockId> = ws.sequence(body.as_ref()).map(|b| &b.id).collect();
        assert_eq!(ids, vec![&a, &b]);
        assert_eq!(ws.top_blocks().count(), 1);
    }

    #[test]
    fn test_rejects_bad_attachments() {
        let mut ws = Workspace::new();
        let start = ws.ensure_start_block();
        let fill = ws
            .push(&start, BlockKind::Fill { color: String::new() })
            .unwrap();

        assert_eq!(
            ws.push(&fill, mv("UP")),
            Err(WorkspaceError::NoBody {
                id: fill.clone(),
                kind: "fill"
            })
        );
        assert_eq!(ws.len(), 2);

        let repeat = ws.add(BlockKind::Repeat { times: 2 });
        assert_eq!(
            ws.append_to_body(&repeat, &repeat),
            Err(WorkspaceError::SelfAttachment(repeat.clone()))
        );
        assert_eq!(
            ws.append_to_body(&repeat, &fill),
            Err(WorkspaceError::AlreadyAttached(fill.clone()))
        );
        assert_eq!(
            ws.append_to_body(&repeat, &start),
            Err(WorkspaceError::StartNotAttachable(start.clone()))
        );
    }

    #[test]
    fn test_set_next_and_duplicate_ids() {
        let mut ws = Workspace::empty();
        let a = BlockId::new("a");
        let b = BlockId::new("b");
        ws.insert(a.clone(), mv("LEFT")).unwrap();
        ws.insert(b.clone(), mv("RIGHT")).unwrap();
        assert_eq!(
            ws.insert(a.clone(), mv("UP")),
            Err(WorkspaceError::DuplicateId(a.clone()))
        );

        ws.set_next(&a, &b).unwrap();
        assert_eq!(ws.top_blocks().count(), 1);
        assert_eq!(ws.sequence(Some(&a)).count(), 2);

        let c = ws.add(mv("UP"));
        assert_eq!(
            ws.set_next(&a, &c),
            Err(WorkspaceError::SuccessorTaken(a.clone()))
        );
    }

    #[test]
    fn test_clear_then_ensure_start() {
        let mut ws = Workspace::new();
        let start = ws.ensure_start_block();
        ws.push(&start, mv("UP")).unwrap();
        ws.clear();
        assert!(ws.is_empty());
        ws.ensure_start_block();
        assert_eq!(ws.len(), 1);
    }
}
