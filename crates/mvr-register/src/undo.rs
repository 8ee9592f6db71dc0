//! Per-actor undo/redo stack discipline.
//!
//! `undo_stack` holds the actor's own terminal `Set` op ids, most recent
//! last. `redo_stack` holds the `Restore` op ids the actor's own `undo()`
//! calls have emitted. A fresh local `Set`/delete clears `redo_stack` —
//! once you make a new edit, the old redo branch is gone.
//!
//! `redo()` is the subtle one: the new `Restore` it emits is anchored at
//! the popped `redo_stack` entry (itself a `Restore`), but what gets
//! pushed onto `undo_stack` afterwards is the *terminal Set* that new
//! Restore resolves to, not the Restore's own id — the next `undo()` must
//! revert the just-redone value, and only a terminal Set id means
//! anything to a future `undo()`. See [`restore_to_terminal`].

use tracing::debug;

use crate::error::{RegisterError, Result};
use crate::graph::OperationGraph;
use crate::id::OpId;
use crate::operation::OpKind;

#[derive(Clone, Debug, Default)]
pub struct ActorUndoStack {
    undo_stack: Vec<OpId>,
    redo_stack: Vec<OpId>,
}

impl ActorUndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_stack(&self) -> &[OpId] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[OpId] {
        &self.redo_stack
    }

    /// Records a freshly-applied local `Set`/delete: pushes it as the new
    /// undo candidate and clears any stale redo branch.
    pub fn push_set(&mut self, set_id: OpId) {
        self.undo_stack.push(set_id);
        if !self.redo_stack.is_empty() {
            debug!(cleared = self.redo_stack.len(), "local set clears redo stack");
            self.redo_stack.clear();
        }
    }

    /// Pops the top undo candidate (for the caller to build a `Restore`
    /// anchored there), pushing the new `Restore`'s own id onto redo.
    pub fn pop_for_undo(&mut self, new_restore_id: OpId) -> Option<OpId> {
        let anchor = self.undo_stack.pop()?;
        self.redo_stack.push(new_restore_id);
        Some(anchor)
    }

    /// Pops the top redo candidate (for the caller to build a `Restore`
    /// anchored there).
    pub fn pop_for_redo(&mut self) -> Option<OpId> {
        self.redo_stack.pop()
    }

    /// Pushes the terminal Set a completed `redo()` resolved down to.
    pub fn push_redo_terminal(&mut self, terminal: OpId) {
        self.undo_stack.push(terminal);
    }

    pub fn is_undo_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn is_redo_empty(&self) -> bool {
        self.redo_stack.is_empty()
    }
}

/// Follows a `Restore` chain down to the terminal `Set` it ultimately
/// resolves to. By the undo/redo stack discipline above, every entry
/// `redo_stack` can ever hold anchors a `Set` directly, so a new restore
/// built from one is at most two pointer-hops from its terminal: one hop
/// to the redo-stack entry (itself a `Restore`), one more to the `Set` it
/// anchors.
pub fn restore_to_terminal<V>(graph: &OperationGraph<V>, start: OpId) -> Result<OpId> {
    let mut current = start;
    loop {
        let op = graph
            .get(&current)
            .ok_or_else(|| RegisterError::InvariantViolation(current.clone()))?;
        match &op.kind {
            OpKind::Set { .. } => return Ok(current),
            OpKind::Restore { anchor } => current = anchor.clone(),
        }
    }
}
