//! The public facade: a single replica of the register, combining the
//! clock, operation graph, causal lobby, resolver, and this actor's own
//! undo/redo stack into one coherent API.

use tracing::{debug, info, instrument, trace};

use crate::clock::LamportClock;
use crate::error::Result;
use crate::graph::OperationGraph;
use crate::id::{ActorId, OpId};
use crate::lobby::CausalLobby;
use crate::operation::Operation;
use crate::resolver::{MvrResolver, ResolutionMetadata};
use crate::undo::{restore_to_terminal, ActorUndoStack};

/// One replica's local view of the register. `V` is the application value
/// type carried by `Set` operations.
pub struct Replica<V> {
    actor: ActorId,
    clock: LamportClock,
    graph: OperationGraph<V>,
    lobby: CausalLobby<V>,
    resolver: MvrResolver<V>,
    undo: ActorUndoStack,
}

impl<V> Replica<V> {
    /// Creates an empty replica for `actor`. `use_cache` toggles the
    /// resolver's per-Restore memoisation — on by default for anything
    /// beyond a toy example, but exposed so callers with a tiny,
    /// short-lived register can skip the bookkeeping.
    pub fn create(actor: ActorId, use_cache: bool) -> Self {
        Self {
            clock: LamportClock::new(actor.clone()),
            actor,
            graph: OperationGraph::new(),
            lobby: CausalLobby::new(),
            resolver: MvrResolver::new(use_cache),
            undo: ActorUndoStack::new(),
        }
    }

    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    pub fn clock_value(&self) -> u64 {
        self.clock.value()
    }

    pub fn undo_stack(&self) -> &[OpId] {
        self.undo.undo_stack()
    }

    pub fn redo_stack(&self) -> &[OpId] {
        self.undo.redo_stack()
    }

    /// Looks up an already-applied operation by id. Mainly useful for
    /// shuttling operations between replicas in tests and examples.
    pub fn operation(&self, id: &OpId) -> Option<&Operation<V>> {
        self.graph.get(id)
    }

    pub fn has_applied(&self, id: &OpId) -> bool {
        self.graph.is_applied(id)
    }

    /// The raw current heads (possibly including unresolved `Restore`s),
    /// as opposed to [`Replica::terminal_heads`]'s resolved `Set` ids.
    /// Needed to shuttle a replica's full frontier between replicas in
    /// tests — `resolve()` alone never surfaces a `Restore` id that
    /// hasn't been superseded by anything yet.
    pub fn heads(&self) -> &std::collections::BTreeSet<OpId> {
        self.graph.heads()
    }

    /// The full resolved view: every surviving value with its trace and
    /// depth, sorted descending by trace.
    pub fn resolve(&mut self) -> Result<Vec<(OpId, ResolutionMetadata)>> {
        self.resolver.resolve(&self.graph)
    }

    /// The resolved values only, in the same order `resolve` returns.
    pub fn get(&mut self) -> Result<Vec<V>>
    where
        V: Clone,
    {
        let resolved = self.resolve()?;
        Ok(resolved
            .into_iter()
            .filter_map(|(id, _)| self.graph.get(&id).and_then(|op| op.set_value().cloned()))
            .collect())
    }

    /// The distinct terminal `OpId`s the current heads resolve to, without
    /// materialising their values.
    pub fn terminal_heads(&mut self) -> Result<Vec<OpId>> {
        Ok(self.resolve()?.into_iter().map(|(id, _)| id).collect())
    }

    /// Applies a `Set` with `value` as a new local operation.
    #[instrument(skip(self, value), fields(actor = %self.actor))]
    pub fn set(&mut self, value: V) -> Result<OpId> {
        let op_id = self.clock.tick();
        let preds = self.graph.heads().clone();
        let op = Operation::new_set(op_id.clone(), preds, Some(value));
        self.admit_local(op)?;
        self.undo.push_set(op_id.clone());
        info!(op = %op_id, "local set");
        Ok(op_id)
    }

    /// Applies a delete (a `Set` with no value) as a new local operation.
    /// A no-op returning `Ok(None)` if the register is already empty —
    /// there is nothing to delete.
    #[instrument(skip(self), fields(actor = %self.actor))]
    pub fn delete(&mut self) -> Result<Option<OpId>> {
        let has_value = self
            .resolve()?
            .iter()
            .any(|(id, _)| self.graph.get(id).and_then(|op| op.set_value()).is_some());
        if !has_value {
            return Ok(None);
        }
        let op_id = self.clock.tick();
        let preds = self.graph.heads().clone();
        let op = Operation::new_set(op_id.clone(), preds, None);
        self.admit_local(op)?;
        self.undo.push_set(op_id.clone());
        info!(op = %op_id, "local delete");
        Ok(Some(op_id))
    }

    /// Reverts this actor's most recent not-yet-undone `Set`. A no-op
    /// returning `Ok(None)` if this actor's undo stack is empty.
    #[instrument(skip(self), fields(actor = %self.actor))]
    pub fn undo(&mut self) -> Result<Option<OpId>> {
        let restore_id = self.clock.tick();
        let Some(anchor) = self.undo.pop_for_undo(restore_id.clone()) else {
            debug!("undo stack empty, no-op");
            return Ok(None);
        };
        let preds = self.graph.heads().clone();
        trace!(anchor = %anchor, "undo anchors own prior set");
        let op = Operation::new_restore(restore_id.clone(), preds, anchor);
        self.admit_local(op)?;
        info!(op = %restore_id, "local undo");
        Ok(Some(restore_id))
    }

    /// Re-applies this actor's most recently undone `Set`. A no-op
    /// returning `Ok(None)` if this actor's redo stack is empty.
    #[instrument(skip(self), fields(actor = %self.actor))]
    pub fn redo(&mut self) -> Result<Option<OpId>> {
        let Some(anchor) = self.undo.pop_for_redo() else {
            debug!("redo stack empty, no-op");
            return Ok(None);
        };
        let restore_id = self.clock.tick();
        let preds = self.graph.heads().clone();
        trace!(anchor = %anchor, "redo anchors own prior restore");
        let op = Operation::new_restore(restore_id.clone(), preds, anchor);
        self.admit_local(op)?;
        let terminal = restore_to_terminal(&self.graph, restore_id.clone())?;
        self.undo.push_redo_terminal(terminal);
        info!(op = %restore_id, "local redo");
        Ok(Some(restore_id))
    }

    /// Admits a remote operation: silently ignored if already applied,
    /// buffered in the causal lobby if its predecessors haven't all
    /// landed, else inserted and the lobby drained against it.
    #[instrument(skip(self, op), fields(actor = %self.actor, op = %op.op_id))]
    pub fn apply(&mut self, op: Operation<V>) -> Result<()> {
        if self.graph.is_applied(&op.op_id) {
            trace!(op = %op.op_id, "duplicate, ignored");
            return Ok(());
        }
        self.clock.sync(op.op_id.counter);
        if self.graph.is_ready(&op) {
            trace!(op = %op.op_id, "admitted");
            self.graph.insert(op);
            let graph = &mut self.graph;
            self.lobby.drain_into(graph, |g, ready| g.insert(ready));
        } else {
            trace!(op = %op.op_id, "deferred to lobby");
            self.lobby.defer(op);
        }
        Ok(())
    }

    /// Applies a batch of remote operations, skipping empty entries — the
    /// wire-level `apply(ops: [Operation?])` from the external interface.
    /// Each entry is admitted via the same path as [`Replica::apply`].
    #[instrument(skip(self, ops), fields(actor = %self.actor))]
    pub fn apply_batch(&mut self, ops: impl IntoIterator<Item = Option<Operation<V>>>) -> Result<()> {
        for op in ops.into_iter().flatten() {
            self.apply(op)?;
        }
        Ok(())
    }

    /// A local op is always causally ready by construction (its preds are
    /// exactly the current heads), so this skips the lobby entirely.
    fn admit_local(&mut self, op: Operation<V>) -> Result<()> {
        self.clock.sync(op.op_id.counter);
        self.graph.insert(op);
        Ok(())
    }
}
