//! Append-only store of applied operations, keyed by `OpId`, tracking the
//! current head set and the greatest applied `OpId`.

use std::collections::{BTreeMap, BTreeSet};

use crate::id::OpId;
use crate::operation::Operation;

#[derive(Clone, Debug)]
pub struct OperationGraph<V> {
    applied: BTreeMap<OpId, Operation<V>>,
    heads: BTreeSet<OpId>,
    last_op: Option<OpId>,
}

impl<V> Default for OperationGraph<V> {
    fn default() -> Self {
        Self {
            applied: BTreeMap::new(),
            heads: BTreeSet::new(),
            last_op: None,
        }
    }
}

impl<V> OperationGraph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_applied(&self, id: &OpId) -> bool {
        self.applied.contains_key(id)
    }

    /// An operation is causally ready once every one of its predecessors is
    /// already applied.
    pub fn is_ready(&self, op: &Operation<V>) -> bool {
        op.preds.iter().all(|p| self.is_applied(p))
    }

    pub fn get(&self, id: &OpId) -> Option<&Operation<V>> {
        self.applied.get(id)
    }

    pub fn heads(&self) -> &BTreeSet<OpId> {
        &self.heads
    }

    pub fn last_op(&self) -> Option<&OpId> {
        self.last_op.as_ref()
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Inserts an already-ready, not-yet-applied operation. Predecessors
    /// are dropped from `heads`, the new op joins it, and `last_op` is
    /// updated if the new id is the greatest seen so far.
    ///
    /// Caller is responsible for the readiness/idempotence preconditions —
    /// the lobby and `Replica::admit` check them before calling this.
    pub fn insert(&mut self, op: Operation<V>) {
        for pred in &op.preds {
            self.heads.remove(pred);
        }
        let id = op.op_id.clone();
        self.heads.insert(id.clone());
        let is_new_max = match &self.last_op {
            Some(last) => &id > last,
            None => true,
        };
        if is_new_max {
            self.last_op = Some(id.clone());
        }
        self.applied.insert(id, op);
    }
}
