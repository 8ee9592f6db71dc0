//! The causal-readiness lobby: operations whose predecessors haven't all
//! landed yet wait here until they do. Re-checked on every admission.

use std::collections::BTreeMap;

use tracing::debug;

use crate::graph::OperationGraph;
use crate::id::OpId;
use crate::operation::Operation;

#[derive(Clone, Debug, Default)]
pub struct CausalLobby<V> {
    pending: BTreeMap<OpId, Operation<V>>,
}

impl<V> CausalLobby<V> {
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }

    /// Buffers `op` if it isn't already waiting.
    pub fn defer(&mut self, op: Operation<V>) {
        self.pending.entry(op.op_id.clone()).or_insert(op);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns one pending operation that has become ready
    /// against `graph`, or `None` if nothing is ready yet. Call in a loop
    /// to drain every operation that becomes ready in the resulting
    /// fixed-point cascade — admitting one op can make others ready.
    pub fn take_ready(&mut self, graph: &OperationGraph<V>) -> Option<Operation<V>> {
        let ready_id = self
            .pending
            .iter()
            .find(|(_, op)| graph.is_ready(op))
            .map(|(id, _)| id.clone())?;
        self.pending.remove(&ready_id)
    }

    /// Drains every operation that becomes ready in one fixed-point pass,
    /// applying each via `admit` as it's found.
    pub fn drain_into(&mut self, graph: &mut OperationGraph<V>, mut admit: impl FnMut(&mut OperationGraph<V>, Operation<V>)) {
        let mut admitted = 0u32;
        while let Some(op) = self.take_ready(graph) {
            admit(graph, op);
            admitted += 1;
        }
        if admitted > 0 {
            debug!(admitted, remaining = self.pending.len(), "lobby fixed-point pass");
        }
    }
}
