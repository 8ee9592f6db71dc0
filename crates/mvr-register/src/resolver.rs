//! The MVR resolver — the centrepiece of the engine.
//!
//! Given the current head set, walks from every head through `Restore`
//! operations back to terminal `Set` operations, producing the ordered
//! list of visible values.
//!
//! ## The walk
//!
//! `resolve_from(start, graph)` resolves a single node (a head, or a
//! `Restore` encountered mid-walk) to the list of terminal Sets reachable
//! from it, each tagged with the `OpIdTrace` visited to reach it:
//!
//! - If `start` is a `Set`, it *is* the (sole) terminal: `[(start, {trace:
//!   [start], depth: 1})]`.
//! - If `start` is a `Restore`, its semantic effect is "revert to the
//!   state immediately before the anchor" — so we resolve each of the
//!   anchor's *own* predecessors (not the Restore's predecessors) and
//!   prepend `start` to every resulting trace. An anchor with no
//!   predecessors (undoing the very first operation ever) contributes
//!   nothing, which is the correct "empty register" view.
//!
//! Resolving a `Restore` this way is naturally recursive and naturally
//! cacheable per anchor, which is exactly what the optional cache (below)
//! memoises.
//!
//! ## Sort order
//!
//! Per-head results are concatenated and sorted **descending** by
//! `OpIdTrace`: compare element-wise up to the shorter trace's length:
//! the first differing position decides, larger `OpId` wins. If one
//! trace is a strict prefix of the other (including the cache-truncation
//! case) they compare equal, and the sort is stable so insertion order
//! (head order, and within a head, predecessor-iteration order) breaks
//! the tie. Duplicates are never removed — when two resolution paths
//! converge on the same terminal Set it is intentionally emitted twice.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{RegisterError, Result};
use crate::graph::OperationGraph;
use crate::id::OpId;
use crate::operation::OpKind;

/// Per-result trace: the path of `OpId`s visited from a head down to a
/// terminal Set, plus how many Restore hops that took.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionMetadata {
    pub op_id_trace: Vec<OpId>,
    pub resolution_depth: u32,
}

/// Compares two traces over their shared prefix; a trace that is a prefix
/// of the other (the cache-truncation case) is considered equal. This is
/// coarser than lexicographic equality by design (see module docs).
pub fn compare_traces(a: &[OpId], b: &[OpId]) -> Ordering {
    let shared = a.len().min(b.len());
    for i in 0..shared {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[derive(Clone, Debug, Default)]
pub struct MvrResolver<V> {
    use_cache: bool,
    /// Keyed by a `Restore`'s own OpId; immutable once written (an
    /// anchor's predecessors never change post-application).
    cache: BTreeMap<OpId, Vec<(OpId, ResolutionMetadata)>>,
    _marker: std::marker::PhantomData<V>,
}

impl<V> MvrResolver<V> {
    pub fn new(use_cache: bool) -> Self {
        Self {
            use_cache,
            cache: BTreeMap::new(),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Resolves every head to its ordered `(terminal OpId, metadata)`
    /// list, sorted descending by `OpIdTrace`.
    pub fn resolve(&mut self, graph: &OperationGraph<V>) -> Result<Vec<(OpId, ResolutionMetadata)>> {
        let mut all = Vec::new();
        for head in graph.heads() {
            all.extend(self.resolve_from(head.clone(), graph)?);
        }
        all.sort_by(|a, b| compare_traces(&b.1.op_id_trace, &a.1.op_id_trace));
        Ok(all)
    }

    /// Resolves a single node (head or mid-walk Restore) to its terminal
    /// Sets. Every returned trace begins with `start`.
    fn resolve_from(&mut self, start: OpId, graph: &OperationGraph<V>) -> Result<Vec<(OpId, ResolutionMetadata)>> {
        if self.use_cache {
            if let Some(cached) = self.cache.get(&start) {
                trace!(restore = %start, entries = cached.len(), "resolver cache hit");
                return Ok(cached.clone());
            }
        }

        let op = graph
            .get(&start)
            .ok_or_else(|| RegisterError::InvariantViolation(start.clone()))?;

        let result = match &op.kind {
            OpKind::Set { .. } => vec![(
                start.clone(),
                ResolutionMetadata {
                    op_id_trace: vec![start.clone()],
                    resolution_depth: 1,
                },
            )],
            OpKind::Restore { anchor } => {
                let anchor_op = graph
                    .get(anchor)
                    .ok_or_else(|| RegisterError::InvariantViolation(anchor.clone()))?;
                let mut acc = Vec::new();
                for pred in &anchor_op.preds {
                    for (term, meta) in self.resolve_from(pred.clone(), graph)? {
                        let mut trace = Vec::with_capacity(meta.op_id_trace.len() + 1);
                        trace.push(start.clone());
                        trace.extend(meta.op_id_trace);
                        acc.push((
                            term,
                            ResolutionMetadata {
                                op_id_trace: trace,
                                resolution_depth: meta.resolution_depth + 1,
                            },
                        ));
                    }
                }
                acc
            }
        };

        if self.use_cache && op.is_restore() {
            self.cache.insert(start, result.clone());
        }
        Ok(result)
    }
}
