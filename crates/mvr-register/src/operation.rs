//! The operation data model: `Set` (and delete-as-set-with-no-value) and
//! `Restore` (undo/redo are the same wire shape, distinguished only by
//! what their anchor resolves to — see `undo::restore_to_terminal`).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::id::{ActorId, OpId};

/// The two operation shapes. `Set` is terminal; `Restore` defers to its
/// anchor. There is deliberately no third kind — undo and redo are both
/// `Restore`, distinguished only at resolution time by the anchor's kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OpKind<V> {
    Set { value: Option<V> },
    Restore { anchor: OpId },
}

/// An operation in the append-only history. `preds` are causal
/// predecessors; empty only for an actor's very first operation ever.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation<V> {
    pub op_id: OpId,
    pub preds: BTreeSet<OpId>,
    #[serde(flatten)]
    pub kind: OpKind<V>,
}

impl<V> Operation<V> {
    pub fn new_set(op_id: OpId, preds: BTreeSet<OpId>, value: Option<V>) -> Self {
        Self {
            op_id,
            preds,
            kind: OpKind::Set { value },
        }
    }

    pub fn new_restore(op_id: OpId, preds: BTreeSet<OpId>, anchor: OpId) -> Self {
        Self {
            op_id,
            preds,
            kind: OpKind::Restore { anchor },
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self.kind, OpKind::Set { .. })
    }

    pub fn is_restore(&self) -> bool {
        matches!(self.kind, OpKind::Restore { .. })
    }

    /// `Some(&value)` if this is a present-valued Set; `None` for a delete
    /// (a Set with no value) or for a Restore.
    pub fn set_value(&self) -> Option<&V> {
        match &self.kind {
            OpKind::Set { value } => value.as_ref(),
            OpKind::Restore { .. } => None,
        }
    }

    pub fn authored_by(&self, actor: &ActorId) -> bool {
        self.op_id.is_authored_by(actor)
    }
}
