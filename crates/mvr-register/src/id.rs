//! Actor identity and operation identity (Lamport timestamps).
//!
//! An [`OpId`] totally orders operations: first by Lamport counter, then by
//! actor as a tie-break. Its canonical wire form is `"<counter>@<actor>"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegisterError;

/// Opaque, stable-per-replica actor identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ActorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Lamport timestamp: `(counter, actor)`, totally ordered by counter then
/// actor. Field order matches the comparison rule so the derived `Ord` is
/// correct without a manual impl.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OpId {
    pub counter: u64,
    pub actor: ActorId,
}

impl OpId {
    pub fn new(counter: u64, actor: ActorId) -> Self {
        Self { counter, actor }
    }

    /// True if this id was minted by `actor`. Used for undo-stack locality
    /// (an actor may only undo/redo its own operations).
    pub fn is_authored_by(&self, actor: &ActorId) -> bool {
        &self.actor == actor
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.counter, self.actor)
    }
}

impl FromStr for OpId {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (counter_str, actor_str) = s.split_once('@').ok_or_else(|| RegisterError::MalformedOpId {
            input: s.to_string(),
            reason: "missing '@' separator".to_string(),
        })?;
        let counter: u64 = counter_str.parse().map_err(|_| RegisterError::MalformedOpId {
            input: s.to_string(),
            reason: "counter is not a non-negative integer".to_string(),
        })?;
        if actor_str.is_empty() {
            return Err(RegisterError::MalformedOpId {
                input: s.to_string(),
                reason: "actor is empty".to_string(),
            });
        }
        Ok(Self {
            counter,
            actor: ActorId::from(actor_str),
        })
    }
}
