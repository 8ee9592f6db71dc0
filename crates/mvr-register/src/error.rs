//! Error taxonomy.
//!
//! Only the fatal classes from the design are real errors here:
//! [`RegisterError::InvariantViolation`] (a Restore's anchor is missing from
//! `applied` at resolution time — a broken causal guarantee) and
//! [`RegisterError::MalformedOpId`] (a wire-form OpId that doesn't parse).
//! Everything else — already-applied, not-yet-ready, empty undo/redo/delete
//! — is normal control flow and shows up as `Option::None`, never as an
//! `Err`.

use thiserror::Error;

use crate::id::OpId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    #[error("restore anchored at {0} could not be resolved: anchor is not applied")]
    InvariantViolation(OpId),

    #[error("malformed OpId \"{input}\": {reason}")]
    MalformedOpId { input: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RegisterError>;
