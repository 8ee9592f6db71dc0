//! # mvr-register
//!
//! A replicated multi-value register with causal operation history and
//! local undo/redo.
//!
//! Every write is an append-only [`Operation`] — a `Set` (present value or
//! delete) or a `Restore` pointing back at an earlier operation — linked to
//! its causal predecessors by [`OpId`]. A [`CausalLobby`] buffers operations
//! that arrive before their predecessors so concurrent replicas converge
//! regardless of delivery order, and [`MvrResolver`] walks the resulting
//! graph from its current heads down to the terminal `Set`s that are the
//! register's visible value(s). [`Replica`] ties clock, graph, lobby,
//! resolver, and this actor's own undo/redo stack together into one API.
//!
//! ## Example
//!
//! ```rust
//! use mvr_register::{ActorId, Replica};
//!
//! let mut replica: Replica<String> = Replica::create(ActorId::from("alice"), true);
//! replica.set("hello".to_string()).unwrap();
//! replica.set("world".to_string()).unwrap();
//! replica.undo().unwrap();
//! assert_eq!(replica.get().unwrap(), vec!["hello".to_string()]);
//! ```

pub mod clock;
pub mod error;
pub mod graph;
pub mod id;
pub mod lobby;
pub mod operation;
pub mod replica;
pub mod resolver;
pub mod undo;

pub use clock::LamportClock;
pub use error::{RegisterError, Result};
pub use graph::OperationGraph;
pub use id::{ActorId, OpId};
pub use lobby::CausalLobby;
pub use operation::{OpKind, Operation};
pub use replica::Replica;
pub use resolver::{MvrResolver, ResolutionMetadata};
pub use undo::{restore_to_terminal, ActorUndoStack};
