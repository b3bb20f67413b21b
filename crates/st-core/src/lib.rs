//! Core types for systree: a tree of named systems with gated event dispatch.
//!
//! Every node lives in a [`SystemTree`] arena and is addressed by its
//! [`SystemId`]. A node only accepts dispatched events once it has been
//! marked connected through [`SystemTree::connect`]; listeners registered on
//! a node are also registered on each of its ancestors unless the tree is
//! configured with [`ListenerScope::Local`].

/// Tree configuration: listener scope and id generation.
pub mod config;
/// Error types used throughout the crate.
pub mod error;
/// Events, listeners, and per-node listener registries.
pub mod event;
/// System identifiers and id generators.
pub mod id;
/// The per-node record stored in the tree.
pub mod system;
/// The arena that owns every system and exposes tree operations.
pub mod tree;

/// Re-export configuration types.
pub use config::{ListenerScope, TreeConfig};
/// Re-export error types.
pub use error::{SystemError, SystemResult};
/// Re-export event and listener types.
pub use event::{Event, EventHandler, Listener};
/// Re-export identifier types.
pub use id::{IdGenerator, RandomIds, SeededIds, SystemId};
/// Re-export the node record.
pub use system::System;
/// Re-export the tree and its child argument.
pub use tree::{NewChild, SystemTree};
