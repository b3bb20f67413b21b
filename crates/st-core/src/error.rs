use crate::id::SystemId;

/// Alias for `Result<T, SystemError>`.
pub type SystemResult<T> = Result<T, SystemError>;

/// Errors raised by tree operations.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// An event was dispatched on a system that is not connected.
    #[error("system with name {name} and id {id} is not connected")]
    NotConnected {
        /// Name of the disconnected system.
        name: String,
        /// Id of the disconnected system.
        id: SystemId,
    },

    /// A listener registration was attempted without a listener.
    #[error("listener not provided for event {kind} on system with name {name} and id {id}")]
    MissingListener {
        /// The event type the registration was for.
        kind: String,
        /// Name of the addressed system.
        name: String,
        /// Id of the addressed system.
        id: SystemId,
    },

    /// The id generator produced an id that is already in the tree.
    #[error("duplicate system id: {0}")]
    DuplicateId(SystemId),

    /// The addressed system id does not exist in the tree.
    #[error("system not found: {0}")]
    SystemNotFound(SystemId),

    /// The system is already a child of another system.
    #[error("system {child} is already a child of {owner}")]
    AlreadyAttached {
        /// The system being attached.
        child: SystemId,
        /// The system that currently owns it.
        owner: SystemId,
    },

    /// Attaching the system would make it its own descendant.
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle {
        /// The system being attached.
        child: SystemId,
        /// The system it was being attached to.
        parent: SystemId,
    },
}
