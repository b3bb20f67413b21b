use crate::event::ListenerRegistry;
use crate::id::SystemId;

/// A named node in a [`SystemTree`](crate::SystemTree).
///
/// Fields are readable through [`SystemTree::get`](crate::SystemTree::get);
/// all mutation goes through the tree so that ownership and the connection
/// flag stay consistent.
#[derive(Debug, Clone)]
pub struct System {
    /// Unique identifier, fixed at construction.
    pub id: SystemId,
    /// Human-readable label. Not required to be unique.
    pub name: String,
    /// Back-reference to the parent given at construction. Does not own it.
    pub parent: Option<SystemId>,
    /// Owned children in insertion order.
    pub children: Vec<SystemId>,
    connected: bool,
    // The system whose `children` lists this one. Differs from `parent` when
    // an existing system is attached with `add_child`.
    owner: Option<SystemId>,
    listeners: ListenerRegistry,
}

impl System {
    pub(crate) fn new(id: SystemId, name: impl Into<String>, parent: Option<SystemId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            children: Vec::new(),
            connected: false,
            owner: None,
            listeners: ListenerRegistry::default(),
        }
    }

    /// Whether events may currently be dispatched on this system.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// The system that owns this one, if it has been attached.
    pub fn owner(&self) -> Option<SystemId> {
        self.owner
    }

    /// Listeners registered directly on this system.
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub(crate) fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub(crate) fn set_owner(&mut self, owner: SystemId) {
        self.owner = Some(owner);
    }

    pub(crate) fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }
}
