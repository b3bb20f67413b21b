use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::config::{ListenerScope, TreeConfig};
use crate::error::{SystemError, SystemResult};
use crate::event::{Event, Listener};
use crate::id::{IdGenerator, SystemId};
use crate::system::System;

/// The child argument of [`SystemTree::add_child`]: a name for a new system,
/// or an existing system to attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewChild {
    /// Construct a new system with this name, parented to the caller.
    Name(String),
    /// Attach a system that already exists in the tree.
    Existing(SystemId),
}

impl From<&str> for NewChild {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for NewChild {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<SystemId> for NewChild {
    fn from(id: SystemId) -> Self {
        Self::Existing(id)
    }
}

/// Owns every system and exposes the operations addressed to them.
///
/// Systems are stored in an arena keyed by [`SystemId`]; parent/child links
/// are ids. A tree may hold several roots, e.g. a system created on its own
/// and attached elsewhere later.
#[derive(Debug)]
pub struct SystemTree {
    config: TreeConfig,
    ids: Box<dyn IdGenerator>,
    systems: HashMap<SystemId, System>,
}

impl Default for SystemTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTree {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty tree. Ids come from the generator `config` selects.
    pub fn with_config(config: TreeConfig) -> Self {
        let ids = config.id_generator();
        Self::with_id_generator(config, ids)
    }

    /// Create an empty tree that draws ids from `ids`, ignoring `config.id_seed`.
    pub fn with_id_generator(config: TreeConfig, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            config,
            ids,
            systems: HashMap::new(),
        }
    }

    /// The configuration this tree was built with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Construct a system with a fresh id.
    ///
    /// `parent` is recorded as the back-reference only; the new system is not
    /// added to the parent's children. Use [`add_child`](Self::add_child) for that.
    pub fn create_system(
        &mut self,
        name: impl Into<String>,
        parent: Option<SystemId>,
    ) -> SystemResult<SystemId> {
        if let Some(parent) = parent {
            self.system(parent)?;
        }
        let id = self.ids.next_id();
        if self.systems.contains_key(&id) {
            return Err(SystemError::DuplicateId(id));
        }
        let system = System::new(id, name, parent);
        debug!(system = %id, name = %system.name, parent = ?parent, "system created");
        self.systems.insert(id, system);
        Ok(id)
    }

    /// Append a child to `this` and return the child's id.
    ///
    /// A name constructs a new system whose parent is `this`. An existing
    /// system is attached as-is and keeps whatever parent it was constructed
    /// with. Names are never checked for uniqueness.
    pub fn add_child(
        &mut self,
        this: SystemId,
        child: impl Into<NewChild>,
    ) -> SystemResult<SystemId> {
        self.system(this)?;
        let child = match child.into() {
            NewChild::Name(name) => self.create_system(name, Some(this))?,
            NewChild::Existing(child) => {
                if let Some(owner) = self.system(child)?.owner() {
                    return Err(SystemError::AlreadyAttached { child, owner });
                }
                if self.owner_chain_contains(this, child) {
                    return Err(SystemError::Cycle {
                        child,
                        parent: this,
                    });
                }
                child
            }
        };

        self.system_mut(child)?.set_owner(this);
        self.system_mut(this)?.children.push(child);
        debug!(parent = %this, child = %child, "child attached");
        Ok(child)
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Get a system by id.
    pub fn get(&self, id: SystemId) -> Option<&System> {
        self.systems.get(&id)
    }

    /// True if the tree holds a system with this id.
    pub fn contains(&self, id: SystemId) -> bool {
        self.systems.contains_key(&id)
    }

    /// Number of systems in the tree.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// True if the tree holds no systems.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// The parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: SystemId) -> SystemResult<Vec<SystemId>> {
        let mut chain = Vec::new();
        let mut next = self.system(id)?.parent;
        while let Some(parent) = next {
            chain.push(parent);
            next = self.system(parent)?.parent;
        }
        Ok(chain)
    }

    fn system(&self, id: SystemId) -> SystemResult<&System> {
        self.systems.get(&id).ok_or(SystemError::SystemNotFound(id))
    }

    fn system_mut(&mut self, id: SystemId) -> SystemResult<&mut System> {
        self.systems
            .get_mut(&id)
            .ok_or(SystemError::SystemNotFound(id))
    }

    fn owner_chain_contains(&self, start: SystemId, needle: SystemId) -> bool {
        let mut next = Some(start);
        while let Some(current) = next {
            if current == needle {
                return true;
            }
            next = self.systems.get(&current).and_then(System::owner);
        }
        false
    }

    // Depth-first search of the subtree under `scope`, children in insertion
    // order. A match is not searched below.
    fn find_in_subtree(&self, scope: SystemId, id: SystemId) -> Vec<SystemId> {
        let mut found = Vec::new();
        let mut stack = vec![scope];
        while let Some(current) = stack.pop() {
            if current == id {
                found.push(current);
                continue;
            }
            if let Some(system) = self.systems.get(&current) {
                stack.extend(system.children.iter().rev().copied());
            }
        }
        found
    }

    // -----------------------------------------------------------------------
    // Connection state
    // -----------------------------------------------------------------------

    /// Mark the system `id` connected if it lies in the subtree of `this`.
    ///
    /// Returns the matched systems; empty if `id` is not in the subtree.
    pub fn connect(&mut self, this: SystemId, id: SystemId) -> SystemResult<Vec<SystemId>> {
        self.system(this)?;
        let matched = self.find_in_subtree(this, id);
        for &system in &matched {
            self.system_mut(system)?.set_connected(true);
            debug!(scope = %this, system = %system, "system connected");
        }
        Ok(matched)
    }

    /// Connect each id in turn and concatenate the results in input order.
    pub fn connect_all(
        &mut self,
        this: SystemId,
        ids: &[SystemId],
    ) -> SystemResult<Vec<SystemId>> {
        let mut matched = Vec::new();
        for &id in ids {
            matched.extend(self.connect(this, id)?);
        }
        Ok(matched)
    }

    /// Mark the system `id` disconnected if it lies in the subtree of `this`.
    pub fn disconnect(&mut self, this: SystemId, id: SystemId) -> SystemResult<()> {
        self.system(this)?;
        for system in self.find_in_subtree(this, id) {
            self.system_mut(system)?.set_connected(false);
            debug!(scope = %this, system = %system, "system disconnected");
        }
        Ok(())
    }

    /// Whether the system `id` is connected.
    pub fn is_connected(&self, id: SystemId) -> SystemResult<bool> {
        Ok(self.system(id)?.connected())
    }

    /// Fail with [`SystemError::NotConnected`] unless `this` is connected.
    pub fn check_connect(&self, this: SystemId) -> SystemResult<()> {
        let system = self.system(this)?;
        if !system.connected() {
            return Err(SystemError::NotConnected {
                name: system.name.clone(),
                id: system.id,
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Deliver `event` to the listeners of `this` registered for its type.
    ///
    /// Fails without delivering anything if `this` is not connected. Only
    /// `this` is dispatched to; children and ancestors are not visited.
    /// Returns false if the event is cancelable and a listener cancelled it.
    pub fn dispatch_event(&self, this: SystemId, event: &mut Event) -> SystemResult<bool> {
        if let Err(err) = self.check_connect(this) {
            warn!(system = %this, kind = event.kind(), "dispatch rejected: {err}");
            return Err(err);
        }

        let listeners = self.system(this)?.listeners().snapshot(event.kind());
        trace!(system = %this, kind = event.kind(), listeners = listeners.len(), "dispatching");

        event.begin_dispatch(this);
        for listener in &listeners {
            listener.invoke(event);
            if event.immediate_propagation_stopped() {
                break;
            }
        }
        event.end_dispatch();
        Ok(!event.default_prevented())
    }

    /// Register `listener` for `kind` on `this`.
    ///
    /// With [`ListenerScope::Ancestors`] the same listener is registered on
    /// every ancestor first, root down, then on `this`. Registering a
    /// listener a system already has for `kind` is a no-op on that system.
    /// Passing `None` fails and registers nothing anywhere.
    pub fn add_event_listener(
        &mut self,
        this: SystemId,
        kind: &str,
        listener: impl Into<Option<Listener>>,
    ) -> SystemResult<()> {
        let system = self.system(this)?;
        let Some(listener) = listener.into() else {
            return Err(SystemError::MissingListener {
                kind: kind.to_string(),
                name: system.name.clone(),
                id: system.id,
            });
        };

        let targets = match self.config.listener_scope {
            ListenerScope::Ancestors => {
                let mut chain = self.ancestors(this)?;
                chain.reverse();
                chain.push(this);
                chain
            }
            ListenerScope::Local => vec![this],
        };

        for target in targets {
            if self
                .system_mut(target)?
                .listeners_mut()
                .add(kind, listener.clone())
            {
                debug!(system = %target, origin = %this, kind, "listener registered");
            }
        }
        Ok(())
    }

    /// Remove `listener` for `kind` from `this` only. Returns whether it was registered.
    pub fn remove_event_listener(
        &mut self,
        this: SystemId,
        kind: &str,
        listener: &Listener,
    ) -> SystemResult<bool> {
        let removed = self.system_mut(this)?.listeners_mut().remove(kind, listener);
        if removed {
            debug!(system = %this, kind, "listener removed");
        }
        Ok(removed)
    }

    /// Number of listeners registered for `kind` directly on `id`.
    pub fn listener_count(&self, id: SystemId, kind: &str) -> SystemResult<usize> {
        Ok(self.system(id)?.listeners().count(kind))
    }
}
