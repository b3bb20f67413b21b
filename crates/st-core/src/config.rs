use crate::id::{IdGenerator, RandomIds, SeededIds};

/// Where [`add_event_listener`](crate::SystemTree::add_event_listener)
/// registers a listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListenerScope {
    /// Register on the addressed system and on every ancestor up to the root.
    #[default]
    Ancestors,
    /// Register on the addressed system only.
    Local,
}

/// Configuration for a [`SystemTree`](crate::SystemTree).
#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    /// How far a listener registration reaches.
    pub listener_scope: ListenerScope,
    /// Seed for deterministic ids. `None` uses random v4 UUIDs.
    pub id_seed: Option<u64>,
}

impl TreeConfig {
    /// Set how far a listener registration reaches.
    pub fn with_listener_scope(mut self, scope: ListenerScope) -> Self {
        self.listener_scope = scope;
        self
    }

    /// Seed the id generator for reproducible trees.
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.id_seed = Some(seed);
        self
    }

    pub(crate) fn id_generator(&self) -> Box<dyn IdGenerator> {
        match self.id_seed {
            Some(seed) => Box::new(SeededIds::new(seed)),
            None => Box::new(RandomIds),
        }
    }
}
