use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

/// Unique identifier for every system in a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub Uuid);

impl SystemId {
    /// Generate a new random system ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SystemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SystemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Source of fresh system identifiers.
///
/// The tree draws one id per constructed system. Implementations must not
/// hand out the same id twice within a tree.
pub trait IdGenerator: fmt::Debug {
    /// Produce the next identifier.
    fn next_id(&mut self) -> SystemId;
}

/// Random v4 UUIDs from the process-wide generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> SystemId {
        SystemId::new()
    }
}

/// Deterministic v4-formatted UUIDs drawn from a seeded RNG.
#[derive(Debug)]
pub struct SeededIds {
    rng: StdRng,
}

impl SeededIds {
    /// Create a generator that yields the same id sequence for the same seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IdGenerator for SeededIds {
    fn next_id(&mut self) -> SystemId {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        SystemId(Builder::from_random_bytes(bytes).into_uuid())
    }
}
