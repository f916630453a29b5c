//! Party identification and per-party storage.
//!
//! The game always has exactly two parties. `ActorId(0)` moves first.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of parties in a game.
pub const PARTY_COUNT: usize = 2;

/// Identifier of one of the two parties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u8);

impl ActorId {
    /// The party that opens the game.
    pub const FIRST: ActorId = ActorId(0);
    /// The party that replies.
    pub const SECOND: ActorId = ActorId(1);

    /// Get the raw index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The opposing party.
    #[must_use]
    pub const fn other(self) -> Self {
        ActorId(1 - (self.0 & 1))
    }

    /// Both parties in seating order.
    pub fn both() -> impl Iterator<Item = ActorId> {
        [Self::FIRST, Self::SECOND].into_iter()
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent{}", self.0 + 1)
    }
}

/// One value per party with O(1) access by `ActorId`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorMap<T> {
    data: [T; PARTY_COUNT],
}

impl<T> ActorMap<T> {
    /// Build from the first and second party's values.
    pub fn new(first: T, second: T) -> Self {
        Self {
            data: [first, second],
        }
    }

    /// Build with a factory called once per party.
    pub fn from_fn(mut factory: impl FnMut(ActorId) -> T) -> Self {
        Self::new(factory(ActorId::FIRST), factory(ActorId::SECOND))
    }

    /// Iterate over (ActorId, &T) pairs in seating order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (ActorId(i as u8), v))
    }
}

impl<T> Index<ActorId> for ActorMap<T> {
    type Output = T;

    fn index(&self, actor: ActorId) -> &Self::Output {
        &self.data[actor.index()]
    }
}

impl<T> IndexMut<ActorId> for ActorMap<T> {
    fn index_mut(&mut self, actor: ActorId) -> &mut Self::Output {
        &mut self.data[actor.index()]
    }
}
