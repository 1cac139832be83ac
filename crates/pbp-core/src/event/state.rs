//! Running game-state counters snapshotted onto every record.
//!
//! Both maps answer lookups for keys they have never seen with a declared
//! default instead of inserting on read.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{PlayerId, TeamId};

/// Team fouls allowed per regulation period before the penalty applies.
pub const DEFAULT_FOULS_TO_GIVE: u8 = 4;

/// Fouls each team may still commit before the opponent shoots free throws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoulBank {
    allowance: u8,
    #[serde(default)]
    remaining: BTreeMap<TeamId, u8>,
}

impl Default for FoulBank {
    fn default() -> Self {
        Self::new(DEFAULT_FOULS_TO_GIVE)
    }
}

impl FoulBank {
    #[must_use]
    pub const fn new(allowance: u8) -> Self {
        Self {
            allowance,
            remaining: BTreeMap::new(),
        }
    }

    /// Fouls left for `team`; the full allowance if the team has not fouled.
    #[must_use]
    pub fn get(&self, team: &TeamId) -> u8 {
        self.remaining.get(team).copied().unwrap_or(self.allowance)
    }

    #[must_use]
    pub const fn allowance(&self) -> u8 {
        self.allowance
    }

    /// `true` once `team` has no fouls left to give.
    #[must_use]
    pub fn in_penalty(&self, team: &TeamId) -> bool {
        self.get(team) == 0
    }

    /// Spend one foul for `team`. Saturates at zero; returns what is left.
    pub fn charge(&mut self, team: &TeamId) -> u8 {
        let left = self.get(team).saturating_sub(1);
        self.remaining.insert(team.clone(), left);
        left
    }

    /// Restore the full allowance for every team.
    pub fn reset(&mut self) {
        self.remaining.clear();
    }

    /// Teams that have been charged at least once since the last reset.
    pub fn teams(&self) -> impl Iterator<Item = &TeamId> {
        self.remaining.keys()
    }
}

/// Personal fouls per player over the whole game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerFouls(BTreeMap<PlayerId, u8>);

impl PlayerFouls {
    /// Personal fouls committed by `player`, zero if none recorded.
    #[must_use]
    pub fn get(&self, player: &PlayerId) -> u8 {
        self.0.get(player).copied().unwrap_or(0)
    }

    /// Record one personal foul; returns the new total.
    pub fn add(&mut self, player: &PlayerId) -> u8 {
        let total = self.get(player).saturating_add(1);
        self.0.insert(player.clone(), total);
        total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
