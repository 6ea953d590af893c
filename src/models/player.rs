//! Player data structure and the orderings used for standings.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Department a player belongs to. Only compared for equality when pairing.
pub type DepartmentId = u32;

/// Points awarded per Swiss win (byes included).
pub const POINTS_PER_WIN: u32 = 3;
/// Swiss wins needed to qualify for the knockout.
pub const ADVANCE_WINS: u32 = 3;
/// Swiss losses after which a player is out of the Swiss stage.
pub const ELIMINATION_LOSSES: u32 = 3;

/// A registered player and their Swiss standing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub department: DepartmentId,
    /// Always `POINTS_PER_WIN * wins`.
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
}

impl Player {
    /// Create a new player with the given name and department. Standings start at zero.
    pub fn new(name: impl Into<String>, department: DepartmentId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            department,
            points: 0,
            wins: 0,
            losses: 0,
        }
    }

    /// Still playing Swiss rounds: neither qualified nor eliminated.
    pub fn is_active(&self) -> bool {
        self.wins < ADVANCE_WINS && self.losses < ELIMINATION_LOSSES
    }

    /// Qualified for the knockout stage.
    pub fn is_qualified(&self) -> bool {
        self.wins >= ADVANCE_WINS
    }

    /// Apply signed win/loss deltas. Points follow wins.
    ///
    /// Returns `None` (leaving `self` untouched) if a counter would drop below zero.
    pub fn adjust(&mut self, wins: i32, losses: i32) -> Option<()> {
        let new_wins = self.wins.checked_add_signed(wins)?;
        let new_losses = self.losses.checked_add_signed(losses)?;
        let new_points = new_wins.checked_mul(POINTS_PER_WIN)?;
        self.wins = new_wins;
        self.losses = new_losses;
        self.points = new_points;
        Some(())
    }

    /// Zero all standings (new tournament).
    pub fn reset(&mut self) {
        self.points = 0;
        self.wins = 0;
        self.losses = 0;
    }
}

/// Ranking used for knockout qualification and seeding:
/// points desc, wins desc, losses asc, id asc.
pub fn cmp_standing(a: &Player, b: &Player) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.wins.cmp(&a.wins))
        .then(a.losses.cmp(&b.losses))
        .then(a.id.cmp(&b.id))
}

/// Ordering of active Swiss players: wins desc, losses asc, id asc.
pub fn cmp_record(a: &Player, b: &Player) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then(a.losses.cmp(&b.losses))
        .then(a.id.cmp(&b.id))
}
