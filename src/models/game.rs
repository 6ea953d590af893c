//! Match and Phase: one pairing of two seats in a stage round.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Stage of the tournament a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Swiss,
    LastChance,
    Knockout,
}

impl Phase {
    /// Phases in the order they take precedence when inferring the current one.
    pub const PRIORITY: [Phase; 3] = [Phase::Knockout, Phase::LastChance, Phase::Swiss];
}

/// A single match. `player2 == None` is a bye, decided for `player1` on creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Stage-relative, starting at 1.
    pub round: u32,
    pub phase: Phase,
    pub player1: PlayerId,
    pub player2: Option<PlayerId>,
    /// None if not yet played.
    pub winner: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// A match between two seated players, not yet decided.
    pub fn new(phase: Phase, round: u32, player1: PlayerId, player2: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            phase,
            player1,
            player2: Some(player2),
            winner: None,
            created_at: Utc::now(),
        }
    }

    /// A bye: `player1` is unopposed and already the winner.
    pub fn bye(phase: Phase, round: u32, player1: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            phase,
            player1,
            player2: None,
            winner: Some(player1),
            created_at: Utc::now(),
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player2.is_none()
    }

    /// Both seats filled and no winner yet.
    pub fn is_open(&self) -> bool {
        self.player2.is_some() && self.winner.is_none()
    }

    /// The winner, counting a bye's sole player as its winner.
    pub fn decided_winner(&self) -> Option<PlayerId> {
        match (self.winner, self.player2) {
            (Some(w), _) => Some(w),
            (None, None) => Some(self.player1),
            (None, Some(_)) => None,
        }
    }

    /// The seat opposite `player`, if `player` is seated here and has an opponent.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if player == self.player1 {
            self.player2
        } else if Some(player) == self.player2 {
            Some(self.player1)
        } else {
            None
        }
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.player1 == player || self.player2 == Some(player)
    }
}
