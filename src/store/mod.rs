//! Record store boundary: typed queries over players and matches plus atomic transactions.

mod memory;

pub use memory::MemoryStore;

use crate::models::{Match, MatchId, Phase, Player, PlayerId};
use thiserror::Error;

/// Failures raised by a [`RecordStore`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StoreError {
    /// Another transaction committed since `expected` was read.
    #[error("transaction conflict: expected version {expected}, found {found}")]
    Conflict { expected: u64, found: u64 },
    #[error("player {0} does not exist")]
    MissingPlayer(PlayerId),
    #[error("match {0} does not exist")]
    MissingMatch(MatchId),
    #[error("player {0} already exists")]
    DuplicatePlayer(PlayerId),
    #[error("player {0} is referenced by a match")]
    PlayerReferenced(PlayerId),
    #[error("standings of player {0} would become negative")]
    NegativeStanding(PlayerId),
    #[error("record store lock poisoned")]
    Poisoned,
}

/// One mutation inside a [`Transaction`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Write {
    CreatePlayer(Player),
    DeletePlayer(PlayerId),
    CreateMatch(Match),
    SetWinner { match_id: MatchId, winner: PlayerId },
    /// Signed win/loss deltas; points follow wins.
    AdjustStanding { player: PlayerId, wins: i32, losses: i32 },
    ResetStandings,
    DeleteMatch(MatchId),
    DeleteAllMatches,
}

/// A batch of writes applied all-or-nothing on top of `base_version`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub base_version: u64,
    pub writes: Vec<Write>,
}

impl Transaction {
    pub fn new(base_version: u64) -> Self {
        Self {
            base_version,
            writes: Vec::new(),
        }
    }

    pub fn push(&mut self, write: Write) {
        self.writes.push(write);
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Durable storage for the single tournament's players and matches.
///
/// Match queries return matches ordered by round ascending, then creation order.
pub trait RecordStore {
    /// Version of the committed state; changes with every commit.
    fn version(&self) -> Result<u64, StoreError>;

    /// All players in registration order.
    fn all_players(&self) -> Result<Vec<Player>, StoreError>;

    fn find_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError>;

    /// Players still in the Swiss stage, ordered by wins desc, losses asc, id asc.
    fn find_active_players(&self) -> Result<Vec<Player>, StoreError>;

    /// Players with enough wins for the knockout, ordered by standing.
    fn find_qualified_players(&self) -> Result<Vec<Player>, StoreError>;

    /// Players short of qualification, ordered by standing.
    fn find_unqualified_players(&self) -> Result<Vec<Player>, StoreError>;

    fn find_match(&self, id: MatchId) -> Result<Option<Match>, StoreError>;

    fn all_matches(&self) -> Result<Vec<Match>, StoreError>;

    /// The most recently inserted match, if any.
    fn latest_match(&self) -> Result<Option<Match>, StoreError>;

    fn find_matches(&self, phase: Phase) -> Result<Vec<Match>, StoreError>;

    fn find_matches_in_round(&self, phase: Phase, round: u32) -> Result<Vec<Match>, StoreError>;

    fn count_matches(&self, phase: Phase) -> Result<usize, StoreError>;

    fn count_matches_in_round(&self, phase: Phase, round: u32) -> Result<usize, StoreError>;

    /// Matches with both seats filled and no winner.
    fn count_open_matches(&self, phase: Phase) -> Result<usize, StoreError>;

    fn count_matches_for_player(&self, player: PlayerId) -> Result<usize, StoreError>;

    fn max_round(&self, phase: Phase) -> Result<Option<u32>, StoreError>;

    /// Apply every write or none of them.
    fn commit(&self, tx: Transaction) -> Result<(), StoreError>;
}
