//! Tournament aggregate root and the errors raised by tournament commands.

use crate::models::game::{Match, MatchId, Phase};
use crate::models::player::{Player, PlayerId};
use crate::store::{RecordStore, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Minimum {required} players required (found {found})")]
    NotEnoughPlayers { required: usize, found: usize },
    #[error("Swiss stage has not been started")]
    SwissNotStarted,
    #[error("Swiss is not finished yet")]
    SwissUnfinished,
    #[error("Knockout already started")]
    KnockoutAlreadyStarted,
    #[error("No valid bracket size for {qualified} qualified of {total} players")]
    NoValidBracketSize { qualified: usize, total: usize },
    #[error("Not enough candidates for the last-chance round: need {needed}, have {available}")]
    NotEnoughCandidates { needed: usize, available: usize },
    #[error("Last-chance round is not finished yet")]
    LastChanceUnfinished,
    #[error("Last-chance winners and qualified players total {size}, which is not a valid bracket size")]
    InvalidLastChanceField { size: usize },
    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("Cannot set winner on bye/TBA match")]
    MatchNotEditable(MatchId),
    #[error("Winner must be one of the players in the match")]
    WinnerNotInMatch { match_id: MatchId, winner: PlayerId },
    #[error("Round has already advanced; result can no longer change")]
    RoundAlreadyAdvanced(MatchId),
    #[error("Player not found")]
    UnknownPlayer(PlayerId),
    #[error("Match refers to missing player {0}")]
    PlayerNotFound(PlayerId),
    #[error("Player is referenced by existing matches")]
    PlayerInUse(PlayerId),
    #[error("Player name must not be empty")]
    EmptyPlayerName,
    #[error("Invalid player CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification of a [`TournamentError`] for callers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Command rejected in the current state; nothing was written.
    Precondition,
    /// Bad or unknown identifiers or values.
    InvalidInput,
    /// Lost a race with another writer; safe to retry.
    Conflict,
    /// Stored records contradict each other.
    Consistency,
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            NotEnoughPlayers { .. }
            | SwissNotStarted
            | SwissUnfinished
            | KnockoutAlreadyStarted
            | NoValidBracketSize { .. }
            | NotEnoughCandidates { .. }
            | LastChanceUnfinished
            | InvalidLastChanceField { .. }
            | RoundAlreadyAdvanced(_)
            | PlayerInUse(_) => ErrorKind::Precondition,
            MatchNotFound(_)
            | MatchNotEditable(_)
            | WinnerNotInMatch { .. }
            | UnknownPlayer(_)
            | EmptyPlayerName
            | Csv(_) => ErrorKind::InvalidInput,
            PlayerNotFound(_) => ErrorKind::Consistency,
            Store(StoreError::Conflict { .. }) => ErrorKind::Conflict,
            Store(StoreError::PlayerReferenced(_)) => ErrorKind::Precondition,
            Store(_) => ErrorKind::Consistency,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

pub type Result<T, E = TournamentError> = std::result::Result<T, E>;

/// A match with its player references resolved.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub game: Match,
    pub player1_ref: Player,
    pub player2_ref: Option<Player>,
    pub winner_ref: Option<Player>,
}

/// The one tournament, owning access to its players and matches through a record store.
#[derive(Debug)]
pub struct Tournament<S> {
    store: S,
}

impl<S: RecordStore> Tournament<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All registered players in registration order.
    pub fn players(&self) -> Result<Vec<Player>> {
        Ok(self.store.all_players()?)
    }

    /// Look up a player that a stored match refers to.
    pub(crate) fn require_player(&self, id: PlayerId) -> Result<Player> {
        self.store
            .find_player(id)?
            .ok_or(TournamentError::PlayerNotFound(id))
    }

    /// Resolve a match's player references.
    pub fn view(&self, game: Match) -> Result<MatchView> {
        let player1_ref = self.require_player(game.player1)?;
        let player2_ref = game.player2.map(|id| self.require_player(id)).transpose()?;
        let winner_ref = game.winner.map(|id| self.require_player(id)).transpose()?;
        Ok(MatchView {
            game,
            player1_ref,
            player2_ref,
            winner_ref,
        })
    }

    /// Every match ordered by round, then creation order.
    pub fn matches(&self) -> Result<Vec<MatchView>> {
        self.store
            .all_matches()?
            .into_iter()
            .map(|m| self.view(m))
            .collect()
    }

    /// The phase in progress: the highest-priority phase with an open match, otherwise
    /// the phase of the most recently stored match. `None` before anything was paired.
    pub fn current_phase(&self) -> Result<Option<Phase>> {
        for phase in Phase::PRIORITY {
            if self.store.count_open_matches(phase)? > 0 {
                return Ok(Some(phase));
            }
        }
        Ok(self.store.latest_match()?.map(|m| m.phase))
    }
}
