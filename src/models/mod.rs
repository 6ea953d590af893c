//! Data structures for the tournament: players, matches, the tournament aggregate.

mod game;
mod player;
mod tournament;

pub use game::{Match, MatchId, Phase};
pub use player::{
    cmp_record, cmp_standing, DepartmentId, Player, PlayerId, ADVANCE_WINS, ELIMINATION_LOSSES,
    POINTS_PER_WIN,
};
pub use tournament::{ErrorKind, MatchView, Result, Tournament, TournamentError};
