//! Swiss + knockout tournament engine: library with models, record store, and progression logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    advance_knockout_round, advance_swiss_round, bracket_size, delete_match, import_players,
    last_chance_matches, pair, pair_in_order, record_result, register_player, remove_player,
    snake_pairs, start_knockout, start_swiss, KnockoutProgress, KnockoutStart, OpponentHistory,
    Pairing, PairingPlayer, SwissProgress, BRACKET_SIZES, MIN_PLAYERS,
};
pub use models::{
    DepartmentId, ErrorKind, Match, MatchId, MatchView, Phase, Player, PlayerId, Tournament,
    TournamentError, ADVANCE_WINS, ELIMINATION_LOSSES, POINTS_PER_WIN,
};
pub use store::{MemoryStore, RecordStore, StoreError, Transaction, Write};
