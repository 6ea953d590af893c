//! Tournament business logic: setup, pairing, Swiss rounds, knockout bracket, results.

mod knockout;
mod ledger;
mod pairing;
mod setup;
mod swiss;

pub use knockout::{
    advance_knockout_round, bracket_size, last_chance_matches, snake_pairs, start_knockout,
    KnockoutProgress, KnockoutStart, BRACKET_SIZES,
};
pub use ledger::{delete_match, record_result};
pub use pairing::{pair, pair_in_order, OpponentHistory, Pairing, PairingPlayer};
pub use setup::{import_players, register_player, remove_player};
pub use swiss::{advance_swiss_round, start_swiss, SwissProgress, MIN_PLAYERS};
