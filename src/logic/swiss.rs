//! Swiss stage: round 1 setup and record-grouped round advancement.

use crate::logic::pairing::{pair, OpponentHistory, PairingPlayer};
use crate::models::{Match, Phase, Player, Result, Tournament, TournamentError};
use crate::store::{RecordStore, Transaction, Write};
use rand::seq::SliceRandom;
use rand::Rng;

/// Fewest registered players a Swiss stage can start with.
pub const MIN_PLAYERS: usize = 4;

/// What a call to [`advance_swiss_round`] did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SwissProgress {
    /// A new round was created.
    Created { round: u32, matches: Vec<Match> },
    /// A concurrent call created the round first.
    AlreadyExists { round: u32 },
    /// The current round still has undecided matches.
    RoundOpen,
    /// Fewer than two players are still active.
    StageComplete,
}

/// Start the Swiss stage: reset standings, drop every match, and pair round 1.
///
/// A leftover player gets a bye, which is credited as a win straight away.
pub fn start_swiss<S, R>(tournament: &Tournament<S>, rng: &mut R) -> Result<Vec<Match>>
where
    S: RecordStore,
    R: Rng + ?Sized,
{
    let store = tournament.store();
    let base = store.version()?;
    let mut players = store.all_players()?;
    if players.len() < MIN_PLAYERS {
        return Err(TournamentError::NotEnoughPlayers {
            required: MIN_PLAYERS,
            found: players.len(),
        });
    }
    players.shuffle(rng);

    let pool: Vec<PairingPlayer> = players.iter().map(PairingPlayer::from).collect();
    let mut tx = Transaction::new(base);
    tx.push(Write::DeleteAllMatches);
    tx.push(Write::ResetStandings);
    let matches = round_writes(&mut tx, &[pool], &OpponentHistory::default(), 1, rng);
    store.commit(tx)?;

    log::info!(
        "Swiss stage started: {} players, {} matches in round 1",
        players.len(),
        matches.len()
    );
    Ok(matches)
}

/// Create the next Swiss round if the current one is complete.
///
/// Active players are grouped by exact win/loss record, best record first, and each group
/// is paired on its own with the opponents everyone has already faced. An odd player out
/// moves down into the next group; one left over at the end gets a bye.
pub fn advance_swiss_round<S, R>(tournament: &Tournament<S>, rng: &mut R) -> Result<SwissProgress>
where
    S: RecordStore,
    R: Rng + ?Sized,
{
    let store = tournament.store();
    let base = store.version()?;

    if store.count_matches(Phase::Swiss)? == 0 {
        return Err(TournamentError::SwissNotStarted);
    }
    if store.count_open_matches(Phase::Swiss)? > 0 {
        return Ok(SwissProgress::RoundOpen);
    }

    let active = store.find_active_players()?;
    if active.len() < 2 {
        log::info!("Swiss stage finished");
        return Ok(SwissProgress::StageComplete);
    }

    let round = store.max_round(Phase::Swiss)?.unwrap_or(0) + 1;
    // Only non-zero when another writer committed the round after `max_round` was read.
    if store.count_matches_in_round(Phase::Swiss, round)? > 0 {
        return Ok(SwissProgress::AlreadyExists { round });
    }

    let history = OpponentHistory::from_matches(&store.find_matches(Phase::Swiss)?);
    let groups = group_by_record(&active);

    let mut tx = Transaction::new(base);
    let matches = round_writes(&mut tx, &groups, &history, round, rng);
    store.commit(tx)?;

    log::info!("Swiss round {} created with {} matches", round, matches.len());
    Ok(SwissProgress::Created { round, matches })
}

/// Split players (already sorted by record) into runs of identical wins/losses.
fn group_by_record(players: &[Player]) -> Vec<Vec<PairingPlayer>> {
    let mut groups: Vec<Vec<PairingPlayer>> = Vec::new();
    let mut last: Option<(u32, u32)> = None;
    for p in players {
        let record = (p.wins, p.losses);
        if last != Some(record) {
            groups.push(Vec::new());
            last = Some(record);
        }
        if let Some(group) = groups.last_mut() {
            group.push(p.into());
        }
    }
    groups
}

/// Pair each group in turn, carrying the odd player forward, and queue the match writes.
fn round_writes<R: Rng + ?Sized>(
    tx: &mut Transaction,
    groups: &[Vec<PairingPlayer>],
    history: &OpponentHistory,
    round: u32,
    rng: &mut R,
) -> Vec<Match> {
    let mut matches = Vec::new();
    let mut carry: Option<PairingPlayer> = None;

    for group in groups {
        let mut pool = Vec::with_capacity(group.len() + 1);
        pool.extend(carry.take());
        pool.extend_from_slice(group);

        let pairing = pair(&pool, history, rng);
        for (p1, p2) in pairing.pairs {
            matches.push(Match::new(Phase::Swiss, round, p1, p2));
        }
        carry = pairing.carry;
    }

    for m in &matches {
        tx.push(Write::CreateMatch(m.clone()));
    }

    if let Some(bye) = carry {
        log::debug!("bye for {} in Swiss round {}", bye.id, round);
        let m = Match::bye(Phase::Swiss, round, bye.id);
        tx.push(Write::CreateMatch(m.clone()));
        tx.push(Write::AdjustStanding {
            player: bye.id,
            wins: 1,
            losses: 0,
        });
        matches.push(m);
    }

    matches
}
