//! Knockout stage: bracket sizing, last-chance play-in, snake seeding, and round generation.

use crate::models::{
    cmp_standing, Match, Phase, Player, PlayerId, Result, Tournament, TournamentError,
};
use crate::store::{RecordStore, Transaction, Write};
use std::collections::HashSet;

/// Bracket sizes the knockout supports.
pub const BRACKET_SIZES: [usize; 4] = [4, 8, 16, 32];

/// What a call to [`start_knockout`] did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KnockoutStart {
    /// Not enough qualified players: a play-in round was created.
    LastChance { bracket_size: usize, matches: Vec<Match> },
    /// Round 1 of the bracket was created.
    Bracket { bracket_size: usize, matches: Vec<Match> },
}

/// What a call to [`advance_knockout_round`] did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KnockoutProgress {
    NotStarted,
    Created { round: u32, matches: Vec<Match> },
    /// A concurrent call created the round first.
    AlreadyExists { round: u32 },
    RoundOpen,
    /// The final is decided.
    Champion(PlayerId),
}

/// Smallest supported bracket that fits all qualified players without exceeding the field.
pub fn bracket_size(qualified: usize, total: usize) -> Option<usize> {
    BRACKET_SIZES
        .into_iter()
        .find(|&size| size >= qualified && size <= total)
}

/// Rank 1 vs rank N, rank 2 vs rank N-1, and so on. A middle seed, if any, is dropped.
pub fn snake_pairs(seeds: &[PlayerId]) -> Vec<(PlayerId, PlayerId)> {
    let half = seeds.len() / 2;
    seeds[..half]
        .iter()
        .zip(seeds.iter().rev())
        .map(|(&a, &b)| (a, b))
        .collect()
}

/// Play-in matches filling `extra_slots` from ranked `candidates`.
///
/// Normally the top `2 * extra_slots` candidates meet as 1v2, 3v4, ... When there are fewer
/// than that, the best candidates get byes so the round still yields `extra_slots` winners.
pub fn last_chance_matches(candidates: &[PlayerId], extra_slots: usize) -> Vec<Match> {
    let entrants = &candidates[..candidates.len().min(extra_slots * 2)];
    let byes = (extra_slots * 2).saturating_sub(entrants.len());
    let (bye_seeds, paired) = entrants.split_at(byes.min(entrants.len()));

    let mut matches: Vec<Match> = bye_seeds
        .iter()
        .map(|&id| Match::bye(Phase::LastChance, 1, id))
        .collect();
    for pair in paired.chunks(2) {
        match *pair {
            [a, b] => matches.push(Match::new(Phase::LastChance, 1, a, b)),
            [a] => matches.push(Match::bye(Phase::LastChance, 1, a)),
            _ => {}
        }
    }
    matches
}

/// Start the knockout stage.
///
/// Requires a played and finished Swiss stage and no existing bracket. If the qualified players do not
/// fill a bracket on their own, the first call creates a last-chance round; calling again
/// once it is decided seeds the bracket with its winners.
pub fn start_knockout<S: RecordStore>(tournament: &Tournament<S>) -> Result<KnockoutStart> {
    let store = tournament.store();
    let base = store.version()?;

    if store.count_matches(Phase::Swiss)? == 0 {
        return Err(TournamentError::SwissNotStarted);
    }
    if store.count_open_matches(Phase::Swiss)? > 0 {
        return Err(TournamentError::SwissUnfinished);
    }
    if store.count_matches(Phase::Knockout)? > 0 {
        return Err(TournamentError::KnockoutAlreadyStarted);
    }

    let qualified = store.find_qualified_players()?;
    let last_chance = store.find_matches(Phase::LastChance)?;

    let field = if !last_chance.is_empty() {
        if last_chance.iter().any(Match::is_open) {
            return Err(TournamentError::LastChanceUnfinished);
        }
        let mut field = qualified;
        let mut seen: HashSet<PlayerId> = field.iter().map(|p| p.id).collect();
        for winner in last_chance.iter().filter_map(Match::decided_winner) {
            if seen.insert(winner) {
                field.push(tournament.require_player(winner)?);
            }
        }
        if !BRACKET_SIZES.contains(&field.len()) {
            return Err(TournamentError::InvalidLastChanceField { size: field.len() });
        }
        field
    } else {
        let total = store.all_players()?.len();
        let size = bracket_size(qualified.len(), total).ok_or(
            TournamentError::NoValidBracketSize {
                qualified: qualified.len(),
                total,
            },
        )?;

        if qualified.len() < size {
            let extra_slots = size - qualified.len();
            let candidates: Vec<PlayerId> = store
                .find_unqualified_players()?
                .iter()
                .map(|p| p.id)
                .collect();
            if candidates.len() < extra_slots {
                return Err(TournamentError::NotEnoughCandidates {
                    needed: extra_slots,
                    available: candidates.len(),
                });
            }

            let matches = last_chance_matches(&candidates, extra_slots);
            let mut tx = Transaction::new(base);
            for m in &matches {
                tx.push(Write::CreateMatch(m.clone()));
            }
            store.commit(tx)?;

            log::info!(
                "Last-chance round created: {} matches for {} open slots",
                matches.len(),
                extra_slots
            );
            return Ok(KnockoutStart::LastChance {
                bracket_size: size,
                matches,
            });
        }
        qualified
    };

    let matches = seed_bracket(field);
    let mut tx = Transaction::new(base);
    for m in &matches {
        tx.push(Write::CreateMatch(m.clone()));
    }
    store.commit(tx)?;

    let bracket_size = matches.len() * 2;
    log::info!("Knockout started with a bracket of {}", bracket_size);
    Ok(KnockoutStart::Bracket {
        bracket_size,
        matches,
    })
}

/// Rank the field by standing and snake-pair it into round 1.
fn seed_bracket(mut field: Vec<Player>) -> Vec<Match> {
    field.sort_by(cmp_standing);
    let seeds: Vec<PlayerId> = field.iter().map(|p| p.id).collect();
    snake_pairs(&seeds)
        .into_iter()
        .map(|(a, b)| Match::new(Phase::Knockout, 1, a, b))
        .collect()
}

/// Create the next knockout round from the winners of the current one, in match order.
pub fn advance_knockout_round<S: RecordStore>(
    tournament: &Tournament<S>,
) -> Result<KnockoutProgress> {
    let store = tournament.store();
    let base = store.version()?;

    let Some(round) = store.max_round(Phase::Knockout)? else {
        return Ok(KnockoutProgress::NotStarted);
    };
    let current = store.find_matches_in_round(Phase::Knockout, round)?;
    if current.iter().any(Match::is_open) {
        return Ok(KnockoutProgress::RoundOpen);
    }

    let next = round + 1;
    // Only non-zero when another writer committed the round after `max_round` was read.
    if store.count_matches_in_round(Phase::Knockout, next)? > 0 {
        return Ok(KnockoutProgress::AlreadyExists { round: next });
    }

    let winners: Vec<PlayerId> = current.iter().filter_map(Match::decided_winner).collect();
    match winners[..] {
        [] => return Ok(KnockoutProgress::NotStarted),
        [champion] => {
            log::info!("Knockout champion: {}", champion);
            return Ok(KnockoutProgress::Champion(champion));
        }
        _ => {}
    }

    let matches: Vec<Match> = winners
        .chunks(2)
        .filter_map(|pair| match *pair {
            [a, b] => Some(Match::new(Phase::Knockout, next, a, b)),
            [a] => Some(Match::bye(Phase::Knockout, next, a)),
            _ => None,
        })
        .collect();

    let mut tx = Transaction::new(base);
    for m in &matches {
        tx.push(Write::CreateMatch(m.clone()));
    }
    store.commit(tx)?;

    log::info!("Knockout round {} created with {} matches", next, matches.len());
    Ok(KnockoutProgress::Created {
        round: next,
        matches,
    })
}
