//! Result ledger: record, correct, and delete match outcomes against Swiss standings.

use crate::logic::knockout::advance_knockout_round;
use crate::logic::swiss::advance_swiss_round;
use crate::models::{
    Match, MatchId, MatchView, Phase, PlayerId, Result, Tournament, TournamentError,
};
use crate::store::{RecordStore, Transaction, Write};
use rand::Rng;

/// Standing writes that undo `m`'s recorded Swiss outcome. Empty if undecided.
fn reverse_outcome(m: &Match) -> Vec<Write> {
    let Some(winner) = m.winner else {
        return Vec::new();
    };
    let mut writes = vec![Write::AdjustStanding {
        player: winner,
        wins: -1,
        losses: 0,
    }];
    if let Some(loser) = m.opponent_of(winner) {
        writes.push(Write::AdjustStanding {
            player: loser,
            wins: 0,
            losses: -1,
        });
    }
    writes
}

/// Record `winner` for a match and advance the stage if that completed a round.
///
/// A Swiss result replaces any earlier one: the old outcome is reversed before the new one
/// is applied, in the same transaction. Last-chance and knockout results only set the
/// winner.
pub fn record_result<S, R>(
    tournament: &Tournament<S>,
    match_id: MatchId,
    winner: PlayerId,
    rng: &mut R,
) -> Result<MatchView>
where
    S: RecordStore,
    R: Rng + ?Sized,
{
    let store = tournament.store();
    let base = store.version()?;

    let m = store
        .find_match(match_id)?
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let Some(player2) = m.player2 else {
        return Err(TournamentError::MatchNotEditable(match_id));
    };
    let loser = if winner == m.player1 {
        player2
    } else if winner == player2 {
        m.player1
    } else {
        return Err(TournamentError::WinnerNotInMatch { match_id, winner });
    };

    let mut tx = Transaction::new(base);
    match m.phase {
        Phase::Swiss => {
            tx.writes.extend(reverse_outcome(&m));
            tx.push(Write::AdjustStanding {
                player: winner,
                wins: 1,
                losses: 0,
            });
            tx.push(Write::AdjustStanding {
                player: loser,
                wins: 0,
                losses: 1,
            });
        }
        Phase::LastChance => {
            if m.winner.is_some_and(|w| w != winner)
                && store.count_matches(Phase::Knockout)? > 0
            {
                return Err(TournamentError::RoundAlreadyAdvanced(match_id));
            }
        }
        Phase::Knockout => {
            if m.winner.is_some_and(|w| w != winner)
                && store.count_matches_in_round(Phase::Knockout, m.round + 1)? > 0
            {
                return Err(TournamentError::RoundAlreadyAdvanced(match_id));
            }
        }
    }
    tx.push(Write::SetWinner { match_id, winner });
    store.commit(tx)?;
    log::info!("{:?} round {}: {} beat {}", m.phase, m.round, winner, loser);

    let follow_up = match m.phase {
        Phase::Swiss => advance_swiss_round(tournament, rng).map(drop),
        Phase::Knockout => advance_knockout_round(tournament).map(drop),
        Phase::LastChance => Ok(()),
    };
    match follow_up {
        Err(e) if e.is_retryable() => {
            log::warn!("Round advancement after {} deferred: {}", match_id, e);
        }
        other => other?,
    }

    let updated = store
        .find_match(match_id)?
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    tournament.view(updated)
}

/// Remove a match, first undoing whatever its Swiss outcome added to the standings.
pub fn delete_match<S: RecordStore>(tournament: &Tournament<S>, match_id: MatchId) -> Result<()> {
    let store = tournament.store();
    let base = store.version()?;

    let m = store
        .find_match(match_id)?
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    let mut tx = Transaction::new(base);
    if m.phase == Phase::Swiss {
        tx.writes.extend(reverse_outcome(&m));
    }
    tx.push(Write::DeleteMatch(match_id));
    store.commit(tx)?;

    log::info!("Deleted {:?} match {} (round {})", m.phase, match_id, m.round);
    Ok(())
}
