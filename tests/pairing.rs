//! Integration tests for the pairing engine.

mod common;

use common::{id, rng};
use std::collections::HashSet;
use swiss_knockout_web::{pair, pair_in_order, Match, OpponentHistory, PairingPlayer, Phase};

fn pp(n: u128, department: u32) -> PairingPlayer {
    PairingPlayer {
        id: id(n),
        department,
    }
}

#[test]
fn every_player_is_paired_or_carried_exactly_once() {
    for n in 0..=11u128 {
        let players: Vec<PairingPlayer> = (1..=n).map(|i| pp(i, (i % 3) as u32)).collect();
        let pairing = pair(&players, &OpponentHistory::default(), &mut rng(n as u64));

        let mut seen = Vec::new();
        for (a, b) in &pairing.pairs {
            seen.push(*a);
            seen.push(*b);
        }
        seen.extend(pairing.carry.map(|c| c.id));

        let unique: HashSet<_> = seen.iter().copied().collect();
        assert_eq!(seen.len(), n as usize, "n = {n}");
        assert_eq!(unique.len(), n as usize, "n = {n}");
        assert_eq!(pairing.carry.is_some(), n % 2 == 1);
    }
}

#[test]
fn empty_and_single_inputs() {
    let empty = pair(&[], &OpponentHistory::default(), &mut rng(1));
    assert!(empty.pairs.is_empty());
    assert_eq!(empty.carry, None);

    let single = pair(&[pp(1, 1)], &OpponentHistory::default(), &mut rng(1));
    assert!(single.pairs.is_empty());
    assert_eq!(single.carry, Some(pp(1, 1)));
}

#[test]
fn prefers_unplayed_opponent_from_other_department() {
    let mut history = OpponentHistory::default();
    history.record(id(1), id(3));
    // 2: same department; 3: already played; 4: fresh and foreign.
    let queue = vec![pp(1, 1), pp(2, 1), pp(3, 2), pp(4, 2)];
    let pairing = pair_in_order(queue, &history);
    assert_eq!(pairing.pairs[0], (id(1), id(4)));
}

#[test]
fn falls_back_to_unplayed_same_department() {
    let mut history = OpponentHistory::default();
    history.record(id(1), id(2));
    // 2: foreign but played; 3: same department, unplayed.
    let queue = vec![pp(1, 1), pp(2, 2), pp(3, 1)];
    let pairing = pair_in_order(queue, &history);
    assert_eq!(pairing.pairs, vec![(id(1), id(3))]);
    assert_eq!(pairing.carry, Some(pp(2, 2)));
}

#[test]
fn falls_back_to_rematch_across_departments() {
    let mut history = OpponentHistory::default();
    history.record(id(1), id(2));
    history.record(id(1), id(3));
    let queue = vec![pp(1, 1), pp(2, 1), pp(3, 2)];
    let pairing = pair_in_order(queue, &history);
    assert_eq!(pairing.pairs, vec![(id(1), id(3))]);
}

#[test]
fn falls_back_to_next_in_line() {
    let mut history = OpponentHistory::default();
    history.record(id(1), id(2));
    history.record(id(1), id(3));
    let queue = vec![pp(1, 1), pp(2, 1), pp(3, 1)];
    let pairing = pair_in_order(queue, &history);
    assert_eq!(pairing.pairs, vec![(id(1), id(2))]);
    assert_eq!(pairing.carry, Some(pp(3, 1)));
}

#[test]
fn later_players_pair_from_what_remains() {
    let history = OpponentHistory::default();
    // 1 takes 3 (first foreign), leaving 2 and 4 together.
    let queue = vec![pp(1, 1), pp(2, 1), pp(3, 2), pp(4, 2)];
    let pairing = pair_in_order(queue, &history);
    assert_eq!(pairing.pairs, vec![(id(1), id(3)), (id(2), id(4))]);
}

#[test]
fn history_ignores_byes() {
    let matches = vec![
        Match::new(Phase::Swiss, 1, id(1), id(2)),
        Match::bye(Phase::Swiss, 1, id(3)),
    ];
    let history = OpponentHistory::from_matches(&matches);
    assert!(history.has_played(id(1), id(2)));
    assert!(history.has_played(id(2), id(1)));
    assert!(!history.has_played(id(3), id(1)));
}
