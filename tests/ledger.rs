//! Integration tests for recording, correcting, and deleting results.

mod common;

use common::{add_match, commit, id, rng, standing, tournament_with_players};
use swiss_knockout_web::{
    delete_match, record_result, ErrorKind, Match, MatchId, Phase, RecordStore, TournamentError,
    Write,
};
use uuid::Uuid;

#[test]
fn recording_a_swiss_result_updates_both_players() {
    let t = tournament_with_players(4);
    let m = add_match(&t, Phase::Swiss, 1, id(1), id(2));
    add_match(&t, Phase::Swiss, 1, id(3), id(4));

    let view = record_result(&t, m.id, id(1), &mut rng(1)).unwrap();

    assert_eq!(view.game.winner, Some(id(1)));
    assert_eq!(view.winner_ref.as_ref().map(|p| p.id), Some(id(1)));
    assert_eq!(view.player2_ref.as_ref().map(|p| p.id), Some(id(2)));
    assert_eq!(standing(&t, id(1)), (1, 0, 3));
    assert_eq!(standing(&t, id(2)), (0, 1, 0));
}

#[test]
fn correcting_a_result_matches_recording_only_the_second() {
    let t = tournament_with_players(4);
    let m = add_match(&t, Phase::Swiss, 1, id(1), id(2));
    add_match(&t, Phase::Swiss, 1, id(3), id(4));
    let mut r = rng(2);

    record_result(&t, m.id, id(1), &mut r).unwrap();
    assert_eq!(standing(&t, id(1)), (1, 0, 3));
    assert_eq!(standing(&t, id(2)), (0, 1, 0));

    record_result(&t, m.id, id(2), &mut r).unwrap();
    assert_eq!(standing(&t, id(1)), (0, 1, 0));
    assert_eq!(standing(&t, id(2)), (1, 0, 3));
}

#[test]
fn re_recording_the_same_winner_is_stable() {
    let t = tournament_with_players(4);
    let m = add_match(&t, Phase::Swiss, 1, id(1), id(2));
    add_match(&t, Phase::Swiss, 1, id(3), id(4));
    let mut r = rng(3);

    record_result(&t, m.id, id(2), &mut r).unwrap();
    record_result(&t, m.id, id(2), &mut r).unwrap();
    assert_eq!(standing(&t, id(1)), (0, 1, 0));
    assert_eq!(standing(&t, id(2)), (1, 0, 3));
}

#[test]
fn rejects_unknown_match() {
    let t = tournament_with_players(4);
    let missing: MatchId = Uuid::from_u128(999);
    let err = record_result(&t, missing, id(1), &mut rng(1)).unwrap_err();
    assert!(matches!(err, TournamentError::MatchNotFound(m) if m == missing));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn rejects_bye_matches() {
    let t = tournament_with_players(4);
    let bye = Match::bye(Phase::Swiss, 1, id(1));
    commit(&t, vec![Write::CreateMatch(bye.clone())]);

    assert!(matches!(
        record_result(&t, bye.id, id(1), &mut rng(1)),
        Err(TournamentError::MatchNotEditable(_))
    ));
}

#[test]
fn rejects_winner_outside_the_match() {
    let t = tournament_with_players(4);
    let m = add_match(&t, Phase::Swiss, 1, id(1), id(2));
    let version = t.store().version().unwrap();

    assert!(matches!(
        record_result(&t, m.id, id(3), &mut rng(1)),
        Err(TournamentError::WinnerNotInMatch { .. })
    ));
    assert_eq!(t.store().version().unwrap(), version);
    assert_eq!(standing(&t, id(3)), (0, 0, 0));
}

#[test]
fn knockout_results_leave_standings_alone() {
    let t = tournament_with_players(4);
    let m = add_match(&t, Phase::Knockout, 1, id(1), id(2));
    add_match(&t, Phase::Knockout, 1, id(3), id(4));

    record_result(&t, m.id, id(2), &mut rng(1)).unwrap();
    assert_eq!(standing(&t, id(1)), (0, 0, 0));
    assert_eq!(standing(&t, id(2)), (0, 0, 0));
    assert_eq!(
        t.store().find_match(m.id).unwrap().unwrap().winner,
        Some(id(2))
    );
}

#[test]
fn deleting_a_decided_match_restores_standings() {
    let t = tournament_with_players(4);
    let first = add_match(&t, Phase::Swiss, 1, id(1), id(2));
    let second = add_match(&t, Phase::Swiss, 1, id(3), id(4));
    let mut r = rng(4);
    record_result(&t, first.id, id(1), &mut r).unwrap();
    let before = (standing(&t, id(3)), standing(&t, id(4)));

    record_result(&t, second.id, id(4), &mut r).unwrap();
    delete_match(&t, second.id).unwrap();

    assert_eq!((standing(&t, id(3)), standing(&t, id(4))), before);
    assert!(t.store().find_match(second.id).unwrap().is_none());
}

#[test]
fn deleting_an_undecided_match_touches_no_standings() {
    let t = tournament_with_players(4);
    let m = add_match(&t, Phase::Swiss, 1, id(1), id(2));

    delete_match(&t, m.id).unwrap();
    assert_eq!(standing(&t, id(1)), (0, 0, 0));
    assert_eq!(standing(&t, id(2)), (0, 0, 0));
}

#[test]
fn deleting_a_swiss_bye_reverses_its_win() {
    let t = tournament_with_players(4);
    let bye = Match::bye(Phase::Swiss, 1, id(1));
    commit(
        &t,
        vec![
            Write::CreateMatch(bye.clone()),
            Write::AdjustStanding {
                player: id(1),
                wins: 1,
                losses: 0,
            },
        ],
    );

    delete_match(&t, bye.id).unwrap();
    assert_eq!(standing(&t, id(1)), (0, 0, 0));
}

#[test]
fn rollback_below_zero_is_rejected_atomically() {
    let t = tournament_with_players(4);
    // Winner recorded without the standings to back it.
    let mut m = Match::new(Phase::Swiss, 1, id(1), id(2));
    m.winner = Some(id(1));
    commit(&t, vec![Write::CreateMatch(m.clone())]);

    let err = delete_match(&t, m.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);
    assert!(t.store().find_match(m.id).unwrap().is_some());
}

#[test]
fn stale_base_version_is_a_retryable_conflict() {
    let t = tournament_with_players(4);
    let m = add_match(&t, Phase::Swiss, 1, id(1), id(2));
    let stale = t.store().version().unwrap();
    add_match(&t, Phase::Swiss, 1, id(3), id(4));

    let mut tx = swiss_knockout_web::Transaction::new(stale);
    tx.push(Write::SetWinner {
        match_id: m.id,
        winner: id(1),
    });
    let err: TournamentError = t.store().commit(tx).unwrap_err().into();
    assert!(err.is_retryable());
    assert_eq!(t.store().find_match(m.id).unwrap().unwrap().winner, None);
}
