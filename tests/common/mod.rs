//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;
use swiss_knockout_web::{
    Match, MatchId, MemoryStore, Phase, Player, PlayerId, RecordStore, StoreError, Tournament,
    Transaction, Write,
};
use uuid::Uuid;

pub fn id(n: u128) -> PlayerId {
    Uuid::from_u128(n)
}

pub fn player(n: u128, department: u32) -> Player {
    Player {
        id: id(n),
        name: format!("P{n}"),
        department,
        points: 0,
        wins: 0,
        losses: 0,
    }
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn commit(t: &Tournament<MemoryStore>, writes: Vec<Write>) {
    let mut tx = Transaction::new(t.store().version().unwrap());
    tx.writes = writes;
    t.store().commit(tx).unwrap();
}

/// Players `1..=n`, departments alternating 1 and 2.
pub fn tournament_with_players(n: u128) -> Tournament<MemoryStore> {
    let t = Tournament::new(MemoryStore::new());
    commit(
        &t,
        (1..=n)
            .map(|i| Write::CreatePlayer(player(i, (i % 2) as u32 + 1)))
            .collect(),
    );
    t
}

pub fn set_record(t: &Tournament<MemoryStore>, player: PlayerId, wins: i32, losses: i32) {
    commit(
        t,
        vec![Write::AdjustStanding {
            player,
            wins,
            losses,
        }],
    );
}

/// Insert an undecided match directly.
pub fn add_match(
    t: &Tournament<MemoryStore>,
    phase: Phase,
    round: u32,
    a: PlayerId,
    b: PlayerId,
) -> Match {
    let m = Match::new(phase, round, a, b);
    commit(t, vec![Write::CreateMatch(m.clone())]);
    m
}

pub fn get(t: &Tournament<MemoryStore>, player: PlayerId) -> Player {
    t.store().find_player(player).unwrap().unwrap()
}

pub fn standing(t: &Tournament<MemoryStore>, player: PlayerId) -> (u32, u32, u32) {
    let p = get(t, player);
    (p.wins, p.losses, p.points)
}

/// A decided Swiss match that leaves standings untouched, so the Swiss stage counts as played.
pub fn played_swiss(t: &Tournament<MemoryStore>) {
    let mut m = Match::new(Phase::Swiss, 1, id(1), id(2));
    m.winner = Some(id(1));
    commit(t, vec![Write::CreateMatch(m)]);
}

/// A store that lets another writer sneak in one match right after `max_round` is read.
#[derive(Debug, Default)]
pub struct RacingStore {
    pub inner: MemoryStore,
    pub sneak_in: Mutex<Option<Match>>,
}

impl RacingStore {
    pub fn with_players(n: u128) -> Self {
        let store = Self::default();
        let mut tx = Transaction::new(0);
        for i in 1..=n {
            tx.push(Write::CreatePlayer(player(i, (i % 2) as u32 + 1)));
        }
        store.inner.commit(tx).unwrap();
        store
    }

    pub fn apply(&self, writes: Vec<Write>) {
        let mut tx = Transaction::new(self.inner.version().unwrap());
        tx.writes = writes;
        self.inner.commit(tx).unwrap();
    }
}

impl RecordStore for RacingStore {
    fn version(&self) -> Result<u64, StoreError> {
        self.inner.version()
    }

    fn all_players(&self) -> Result<Vec<Player>, StoreError> {
        self.inner.all_players()
    }

    fn find_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        self.inner.find_player(id)
    }

    fn find_active_players(&self) -> Result<Vec<Player>, StoreError> {
        self.inner.find_active_players()
    }

    fn find_qualified_players(&self) -> Result<Vec<Player>, StoreError> {
        self.inner.find_qualified_players()
    }

    fn find_unqualified_players(&self) -> Result<Vec<Player>, StoreError> {
        self.inner.find_unqualified_players()
    }

    fn find_match(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        self.inner.find_match(id)
    }

    fn all_matches(&self) -> Result<Vec<Match>, StoreError> {
        self.inner.all_matches()
    }

    fn latest_match(&self) -> Result<Option<Match>, StoreError> {
        self.inner.latest_match()
    }

    fn find_matches(&self, phase: Phase) -> Result<Vec<Match>, StoreError> {
        self.inner.find_matches(phase)
    }

    fn find_matches_in_round(&self, phase: Phase, round: u32) -> Result<Vec<Match>, StoreError> {
        self.inner.find_matches_in_round(phase, round)
    }

    fn count_matches(&self, phase: Phase) -> Result<usize, StoreError> {
        self.inner.count_matches(phase)
    }

    fn count_matches_in_round(&self, phase: Phase, round: u32) -> Result<usize, StoreError> {
        self.inner.count_matches_in_round(phase, round)
    }

    fn count_open_matches(&self, phase: Phase) -> Result<usize, StoreError> {
        self.inner.count_open_matches(phase)
    }

    fn count_matches_for_player(&self, player: PlayerId) -> Result<usize, StoreError> {
        self.inner.count_matches_for_player(player)
    }

    fn max_round(&self, phase: Phase) -> Result<Option<u32>, StoreError> {
        let round = self.inner.max_round(phase)?;
        if let Some(m) = self.sneak_in.lock().unwrap().take() {
            self.apply(vec![Write::CreateMatch(m)]);
        }
        Ok(round)
    }

    fn commit(&self, tx: Transaction) -> Result<(), StoreError> {
        self.inner.commit(tx)
    }
}
