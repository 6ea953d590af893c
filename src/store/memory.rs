//! In-memory record store guarded by a single `RwLock`.

use super::{RecordStore, StoreError, Transaction, Write};
use crate::models::{cmp_record, cmp_standing, Match, MatchId, Phase, Player, PlayerId};
use std::sync::{RwLock, RwLockReadGuard};

#[derive(Clone, Debug, Default)]
struct Records {
    version: u64,
    players: Vec<Player>,
    matches: Vec<Match>,
}

impl Records {
    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, StoreError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::MissingPlayer(id))
    }

    fn match_mut(&mut self, id: MatchId) -> Result<&mut Match, StoreError> {
        self.matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::MissingMatch(id))
    }

    fn has_player(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    fn apply(&mut self, write: Write) -> Result<(), StoreError> {
        match write {
            Write::CreatePlayer(player) => {
                if self.has_player(player.id) {
                    return Err(StoreError::DuplicatePlayer(player.id));
                }
                self.players.push(player);
            }
            Write::DeletePlayer(id) => {
                if self.matches.iter().any(|m| m.involves(id)) {
                    return Err(StoreError::PlayerReferenced(id));
                }
                let idx = self
                    .players
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or(StoreError::MissingPlayer(id))?;
                self.players.remove(idx);
            }
            Write::CreateMatch(m) => {
                for id in std::iter::once(m.player1).chain(m.player2) {
                    if !self.has_player(id) {
                        return Err(StoreError::MissingPlayer(id));
                    }
                }
                self.matches.push(m);
            }
            Write::SetWinner { match_id, winner } => {
                self.match_mut(match_id)?.winner = Some(winner);
            }
            Write::AdjustStanding {
                player,
                wins,
                losses,
            } => {
                self.player_mut(player)?
                    .adjust(wins, losses)
                    .ok_or(StoreError::NegativeStanding(player))?;
            }
            Write::ResetStandings => self.players.iter_mut().for_each(Player::reset),
            Write::DeleteMatch(id) => {
                let idx = self
                    .matches
                    .iter()
                    .position(|m| m.id == id)
                    .ok_or(StoreError::MissingMatch(id))?;
                self.matches.remove(idx);
            }
            Write::DeleteAllMatches => self.matches.clear(),
        }
        Ok(())
    }

    fn matches_where(&self, pred: impl Fn(&Match) -> bool) -> Vec<Match> {
        let mut found: Vec<Match> = self.matches.iter().filter(|m| pred(m)).cloned().collect();
        // Stable: keeps creation order within a round.
        found.sort_by_key(|m| m.round);
        found
    }
}

/// Keeps all records in process memory. Commits are serialized by the write lock and
/// validated against the caller's base version.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>, StoreError> {
        self.records.read().map_err(|_| StoreError::Poisoned)
    }
}

impl RecordStore for MemoryStore {
    fn version(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.version)
    }

    fn all_players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.read()?.players.clone())
    }

    fn find_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        Ok(self.read()?.players.iter().find(|p| p.id == id).cloned())
    }

    fn find_active_players(&self) -> Result<Vec<Player>, StoreError> {
        let mut players: Vec<Player> = self
            .read()?
            .players
            .iter()
            .filter(|p| p.is_active())
            .cloned()
            .collect();
        players.sort_by(cmp_record);
        Ok(players)
    }

    fn find_qualified_players(&self) -> Result<Vec<Player>, StoreError> {
        let mut players: Vec<Player> = self
            .read()?
            .players
            .iter()
            .filter(|p| p.is_qualified())
            .cloned()
            .collect();
        players.sort_by(cmp_standing);
        Ok(players)
    }

    fn find_unqualified_players(&self) -> Result<Vec<Player>, StoreError> {
        let mut players: Vec<Player> = self
            .read()?
            .players
            .iter()
            .filter(|p| !p.is_qualified())
            .cloned()
            .collect();
        players.sort_by(cmp_standing);
        Ok(players)
    }

    fn find_match(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        Ok(self.read()?.matches.iter().find(|m| m.id == id).cloned())
    }

    fn all_matches(&self) -> Result<Vec<Match>, StoreError> {
        Ok(self.read()?.matches_where(|_| true))
    }

    fn latest_match(&self) -> Result<Option<Match>, StoreError> {
        Ok(self.read()?.matches.last().cloned())
    }

    fn find_matches(&self, phase: Phase) -> Result<Vec<Match>, StoreError> {
        Ok(self.read()?.matches_where(|m| m.phase == phase))
    }

    fn find_matches_in_round(&self, phase: Phase, round: u32) -> Result<Vec<Match>, StoreError> {
        Ok(self
            .read()?
            .matches_where(|m| m.phase == phase && m.round == round))
    }

    fn count_matches(&self, phase: Phase) -> Result<usize, StoreError> {
        Ok(self.read()?.matches.iter().filter(|m| m.phase == phase).count())
    }

    fn count_matches_in_round(&self, phase: Phase, round: u32) -> Result<usize, StoreError> {
        Ok(self
            .read()?
            .matches
            .iter()
            .filter(|m| m.phase == phase && m.round == round)
            .count())
    }

    fn count_open_matches(&self, phase: Phase) -> Result<usize, StoreError> {
        Ok(self
            .read()?
            .matches
            .iter()
            .filter(|m| m.phase == phase && m.is_open())
            .count())
    }

    fn count_matches_for_player(&self, player: PlayerId) -> Result<usize, StoreError> {
        Ok(self
            .read()?
            .matches
            .iter()
            .filter(|m| m.involves(player))
            .count())
    }

    fn max_round(&self, phase: Phase) -> Result<Option<u32>, StoreError> {
        Ok(self
            .read()?
            .matches
            .iter()
            .filter(|m| m.phase == phase)
            .map(|m| m.round)
            .max())
    }

    fn commit(&self, tx: Transaction) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if records.version != tx.base_version {
            return Err(StoreError::Conflict {
                expected: tx.base_version,
                found: records.version,
            });
        }
        let mut staged = records.clone();
        for write in tx.writes {
            staged.apply(write)?;
        }
        staged.version += 1;
        *records = staged;
        Ok(())
    }
}
