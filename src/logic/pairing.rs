//! Greedy pairing with rematch and same-department avoidance.

use crate::models::{DepartmentId, Match, Player, PlayerId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet, VecDeque};

/// The part of a player the pairing engine looks at.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PairingPlayer {
    pub id: PlayerId,
    pub department: DepartmentId,
}

impl From<&Player> for PairingPlayer {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            department: p.department,
        }
    }
}

/// Who has already faced whom. Rebuilt from stored matches; never persisted.
#[derive(Clone, Debug, Default)]
pub struct OpponentHistory {
    opponents: HashMap<PlayerId, HashSet<PlayerId>>,
}

impl OpponentHistory {
    /// Collect opponent pairs from `matches`. Byes are skipped.
    pub fn from_matches<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Self {
        let mut history = Self::default();
        for m in matches {
            if let Some(p2) = m.player2 {
                history.record(m.player1, p2);
            }
        }
        history
    }

    pub fn record(&mut self, a: PlayerId, b: PlayerId) {
        self.opponents.entry(a).or_default().insert(b);
        self.opponents.entry(b).or_default().insert(a);
    }

    pub fn has_played(&self, a: PlayerId, b: PlayerId) -> bool {
        self.opponents.get(&a).is_some_and(|set| set.contains(&b))
    }
}

/// Result of one pairing pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pairing {
    pub pairs: Vec<(PlayerId, PlayerId)>,
    /// Left over when the pool is odd.
    pub carry: Option<PairingPlayer>,
}

/// Shuffle `players` and pair them with [`pair_in_order`].
pub fn pair<R: Rng + ?Sized>(
    players: &[PairingPlayer],
    history: &OpponentHistory,
    rng: &mut R,
) -> Pairing {
    let mut queue = players.to_vec();
    queue.shuffle(rng);
    pair_in_order(queue, history)
}

/// Pair players in the given order: the head of the queue takes the first candidate that is
///
/// 1. unplayed and from another department, else
/// 2. unplayed, else
/// 3. from another department, else
/// 4. simply next in line.
pub fn pair_in_order(players: Vec<PairingPlayer>, history: &OpponentHistory) -> Pairing {
    let mut queue: VecDeque<PairingPlayer> = players.into();
    let mut pairing = Pairing::default();

    while let Some(player) = queue.pop_front() {
        let idx = pick_partner(&queue, &player, history);
        match idx.and_then(|i| queue.remove(i)) {
            Some(partner) => pairing.pairs.push((player.id, partner.id)),
            None => pairing.carry = Some(player),
        }
    }

    pairing
}

fn pick_partner(
    queue: &VecDeque<PairingPlayer>,
    player: &PairingPlayer,
    history: &OpponentHistory,
) -> Option<usize> {
    if queue.is_empty() {
        return None;
    }
    let fresh = |c: &PairingPlayer| !history.has_played(player.id, c.id);
    let foreign = |c: &PairingPlayer| c.department != player.department;

    let tier = [
        queue.iter().position(|c| fresh(c) && foreign(c)),
        queue.iter().position(fresh),
        queue.iter().position(foreign),
    ]
    .into_iter()
    .enumerate()
    .find_map(|(tier, idx)| idx.map(|i| (tier + 1, i)));

    match tier {
        Some((tier, idx)) => {
            log::debug!("paired {} by rule {}", player.id, tier);
            Some(idx)
        }
        None => {
            log::debug!("paired {} with next in line", player.id);
            Some(0)
        }
    }
}
