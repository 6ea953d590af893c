//! Setup: registering, removing, and importing players.

use crate::models::{DepartmentId, Player, PlayerId, Result, Tournament, TournamentError};
use crate::store::{RecordStore, Transaction, Write};
use serde::Deserialize;
use std::io::Read;

/// One row of a player roster CSV (`name,department`).
#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    department: DepartmentId,
}

fn new_player(name: &str, department: DepartmentId) -> Result<Player> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyPlayerName);
    }
    Ok(Player::new(name, department))
}

/// Register a player with zeroed standings.
pub fn register_player<S: RecordStore>(
    tournament: &Tournament<S>,
    name: &str,
    department: DepartmentId,
) -> Result<Player> {
    let player = new_player(name, department)?;
    let store = tournament.store();
    let mut tx = Transaction::new(store.version()?);
    tx.push(Write::CreatePlayer(player.clone()));
    store.commit(tx)?;
    log::info!("Registered {} ({})", player.name, player.id);
    Ok(player)
}

/// Remove a player that no match refers to.
pub fn remove_player<S: RecordStore>(
    tournament: &Tournament<S>,
    player_id: PlayerId,
) -> Result<()> {
    let store = tournament.store();
    let base = store.version()?;
    if store.find_player(player_id)?.is_none() {
        return Err(TournamentError::UnknownPlayer(player_id));
    }
    if store.count_matches_for_player(player_id)? > 0 {
        return Err(TournamentError::PlayerInUse(player_id));
    }
    let mut tx = Transaction::new(base);
    tx.push(Write::DeletePlayer(player_id));
    store.commit(tx)?;
    Ok(())
}

/// Register every row of a `name,department` CSV (with header) in one transaction.
pub fn import_players<S: RecordStore, R: Read>(
    tournament: &Tournament<S>,
    reader: R,
) -> Result<Vec<Player>> {
    let mut players = Vec::new();
    for row in csv::Reader::from_reader(reader).deserialize() {
        let row: RosterRow = row?;
        players.push(new_player(&row.name, row.department)?);
    }

    let store = tournament.store();
    let mut tx = Transaction::new(store.version()?);
    for p in &players {
        tx.push(Write::CreatePlayer(p.clone()));
    }
    store.commit(tx)?;
    log::info!("Imported {} players", players.len());
    Ok(players)
}
