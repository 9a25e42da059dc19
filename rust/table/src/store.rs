use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::{Duration, Instant};

use felt_ai::StrategyKind;
use felt_engine::game::GameSnapshot;
use felt_engine::logger::HandRecord;
use felt_engine::player::PlayerAction;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::settings::TableSettings;
use crate::table::{BotDecision, GameOptions, Table};

pub type GameId = String;

/// The seat a human caller plays in games built by [`GameStore::create_game`].
pub const HUMAN_SEAT: usize = 0;

/// Id-keyed set of running games. Each game sits behind its own mutex, so
/// actions on one game are serialized while independent games proceed in
/// parallel.
#[derive(Debug)]
pub struct GameStore {
    games: RwLock<HashMap<GameId, Arc<GameSession>>>,
    settings: TableSettings,
    ttl: Duration,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(TableSettings::default())
    }
}

impl GameStore {
    pub fn new(settings: TableSettings) -> Self {
        let ttl = settings.session_timeout();
        Self {
            games: RwLock::new(HashMap::new()),
            settings,
            ttl,
        }
    }

    pub fn with_ttl(settings: TableSettings, ttl: Duration) -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
            settings,
            ttl,
        }
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    /// Create a game with a human in seat 0 and one bot per policy after it.
    pub fn create_game(
        &self,
        seat_count: usize,
        policies: &[StrategyKind],
    ) -> Result<(GameId, GameSnapshot), StoreError> {
        if policies.len() + 1 != seat_count {
            return Err(StoreError::InvalidRequest(format!(
                "{seat_count} seats need {} opponent policies, got {}",
                seat_count.saturating_sub(1),
                policies.len()
            )));
        }
        self.create_game_with(GameOptions::human_vs(policies, &self.settings))
    }

    pub fn create_game_with(
        &self,
        options: GameOptions,
    ) -> Result<(GameId, GameSnapshot), StoreError> {
        let id = Uuid::new_v4().to_string();
        let table = Table::new(&options)?;
        let viewer = human_viewer(&table);
        let snapshot = table.snapshot(viewer);

        tracing::info!(
            game_id = %id,
            seats = options.seats.len(),
            seed = table.game().seed(),
            "created game"
        );

        let session = Arc::new(GameSession::new(table));
        {
            let mut guard = self
                .games
                .write()
                .map_err(|_| StoreError::StoragePoisoned)?;
            guard.insert(id.clone(), session);
        }
        Ok((id, snapshot))
    }

    /// Apply a human seat's action and play the bots that follow it.
    /// Rejections leave the game unchanged.
    pub fn submit_action(
        &self,
        id: &GameId,
        seat: usize,
        action: PlayerAction,
    ) -> Result<GameSnapshot, StoreError> {
        let session = self.live_session(id)?;
        let mut table = session.lock()?;
        let hands_before = table.history().len();

        if let Err(e) = table.act(seat, action) {
            if e.is_recoverable() {
                tracing::warn!(game_id = %id, seat, ?action, error = %e, "rejected action");
            } else {
                tracing::error!(game_id = %id, seat, error = %e, "game aborted");
            }
            return Err(e.into());
        }
        tracing::debug!(game_id = %id, seat, ?action, "applied action");
        log_completed(id, &table.history()[hands_before..]);
        Ok(table.snapshot(Some(seat)))
    }

    /// Deal the next hand once the current one is resolved.
    pub fn advance_to_next_hand(&self, id: &GameId) -> Result<GameSnapshot, StoreError> {
        let session = self.live_session(id)?;
        let mut table = session.lock()?;
        let hands_before = table.history().len();

        if let Err(e) = table.next_hand() {
            if !e.is_recoverable() {
                tracing::error!(game_id = %id, error = %e, "game aborted");
            }
            return Err(e.into());
        }
        tracing::debug!(
            game_id = %id,
            hand_number = table.game().hand_number(),
            "started hand"
        );
        log_completed(id, &table.history()[hands_before..]);
        Ok(table.snapshot(human_viewer(&table)))
    }

    pub fn snapshot(&self, id: &GameId, viewer: Option<usize>) -> Result<GameSnapshot, StoreError> {
        let session = self.live_session(id)?;
        let table = session.lock()?;
        Ok(table.snapshot(viewer))
    }

    pub fn hand_history(&self, id: &GameId) -> Result<Vec<HandRecord>, StoreError> {
        let session = self.live_session(id)?;
        let table = session.lock()?;
        Ok(table.history().to_vec())
    }

    /// Bot decisions, with rationale, from the current or last finished hand.
    pub fn bot_decisions(&self, id: &GameId) -> Result<Vec<BotDecision>, StoreError> {
        let session = self.live_session(id)?;
        let table = session.lock()?;
        Ok(table.decisions().to_vec())
    }

    pub fn delete_game(&self, id: &GameId) -> Result<(), StoreError> {
        let removed = self
            .games
            .write()
            .map_err(|_| StoreError::StoragePoisoned)?
            .remove(id);
        match removed {
            Some(_) => {
                tracing::info!(game_id = %id, "deleted game");
                Ok(())
            }
            None => Err(StoreError::NotFound(id.clone())),
        }
    }

    /// Drop every game idle for longer than the timeout. Returns how many
    /// were evicted.
    pub fn cleanup_expired_games(&self) -> usize {
        let mut expired = Vec::new();
        {
            let mut guard = match self.games.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.retain(|id, session| {
                if session.is_expired(self.ttl) {
                    expired.push(id.clone());
                    false
                } else {
                    true
                }
            });
        }
        for id in &expired {
            tracing::info!(game_id = %id, "evicted idle game");
        }
        expired.len()
    }

    pub fn active_games(&self) -> Vec<GameId> {
        match self.games.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn get_session(&self, id: &GameId) -> Result<Arc<GameSession>, StoreError> {
        let guard = self.games.read().map_err(|_| StoreError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Look up a game, evicting it instead if it has been idle too long.
    fn live_session(&self, id: &GameId) -> Result<Arc<GameSession>, StoreError> {
        let session = self.get_session(id)?;
        if session.is_expired(self.ttl) {
            if let Ok(mut guard) = self.games.write() {
                guard.remove(id);
            }
            tracing::info!(game_id = %id, "evicted idle game");
            return Err(StoreError::Expired(id.clone()));
        }
        session.touch();
        Ok(session)
    }

    #[cfg(test)]
    fn session(&self, id: &GameId) -> Arc<GameSession> {
        match self.get_session(id) {
            Ok(session) => session,
            Err(e) => panic!("missing session: {e}"),
        }
    }
}

/// Parse a comma-separated policy list such as `"conservative,bluffer"`.
pub fn parse_policies(list: &str) -> Result<Vec<StrategyKind>, StoreError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<StrategyKind>().map_err(StoreError::from))
        .collect()
}

fn human_viewer(table: &Table) -> Option<usize> {
    (!table.is_bot(HUMAN_SEAT)).then_some(HUMAN_SEAT)
}

fn log_completed(id: &GameId, records: &[HandRecord]) {
    for record in records {
        tracing::info!(
            game_id = %id,
            hand_number = record.hand_number,
            winners = ?record.result.winners,
            "hand complete"
        );
    }
}

#[derive(Debug)]
struct GameSession {
    table: Mutex<Table>,
    last_active: Mutex<Instant>,
}

impl GameSession {
    fn new(table: Table) -> Self {
        Self {
            table: Mutex::new(table),
            last_active: Mutex::new(Instant::now()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, StoreError> {
        self.table.lock().map_err(|_| StoreError::StoragePoisoned)
    }

    fn touch(&self) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = Instant::now();
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        match self.last_active.lock() {
            Ok(last) => last.elapsed() >= ttl,
            Err(_) => false,
        }
    }

    #[cfg(test)]
    fn force_last_active(&self, instant: Instant) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = instant;
        }
    }
}
