use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::external::RaffleStore;
use crate::models::{Participant, Prize, Winner};

/// In-memory session cache of the three entity lists. The remote store owns
/// the data; every mutation eagerly refreshes the affected list so the cache
/// never diverges for longer than one round-trip. Constructed once per
/// process and shared by all services.
pub struct SessionCache {
    participants: RwLock<Vec<Participant>>,
    prizes: RwLock<Vec<Prize>>,
    winners: RwLock<Vec<Winner>>,
    /// Serializes winner-list reloads; concurrent requests are dropped
    reloading_winners: AtomicBool,
}

impl SessionCache {
    pub fn new() -> Self {
        Self {
            participants: RwLock::new(Vec::new()),
            prizes: RwLock::new(Vec::new()),
            winners: RwLock::new(Vec::new()),
            reloading_winners: AtomicBool::new(false),
        }
    }

    /// Fills all three lists from the store. Used at startup.
    pub async fn warm<S: RaffleStore>(&self, store: &S) -> AppResult<()> {
        let participants = store.list_participants().await?;
        let prizes = store.list_prizes().await?;
        let winners = store.list_winners().await?;
        *self.participants.write().await = participants;
        *self.prizes.write().await = prizes;
        *self.winners.write().await = winners;
        Ok(())
    }

    pub async fn participants(&self) -> Vec<Participant> {
        self.participants.read().await.clone()
    }

    pub async fn prizes(&self) -> Vec<Prize> {
        self.prizes.read().await.clone()
    }

    pub async fn winners(&self) -> Vec<Winner> {
        self.winners.read().await.clone()
    }

    pub async fn find_prize(&self, id_prize: i64) -> Option<Prize> {
        self.prizes
            .read()
            .await
            .iter()
            .find(|p| p.id_prize == id_prize)
            .cloned()
    }

    pub async fn find_participant(&self, id_participant: i64) -> Option<Participant> {
        self.participants
            .read()
            .await
            .iter()
            .find(|p| p.id_participant == id_participant)
            .cloned()
    }

    pub async fn set_participants(&self, participants: Vec<Participant>) {
        *self.participants.write().await = participants;
    }

    pub async fn append_participants(&self, mut participants: Vec<Participant>) {
        self.participants.write().await.append(&mut participants);
    }

    pub async fn remove_participant(&self, id_participant: i64) {
        self.participants
            .write()
            .await
            .retain(|p| p.id_participant != id_participant);
    }

    pub async fn set_prizes(&self, prizes: Vec<Prize>) {
        *self.prizes.write().await = prizes;
    }

    pub async fn append_prizes(&self, mut prizes: Vec<Prize>) {
        self.prizes.write().await.append(&mut prizes);
    }

    pub async fn remove_prize(&self, id_prize: i64) {
        self.prizes.write().await.retain(|p| p.id_prize != id_prize);
    }

    pub async fn set_winners(&self, winners: Vec<Winner>) {
        *self.winners.write().await = winners;
    }

    pub async fn append_winner(&self, winner: Winner) {
        self.winners.write().await.push(winner);
    }

    /// Applies a completed draw to the cached pair: prize drawn, participant
    /// no longer active. Called only after BOTH remote flag updates succeed.
    pub async fn mark_drawn(&self, id_prize: i64, id_participant: i64) {
        for prize in self.prizes.write().await.iter_mut() {
            if prize.id_prize == id_prize {
                prize.sorteado = true;
            }
        }
        for participant in self.participants.write().await.iter_mut() {
            if participant.id_participant == id_participant {
                participant.active = false;
            }
        }
    }

    /// Reverts a single draw outcome on the cached pair.
    pub async fn restore_pair(&self, id_prize: i64, id_participant: i64) {
        for prize in self.prizes.write().await.iter_mut() {
            if prize.id_prize == id_prize {
                prize.sorteado = false;
            }
        }
        for participant in self.participants.write().await.iter_mut() {
            if participant.id_participant == id_participant {
                participant.active = true;
            }
        }
    }

    /// Restores every prize and participant to the pre-raffle state.
    pub async fn restore_all(&self) {
        for prize in self.prizes.write().await.iter_mut() {
            prize.sorteado = false;
        }
        for participant in self.participants.write().await.iter_mut() {
            participant.active = true;
        }
    }

    pub async fn clear_all(&self) {
        self.participants.write().await.clear();
        self.prizes.write().await.clear();
        self.winners.write().await.clear();
    }

    /// Re-fetches the winner list from the store (read-repair). Reloads are
    /// serialized by a guard; a request arriving while one is in flight is
    /// dropped and the current cache returned. On fetch failure the cache
    /// defaults to empty rather than keeping possibly-stale entries.
    pub async fn reload_winners<S: RaffleStore>(&self, store: &S) -> Vec<Winner> {
        if self
            .reloading_winners
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("Winner reload already in flight, dropping request");
            return self.winners().await;
        }
        let winners = match store.list_winners().await {
            Ok(winners) => winners,
            Err(e) => {
                log::warn!("Failed to reload winners, defaulting to empty list: {e}");
                Vec::new()
            }
        };
        self.set_winners(winners.clone()).await;
        self.reloading_winners.store(false, Ordering::SeqCst);
        winners
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}
