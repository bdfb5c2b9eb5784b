use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::external::RaffleStore;
use crate::models::{DeleteWinnerRequest, StatisticsResponse, Winner};
use crate::services::SessionCache;

/// Confirmation keyword the operator must type for a full data wipe.
const RESET_KEYWORD: &str = "Reiniciar";

/// Winner history plus the reset/undo operations: single-winner delete,
/// full history clear and the keyword-guarded wipe-everything.
pub struct WinnerService<S> {
    store: Arc<S>,
    cache: Arc<SessionCache>,
}

impl<S> Clone for WinnerService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<S: RaffleStore> WinnerService<S> {
    pub fn new(store: Arc<S>, cache: Arc<SessionCache>) -> Self {
        Self { store, cache }
    }

    pub async fn list(&self) -> Vec<Winner> {
        self.cache.winners().await
    }

    /// Guarded read-repair from the store; concurrent reloads are dropped.
    pub async fn reload(&self) -> Vec<Winner> {
        self.cache.reload_winners(self.store.as_ref()).await
    }

    /// Deletes one winner record by its id. The store requires the full
    /// recorded tuple as an exact-match key; on success the associated prize
    /// and participant are restored in the cache and the history re-fetched.
    /// On failure nothing local changes.
    pub async fn delete_winner(&self, id_winner: i64) -> AppResult<()> {
        let winner = self
            .cache
            .winners()
            .await
            .into_iter()
            .find(|w| w.id_winner == id_winner)
            .ok_or_else(|| AppError::NotFound(format!("Ganador {id_winner} no encontrado")))?;

        self.store
            .delete_winner(&DeleteWinnerRequest {
                id_winner: winner.id_winner,
                id_prize: winner.id_prize,
                id_participant: winner.id_participant,
                drawdate: winner.drawdate,
            })
            .await?;

        self.cache.reload_winners(self.store.as_ref()).await;
        self.cache
            .restore_pair(winner.id_prize, winner.id_participant)
            .await;
        log::info!(
            "Winner {} deleted, prize {} and participant {} restored",
            winner.id_winner,
            winner.id_prize,
            winner.id_participant
        );
        Ok(())
    }

    /// Clears the entire winner history and restores every prize and
    /// participant. A no-op history is still a success (idempotent).
    pub async fn clear_all(&self) -> AppResult<()> {
        self.store.delete_all_winners().await?;
        self.cache.reload_winners(self.store.as_ref()).await;
        self.cache.restore_all().await;
        log::info!("Winner history cleared, prizes and participants restored");
        Ok(())
    }

    /// Destructive delete-everything, guarded by an exact confirmation
    /// keyword. A mismatch issues no request at all.
    pub async fn full_reset(&self, keyword: &str) -> AppResult<()> {
        if keyword != RESET_KEYWORD {
            return Err(AppError::ValidationError(format!(
                "Palabra clave incorrecta. La palabra clave correcta es \"{RESET_KEYWORD}\"."
            )));
        }
        self.store.wipe_all().await?;
        self.cache.clear_all().await;
        log::info!("Full reset completed, all data wiped");
        Ok(())
    }

    /// Session statistics computed from the caches: attendees hold a ticket
    /// without a recorded win, winners hold a ticket and appear in the
    /// history, non-attendees have no ticket at all.
    pub async fn statistics(&self) -> StatisticsResponse {
        let participants = self.cache.participants().await;
        let prizes = self.cache.prizes().await;
        let winners = self.cache.winners().await;

        let winner_ids: Vec<i64> = winners.iter().map(|w| w.id_participant).collect();
        let attendees = participants
            .iter()
            .filter(|p| p.ticket_number.is_some() && !winner_ids.contains(&p.id_participant))
            .count();
        let actual_winners = participants
            .iter()
            .filter(|p| p.ticket_number.is_some() && winner_ids.contains(&p.id_participant))
            .count();
        let non_attendees = participants
            .iter()
            .filter(|p| p.ticket_number.is_none())
            .count();

        StatisticsResponse {
            total_prizes: prizes.len(),
            prizes_available: prizes.iter().filter(|p| !p.sorteado).count(),
            total_participants: participants.len(),
            attendees,
            winners: actual_winners,
            non_attendees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::memory::MemoryStore;
    use crate::models::CreateWinnerRequest;
    use chrono::Utc;

    async fn setup() -> (WinnerService<MemoryStore>, Arc<SessionCache>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(SessionCache::new());
        let service = WinnerService::new(store.clone(), cache.clone());
        (service, cache, store)
    }

    /// Seeds one completed draw directly in the store: participant inactive,
    /// prize drawn, winner recorded.
    async fn seed_completed_draw(store: &MemoryStore) -> Winner {
        let participant = store.seed_participant("Ana", "1234567890", Some("005"));
        let prize = store.seed_prize("Cena para dos", 1, 10);
        let winner = store
            .create_winner(&CreateWinnerRequest {
                id_prize: prize.id_prize,
                id_participant: participant.id_participant,
                drawdate: Utc::now(),
            })
            .await
            .unwrap();
        store
            .update_prize(&crate::models::UpdatePrizeRequest {
                id_prize: prize.id_prize,
                name: None,
                range_start: None,
                range_end: None,
                sorteado: Some(true),
            })
            .await
            .unwrap();
        store
            .update_participant(&crate::models::UpdateParticipantRequest {
                id_participant: participant.id_participant,
                name: None,
                cedula: None,
                ticket_number: None,
                mesa: None,
                active: Some(false),
            })
            .await
            .unwrap();
        winner
    }

    #[tokio::test]
    async fn test_delete_winner_restores_pair() {
        let (service, cache, store) = setup().await;
        let winner = seed_completed_draw(&store).await;
        cache.warm(store.as_ref()).await.unwrap();

        service.delete_winner(winner.id_winner).await.unwrap();

        assert!(store.stored_winners().is_empty());
        assert!(cache.winners().await.is_empty());
        assert!(!cache.prizes().await[0].sorteado);
        assert!(cache.participants().await[0].active);
    }

    #[tokio::test]
    async fn test_delete_winner_unknown_id_is_not_found() {
        let (service, cache, store) = setup().await;
        seed_completed_draw(&store).await;
        cache.warm(store.as_ref()).await.unwrap();

        let result = service.delete_winner(999).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        // Visible failure, no local mutation
        assert_eq!(cache.winners().await.len(), 1);
        assert!(cache.prizes().await[0].sorteado);
    }

    #[tokio::test]
    async fn test_clear_all_restores_everything() {
        let (service, cache, store) = setup().await;
        seed_completed_draw(&store).await;
        cache.warm(store.as_ref()).await.unwrap();

        service.clear_all().await.unwrap();

        assert!(cache.winners().await.is_empty());
        assert!(cache.prizes().await.iter().all(|p| !p.sorteado));
        assert!(cache.participants().await.iter().all(|p| p.active));
    }

    #[tokio::test]
    async fn test_clear_all_idempotent_on_empty_history() {
        let (service, cache, store) = setup().await;
        store.seed_participant("Ana", "1234567890", Some("005"));
        store.seed_prize("Cena para dos", 1, 10);
        cache.warm(store.as_ref()).await.unwrap();

        service.clear_all().await.unwrap();

        assert!(cache.winners().await.is_empty());
        assert!(cache.prizes().await.iter().all(|p| !p.sorteado));
        assert!(cache.participants().await.iter().all(|p| p.active));
    }

    #[tokio::test]
    async fn test_full_reset_requires_exact_keyword() {
        let (service, cache, store) = setup().await;
        seed_completed_draw(&store).await;
        cache.warm(store.as_ref()).await.unwrap();

        let result = service.full_reset("reiniciar").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        // Mismatch issues no request: store and cache untouched
        assert_eq!(store.stored_participants().len(), 1);
        assert_eq!(cache.winners().await.len(), 1);

        service.full_reset("Reiniciar").await.unwrap();
        assert!(store.stored_participants().is_empty());
        assert!(store.stored_prizes().is_empty());
        assert!(cache.participants().await.is_empty());
        assert!(cache.prizes().await.is_empty());
        assert!(cache.winners().await.is_empty());
    }

    #[tokio::test]
    async fn test_reload_defaults_to_empty_on_store_failure() {
        let (service, cache, store) = setup().await;
        seed_completed_draw(&store).await;
        cache.warm(store.as_ref()).await.unwrap();
        assert_eq!(cache.winners().await.len(), 1);

        store
            .fail_list_winners
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let winners = service.reload().await;
        assert!(winners.is_empty());
        assert!(cache.winners().await.is_empty());
    }

    #[tokio::test]
    async fn test_statistics_classification() {
        let (service, cache, store) = setup().await;
        let winner = seed_completed_draw(&store).await;
        store.seed_participant("Luis", "0987654321", Some("007"));
        store.seed_participant("Marta", "1122334455", None);
        store.seed_prize("Botella de vino", 1, 10);
        cache.warm(store.as_ref()).await.unwrap();

        let stats = service.statistics().await;
        assert_eq!(stats.total_participants, 3);
        assert_eq!(stats.winners, 1);
        assert_eq!(stats.attendees, 1);
        assert_eq!(stats.non_attendees, 1);
        assert_eq!(stats.total_prizes, 2);
        assert_eq!(stats.prizes_available, 1);
        assert_eq!(winner.participant_name, "Ana");
    }
}
