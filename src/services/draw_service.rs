use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use futures_util::join;
use rand::Rng;

use crate::error::{AppError, AppResult};
use crate::external::RaffleStore;
use crate::models::{
    CreateWinnerRequest, DrawResultResponse, NextDrawResponse, Participant, Prize,
    UpdateParticipantRequest, UpdatePrizeRequest, Winner,
};
use crate::services::SessionCache;
use crate::utils::extract_ticket_number;

/// Computes the subset of participants eligible for a prize: those whose
/// extracted ticket number falls inside `[range_start, range_end]` inclusive.
/// Eligibility keys purely on range membership; the `active` flag is not
/// consulted (the `sorteado` guard already prevents a prize from being drawn
/// twice). Pure and order-independent.
pub fn eligible_participants(prize: &Prize, participants: &[Participant]) -> Vec<Participant> {
    participants
        .iter()
        .filter(
            |p| match extract_ticket_number(p.ticket_number.as_deref()) {
                Some(n) => n >= prize.range_start && n <= prize.range_end,
                None => false,
            },
        )
        .cloned()
        .collect()
}

/// Picks one participant uniformly at random from the eligible set.
pub fn select_winner(prize: &Prize, eligible: &[Participant]) -> AppResult<Participant> {
    if eligible.is_empty() {
        return Err(AppError::NoEligibleParticipants(
            prize.range_start,
            prize.range_end,
        ));
    }
    let index = rand::thread_rng().gen_range(0..eligible.len());
    Ok(eligible[index].clone())
}

/// Orchestrates the lifecycle of a single draw:
/// Idle -> Validating -> Animating -> Finalizing -> Idle.
///
/// A single in-flight flag serializes draws; a request arriving while one is
/// animating or finalizing is rejected, not queued. Validation failures
/// return to Idle without entering the animation. On success the chosen
/// (prize, participant) pair is frozen before the animation starts and stays
/// authoritative for the rest of the draw regardless of cache changes.
pub struct DrawService<S> {
    store: Arc<S>,
    cache: Arc<SessionCache>,
    animation: Duration,
    in_flight: Arc<AtomicBool>,
}

impl<S> Clone for DrawService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
            animation: self.animation,
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<S: RaffleStore> DrawService<S> {
    pub fn new(store: Arc<S>, cache: Arc<SessionCache>, animation_ms: u64) -> Self {
        Self {
            store,
            cache,
            animation: Duration::from_millis(animation_ms),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared handle to the in-flight flag, used to quiesce participant
    /// updates (ticket registration) while a draw is running.
    pub fn in_flight_flag(&self) -> Arc<AtomicBool> {
        self.in_flight.clone()
    }

    /// Runs a full draw for the given prize and returns the optimistic
    /// reveal. The reveal is returned as soon as the animation window closes;
    /// persistence continues on a background task and is never awaited here.
    pub async fn draw(&self, id_prize: i64) -> AppResult<DrawResultResponse> {
        if self.in_flight.load(Ordering::SeqCst) {
            return Err(AppError::DrawInProgress);
        }

        let prize = self
            .cache
            .find_prize(id_prize)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Premio {id_prize} no encontrado")))?;

        if prize.sorteado {
            return Err(AppError::PrizeAlreadyDrawn(prize.name));
        }

        let participants = self.cache.participants().await;
        if eligible_participants(&prize, &participants).is_empty() {
            return Err(AppError::NoEligibleParticipants(
                prize.range_start,
                prize.range_end,
            ));
        }

        // Idle -> Validating: claim the single in-flight slot
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::DrawInProgress);
        }

        // Eligibility is re-evaluated at the moment of draw, never cached
        let participants = self.cache.participants().await;
        let eligible = eligible_participants(&prize, &participants);
        let participant = match select_winner(&prize, &eligible) {
            Ok(participant) => participant,
            Err(e) => {
                self.in_flight.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        log::info!(
            "Draw started: prize \"{}\" (id {}), frozen winner participant id {}",
            prize.name,
            prize.id_prize,
            participant.id_participant
        );

        // Animating: fixed minimum duration before the reveal, not cancellable
        tokio::time::sleep(self.animation).await;

        // Finalizing: construct the optimistic winner from the frozen snapshot
        let winner = Winner {
            id_winner: 0,
            id_prize: prize.id_prize,
            id_participant: participant.id_participant,
            participant_name: participant.name.clone(),
            ticket_number: participant.ticket_number.clone().unwrap_or_default(),
            prize_name: prize.name.clone(),
            drawdate: Utc::now(),
        };

        // Persistence runs in the background; the reveal never waits for it
        let service = self.clone();
        let frozen_prize = prize.clone();
        let frozen_participant = participant.clone();
        let optimistic = winner.clone();
        tokio::spawn(async move {
            service
                .reconcile(frozen_prize, frozen_participant, optimistic)
                .await;
        });

        self.in_flight.store(false, Ordering::SeqCst);

        Ok(DrawResultResponse {
            winner,
            confirmed: false,
        })
    }

    /// After closing a reveal, draws the first remaining un-drawn prize that
    /// currently has an eligible participant, in display order.
    pub async fn draw_next(&self) -> AppResult<NextDrawResponse> {
        let prizes = self.cache.prizes().await;
        let participants = self.cache.participants().await;

        let next = prizes
            .iter()
            .find(|p| !p.sorteado && !eligible_participants(p, &participants).is_empty());

        match next {
            Some(prize) => {
                let result = self.draw(prize.id_prize).await?;
                Ok(NextDrawResponse::Drawn {
                    winner: result.winner,
                    confirmed: result.confirmed,
                })
            }
            None => {
                let remaining = prizes.iter().filter(|p| !p.sorteado).count();
                if remaining > 0 {
                    Ok(NextDrawResponse::NoneEligible {
                        remaining_prizes: remaining,
                    })
                } else {
                    Ok(NextDrawResponse::Complete)
                }
            }
        }
    }

    /// Applies a finalized draw against the store:
    /// 1. register the winner record;
    /// 2. read-repair the winner list regardless of step 1, keeping the
    ///    confirmed record when the re-fetch fails;
    /// 3. flip the prize/participant flags remotely and mirror them in the
    ///    cache only when BOTH updates succeed.
    /// Failures are logged and surfaced as warnings; the optimistic reveal
    /// already shown is never rolled back.
    async fn reconcile(&self, prize: Prize, participant: Participant, optimistic: Winner) {
        let request = CreateWinnerRequest {
            id_prize: prize.id_prize,
            id_participant: participant.id_participant,
            drawdate: optimistic.drawdate,
        };
        let confirmed = match self.store.create_winner(&request).await {
            Ok(mut confirmed) => {
                // Keep the local display fields when the store omits them
                if confirmed.participant_name.is_empty() {
                    confirmed.participant_name = optimistic.participant_name.clone();
                }
                if confirmed.ticket_number.is_empty() {
                    confirmed.ticket_number = optimistic.ticket_number.clone();
                }
                if confirmed.prize_name.is_empty() {
                    confirmed.prize_name = optimistic.prize_name.clone();
                }
                log::info!(
                    "Winner registered with store: id_winner {}",
                    confirmed.id_winner
                );
                Some(confirmed)
            }
            Err(e) => {
                log::error!("Failed to register winner with store (local reveal stands): {e}");
                None
            }
        };

        let reloaded = self.cache.reload_winners(self.store.as_ref()).await;
        // A failed read-repair must not lose the record the store confirmed
        if let Some(confirmed) = confirmed
            && !reloaded.iter().any(|w| w.id_winner == confirmed.id_winner)
        {
            self.cache.append_winner(confirmed).await;
        }

        let prize_update = UpdatePrizeRequest {
            id_prize: prize.id_prize,
            name: None,
            range_start: None,
            range_end: None,
            sorteado: Some(true),
        };
        let participant_update = UpdateParticipantRequest {
            id_participant: participant.id_participant,
            name: None,
            cedula: None,
            ticket_number: None,
            mesa: None,
            active: Some(false),
        };
        let (prize_result, participant_result) = join!(
            self.store.update_prize(&prize_update),
            self.store.update_participant(&participant_update)
        );

        match (&prize_result, &participant_result) {
            (Ok(()), Ok(())) => {
                self.cache
                    .mark_drawn(prize.id_prize, participant.id_participant)
                    .await;
                log::info!(
                    "Sorteo realizado: {} ha ganado \"{}\"",
                    participant.name,
                    prize.name
                );
            }
            _ => {
                // The winner record may already exist server-side even though
                // the flags did not update; the operator must verify manually.
                log::warn!(
                    "Partial draw reconciliation for prize {} / participant {}: \
                     prize update {:?}, participant update {:?}. Manual verification needed.",
                    prize.id_prize,
                    participant.id_participant,
                    prize_result.as_ref().err(),
                    participant_result.as_ref().err()
                );
            }
        }
    }
}
