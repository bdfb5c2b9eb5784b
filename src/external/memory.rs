//! In-memory stand-in for the remote raffle store, used by the service unit
//! tests. Mirrors the store's observable behavior: server-assigned ids,
//! exact-match winner deletes, and flag restoration on winner removal.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppError, AppResult};
use crate::models::{
    CreatePrizeRequest, CreateWinnerRequest, DeleteWinnerRequest, Participant, Prize,
    UpdateParticipantRequest, UpdatePrizeRequest, Winner,
};

use super::store::{NewParticipant, RaffleStore};

#[derive(Default)]
struct Tables {
    participants: Vec<Participant>,
    prizes: Vec<Prize>,
    winners: Vec<Winner>,
    next_participant_id: i64,
    next_prize_id: i64,
    next_winner_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    pub fail_create_winner: AtomicBool,
    pub fail_list_winners: AtomicBool,
    pub fail_update_prize: AtomicBool,
    pub fail_update_participant: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_participant(&self, name: &str, cedula: &str, ticket: Option<&str>) -> Participant {
        let mut tables = self.tables.lock().unwrap();
        tables.next_participant_id += 1;
        let participant = Participant {
            id_participant: tables.next_participant_id,
            name: name.to_string(),
            cedula: cedula.to_string(),
            ticket_number: ticket.map(|t| t.to_string()),
            mesa: None,
            active: true,
        };
        tables.participants.push(participant.clone());
        participant
    }

    pub fn seed_prize(&self, name: &str, range_start: i64, range_end: i64) -> Prize {
        let mut tables = self.tables.lock().unwrap();
        tables.next_prize_id += 1;
        let prize = Prize {
            id_prize: tables.next_prize_id,
            name: name.to_string(),
            range_start,
            range_end,
            sorteado: false,
        };
        tables.prizes.push(prize.clone());
        prize
    }

    pub fn stored_participants(&self) -> Vec<Participant> {
        self.tables.lock().unwrap().participants.clone()
    }

    pub fn stored_prizes(&self) -> Vec<Prize> {
        self.tables.lock().unwrap().prizes.clone()
    }

    pub fn stored_winners(&self) -> Vec<Winner> {
        self.tables.lock().unwrap().winners.clone()
    }

    fn failing(flag: &AtomicBool, context: &str) -> AppResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(AppError::ExternalApiError(format!(
                "{context}: injected failure"
            )));
        }
        Ok(())
    }
}

impl RaffleStore for MemoryStore {
    async fn list_participants(&self) -> AppResult<Vec<Participant>> {
        Ok(self.stored_participants())
    }

    async fn create_participant(&self, participant: &NewParticipant) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.next_participant_id += 1;
        let id = tables.next_participant_id;
        tables.participants.push(Participant {
            id_participant: id,
            name: participant.name.clone(),
            cedula: participant.cedula.clone(),
            ticket_number: participant.ticket_number.clone(),
            mesa: participant.mesa.clone(),
            active: participant.active,
        });
        Ok(())
    }

    async fn bulk_create_participants(
        &self,
        participants: &[NewParticipant],
    ) -> AppResult<Vec<Participant>> {
        let mut created = Vec::with_capacity(participants.len());
        let mut tables = self.tables.lock().unwrap();
        for participant in participants {
            tables.next_participant_id += 1;
            let record = Participant {
                id_participant: tables.next_participant_id,
                name: participant.name.clone(),
                cedula: participant.cedula.clone(),
                ticket_number: participant.ticket_number.clone(),
                mesa: participant.mesa.clone(),
                active: participant.active,
            };
            tables.participants.push(record.clone());
            created.push(record);
        }
        Ok(created)
    }

    async fn update_participant(&self, update: &UpdateParticipantRequest) -> AppResult<()> {
        Self::failing(&self.fail_update_participant, "update participant")?;
        let mut tables = self.tables.lock().unwrap();
        let participant = tables
            .participants
            .iter_mut()
            .find(|p| p.id_participant == update.id_participant)
            .ok_or_else(|| AppError::ExternalApiError("participant not found".to_string()))?;
        if let Some(name) = &update.name {
            participant.name = name.clone();
        }
        if let Some(cedula) = &update.cedula {
            participant.cedula = cedula.clone();
        }
        if let Some(ticket) = &update.ticket_number {
            participant.ticket_number = if ticket.is_empty() {
                None
            } else {
                Some(ticket.clone())
            };
        }
        if let Some(mesa) = &update.mesa {
            participant.mesa = Some(mesa.clone());
        }
        if let Some(active) = update.active {
            participant.active = active;
        }
        Ok(())
    }

    async fn delete_participant(&self, id_participant: i64) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .participants
            .retain(|p| p.id_participant != id_participant);
        Ok(())
    }

    async fn list_prizes(&self) -> AppResult<Vec<Prize>> {
        Ok(self.stored_prizes())
    }

    async fn create_prize(&self, prize: &CreatePrizeRequest) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.next_prize_id += 1;
        let id = tables.next_prize_id;
        tables.prizes.push(Prize {
            id_prize: id,
            name: prize.name.clone(),
            range_start: prize.range_start,
            range_end: prize.range_end,
            sorteado: false,
        });
        Ok(())
    }

    async fn bulk_create_prizes(&self, prizes: &[CreatePrizeRequest]) -> AppResult<Vec<Prize>> {
        let mut created = Vec::with_capacity(prizes.len());
        let mut tables = self.tables.lock().unwrap();
        for prize in prizes {
            tables.next_prize_id += 1;
            let record = Prize {
                id_prize: tables.next_prize_id,
                name: prize.name.clone(),
                range_start: prize.range_start,
                range_end: prize.range_end,
                sorteado: false,
            };
            tables.prizes.push(record.clone());
            created.push(record);
        }
        Ok(created)
    }

    async fn update_prize(&self, update: &UpdatePrizeRequest) -> AppResult<()> {
        Self::failing(&self.fail_update_prize, "update prize")?;
        let mut tables = self.tables.lock().unwrap();
        let prize = tables
            .prizes
            .iter_mut()
            .find(|p| p.id_prize == update.id_prize)
            .ok_or_else(|| AppError::ExternalApiError("prize not found".to_string()))?;
        if let Some(name) = &update.name {
            prize.name = name.clone();
        }
        if let Some(range_start) = update.range_start {
            prize.range_start = range_start;
        }
        if let Some(range_end) = update.range_end {
            prize.range_end = range_end;
        }
        if let Some(sorteado) = update.sorteado {
            prize.sorteado = sorteado;
        }
        Ok(())
    }

    async fn delete_prize(&self, id_prize: i64) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.prizes.retain(|p| p.id_prize != id_prize);
        Ok(())
    }

    async fn list_winners(&self) -> AppResult<Vec<Winner>> {
        Self::failing(&self.fail_list_winners, "list winners")?;
        Ok(self.stored_winners())
    }

    async fn create_winner(&self, winner: &CreateWinnerRequest) -> AppResult<Winner> {
        Self::failing(&self.fail_create_winner, "create winner")?;
        let mut tables = self.tables.lock().unwrap();
        let participant_name;
        let ticket_number;
        {
            let participant = tables
                .participants
                .iter()
                .find(|p| p.id_participant == winner.id_participant)
                .ok_or_else(|| AppError::ExternalApiError("participant not found".to_string()))?;
            participant_name = participant.name.clone();
            ticket_number = participant.ticket_number.clone().unwrap_or_default();
        }
        let prize_name = tables
            .prizes
            .iter()
            .find(|p| p.id_prize == winner.id_prize)
            .map(|p| p.name.clone())
            .ok_or_else(|| AppError::ExternalApiError("prize not found".to_string()))?;
        tables.next_winner_id += 1;
        let record = Winner {
            id_winner: tables.next_winner_id,
            id_prize: winner.id_prize,
            id_participant: winner.id_participant,
            participant_name,
            ticket_number,
            prize_name,
            drawdate: winner.drawdate,
        };
        tables.winners.push(record.clone());
        Ok(record)
    }

    async fn delete_winner(&self, request: &DeleteWinnerRequest) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.winners.len();
        tables.winners.retain(|w| {
            !(w.id_winner == request.id_winner
                && w.id_prize == request.id_prize
                && w.id_participant == request.id_participant
                && w.drawdate == request.drawdate)
        });
        if tables.winners.len() == before {
            return Err(AppError::ExternalApiError(
                "delete winner failed: status 404".to_string(),
            ));
        }
        // The store restores the pair when a winner record is removed
        for prize in tables.prizes.iter_mut() {
            if prize.id_prize == request.id_prize {
                prize.sorteado = false;
            }
        }
        for participant in tables.participants.iter_mut() {
            if participant.id_participant == request.id_participant {
                participant.active = true;
            }
        }
        Ok(())
    }

    async fn delete_all_winners(&self) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.winners.clear();
        for prize in tables.prizes.iter_mut() {
            prize.sorteado = false;
        }
        for participant in tables.participants.iter_mut() {
            participant.active = true;
        }
        Ok(())
    }

    async fn wipe_all(&self) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.participants.clear();
        tables.prizes.clear();
        tables.winners.clear();
        Ok(())
    }
}
