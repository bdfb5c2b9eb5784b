use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A draw outcome record. `id_winner` is server-assigned; 0 is the transient
/// client-local placeholder before the store confirms.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Winner {
    pub id_winner: i64,
    pub id_prize: i64,
    pub id_participant: i64,
    /// Denormalized display fields, kept for read convenience
    pub participant_name: String,
    pub ticket_number: String,
    pub prize_name: String,
    pub drawdate: DateTime<Utc>,
}

/// Wire payload for registering a winner with the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWinnerRequest {
    pub id_prize: i64,
    pub id_participant: i64,
    pub drawdate: DateTime<Utc>,
}

/// Single-winner delete is an exact-match on the full tuple, not just the id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteWinnerRequest {
    pub id_winner: i64,
    pub id_prize: i64,
    pub id_participant: i64,
    pub drawdate: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FullResetRequest {
    /// Must match the confirmation keyword ("Reiniciar") exactly
    pub keyword: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatisticsResponse {
    pub total_prizes: usize,
    pub prizes_available: usize,
    pub total_participants: usize,
    /// Ticketed participants without a recorded win
    pub attendees: usize,
    /// Ticketed participants present in the winner history
    pub winners: usize,
    /// Participants with no ticket number
    pub non_attendees: usize,
}
