use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Winner;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DrawRequest {
    pub id_prize: i64,
}

/// The optimistic reveal returned as soon as the animation window closes.
/// `confirmed` is false until the store acknowledges the winner record; the
/// reconciler merges the server-assigned fields into the winner history in
/// the background.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResultResponse {
    pub winner: Winner,
    pub confirmed: bool,
}

/// Outcome of the "draw next prize" convenience operation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextDrawResponse {
    /// The first un-drawn prize with an eligible participant was drawn
    Drawn {
        winner: Winner,
        confirmed: bool,
    },
    /// Un-drawn prizes remain but none has an eligible participant
    NoneEligible {
        remaining_prizes: usize,
    },
    /// Every prize has been drawn
    Complete,
}
