use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A raffle prize with its inclusive ticket range. `sorteado` flips true when
/// a draw completes for it and back to false when its winner is removed;
/// while true the prize is immutable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Prize {
    pub id_prize: i64,
    pub name: String,
    pub range_start: i64,
    pub range_end: i64,
    pub sorteado: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePrizeRequest {
    pub name: String,
    pub range_start: i64,
    pub range_end: i64,
}

/// Partial update; only present fields are sent to the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePrizeRequest {
    pub id_prize: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorteado: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkPrizesRequest {
    pub prizes: Vec<CreatePrizeRequest>,
}
