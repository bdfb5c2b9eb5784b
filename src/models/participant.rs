use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A raffle participant. A participant without a ticket number is a
/// "no asistente" and can never be drawn; `active` flips to false exactly
/// while the participant holds a recorded win.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    pub id_participant: i64,
    pub name: String,
    /// National ID, unique, at most 10 digits
    pub cedula: String,
    /// 3-digit ticket ("manilla") label, unique when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
    /// Free-text table label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesa: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateParticipantRequest {
    pub name: String,
    pub cedula: String,
    pub ticket_number: Option<String>,
    pub mesa: Option<String>,
}

/// Partial update; only present fields are sent to the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateParticipantRequest {
    pub id_participant: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cedula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// The lookup flow: register a ticket for an existing participant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignTicketRequest {
    pub id_participant: i64,
    pub ticket_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkParticipantsRequest {
    pub participants: Vec<CreateParticipantRequest>,
}
