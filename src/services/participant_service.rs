use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppError, AppResult};
use crate::external::{NewParticipant, RaffleStore};
use crate::models::{
    CreateParticipantRequest, Participant, UpdateParticipantRequest,
};
use crate::services::SessionCache;
use crate::utils::pad_ticket_number;

/// Valid ticket ("manilla") numbers are 3-digit labels in this band.
const TICKET_MIN: i64 = 1;
const TICKET_MAX: i64 = 500;

/// Participant CRUD with client-side validation, plus the ticket
/// registration ("lookup") flow. Writes go to the store first; the cache is
/// refreshed eagerly afterwards. Updates are quiesced while a draw is in
/// flight so the roster cannot shift under a frozen snapshot.
pub struct ParticipantService<S> {
    store: Arc<S>,
    cache: Arc<SessionCache>,
    draw_in_flight: Arc<AtomicBool>,
}

impl<S> Clone for ParticipantService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
            draw_in_flight: self.draw_in_flight.clone(),
        }
    }
}

/// Validates participant fields against the rest of the roster. Returns the
/// normalized (zero-padded) ticket number when one is present.
fn validate_fields(
    name: &str,
    cedula: &str,
    ticket_number: Option<&str>,
    existing: &[Participant],
    exclude_id: Option<i64>,
) -> AppResult<Option<String>> {
    let others = existing
        .iter()
        .filter(|p| exclude_id != Some(p.id_participant));

    if name.trim().is_empty() {
        return Err(AppError::ValidationError("El nombre es requerido".into()));
    }
    if cedula.trim().is_empty() {
        return Err(AppError::ValidationError("La cédula es requerida".into()));
    }
    if cedula.trim().len() > 10 {
        return Err(AppError::ValidationError(
            "La cédula no puede tener más de 10 dígitos".into(),
        ));
    }

    let ticket = match ticket_number.map(str::trim).filter(|t| !t.is_empty()) {
        Some(ticket) => {
            if ticket.len() != 3 || !ticket.chars().all(|c| c.is_ascii_digit()) {
                return Err(AppError::ValidationError(
                    "El número de manilla debe tener exactamente 3 dígitos".into(),
                ));
            }
            let numeric: i64 = ticket.parse().map_err(|_| {
                AppError::ValidationError("Número de manilla inválido".into())
            })?;
            if !(TICKET_MIN..=TICKET_MAX).contains(&numeric) {
                return Err(AppError::ValidationError(format!(
                    "El número de manilla debe estar entre {TICKET_MIN:03} y {TICKET_MAX}"
                )));
            }
            Some(pad_ticket_number(ticket))
        }
        None => None,
    };

    for other in others {
        if other.name.eq_ignore_ascii_case(name.trim()) {
            return Err(AppError::ValidationError(
                "Ya existe un participante con este nombre".into(),
            ));
        }
        if other.cedula == cedula.trim() {
            return Err(AppError::ValidationError(
                "Ya existe un participante con esta cédula".into(),
            ));
        }
        if let (Some(ticket), Some(other_ticket)) = (&ticket, &other.ticket_number)
            && ticket == other_ticket
        {
            return Err(AppError::ValidationError(
                "Ya existe un participante con este número de manilla".into(),
            ));
        }
    }

    Ok(ticket)
}

impl<S: RaffleStore> ParticipantService<S> {
    pub fn new(store: Arc<S>, cache: Arc<SessionCache>, draw_in_flight: Arc<AtomicBool>) -> Self {
        Self {
            store,
            cache,
            draw_in_flight,
        }
    }

    fn ensure_no_draw_in_flight(&self) -> AppResult<()> {
        if self.draw_in_flight.load(Ordering::SeqCst) {
            return Err(AppError::DrawInProgress);
        }
        Ok(())
    }

    pub async fn list(&self) -> Vec<Participant> {
        self.cache.participants().await
    }

    async fn reload(&self) -> AppResult<()> {
        let participants = self.store.list_participants().await?;
        self.cache.set_participants(participants).await;
        Ok(())
    }

    /// Registers a single participant. Manually added participants start
    /// active (they are present at the event).
    pub async fn create(&self, request: CreateParticipantRequest) -> AppResult<()> {
        let existing = self.cache.participants().await;
        let ticket = validate_fields(
            &request.name,
            &request.cedula,
            request.ticket_number.as_deref(),
            &existing,
            None,
        )?;

        self.store
            .create_participant(&NewParticipant {
                name: request.name.trim().to_string(),
                cedula: request.cedula.trim().to_string(),
                ticket_number: ticket,
                mesa: request.mesa.filter(|m| !m.trim().is_empty()),
                active: true,
            })
            .await?;
        self.reload().await
    }

    /// Bulk import of pre-parsed rows. Rows missing a name or cedula are
    /// skipped. Unlike single create, imported tickets are padded but NOT
    /// validated: a malformed or out-of-band ticket is carried as-is and
    /// simply never matches a prize range, so a bad row cannot sink the
    /// whole file. Imported participants start inactive; they become
    /// drawable once a ticket is registered through the lookup flow.
    /// Returns the number of rows imported.
    pub async fn bulk_import(&self, rows: Vec<CreateParticipantRequest>) -> AppResult<usize> {
        let records: Vec<NewParticipant> = rows
            .into_iter()
            .filter(|row| !row.name.trim().is_empty() && !row.cedula.trim().is_empty())
            .map(|row| NewParticipant {
                name: row.name.trim().to_string(),
                cedula: row.cedula.trim().to_string(),
                ticket_number: row
                    .ticket_number
                    .filter(|t| !t.trim().is_empty())
                    .map(|t| pad_ticket_number(t.trim())),
                mesa: row.mesa.filter(|m| !m.trim().is_empty()),
                active: false,
            })
            .collect();

        if records.is_empty() {
            return Err(AppError::ValidationError(
                "No hay participantes válidos para importar".into(),
            ));
        }

        let created = self.store.bulk_create_participants(&records).await?;
        let count = created.len();
        self.cache.append_participants(created).await;
        Ok(count)
    }

    pub async fn update(&self, request: UpdateParticipantRequest) -> AppResult<()> {
        self.ensure_no_draw_in_flight()?;

        let existing = self.cache.participants().await;
        let current = existing
            .iter()
            .find(|p| p.id_participant == request.id_participant)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Participante {} no encontrado",
                    request.id_participant
                ))
            })?;

        // Validate the merged record, not just the changed fields
        let name = request.name.as_deref().unwrap_or(&current.name);
        let cedula = request.cedula.as_deref().unwrap_or(&current.cedula);
        let ticket = request
            .ticket_number
            .as_deref()
            .or(current.ticket_number.as_deref());
        let ticket = validate_fields(
            name,
            cedula,
            ticket,
            &existing,
            Some(request.id_participant),
        )?;

        let mut update = request;
        if update.ticket_number.is_some() {
            update.ticket_number = ticket;
        }
        self.store.update_participant(&update).await?;
        self.reload().await
    }

    /// The lookup flow: assigns a ticket to an already-registered
    /// participant and activates them.
    pub async fn assign_ticket(&self, id_participant: i64, ticket_number: &str) -> AppResult<()> {
        self.update(UpdateParticipantRequest {
            id_participant,
            name: None,
            cedula: None,
            ticket_number: Some(ticket_number.to_string()),
            mesa: None,
            active: Some(true),
        })
        .await
    }

    /// Deletes a participant. A current winner (holds a ticket and is
    /// inactive) cannot be deleted until their win is undone.
    pub async fn delete(&self, id_participant: i64) -> AppResult<()> {
        let participant = self
            .cache
            .find_participant(id_participant)
            .await
            .ok_or_else(|| {
                AppError::NotFound(format!("Participante {id_participant} no encontrado"))
            })?;

        if participant.ticket_number.is_some() && !participant.active {
            return Err(AppError::ValidationError(
                "No se puede eliminar un participante que es ganador actual".into(),
            ));
        }

        self.store.delete_participant(id_participant).await?;
        self.cache.remove_participant(id_participant).await;
        Ok(())
    }
}
