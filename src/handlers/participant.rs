use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::external::RaffleStoreClient;
use crate::models::{
    AssignTicketRequest, BulkParticipantsRequest, CreateParticipantRequest, Participant,
    UpdateParticipantRequest,
};
use crate::services::ParticipantService;

type Service = web::Data<ParticipantService<RaffleStoreClient>>;

#[utoipa::path(
    get,
    path = "/participants",
    tag = "participants",
    responses(
        (status = 200, description = "Lista de participantes", body = [Participant])
    )
)]
pub async fn list_participants(service: Service) -> Result<HttpResponse> {
    let participants = service.list().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": participants })))
}

#[utoipa::path(
    post,
    path = "/participants",
    tag = "participants",
    request_body = CreateParticipantRequest,
    responses(
        (status = 200, description = "Participante añadido"),
        (status = 400, description = "Datos inválidos o duplicados")
    )
)]
pub async fn create_participant(
    service: Service,
    request: web::Json<CreateParticipantRequest>,
) -> Result<HttpResponse> {
    match service.create(request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "El participante ha sido agregado exitosamente"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/participants/bulk",
    tag = "participants",
    request_body = BulkParticipantsRequest,
    responses(
        (status = 200, description = "Participantes importados"),
        (status = 400, description = "Ninguna fila válida")
    )
)]
/// Bulk import of pre-parsed rows (the UI shell parses the CSV file).
/// Imported participants start inactive until a ticket is registered.
pub async fn bulk_import_participants(
    service: Service,
    request: web::Json<BulkParticipantsRequest>,
) -> Result<HttpResponse> {
    match service.bulk_import(request.into_inner().participants).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("Se han agregado {count} participantes exitosamente")
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/participants",
    tag = "participants",
    request_body = UpdateParticipantRequest,
    responses(
        (status = 200, description = "Participante actualizado"),
        (status = 409, description = "Sorteo en curso")
    )
)]
pub async fn update_participant(
    service: Service,
    request: web::Json<UpdateParticipantRequest>,
) -> Result<HttpResponse> {
    match service.update(request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "El participante ha sido actualizado exitosamente"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/participants/ticket",
    tag = "participants",
    request_body = AssignTicketRequest,
    responses(
        (status = 200, description = "Manilla registrada"),
        (status = 400, description = "Número de manilla inválido o duplicado"),
        (status = 409, description = "Sorteo en curso")
    )
)]
/// Registers a ticket ("manilla") for a participant found through lookup
/// and activates them for the raffle.
pub async fn assign_ticket(
    service: Service,
    request: web::Json<AssignTicketRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    match service
        .assign_ticket(request.id_participant, &request.ticket_number)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Número de manilla registrado exitosamente"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/participants/{id}",
    tag = "participants",
    params(
        ("id" = i64, Path, description = "Id del participante")
    ),
    responses(
        (status = 200, description = "Participante eliminado"),
        (status = 400, description = "El participante es ganador actual"),
        (status = 404, description = "No encontrado")
    )
)]
pub async fn delete_participant(service: Service, path: web::Path<i64>) -> Result<HttpResponse> {
    match service.delete(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "El participante ha sido eliminado exitosamente"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn participant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/participants")
            .route("", web::get().to(list_participants))
            .route("", web::post().to(create_participant))
            .route("", web::put().to(update_participant))
            .route("/bulk", web::post().to(bulk_import_participants))
            .route("/ticket", web::put().to(assign_ticket))
            .route("/{id}", web::delete().to(delete_participant)),
    );
}
