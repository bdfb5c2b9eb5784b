use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::participant::list_participants,
        handlers::participant::create_participant,
        handlers::participant::bulk_import_participants,
        handlers::participant::update_participant,
        handlers::participant::assign_ticket,
        handlers::participant::delete_participant,
        handlers::prize::list_prizes,
        handlers::prize::create_prize,
        handlers::prize::bulk_import_prizes,
        handlers::prize::update_prize,
        handlers::prize::delete_prize,
        handlers::draw::draw,
        handlers::draw::draw_next,
        handlers::winner::list_winners,
        handlers::winner::delete_winner,
        handlers::winner::clear_winners,
        handlers::winner::full_reset,
        handlers::winner::statistics,
    ),
    components(
        schemas(
            Participant,
            CreateParticipantRequest,
            UpdateParticipantRequest,
            AssignTicketRequest,
            BulkParticipantsRequest,
            Prize,
            CreatePrizeRequest,
            UpdatePrizeRequest,
            BulkPrizesRequest,
            Winner,
            CreateWinnerRequest,
            DeleteWinnerRequest,
            FullResetRequest,
            StatisticsResponse,
            DrawRequest,
            DrawResultResponse,
            NextDrawResponse,
        )
    ),
    tags(
        (name = "participants", description = "Gestión de participantes"),
        (name = "prizes", description = "Gestión de premios"),
        (name = "draw", description = "Sorteo de premios"),
        (name = "winners", description = "Historial de ganadores y reinicio")
    ),
    info(
        title = "Sorteo Backend API",
        description = "Coordinador de sorteos: elegibilidad, selección de ganadores y reconciliación con el almacén remoto",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
