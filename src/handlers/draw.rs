use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::external::RaffleStoreClient;
use crate::models::{DrawRequest, DrawResultResponse, NextDrawResponse};
use crate::services::DrawService;

type Service = web::Data<DrawService<RaffleStoreClient>>;

#[utoipa::path(
    post,
    path = "/draw",
    tag = "draw",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "Sorteo realizado, ganador revelado", body = DrawResultResponse),
        (status = 404, description = "Premio no encontrado"),
        (status = 409, description = "Sorteo en curso, premio ya sorteado o sin participantes elegibles")
    )
)]
/// Runs a draw for one prize. The response is the optimistic reveal,
/// returned after the animation window; persistence against the store
/// continues in the background.
pub async fn draw(service: Service, request: web::Json<DrawRequest>) -> Result<HttpResponse> {
    match service.draw(request.id_prize).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/draw/next",
    tag = "draw",
    responses(
        (status = 200, description = "Resultado del siguiente sorteo", body = NextDrawResponse),
        (status = 409, description = "Sorteo en curso")
    )
)]
/// Draws the first remaining un-drawn prize with an eligible participant,
/// or reports that none qualifies / the raffle is complete.
pub async fn draw_next(service: Service) -> Result<HttpResponse> {
    match service.draw_next().await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn draw_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/draw")
            .route("", web::post().to(draw))
            .route("/next", web::post().to(draw_next)),
    );
}
