use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::external::RaffleStoreClient;
use crate::models::{FullResetRequest, StatisticsResponse, Winner};
use crate::services::WinnerService;

type Service = web::Data<WinnerService<RaffleStoreClient>>;

#[utoipa::path(
    get,
    path = "/winners",
    tag = "winners",
    responses(
        (status = 200, description = "Historial de ganadores", body = [Winner])
    )
)]
/// Returns the winner history after a best-effort read-repair from the
/// store (concurrent reloads are dropped, not queued).
pub async fn list_winners(service: Service) -> Result<HttpResponse> {
    let winners = service.reload().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": winners })))
}

#[utoipa::path(
    delete,
    path = "/winners/{id}",
    tag = "winners",
    params(
        ("id" = i64, Path, description = "Id del ganador")
    ),
    responses(
        (status = 200, description = "Ganador eliminado, premio y participante restaurados"),
        (status = 404, description = "No encontrado")
    )
)]
pub async fn delete_winner(service: Service, path: web::Path<i64>) -> Result<HttpResponse> {
    match service.delete_winner(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Se ha eliminado el ganador y restaurado el premio y participante asociados"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/winners",
    tag = "winners",
    responses(
        (status = 200, description = "Historial vaciado, premios y participantes restaurados")
    )
)]
pub async fn clear_winners(service: Service) -> Result<HttpResponse> {
    match service.clear_all().await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Se han restaurado los premios y participantes a su estado original"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/reset",
    tag = "winners",
    request_body = FullResetRequest,
    responses(
        (status = 200, description = "Reinicio completo, todos los datos eliminados"),
        (status = 400, description = "Palabra clave incorrecta")
    )
)]
/// Destructive full reset. The request must carry the exact confirmation
/// keyword; a mismatch performs no remote call.
pub async fn full_reset(
    service: Service,
    request: web::Json<FullResetRequest>,
) -> Result<HttpResponse> {
    match service.full_reset(&request.keyword).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Todos los datos han sido eliminados exitosamente"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/statistics",
    tag = "winners",
    responses(
        (status = 200, description = "Resumen de la sesión", body = StatisticsResponse)
    )
)]
pub async fn statistics(service: Service) -> Result<HttpResponse> {
    let stats = service.statistics().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": stats })))
}

pub fn winner_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/winners")
            .route("", web::get().to(list_winners))
            .route("", web::delete().to(clear_winners))
            .route("/{id}", web::delete().to(delete_winner)),
    )
    .route("/reset", web::post().to(full_reset))
    .route("/statistics", web::get().to(statistics));
}
