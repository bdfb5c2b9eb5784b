use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::external::RaffleStoreClient;
use crate::models::{BulkPrizesRequest, CreatePrizeRequest, Prize, UpdatePrizeRequest};
use crate::services::PrizeService;

type Service = web::Data<PrizeService<RaffleStoreClient>>;

#[utoipa::path(
    get,
    path = "/prizes",
    tag = "prizes",
    responses(
        (status = 200, description = "Lista de premios", body = [Prize])
    )
)]
pub async fn list_prizes(service: Service) -> Result<HttpResponse> {
    let prizes = service.list().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prizes })))
}

#[utoipa::path(
    post,
    path = "/prizes",
    tag = "prizes",
    request_body = CreatePrizeRequest,
    responses(
        (status = 200, description = "Premio añadido"),
        (status = 400, description = "Rango inválido")
    )
)]
pub async fn create_prize(
    service: Service,
    request: web::Json<CreatePrizeRequest>,
) -> Result<HttpResponse> {
    match service.create(request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "El premio ha sido agregado exitosamente"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/prizes/bulk",
    tag = "prizes",
    request_body = BulkPrizesRequest,
    responses(
        (status = 200, description = "Premios importados"),
        (status = 400, description = "Alguna fila inválida")
    )
)]
pub async fn bulk_import_prizes(
    service: Service,
    request: web::Json<BulkPrizesRequest>,
) -> Result<HttpResponse> {
    match service.bulk_import(request.into_inner().prizes).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("Se han agregado {count} premios exitosamente")
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/prizes",
    tag = "prizes",
    request_body = UpdatePrizeRequest,
    responses(
        (status = 200, description = "Premio actualizado"),
        (status = 409, description = "El premio ya fue sorteado")
    )
)]
pub async fn update_prize(
    service: Service,
    request: web::Json<UpdatePrizeRequest>,
) -> Result<HttpResponse> {
    match service.update(request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "El premio ha sido actualizado exitosamente"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/prizes/{id}",
    tag = "prizes",
    params(
        ("id" = i64, Path, description = "Id del premio")
    ),
    responses(
        (status = 200, description = "Premio eliminado"),
        (status = 404, description = "No encontrado"),
        (status = 409, description = "El premio ya fue sorteado")
    )
)]
pub async fn delete_prize(service: Service, path: web::Path<i64>) -> Result<HttpResponse> {
    match service.delete(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "El premio ha sido eliminado exitosamente"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prizes")
            .route("", web::get().to(list_prizes))
            .route("", web::post().to(create_prize))
            .route("", web::put().to(update_prize))
            .route("/bulk", web::post().to(bulk_import_prizes))
            .route("/{id}", web::delete().to(delete_prize)),
    );
}
