use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ya hay un sorteo en curso")]
    DrawInProgress,

    #[error("El premio \"{0}\" ya ha sido sorteado")]
    PrizeAlreadyDrawn(String),

    #[error("No hay participantes elegibles en el rango {0} - {1}")]
    NoEligibleParticipants(i64, i64),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::DrawInProgress => {
                log::warn!("Draw requested while another draw is in flight");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "DRAW_IN_PROGRESS",
                    self.to_string(),
                )
            }
            AppError::PrizeAlreadyDrawn(_) => (
                actix_web::http::StatusCode::CONFLICT,
                "PRIZE_ALREADY_DRAWN",
                self.to_string(),
            ),
            AppError::NoEligibleParticipants(_, _) => (
                actix_web::http::StatusCode::CONFLICT,
                "NO_ELIGIBLE_PARTICIPANTS",
                self.to_string(),
            ),
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    msg.clone(),
                )
            }
            AppError::ReqwestError(_) => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
