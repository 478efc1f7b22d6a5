use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::json;

use crate::services::ServiceError;

pub mod client;
pub mod contract;
pub mod folder;
pub mod visit;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

impl actix_web::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::InvalidState => StatusCode::CONFLICT,
            ServiceError::OutOfRange(_)
            | ServiceError::Form(_)
            | ServiceError::TypeConstraint(_) => StatusCode::BAD_REQUEST,
            ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ServiceError::Repository(err) = self {
            log::error!("Repository failure: {err}");
            return HttpResponse::InternalServerError().json(json!({"error": "internal error"}));
        }
        HttpResponse::build(self.status_code()).json(json!({"error": self.to_string()}))
    }
}

/// Runs the `validator` checks of a form, mapping failures to a 400.
pub(crate) fn validate_form<F: validator::Validate>(form: &F) -> Result<(), ServiceError> {
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))
}
