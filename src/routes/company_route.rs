use actix_web::{
    error::{InternalError, PathError},
    http::StatusCode,
    post, web, HttpRequest, HttpResponse, ResponseError,
};
use serde::Serialize;
use uuid::Uuid;

use crate::services::{EnrichmentPipeline, PipelineError};

#[derive(Serialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: String,
    details: Option<String>,
}

impl ResponseError for PipelineError {
    fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
            PipelineError::MissingPrecondition => StatusCode::BAD_REQUEST,
            PipelineError::Fetch(_) | PipelineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            PipelineError::Fetch(e) => Some(e.to_string()),
            PipelineError::Store(e) => Some(format!("{:#}", e)),
            PipelineError::NotFound(_) | PipelineError::MissingPrecondition => None,
        };

        if self.status_code().is_server_error() {
            log::error!("Pipeline failed: {} ({:?})", self, details);
        }

        HttpResponse::build(self.status_code()).json(ErrorEnvelope {
            error: self.to_string(),
            details,
        })
    }
}

/// Path ids that are not UUIDs can not name a company: 404 in the usual envelope.
pub fn invalid_company_id(err: PathError, req: &HttpRequest) -> actix_web::Error {
    let raw_id = req.match_info().get("company_id").unwrap_or_default();
    let response = HttpResponse::NotFound().json(ErrorEnvelope {
        error: format!("Firma {} nicht gefunden", raw_id),
        details: Some(err.to_string()),
    });

    InternalError::from_response(err, response).into()
}

#[post("/{company_id}/analyze-website")]
async fn analyze_website(
    pipeline: web::Data<EnrichmentPipeline>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PipelineError> {
    let company = pipeline.analyze_website(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope { data: company }))
}

#[post("/{company_id}/detect-tech")]
async fn detect_tech(
    pipeline: web::Data<EnrichmentPipeline>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PipelineError> {
    let company = pipeline.detect_tech(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope { data: company }))
}

#[post("/{company_id}/extract-services")]
async fn extract_services(
    pipeline: web::Data<EnrichmentPipeline>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PipelineError> {
    let company = pipeline.extract_services(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope { data: company }))
}

#[post("/{company_id}/generate-description")]
async fn generate_description(
    pipeline: web::Data<EnrichmentPipeline>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PipelineError> {
    let company = pipeline.generate_description(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope { data: company }))
}
