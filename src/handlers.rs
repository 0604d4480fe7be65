// src/handlers.rs
use crate::{AppState, errors::AnalyzeError, models::AnalyzeRequest};
use actix_web::{HttpResponse, http::Method, web};

/// The single `/analyze` resource: POST runs the pipeline, OPTIONS answers
/// the browser preflight, anything else is rejected with 405.
pub fn analyze_resource() -> actix_web::Resource {
    web::resource("/analyze")
        .route(web::post().to(analyze_image))
        .route(web::method(Method::OPTIONS).to(analyze_preflight))
        .route(web::route().to(method_not_allowed))
}

pub async fn analyze_image(
    body: web::Bytes,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AnalyzeError> {
    let request = AnalyzeRequest::from_body(&body)?;

    let draft = data.analyzer.analyze(&request).await?;

    Ok(HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .json(serde_json::json!({
            "success": true,
            "data": draft
        })))
}

pub async fn analyze_preflight() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Headers", "Content-Type"))
        .insert_header(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .finish()
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .finish()
}
