// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("request body is not a valid analysis request: {0}")]
    MalformedRequest(String),

    #[error("image payload is missing")]
    MissingImage,

    #[error("GROQ_KEY is not configured")]
    Configuration,

    #[error("Groq API returned status {status}")]
    Upstream { status: u16, body: String },

    #[error("Groq API request failed: {0}")]
    Transport(String),
}

impl ResponseError for AnalyzeError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalyzeError::MalformedRequest(_) | AnalyzeError::MissingImage => {
                StatusCode::BAD_REQUEST
            }
            AnalyzeError::Configuration
            | AnalyzeError::Upstream { .. }
            | AnalyzeError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AnalyzeError::MalformedRequest(details) => serde_json::json!({
                "error": "Requête invalide",
                "details": details
            }),
            AnalyzeError::MissingImage => serde_json::json!({
                "error": "Image requise"
            }),
            AnalyzeError::Configuration => serde_json::json!({
                "error": "Clé API non configurée"
            }),
            AnalyzeError::Upstream { body, .. } => serde_json::json!({
                "error": "Erreur API Groq",
                "details": body
            }),
            AnalyzeError::Transport(details) => serde_json::json!({
                "error": "Erreur de connexion à l'API Groq",
                "details": details
            }),
        };

        HttpResponse::build(self.status_code())
            .insert_header(("Access-Control-Allow-Origin", "*"))
            .json(body)
    }
}
