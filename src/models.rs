// src/models.rs
use serde::Deserialize;

use crate::errors::AnalyzeError;

/// One product photo to turn into a listing draft. `imageBase64` carries
/// either a bare base64 payload or the full data URI produced by the
/// browser's FileReader; `category` is only used as a fallback value when
/// the model answer cannot be parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "imageBase64", default)]
    pub image_base64: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl AnalyzeRequest {
    /// Parses and validates a raw request body. No size or content-type
    /// checks server-side; the upload limit lives in the client.
    pub fn from_body(body: &[u8]) -> Result<Self, AnalyzeError> {
        let request: AnalyzeRequest = serde_json::from_slice(body)
            .map_err(|e| AnalyzeError::MalformedRequest(e.to_string()))?;

        if request.image_base64.trim().is_empty() {
            return Err(AnalyzeError::MissingImage);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_request() {
        let body = br#"{"imageBase64": "aGVsbG8=", "category": "Hauts"}"#;
        let request = AnalyzeRequest::from_body(body).unwrap();
        assert_eq!(request.image_base64, "aGVsbG8=");
        assert_eq!(request.category.as_deref(), Some("Hauts"));
    }

    #[test]
    fn category_is_optional() {
        let body = br#"{"imageBase64": "aGVsbG8="}"#;
        let request = AnalyzeRequest::from_body(body).unwrap();
        assert!(request.category.is_none());
    }

    #[test]
    fn rejects_missing_image_field() {
        let err = AnalyzeRequest::from_body(br#"{"category": "Hauts"}"#).unwrap_err();
        assert!(matches!(err, AnalyzeError::MissingImage));
    }

    #[test]
    fn rejects_empty_image_payload() {
        let err = AnalyzeRequest::from_body(br#"{"imageBase64": "  "}"#).unwrap_err();
        assert!(matches!(err, AnalyzeError::MissingImage));
    }

    #[test]
    fn rejects_non_json_body() {
        let err = AnalyzeRequest::from_body(b"not json at all").unwrap_err();
        assert!(matches!(err, AnalyzeError::MalformedRequest(_)));
    }
}
