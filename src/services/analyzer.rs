// src/services/analyzer.rs
use crate::errors::AnalyzeError;
use crate::models::AnalyzeRequest;
use crate::services::VisionApi;
use crate::services::normalizer::normalize_completion;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

/// Instruction sent with every photo. The model is told to answer with bare
/// JSON; `normalize_completion` copes with the times it does not. The field
/// set below is the listing-draft schema the rest of the pipeline relies on.
const ANALYSIS_PROMPT: &str = r##"Tu es un expert en vente de vêtements et articles de mode sur Vinted. Analyse cette image de produit et fournis une réponse JSON structurée.

IMPORTANT: Réponds UNIQUEMENT en JSON valide, sans texte avant ou après.

{
  "titre": "Un titre accrocheur de max 50 caractères pour Vinted",
  "description": "Une description vendeuse de 150-200 mots qui inclut: état du produit, matière probable, couleur exacte, style, occasions de port, points forts. Utilise un ton amical et professionnel typique de Vinted.",
  "categorie": "La catégorie Vinted appropriée (ex: Hauts, Pantalons, Chaussures, Accessoires, etc.)",
  "marque_detectee": "La marque si visible, sinon 'Non identifiée'",
  "couleur": "Couleur principale",
  "etat_estime": "Neuf avec étiquette / Très bon état / Bon état / Satisfaisant",
  "taille_probable": "Estimation de taille si possible",
  "mots_cles": ["mot1", "mot2", "mot3", "mot4", "mot5"],
  "prix_suggere": {
    "minimum": 0,
    "optimal": 0,
    "maximum": 0,
    "justification": "Explication courte du prix suggéré basée sur la marque, l'état et le type de produit"
  },
  "conseils_photo": ["conseil1", "conseil2"],
  "hashtags": ["#tag1", "#tag2", "#tag3"]
}"##;

/// Request-scoped photo-to-draft pipeline: builds the prompt payload, calls
/// the vision backend once and normalizes whatever comes back. Holds no
/// per-request state of its own.
pub struct AnalyzerService {
    api_key: Option<String>,
    api: Arc<dyn VisionApi>,
}

impl AnalyzerService {
    pub fn new(api_key: Option<String>, api: Arc<dyn VisionApi>) -> Self {
        Self { api_key, api }
    }

    pub async fn analyze(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<serde_json::Value, AnalyzeError> {
        // Fail closed before any network traffic when the key is absent.
        let api_key = self.api_key.as_deref().ok_or(AnalyzeError::Configuration)?;

        let request_id = Uuid::new_v4();
        info!(
            "[{}] analyzing product photo ({} payload bytes)",
            request_id,
            request.image_base64.len()
        );

        let image_url = to_data_uri(&request.image_base64);
        let completion = self
            .api
            .complete(api_key, ANALYSIS_PROMPT, &image_url)
            .await?;

        info!(
            "[{}] received {} completion chars",
            request_id,
            completion.len()
        );

        Ok(normalize_completion(
            &completion,
            request.category.as_deref(),
        ))
    }
}

/// FileReader on the browser side already produces a complete data URI; a
/// bare base64 payload is assumed to be JPEG.
fn to_data_uri(image_base64: &str) -> String {
    if image_base64.starts_with("data:") {
        image_base64.to_string()
    } else {
        format!("data:image/jpeg;base64,{}", image_base64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockVisionApi {
        completion: String,
        calls: AtomicUsize,
        seen_image_urls: Mutex<Vec<String>>,
    }

    impl MockVisionApi {
        fn new(completion: &str) -> Self {
            Self {
                completion: completion.to_string(),
                calls: AtomicUsize::new(0),
                seen_image_urls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VisionApi for MockVisionApi {
        async fn complete(
            &self,
            _api_key: &str,
            _prompt: &str,
            image_url: &str,
        ) -> Result<String, AnalyzeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_image_urls
                .lock()
                .unwrap()
                .push(image_url.to_string());
            Ok(self.completion.clone())
        }
    }

    fn request(image_base64: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            image_base64: image_base64.to_string(),
            category: None,
        }
    }

    #[test]
    fn bare_base64_payload_gets_jpeg_prefix() {
        assert_eq!(to_data_uri("aGVsbG8="), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn existing_data_uri_is_forwarded_unchanged() {
        let uri = "data:image/png;base64,aGVsbG8=";
        assert_eq!(to_data_uri(uri), uri);
    }

    #[tokio::test]
    async fn missing_key_short_circuits_before_any_network_call() {
        let api = Arc::new(MockVisionApi::new("{}"));
        let analyzer = AnalyzerService::new(None, api.clone());

        let err = analyzer.analyze(&request("aGVsbG8=")).await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Configuration));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn backend_receives_the_normalized_data_uri() {
        let api = Arc::new(MockVisionApi::new("{}"));
        let analyzer = AnalyzerService::new(Some("test-key".into()), api.clone());

        analyzer.analyze(&request("aGVsbG8=")).await.unwrap();
        analyzer
            .analyze(&request("data:image/png;base64,aGVsbG8="))
            .await
            .unwrap();

        let seen = api.seen_image_urls.lock().unwrap();
        assert_eq!(seen[0], "data:image/jpeg;base64,aGVsbG8=");
        assert_eq!(seen[1], "data:image/png;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn fenced_completion_becomes_the_parsed_draft() {
        let api = Arc::new(MockVisionApi::new(
            "```json\n{\"titre\": \"T-shirt bleu\", \"couleur\": \"bleu\"}\n```",
        ));
        let analyzer = AnalyzerService::new(Some("test-key".into()), api);

        let draft = analyzer.analyze(&request("aGVsbG8=")).await.unwrap();
        assert_eq!(draft["titre"], "T-shirt bleu");
        assert_eq!(draft["couleur"], "bleu");
    }

    #[tokio::test]
    async fn category_hint_reaches_the_fallback_draft() {
        let api = Arc::new(MockVisionApi::new("pas du JSON"));
        let analyzer = AnalyzerService::new(Some("test-key".into()), api);

        let req = AnalyzeRequest {
            image_base64: "aGVsbG8=".to_string(),
            category: Some("Accessoires".to_string()),
        };
        let draft = analyzer.analyze(&req).await.unwrap();
        assert_eq!(draft["categorie"], "Accessoires");
        assert_eq!(draft["description"], "pas du JSON");
    }

    #[tokio::test]
    async fn identical_inputs_produce_identical_drafts() {
        let api = Arc::new(MockVisionApi::new(
            "{\"titre\": \"Veste\", \"prix_suggere\": {\"minimum\": 8, \"optimal\": 12, \"maximum\": 20}}",
        ));
        let analyzer = AnalyzerService::new(Some("test-key".into()), api);

        let first = analyzer.analyze(&request("aGVsbG8=")).await.unwrap();
        let second = analyzer.analyze(&request("aGVsbG8=")).await.unwrap();
        assert_eq!(first, second);
    }
}
