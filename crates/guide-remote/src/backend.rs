//! Analysis backend
//!
//! The backend turns a discharge report into patient guide text. A failed
//! call never aborts document production: [`analyze_or_error_text`] turns
//! the failure into text that is rendered like any other guide.

use crate::types::*;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub trait AnalysisBackend {
    fn analyze(&self, request: &AnalysisRequest) -> Result<String>;
}

/// Body posted to the webhook
#[derive(Debug, Serialize, PartialEq)]
pub struct WebhookPayload<'a> {
    pub input_type: &'static str,
    pub language: &'static str,
    pub model: &'a str,
    pub image_url: &'a str,
    pub text: &'a str,
}

impl<'a> WebhookPayload<'a> {
    pub fn from_request(request: &'a AnalysisRequest) -> Self {
        let (input_type, image_url, text) = match &request.input {
            AnalysisInput::Text(text) => ("text", "", text.as_str()),
            AnalysisInput::ImageUrl(url) => ("image", url.as_str(), ""),
        };
        Self {
            input_type,
            language: request.language.label(),
            model: &request.model,
            image_url,
            text,
        }
    }
}

/// Blocking JSON webhook client
pub struct WebhookBackend {
    url: String,
    agent: ureq::Agent,
}

impl WebhookBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        let url = config.webhook_url.clone().ok_or_else(|| {
            RemoteError::Config(format!("No webhook URL configured (set {})", WEBHOOK_ENV))
        })?;
        Ok(Self::new(url, Duration::from_secs(config.timeout_secs)))
    }
}

impl AnalysisBackend for WebhookBackend {
    fn analyze(&self, request: &AnalysisRequest) -> Result<String> {
        request.validate()?;
        let payload = WebhookPayload::from_request(request);
        log::info!(
            "Requesting {} guide ({} input) with {}",
            request.language,
            payload.input_type,
            request.model
        );

        let response = self
            .agent
            .post(&self.url)
            .send_json(&payload)
            .map_err(|e| RemoteError::Http(e.to_string()))?;
        let body: Value = response.into_json()?;

        extract_guide(&body)
    }
}

/// Pull the guide text out of a webhook response
///
/// Accepts `{"result": ...}`, the older `{"patient_guide": ...}`, and either
/// of those wrapped in a one-element array.
pub fn extract_guide(body: &Value) -> Result<String> {
    let object = match body {
        Value::Array(items) => items.first().ok_or(RemoteError::MissingResult)?,
        other => other,
    };

    object
        .get("result")
        .or_else(|| object.get("patient_guide"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(RemoteError::MissingResult)
}

/// Run the analysis; on failure return the error message as document text
pub fn analyze_or_error_text(backend: &dyn AnalysisBackend, request: &AnalysisRequest) -> String {
    match backend.analyze(request) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("Analysis failed, rendering the error instead: {}", err);
            format!("Erreur lors de l'analyse du document : {}", err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guide_layout::Language;
    use serde_json::json;

    struct Fixed(Result<String>);

    impl AnalysisBackend for Fixed {
        fn analyze(&self, _request: &AnalysisRequest) -> Result<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(RemoteError::MissingResult),
            }
        }
    }

    #[test]
    fn test_text_payload() {
        let request = AnalysisRequest::text("CRH: AVC ischémique", Language::Darija);
        let payload = serde_json::to_value(WebhookPayload::from_request(&request)).unwrap();
        assert_eq!(
            payload,
            json!({
                "input_type": "text",
                "language": "Darija (Maroc)",
                "model": "gpt-4o",
                "image_url": "",
                "text": "CRH: AVC ischémique",
            })
        );
    }

    #[test]
    fn test_image_payload() {
        let mut request = AnalysisRequest::image_url("https://img/crh.jpg", Language::French);
        request.model = "gpt-4o-mini".to_string();
        let payload = WebhookPayload::from_request(&request);
        assert_eq!(payload.input_type, "image");
        assert_eq!(payload.image_url, "https://img/crh.jpg");
        assert_eq!(payload.text, "");
        assert_eq!(payload.language, "Français");
        assert_eq!(payload.model, "gpt-4o-mini");
    }

    #[test]
    fn test_extract_result_key() {
        let body = json!({ "result": "1. Repos" });
        assert_eq!(extract_guide(&body).unwrap(), "1. Repos");
    }

    #[test]
    fn test_extract_legacy_key_and_array() {
        let body = json!([{ "patient_guide": "- Pas de sport" }]);
        assert_eq!(extract_guide(&body).unwrap(), "- Pas de sport");
    }

    #[test]
    fn test_extract_missing_key() {
        assert!(matches!(
            extract_guide(&json!({ "output": 1 })),
            Err(RemoteError::MissingResult)
        ));
        assert!(matches!(
            extract_guide(&json!([])),
            Err(RemoteError::MissingResult)
        ));
    }

    #[test]
    fn test_failure_becomes_document_text() {
        let request = AnalysisRequest::text("CRH", Language::French);
        let text = analyze_or_error_text(&Fixed(Err(RemoteError::MissingResult)), &request);
        assert!(text.starts_with("Erreur"));
        assert!(text.contains("no guide text"));

        let ok = analyze_or_error_text(&Fixed(Ok("1. Repos".to_string())), &request);
        assert_eq!(ok, "1. Repos");
    }

    #[test]
    fn test_unreachable_webhook_yields_error_text() {
        let backend = WebhookBackend::new("http://127.0.0.1:9/webhook", Duration::from_secs(2));
        let request = AnalysisRequest::text("CRH", Language::French);
        let text = analyze_or_error_text(&backend, &request);
        assert!(text.starts_with("Erreur"));
    }

    #[test]
    fn test_blank_report_is_never_posted() {
        let backend = WebhookBackend::new("http://127.0.0.1:9/webhook", Duration::from_secs(2));
        let request = AnalysisRequest::text(" \n ", Language::French);
        assert!(matches!(
            backend.analyze(&request),
            Err(RemoteError::EmptyInput)
        ));
    }

    #[test]
    fn test_backend_requires_url() {
        let config = RemoteConfig::default();
        assert!(matches!(
            WebhookBackend::from_config(&config),
            Err(RemoteError::Config(_))
        ));
    }
}
