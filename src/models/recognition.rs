//! Request/response types for `POST /api/recognize`.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Request body sent by the login page.
///
/// ```json
/// { "image": "data:image/jpeg;base64,/9j/4AAQ..." }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RecognizeRequest {
    pub image: Option<String>,
}

/// Response body for a completed recognition attempt.
///
/// # JSON Example (match)
///
/// ```json
/// {
///   "success": true,
///   "employee_id": "EMP010",
///   "employee_name": "Alex Lee",
///   "confidence": 0.93,
///   "message": "Welcome back, Alex Lee! Confidence: 93.0%",
///   "redirect_url": "/dashboard?employee_id=EMP010"
/// }
/// ```
///
/// On rejection only `success`, `message` and possibly `confidence` are set.
#[derive(Debug, Serialize)]
pub struct RecognizeResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,

    /// Same value written to `login_logs.confidence_score`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl RecognizeResponse {
    pub fn accepted(employee_id: &str, employee_name: &str, confidence: f64) -> Self {
        Self {
            success: true,
            employee_id: Some(employee_id.to_string()),
            employee_name: Some(employee_name.to_string()),
            confidence: Some(confidence),
            message: format!(
                "Welcome back, {employee_name}! Confidence: {:.1}%",
                confidence * 100.0
            ),
            redirect_url: Some(dashboard_url(employee_id)),
        }
    }

    pub fn rejected(message: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            success: false,
            employee_id: None,
            employee_name: None,
            confidence,
            message: message.into(),
            redirect_url: None,
        }
    }
}

/// Dashboard page for `employee_id`, with the id form-encoded.
fn dashboard_url(employee_id: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("employee_id", employee_id)
        .finish();
    format!("/dashboard?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_omits_identity_fields() {
        let json = serde_json::to_value(RecognizeResponse::rejected("nope", None)).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("employee_name").is_none());
        assert!(json.get("confidence").is_none());
        assert!(json.get("redirect_url").is_none());
    }

    #[test]
    fn accepted_builds_redirect() {
        let response = RecognizeResponse::accepted("EMP010", "Alex Lee", 0.9);
        assert_eq!(
            response.redirect_url.as_deref(),
            Some("/dashboard?employee_id=EMP010")
        );
        assert_eq!(response.message, "Welcome back, Alex Lee! Confidence: 90.0%");
    }

    #[test]
    fn redirect_escapes_reserved_characters() {
        let response = RecognizeResponse::accepted("R&D#7 +%", "Alex Lee", 0.9);
        let redirect = response.redirect_url.unwrap();
        assert_eq!(redirect, "/dashboard?employee_id=R%26D%237+%2B%25");

        let query = redirect.split_once('?').unwrap().1;
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(pairs, vec![("employee_id".to_string(), "R&D#7 +%".to_string())]);
    }
}
