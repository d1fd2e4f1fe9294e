use serde::{Deserialize, Serialize};

/// Body the backend sends alongside a non-2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Extracts the `error` field from a raw response body. Returns `None` for
    /// bodies that are not JSON, lack the field, or carry a blank message.
    pub fn message_from_body(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|parsed| parsed.error)
            .filter(|message| !message.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_error_field_verbatim() {
        assert_eq!(
            ApiErrorBody::message_from_body(r#"{"error": "Review text is required"}"#),
            Some("Review text is required".to_string())
        );
    }

    #[test]
    fn missing_or_unparsable_error_yields_none() {
        assert_eq!(ApiErrorBody::message_from_body("{}"), None);
        assert_eq!(ApiErrorBody::message_from_body(r#"{"error": null}"#), None);
        assert_eq!(ApiErrorBody::message_from_body(r#"{"error": "  "}"#), None);
        assert_eq!(ApiErrorBody::message_from_body("<html>502</html>"), None);
    }
}
