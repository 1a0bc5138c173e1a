use serde::{Deserialize, Serialize};

/// Body of a successful `GET /api/query`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub response: String,
}

/// Body of `GET /api/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_response_ignores_extra_fields() {
        let body = r#"{"response": "hi there", "sources": []}"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response, "hi there");
    }

    #[test]
    fn query_response_requires_response_field() {
        assert!(serde_json::from_str::<QueryResponse>(r#"{"answer": "x"}"#).is_err());
    }

    #[test]
    fn health_message_is_optional() {
        let parsed: HealthResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(parsed.is_ok());
        assert!(parsed.message.is_empty());
    }
}
