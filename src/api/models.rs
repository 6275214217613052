use crate::domain::DiaryFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub role: &'a str,
    pub message: &'a str,
    pub stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanRequest<'a> {
    pub request: &'a str,
}

/// A diary as sent to the save endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryDocument {
    pub filename: String,
    pub content: String,
    #[serde(default)]
    pub format: DiaryFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiaryContent {
    pub content: String,
    #[serde(default)]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub status: String,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// FastAPI-style error body
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chat_request_shape() {
        let body = serde_json::to_value(ChatRequest {
            role: "你是助手",
            message: "hi",
            stream: true,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"role": "你是助手", "message": "hi", "stream": true}));
    }

    #[test]
    fn test_diary_document_defaults_to_markdown() {
        let doc: DiaryDocument = serde_json::from_str(r#"{"filename":"a","content":"b"}"#).unwrap();
        assert_eq!(doc.format, DiaryFormat::Md);
    }

    #[test]
    fn test_user_parses() {
        let user: User = serde_json::from_str(
            r#"{"id":1,"username":"lin","email":"lin@example.com","created_at":"2024-05-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(user.username, "lin");
    }
}
