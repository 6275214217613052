use super::error::{ApiError, ApiResult};
use super::models::{
    ChatRequest, ChatResponse, DiaryContent, DiaryDocument, ErrorBody, PlanRequest, SaveResponse,
    Token, User,
};
use super::stream::ChatStream;
use crate::domain::PlanResponse;
use log::debug;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Typed client for the DiaryMind REST backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> ApiResult<Self> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("diarymind/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base,
            timeout,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build an endpoint URL from path segments; each segment is percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = check_status(builder.timeout(self.timeout).send().await?).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Filenames of all stored diaries, sorted
    pub async fn list_diaries(&self) -> ApiResult<Vec<String>> {
        let builder = self.request(Method::GET, &["api", "diary", "list"])?;
        let mut files: Vec<String> = self.send_json(builder).await?;
        files.sort();
        Ok(files)
    }

    pub async fn diary_content(&self, filename: &str) -> ApiResult<DiaryContent> {
        let builder = self.request(Method::GET, &["api", "diary", "content", filename])?;
        self.send_json(builder).await
    }

    /// Store a diary. Returns the filename the server used.
    pub async fn save_diary(&self, document: &DiaryDocument) -> ApiResult<String> {
        let builder = self.request(Method::POST, &["api", "diary", "save"])?.json(document);
        let saved: SaveResponse = self.send_json(builder).await?;
        debug!("saved diary {} ({})", saved.filename, saved.status);
        Ok(saved.filename)
    }

    pub async fn chat(&self, role: &str, message: &str) -> ApiResult<String> {
        let builder = self.request(Method::POST, &["api", "llm", "chat"])?.json(&ChatRequest {
            role,
            message,
            stream: false,
        });
        let reply: ChatResponse = self.send_json(builder).await?;
        Ok(reply.response)
    }

    /// Open a streaming chat. No overall timeout applies to the body; use `cancel` to stop it.
    pub async fn stream_chat(
        &self,
        role: &str,
        message: &str,
        cancel: CancellationToken,
    ) -> ApiResult<ChatStream> {
        let builder = self.request(Method::POST, &["api", "llm", "stream-chat"])?.json(&ChatRequest {
            role,
            message,
            stream: true,
        });

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            response = builder.send() => response?,
        };
        let response = check_status(response).await?;
        Ok(ChatStream::from_response(response, cancel))
    }

    pub async fn plan_tasks(&self, request: &str) -> ApiResult<PlanResponse> {
        let builder = self
            .request(Method::POST, &["api", "llm", "plan"])?
            .json(&PlanRequest { request });
        self.send_json(builder).await
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Token> {
        let builder = self
            .request(Method::POST, &["api", "auth", "login"])?
            .form(&[("username", username), ("password", password)]);
        self.send_json(builder).await
    }

    pub async fn me(&self) -> ApiResult<User> {
        let builder = self.request(Method::GET, &["api", "auth", "me"])?;
        self.send_json(builder).await
    }

    pub async fn logout(&self) -> ApiResult<()> {
        let builder = self.request(Method::POST, &["api", "auth", "logout"])?;
        check_status(builder.timeout(self.timeout).send().await?).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into `ApiError::Status`, preferring the server's `detail`
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status,
        detail: error_detail(&body),
    })
}

fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5), None).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://localhost:8082");
        assert_eq!(
            c.endpoint(&["api", "diary", "list"]).unwrap().as_str(),
            "http://localhost:8082/api/diary/list"
        );

        let c = client("http://example.com/prefix/");
        assert_eq!(
            c.endpoint(&["api", "llm", "chat"]).unwrap().as_str(),
            "http://example.com/prefix/api/llm/chat"
        );
    }

    #[test]
    fn test_endpoint_encodes_filenames() {
        let c = client("http://localhost:8082");
        let url = c.endpoint(&["api", "diary", "content", "my diary?.md"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8082/api/diary/content/my%20diary%3F.md");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", Duration::from_secs(1), None),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com", Duration::from_secs(1), None),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(error_detail(r#"{"detail":"File not found"}"#), "File not found");
        assert_eq!(error_detail(r#"{"detail":[{"msg":"field required"}]}"#), r#"[{"msg":"field required"}]"#);
        assert_eq!(error_detail("Internal Server Error\n"), "Internal Server Error");
    }
}
