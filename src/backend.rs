use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::error::AgentError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen analysis returned by the vision backend. Both click targets are
/// optional; absent fields fall back to fixed coordinates downstream.
/// A present field with non-numeric coordinates fails deserialization, which
/// surfaces as an analysis failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analysis {
    pub campo_texto: Option<Point>,
    pub botao_enviar: Option<Point>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Answer of the find-txt endpoint. When `found` is false the other fields
/// are not consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindResult {
    pub found: bool,
    pub filename: Option<String>,
    pub coordinates: Option<Point>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptureResponse {
    screenshot: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    analysis: Option<Analysis>,
}

/// Port to the local automation backend (screen capture, vision analysis,
/// synthetic input). The orchestrator only ever talks through this trait.
#[async_trait]
pub trait AutomationBackend: Send + Sync {
    async fn capture_screen(&self) -> Result<String, AgentError>;
    async fn analyze(
        &self,
        api_key: &str,
        screenshot: &str,
        command: &str,
    ) -> Result<Analysis, AgentError>;
    async fn click(&self, at: Point) -> Result<(), AgentError>;
    async fn paste(&self) -> Result<(), AgentError>;
    async fn find_txt(&self, api_key: &str, screenshot: &str) -> Result<FindResult, AgentError>;
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl AutomationBackend for HttpBackend {
    async fn capture_screen(&self) -> Result<String, AgentError> {
        let resp = self
            .client
            .post(self.url("/capture-screen"))
            .send()
            .await
            .map_err(|e| {
                warn!("requisição de captura falhou: {}", e);
                AgentError::Capture
            })?;
        if !resp.status().is_success() {
            warn!("captura retornou HTTP {}", resp.status());
            return Err(AgentError::Capture);
        }
        let body: CaptureResponse = resp.json().await.map_err(|e| {
            warn!("resposta de captura inválida: {}", e);
            AgentError::Capture
        })?;
        body.screenshot.ok_or(AgentError::Capture)
    }

    async fn analyze(
        &self,
        api_key: &str,
        screenshot: &str,
        command: &str,
    ) -> Result<Analysis, AgentError> {
        let resp = self
            .client
            .post(self.url("/gemini-analyze"))
            .json(&json!({
                "api_key": api_key,
                "screenshot": screenshot,
                "command": command,
            }))
            .send()
            .await
            .map_err(|e| {
                warn!("requisição de análise falhou: {}", e);
                AgentError::Analysis
            })?;
        if !resp.status().is_success() {
            warn!("análise retornou HTTP {}", resp.status());
            return Err(AgentError::Analysis);
        }
        let body: AnalyzeResponse = resp.json().await.map_err(|e| {
            warn!("resposta de análise inválida: {}", e);
            AgentError::Analysis
        })?;
        body.analysis.ok_or(AgentError::Analysis)
    }

    // The two action endpoints are fire-and-forget: only transport errors
    // count, the response body is never inspected.
    async fn click(&self, at: Point) -> Result<(), AgentError> {
        self.client
            .post(self.url("/click"))
            .json(&json!({ "x": at.x, "y": at.y }))
            .send()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn paste(&self) -> Result<(), AgentError> {
        self.client
            .post(self.url("/paste"))
            .send()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn find_txt(&self, api_key: &str, screenshot: &str) -> Result<FindResult, AgentError> {
        let resp = self
            .client
            .post(self.url("/find-txt"))
            .json(&json!({
                "api_key": api_key,
                "screenshot": screenshot,
            }))
            .send()
            .await
            .map_err(|e| {
                warn!("requisição find-txt falhou: {}", e);
                AgentError::FindTxt
            })?;
        if !resp.status().is_success() {
            warn!("find-txt retornou HTTP {}", resp.status());
            return Err(AgentError::FindTxt);
        }
        resp.json().await.map_err(|e| {
            warn!("resposta find-txt inválida: {}", e);
            AgentError::FindTxt
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn capture_screen_returns_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/capture-screen"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "screenshot": "b64data" })),
            )
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        assert_eq!(backend.capture_screen().await.unwrap(), "b64data");
    }

    #[tokio::test]
    async fn capture_screen_fails_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/capture-screen"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        assert!(matches!(
            backend.capture_screen().await,
            Err(AgentError::Capture)
        ));
    }

    #[tokio::test]
    async fn capture_screen_fails_on_missing_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/capture-screen"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        assert!(matches!(
            backend.capture_screen().await,
            Err(AgentError::Capture)
        ));
    }

    #[tokio::test]
    async fn analyze_sends_credentials_and_command() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gemini-analyze"))
            .and(body_json(json!({
                "api_key": "chave",
                "screenshot": "b64data",
                "command": "/nome Maria",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "analysis": {
                    "campo_texto": { "x": 100.0, "y": 200.0 },
                    "confianca": 0.9,
                }
            })))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        let analysis = backend
            .analyze("chave", "b64data", "/nome Maria")
            .await
            .unwrap();
        assert_eq!(analysis.campo_texto, Some(Point::new(100.0, 200.0)));
        assert!(analysis.botao_enviar.is_none());
        assert!(analysis.extra.contains_key("confianca"));
    }

    #[tokio::test]
    async fn analyze_rejects_malformed_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gemini-analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "analysis": { "campo_texto": { "x": "não-numérico", "y": 2000 } }
            })))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        assert!(matches!(
            backend.analyze("chave", "b64", "/nome X").await,
            Err(AgentError::Analysis)
        ));
    }

    #[tokio::test]
    async fn click_posts_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/click"))
            .and(body_json(json!({ "x": 540.0, "y": 2000.0 })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        backend.click(Point::new(540.0, 2000.0)).await.unwrap();
    }

    #[tokio::test]
    async fn click_ignores_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/click"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        // Action endpoints only fail on transport errors.
        assert!(backend.click(Point::new(1.0, 2.0)).await.is_ok());
    }

    #[tokio::test]
    async fn find_txt_parses_found_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/find-txt"))
            .and(body_json(json!({ "api_key": "chave", "screenshot": "b64" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "found": true,
                "filename": "resultado.txt",
                "coordinates": { "x": 300.0, "y": 400.0 },
                "content": "linha 1",
            })))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        let result = backend.find_txt("chave", "b64").await.unwrap();
        assert!(result.found);
        assert_eq!(result.filename.as_deref(), Some("resultado.txt"));
        assert_eq!(result.coordinates, Some(Point::new(300.0, 400.0)));
        assert_eq!(result.content.as_deref(), Some("linha 1"));
    }
}
