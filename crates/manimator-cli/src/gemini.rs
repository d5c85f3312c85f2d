//! Gemini model backend
//!
//! Calls `models/{model}:generateContent` on the Gemini REST API with the
//! bridged tool declarations attached. No timeout is applied.

use async_trait::async_trait;
use manimator_core::schema::{FunctionDeclaration, gemini_tools};
use manimator_core::{Error, Result};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::Config;
use crate::orchestrator::{LanguageModel, ModelReply};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.into();
        let base_url = if base_url.trim().is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            base_url.trim().trim_end_matches('/').to_string()
        };

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_key, &config.model, &config.api_base)
    }

    fn endpoint(&self) -> String {
        let model_resource = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        format!("{}/{}:generateContent", self.base_url, model_resource)
    }

    fn request_body(prompt: &str, declarations: &[FunctionDeclaration]) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });
        if !declarations.is_empty() {
            body["tools"] = gemini_tools(declarations);
        }
        body
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
}

impl From<GenerateContentResponse> for ModelReply {
    fn from(response: GenerateContentResponse) -> Self {
        let parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let mut text = String::new();
        let mut function_calls = Vec::new();
        for part in parts {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(call) = part.function_call {
                function_calls.push(call.name);
            }
        }

        ModelReply {
            text: (!text.is_empty()).then_some(text),
            function_calls,
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str, declarations: &[FunctionDeclaration]) -> Result<ModelReply> {
        let endpoint = self.endpoint();
        debug!("POST {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(prompt, declarations))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    Error::Generation(format!("could not reach Gemini at {}: {e}", self.base_url))
                } else {
                    Error::Generation(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::Generation(
                "Gemini authentication failed. Check GEMINI_API_KEY".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!("Gemini API returned {status}: {body}")));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("failed to parse Gemini response JSON: {e}")))?;

        let reply = ModelReply::from(payload);
        if reply.text.is_none() && reply.function_calls.is_empty() {
            return Err(Error::Generation("Gemini returned no candidates".to_string()));
        }

        info!("Model replied ({} function calls)", reply.function_calls.len());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use manimator_core::schema::{ToolDescriptor, to_function_declarations};

    const PATH: &str = "/v1beta/models/gemini-test:generateContent";

    fn model(server: &MockServer) -> GeminiModel {
        GeminiModel::new("test-key", "gemini-test", format!("{}/v1beta/", server.base_url())).unwrap()
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_tools() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(PATH)
                .query_param("key", "test-key")
                .body_contains("\"functionDeclarations\"")
                .body_contains("\"execute_manim_code\"")
                .body_contains("a blue circle growing");
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [
                            { "text": "```python\nclass CircleGrow(Scene):\n" },
                            { "text": "    pass\n```" }
                        ]
                    }
                }]
            }));
        });

        let declarations = to_function_declarations(&[ToolDescriptor::new(
            "execute_manim_code",
            "Render",
            json!({ "type": "object", "title": "ExecuteManimCodeRequest" }),
        )]);

        let reply = model(&server)
            .generate("Description: a blue circle growing", &declarations)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(
            reply.text.as_deref(),
            Some("```python\nclass CircleGrow(Scene):\n    pass\n```")
        );
    }

    #[tokio::test]
    async fn test_function_call_reply() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "functionCall": { "name": "execute_manim_code", "args": {} } }]
                    }
                }]
            }));
        });

        let reply = model(&server).generate("p", &[]).await.unwrap();
        assert_eq!(reply.text, None);
        assert_eq!(reply.function_calls, ["execute_manim_code"]);
    }

    #[tokio::test]
    async fn test_no_candidates_is_generation_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(json!({ "candidates": [] }));
        });

        let err = model(&server).generate("p", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[tokio::test]
    async fn test_auth_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(403).json_body(json!({ "error": { "message": "API key not valid" } }));
        });

        let err = model(&server).generate("p", &[]).await.unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_request_body_omits_empty_tools() {
        let body = GeminiModel::request_body("hi", &[]);
        assert!(body.get("tools").is_none());
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
    }
}
