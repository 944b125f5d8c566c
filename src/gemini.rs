// Gemini adapter: a small blocking client for the `generateContent` REST
// endpoint. Only the single-prompt, single-answer form is used.

use crate::error::ServiceError;
use crate::recommend::TextModel;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder().build()?;
        Ok(GeminiClient {
            client,
            base_url: GEMINI_BASE_URL.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Point the client at a different host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

impl TextModel for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let body = GenerateRequest {
            contents: [Content { parts: [Part { text: prompt }] }],
        };
        debug!(model = %self.model, "calling generateContent");
        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = res.status();
        let txt = res.text()?;
        if !status.is_success() {
            return Err(ServiceError::from_body(status.as_u16(), &txt, error_message));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&txt).map_err(|e| ServiceError::Decode(e.to_string()))?;
        extract_text(parsed)
    }
}

fn error_message(v: &serde_json::Value) -> Option<&str> {
    v["error"]["message"].as_str()
}

fn extract_text(resp: GenerateResponse) -> Result<String, ServiceError> {
    let mut finish_reason = None;
    if let Some(candidate) = resp.candidates.into_iter().next() {
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if !text.is_empty() {
            return Ok(text);
        }
        finish_reason = candidate.finish_reason;
    }

    let reason = resp
        .prompt_feedback
        .and_then(|f| f.block_reason)
        .map(|r| format!("prompt blocked ({})", r))
        .or_else(|| finish_reason.map(|r| format!("no text returned (finish reason {})", r)))
        .unwrap_or_else(|| "no candidates returned".into());
    Err(ServiceError::EmptyResponse(reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let resp = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"1. 가"},{"text":"\n2. 나"}],"role":"model"},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(extract_text(resp).unwrap(), "1. 가\n2. 나");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let resp = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        let err = extract_text(resp).unwrap_err();
        assert_eq!(err.to_string(), "empty response: prompt blocked (SAFETY)");
    }

    #[test]
    fn candidate_without_text_reports_finish_reason() {
        let resp = parse(r#"{"candidates":[{"finishReason":"RECITATION"}]}"#);
        let err = extract_text(resp).unwrap_err();
        assert!(err.to_string().contains("RECITATION"));
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new("k", "gemini-1.5-flash")
            .unwrap()
            .with_base_url("http://localhost:1234/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
