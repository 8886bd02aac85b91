use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::{GenerativeBackend, Part};

/// REST client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

// Gemini API request types
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    InlineData { inline_data: InlineData<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

// Gemini API response types
#[derive(Deserialize, Debug, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
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
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiClient {
    pub fn new(api_base: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, model)
    }
}

#[async_trait(?Send)]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, model: &str, parts: Vec<Part>) -> Result<String> {
        let body = GenerateRequest {
            contents: [Content {
                parts: parts.iter().map(request_part).collect(),
            }],
        };

        let response = self
            .client
            .post(self.endpoint_for_model(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(anyhow!(describe_error(status.as_u16(), &text)));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).context("Gemini response was not valid JSON")?;
        Ok(extract_text(parsed))
    }
}

fn request_part(part: &Part) -> RequestPart<'_> {
    match part {
        Part::InlineData { mime_type, data } => RequestPart::InlineData {
            inline_data: InlineData { mime_type, data },
        },
        Part::Text(text) => RequestPart::Text { text },
    }
}

/// Concatenated text of the first candidate, empty when there is none.
fn extract_text(response: GenerateResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Error text for a non-2xx reply.
///
/// The canonical status is appended with spaces (`PERMISSION DENIED`) so the
/// keyword classifier can match on it.
fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("{} ({})", envelope.error.message, code.replace('_', " ")),
            None => envelope.error.message,
        },
        Err(_) => format!("Gemini error {status}: {body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_puts_image_before_prompt() {
        let parts = vec![
            Part::InlineData {
                mime_type: "image/png".into(),
                data: "aGVsbG8=".into(),
            },
            Part::Text("What emotion?".into()),
        ];
        let body = GenerateRequest {
            contents: [Content {
                parts: parts.iter().map(request_part).collect(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "contents": [{
                    "parts": [
                        { "inline_data": { "mime_type": "image/png", "data": "aGVsbG8=" } },
                        { "text": "What emotion?" }
                    ]
                }]
            })
        );
    }

    #[test]
    fn extracts_text_from_first_candidate() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Hap"},{"text":"py"}],"role":"model"}},{"content":{"parts":[{"text":"Sad"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(extract_text(parsed), "Happy");
    }

    #[test]
    fn missing_candidates_yield_empty_text() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(extract_text(parsed), "");

        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(extract_text(parsed), "");
    }

    #[test]
    fn error_envelope_is_flattened_for_classification() {
        let body = r#"{"error":{"code":403,"message":"Method doesn't allow unregistered callers.","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(
            describe_error(403, body),
            "Method doesn't allow unregistered callers. (PERMISSION DENIED)"
        );
    }

    #[test]
    fn non_json_error_keeps_status_and_body() {
        assert_eq!(
            describe_error(502, "Bad Gateway"),
            "Gemini error 502: Bad Gateway"
        );
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new("https://example.test/", "key");
        assert_eq!(
            client.endpoint_for_model("gemini-test"),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }
}
