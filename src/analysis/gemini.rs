//! Gemini notes provider.
//!
//! Sends the media payload inline (base64) together with the analysis
//! instruction and a response schema constraining the model's output to
//! the four-field notes document. One round trip per call; no retries.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use super::error::NotesError;
use super::notes::{parse_notes, MeetingNotes};
use super::{ensure_supported_media, NotesProvider};
use crate::capture::MediaCapture;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const ANALYSIS_PROMPT: &str = "You are an expert meeting assistant. Please analyze the provided meeting recording and provide the output in the specified JSON format.
    1.  **Transcription**: Transcribe the audio accurately. You MUST identify and differentiate between speakers, labeling them sequentially as 'Speaker 1', 'Speaker 2', and so on. The transcription must be an array of objects, where each object contains a 'speaker' and a 'quote'.
    2.  **Summary**: Write a concise summary of the key decisions, outcomes, and main topics.
    3.  **Action Items**: List all clear action items. For each item, identify the task and the owner. The owner can be a specific name or a speaker label (e.g., 'Speaker 1'). If no one is assigned, use 'Unassigned'.
    4.  **Discussion Points**: List the main topics or questions that were discussed.";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Media {
        #[serde(rename = "inline_data")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mime_type")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    status: Option<String>,
    code: Option<i64>,
}

pub struct GeminiNotesProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiNotesProvider {
    pub fn new(api_key: String, model: Option<String>, endpoint: Option<String>) -> Self {
        let client = reqwest::Client::new();
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        info!(
            "Initialized Gemini notes provider: model={}, endpoint={}",
            model, endpoint
        );

        Self {
            client,
            endpoint,
            api_key,
            model,
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    fn build_request(&self, capture: &MediaCapture) -> GenerateRequest {
        GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Media {
                        inline_data: InlineData {
                            mime_type: capture.mime_type.clone(),
                            data: BASE64.encode(&capture.bytes),
                        },
                    },
                    RequestPart::Text {
                        text: ANALYSIS_PROMPT.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: notes_response_schema(),
            },
        }
    }
}

#[async_trait::async_trait]
impl NotesProvider for GeminiNotesProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn generate(&self, capture: &MediaCapture) -> Result<MeetingNotes, NotesError> {
        ensure_supported_media(capture)?;

        info!(
            "Generating meeting notes for '{}' ({}, {} bytes)",
            capture.name,
            capture.mime_type,
            capture.size_bytes()
        );

        let body = self.build_request(capture);

        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(NotesError::Request)?;

        let status = response.status();
        let response_text = response.text().await.map_err(NotesError::Request)?;

        if !status.is_success() {
            error!(
                "Notes request failed with status {}: {}",
                status, response_text
            );

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&response_text) {
                return Err(NotesError::Service(format!(
                    "{} (status: {:?}, code: {:?})",
                    error_response.error.message,
                    error_response.error.status,
                    error_response.error.code
                )));
            }

            return Err(NotesError::Service(format!(
                "request failed with status {status}: {response_text}"
            )));
        }

        let envelope: GenerateResponse = serde_json::from_str(&response_text).map_err(|e| {
            NotesError::MalformedResponse(format!("unexpected response envelope: {e}"))
        })?;

        let json_text = envelope
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| {
                NotesError::MalformedResponse("response contained no text candidate".to_string())
            })?;

        debug!("Raw notes payload: {}", json_text);

        let notes = parse_notes(json_text.trim())?;
        info!(
            "Notes generated: {} action items, {} discussion points, {} transcript entries",
            notes.action_items.len(),
            notes.discussion_points.len(),
            notes.transcription.len()
        );

        Ok(notes)
    }
}

/// Schema declaration sent with every request, constraining the model to
/// the four-field notes document.
fn notes_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A concise summary of the key decisions, outcomes, and main topics of the meeting."
            },
            "actionItems": {
                "type": "ARRAY",
                "description": "A list of clear action items from the meeting.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "task": {
                            "type": "STRING",
                            "description": "The specific action or task that needs to be completed."
                        },
                        "owner": {
                            "type": "STRING",
                            "description": "The person, team, or speaker label (e.g., 'Speaker 1') assigned to the task. If not mentioned, state 'Unassigned'."
                        }
                    },
                    "required": ["task", "owner"]
                }
            },
            "discussionPoints": {
                "type": "ARRAY",
                "description": "A list of the main topics or questions that were discussed.",
                "items": { "type": "STRING" }
            },
            "transcription": {
                "type": "ARRAY",
                "description": "Full and accurate transcription of the meeting audio. Each part of the dialogue should be an object with a speaker label and their corresponding quote.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "speaker": {
                            "type": "STRING",
                            "description": "The identified speaker label (e.g., 'Speaker 1', 'Speaker 2', or a person's name if identifiable)."
                        },
                        "quote": {
                            "type": "STRING",
                            "description": "The transcribed text spoken by the speaker."
                        }
                    },
                    "required": ["speaker", "quote"]
                }
            }
        },
        "required": ["summary", "actionItems", "discussionPoints", "transcription"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiNotesProvider {
        GeminiNotesProvider::new("test-key".to_string(), None, None)
    }

    #[tokio::test]
    async fn test_unsupported_mime_fails_before_network() {
        // Endpoint is unroutable; reaching it would fail differently.
        let provider = GeminiNotesProvider::new(
            "test-key".to_string(),
            None,
            Some("http://127.0.0.1:1/api".to_string()),
        );
        let capture = MediaCapture::new(b"plain text".to_vec(), "text/plain", "notes.txt");

        let err = provider.generate(&capture).await.unwrap_err();
        assert!(matches!(err, NotesError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_request_url_includes_model() {
        let provider = provider();
        assert_eq!(
            provider.request_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_url_trims_trailing_slash() {
        let provider = GeminiNotesProvider::new(
            "k".to_string(),
            Some("gemini-2.0-flash".to_string()),
            Some("https://example.com/v1beta/".to_string()),
        );
        assert_eq!(
            provider.request_url(),
            "https://example.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_build_request_shape() {
        let provider = provider();
        let capture = MediaCapture::new(vec![1, 2, 3], "audio/wav", "recording.wav");

        let request = provider.build_request(&capture);
        let value = serde_json::to_value(&request).unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inline_data"]["mime_type"], "audio/wav");
        assert_eq!(parts[0]["inline_data"]["data"], BASE64.encode([1u8, 2, 3]));
        assert!(parts[1]["text"]
            .as_str()
            .unwrap()
            .contains("meeting assistant"));
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let required = value["generationConfig"]["responseSchema"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 4);
    }

    #[test]
    fn test_candidate_text_extraction() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"x\":1}" }] }
            }]
        })
        .to_string();
        let envelope: GenerateResponse = serde_json::from_str(&body).unwrap();
        let text = envelope
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text);
        assert_eq!(text.as_deref(), Some("{\"x\":1}"));
    }

    #[test]
    fn test_error_body_parses() {
        let body = r#"{"error": {"message": "API key not valid", "status": "INVALID_ARGUMENT", "code": 400}}"#;
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "API key not valid");
        assert_eq!(parsed.error.code, Some(400));
    }
}
