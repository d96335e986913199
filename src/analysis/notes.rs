//! Structured meeting notes returned by the analysis service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::NotesError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default)]
    pub task: String,
    /// Person, team or speaker label. The remote service is instructed to
    /// use "Unassigned" when nobody is named; this is not enforced locally.
    #[serde(default)]
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub quote: String,
}

/// The four-field notes document. Field order within the lists is the
/// order the service returned them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingNotes {
    pub summary: String,
    pub action_items: Vec<ActionItem>,
    pub discussion_points: Vec<String>,
    pub transcription: Vec<TranscriptEntry>,
}

/// Parse service output into `MeetingNotes`.
///
/// The shape check matches the upstream contract: `summary` must be a
/// non-empty string and the three list fields must be arrays. Emptiness of
/// the lists is allowed, and per-item field completeness is deliberately
/// not checked (missing item fields default to empty strings).
pub fn parse_notes(json_text: &str) -> Result<MeetingNotes, NotesError> {
    let value: Value = serde_json::from_str(json_text)
        .map_err(|e| NotesError::MalformedResponse(format!("response is not valid JSON: {e}")))?;

    check_shape(&value)?;

    serde_json::from_value(value)
        .map_err(|e| NotesError::MalformedResponse(format!("unexpected field type: {e}")))
}

fn check_shape(value: &Value) -> Result<(), NotesError> {
    let summary_ok = value
        .get("summary")
        .and_then(Value::as_str)
        .map(|s| !s.is_empty())
        .unwrap_or(false);
    if !summary_ok {
        return Err(NotesError::MalformedResponse(
            "summary is missing or empty".to_string(),
        ));
    }

    for field in ["actionItems", "discussionPoints", "transcription"] {
        if !value.get(field).map(Value::is_array).unwrap_or(false) {
            return Err(NotesError::MalformedResponse(format!(
                "{field} is missing or not a list"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> String {
        serde_json::json!({
            "summary": "The team agreed to ship Friday.",
            "actionItems": [
                {"task": "Update the changelog", "owner": "Speaker 1"},
                {"task": "Tag the release", "owner": "Unassigned"}
            ],
            "discussionPoints": ["Release timing", "Support rota"],
            "transcription": [
                {"speaker": "Speaker 1", "quote": "Can we ship Friday?"},
                {"speaker": "Speaker 2", "quote": "Yes, if QA signs off."}
            ]
        })
        .to_string()
    }

    #[test]
    fn test_parse_notes_preserves_order() {
        let notes = parse_notes(&valid_json()).unwrap();
        assert_eq!(notes.summary, "The team agreed to ship Friday.");
        assert_eq!(notes.action_items.len(), 2);
        assert_eq!(notes.action_items[0].task, "Update the changelog");
        assert_eq!(notes.action_items[1].owner, "Unassigned");
        assert_eq!(
            notes.discussion_points,
            vec!["Release timing", "Support rota"]
        );
        assert_eq!(notes.transcription[1].speaker, "Speaker 2");
    }

    #[test]
    fn test_parse_notes_missing_summary() {
        let json = r#"{"actionItems": [], "discussionPoints": [], "transcription": []}"#;
        let err = parse_notes(json).unwrap_err();
        assert!(matches!(err, NotesError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_notes_empty_summary() {
        let json = r#"{"summary": "", "actionItems": [], "discussionPoints": [], "transcription": []}"#;
        assert!(parse_notes(json).is_err());
    }

    #[test]
    fn test_parse_notes_non_array_field() {
        let json =
            r#"{"summary": "ok", "actionItems": "none", "discussionPoints": [], "transcription": []}"#;
        let err = parse_notes(json).unwrap_err();
        assert!(err.to_string().contains("actionItems"));
    }

    #[test]
    fn test_parse_notes_empty_lists_are_valid() {
        let json = r#"{"summary": "Quiet meeting.", "actionItems": [], "discussionPoints": [], "transcription": []}"#;
        let notes = parse_notes(json).unwrap();
        assert!(notes.action_items.is_empty());
        assert!(notes.discussion_points.is_empty());
        assert!(notes.transcription.is_empty());
    }

    #[test]
    fn test_parse_notes_incomplete_items_default() {
        // Item-level completeness is not validated; missing fields default.
        let json = r#"{"summary": "ok", "actionItems": [{"task": "Follow up"}], "discussionPoints": [], "transcription": [{"speaker": "Speaker 1"}]}"#;
        let notes = parse_notes(json).unwrap();
        assert_eq!(notes.action_items[0].owner, "");
        assert_eq!(notes.transcription[0].quote, "");
    }

    #[test]
    fn test_parse_notes_not_json() {
        assert!(parse_notes("sorry, I cannot do that").is_err());
    }

    #[test]
    fn test_notes_round_trip_wire_names() {
        let notes = parse_notes(&valid_json()).unwrap();
        let serialized = serde_json::to_value(&notes).unwrap();
        assert!(serialized.get("actionItems").is_some());
        assert!(serialized.get("discussionPoints").is_some());
    }
}
