//! Terminal rendering of meeting notes.
//!
//! Pure presentation over a `MeetingNotes`: no state, no side effects.

use crate::analysis::MeetingNotes;

pub const NO_ACTION_ITEMS: &str = "No specific action items were identified.";
pub const NO_DISCUSSION_POINTS: &str = "No specific discussion points were extracted.";
pub const NO_TRANSCRIPTION: &str = "No transcription available.";

/// Render the four sections as plain text in the order the service
/// returned them.
pub fn render_text(notes: &MeetingNotes) -> String {
    let mut out = String::new();

    out.push_str("Meeting Notes\n");
    out.push_str("=============\n\n");

    out.push_str("Summary\n\n");
    out.push_str(notes.summary.trim());
    out.push_str("\n\n");

    out.push_str("Action Items\n\n");
    if notes.action_items.is_empty() {
        out.push_str(NO_ACTION_ITEMS);
        out.push('\n');
    } else {
        for (index, item) in notes.action_items.iter().enumerate() {
            out.push_str(&format!("{}. {}\n   Owner: {}\n", index + 1, item.task, item.owner));
        }
    }
    out.push('\n');

    out.push_str("Discussion Highlights\n\n");
    if notes.discussion_points.is_empty() {
        out.push_str(NO_DISCUSSION_POINTS);
        out.push('\n');
    } else {
        for point in &notes.discussion_points {
            out.push_str(&format!("- {}\n", point));
        }
    }
    out.push('\n');

    out.push_str("Full Transcription\n\n");
    if notes.transcription.is_empty() {
        out.push_str(NO_TRANSCRIPTION);
        out.push('\n');
    } else {
        for entry in &notes.transcription {
            out.push_str(&format!("{}: {}\n", entry.speaker, entry.quote));
        }
    }

    out
}

/// Render as pretty-printed JSON with the wire field names.
pub fn render_json(notes: &MeetingNotes) -> String {
    serde_json::to_string_pretty(notes).unwrap_or_else(|_| render_text(notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ActionItem, TranscriptEntry};

    fn notes_with(
        action_items: Vec<ActionItem>,
        discussion_points: Vec<String>,
        transcription: Vec<TranscriptEntry>,
    ) -> MeetingNotes {
        MeetingNotes {
            summary: "Decided to ship Friday.".to_string(),
            action_items,
            discussion_points,
            transcription,
        }
    }

    #[test]
    fn test_render_counts_match_input_in_order() {
        let notes = notes_with(
            vec![
                ActionItem {
                    task: "Update the changelog".to_string(),
                    owner: "Speaker 1".to_string(),
                },
                ActionItem {
                    task: "Tag the release".to_string(),
                    owner: "Unassigned".to_string(),
                },
                ActionItem {
                    task: "Notify support".to_string(),
                    owner: "Dana".to_string(),
                },
            ],
            vec!["Release timing".to_string()],
            vec![TranscriptEntry {
                speaker: "Speaker 1".to_string(),
                quote: "Can we ship Friday?".to_string(),
            }],
        );

        let text = render_text(&notes);
        assert!(text.contains("1. Update the changelog"));
        assert!(text.contains("2. Tag the release"));
        assert!(text.contains("3. Notify support"));
        assert!(text.contains("Owner: Unassigned"));
        assert!(text.contains("- Release timing"));
        assert!(text.contains("Speaker 1: Can we ship Friday?"));

        let first = text.find("1. Update the changelog").unwrap();
        let third = text.find("3. Notify support").unwrap();
        assert!(first < third);
    }

    #[test]
    fn test_render_empty_list_fallbacks() {
        let notes = notes_with(
            vec![],
            vec![],
            vec![
                TranscriptEntry {
                    speaker: "Speaker 1".to_string(),
                    quote: "Hello.".to_string(),
                },
                TranscriptEntry {
                    speaker: "Speaker 2".to_string(),
                    quote: "Hi there.".to_string(),
                },
            ],
        );

        let text = render_text(&notes);
        assert!(text.contains(NO_ACTION_ITEMS));
        assert!(text.contains(NO_DISCUSSION_POINTS));
        assert!(!text.contains(NO_TRANSCRIPTION));

        let rows: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("Speaker "))
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "Speaker 1: Hello.");
        assert_eq!(rows[1], "Speaker 2: Hi there.");
    }

    #[test]
    fn test_render_empty_transcription_fallback() {
        let notes = notes_with(vec![], vec![], vec![]);
        let text = render_text(&notes);
        assert!(text.contains(NO_TRANSCRIPTION));
    }

    #[test]
    fn test_render_json_uses_wire_names() {
        let notes = notes_with(vec![], vec![], vec![]);
        let json = render_json(&notes);
        assert!(json.contains("\"actionItems\""));
        assert!(json.contains("\"discussionPoints\""));
        assert!(json.contains("\"transcription\""));
    }
}
