use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::tail::ReverseLines;

/// Represents a transcript line. Only the message body matters here; its
/// shape differs between user, assistant and system records.
#[derive(Debug, Deserialize)]
struct TranscriptLine {
    message: Option<Value>,
}

impl TranscriptLine {
    /// Trimmed text of the first content block, if it is non-empty.
    fn first_text(&self) -> Option<&str> {
        let content = self.message.as_ref()?.get("content")?.as_array()?;
        let text = content.first()?.get("text")?.as_str()?.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// Find the most recent message text in a transcript, scanning from the end.
///
/// Returns the trimmed text of the first content block of the newest record
/// that has one. Blank lines, malformed JSON and records without text are
/// skipped. Scanning stops at the first match, so the rest of the file is
/// never read. Falls back to `default` when the file is missing or nothing
/// qualifies.
pub fn last_message(transcript_path: &Path, default: &str) -> String {
    let lines = match ReverseLines::open(transcript_path) {
        Ok(lines) => lines,
        Err(e) => {
            tracing::warn!(path = %transcript_path.display(), "failed to open transcript: {e}");
            return default.to_string();
        }
    };

    for line in lines {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(path = %transcript_path.display(), "failed to read transcript: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let entry: TranscriptLine = match serde_json::from_str(&line) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping unparseable transcript line: {e}");
                continue;
            }
        };

        if let Some(text) = entry.first_text() {
            return text.to_string();
        }
    }

    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn transcript(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_nonexistent_transcript() {
        let message = last_message(Path::new("/nonexistent/path.jsonl"), "D");
        assert_eq!(message, "D");
    }

    #[test]
    fn test_empty_file_returns_default() {
        let file = transcript(&[]);
        assert_eq!(last_message(file.path(), "default"), "default");
    }

    #[test]
    fn test_blank_and_malformed_lines_return_default() {
        let file = transcript(&["", "   ", "not json", "{\"message\":", "42", "[1,2]"]);
        assert_eq!(last_message(file.path(), "default"), "default");
    }

    #[test]
    fn test_whitespace_text_is_skipped() {
        let file = transcript(&[
            r#"{"message":{"content":[{"text":"  "}]}}"#,
            r#"{"message":{"content":[{"text":"hello"}]}}"#,
        ]);
        assert_eq!(last_message(file.path(), "default"), "hello");
    }

    #[test]
    fn test_newest_qualifying_record_wins() {
        let file = transcript(&[
            r#"{"message":{"content":[{"text":"older"}]}}"#,
            r#"{"message":{"content":[{"text":"  newest  "}]}}"#,
            r#"{"message":{"content":[{"text":"   "}]}}"#,
            r#"{"message":{"content":[]}}"#,
            r#"{"message":{"content":"plain string content"}}"#,
            r#"{"type":"summary"}"#,
            "garbage",
            "",
        ]);
        assert_eq!(last_message(file.path(), "default"), "newest");
    }

    #[test]
    fn test_only_first_content_block_is_inspected() {
        let file = transcript(&[
            r#"{"message":{"content":[{"text":"earlier"}]}}"#,
            r#"{"message":{"content":[{"type":"tool_use","name":"Bash"},{"text":"second block"}]}}"#,
        ]);
        assert_eq!(last_message(file.path(), "default"), "earlier");
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "{}\n{}",
            r#"{"message":{"content":[{"text":"first"}]}}"#,
            r#"{"message":{"content":[{"text":"unterminated"}]}}"#
        )
        .unwrap();
        assert_eq!(last_message(file.path(), "default"), "unterminated");
    }

    #[test]
    fn test_non_string_text_is_skipped() {
        let file = transcript(&[
            r#"{"message":{"content":[{"text":"fine"}]}}"#,
            r#"{"message":{"content":[{"text":17}]}}"#,
            r#"{"message":{"content":[null]}}"#,
        ]);
        assert_eq!(last_message(file.path(), "default"), "fine");
    }
}
