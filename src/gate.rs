use glob::Pattern;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::GateConfig;
use crate::messages::Messages;

/// How much of a file is inspected to decide whether it is UTF-8
const SAMPLE_SIZE: u64 = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { reason: String },
}

/// Hook output for a denied tool call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutput {
    pub decision: &'static str,
    pub reason: String,
    pub suppress_output: bool,
}

impl Decision {
    /// JSON line to print, only for denials. No output means allow.
    pub fn output(&self) -> Option<DecisionOutput> {
        match self {
            Decision::Allow => None,
            Decision::Deny { reason } => Some(DecisionOutput {
                decision: "deny",
                reason: reason.clone(),
                suppress_output: true,
            }),
        }
    }
}

/// Decide whether a file tool call may go ahead.
///
/// Reads of files that are not UTF-8 and writes of files that must stay in
/// the legacy encoding are denied, so they go through the encoding-aware
/// MCP servers instead.
pub fn evaluate(
    tool_name: Option<&str>,
    file_path: Option<&Path>,
    gate: &GateConfig,
    messages: &Messages,
) -> Decision {
    let Some(file_path) = file_path else {
        return Decision::Allow;
    };

    match tool_name {
        Some("Read") => match is_utf8_file(file_path) {
            Ok(true) => Decision::Allow,
            Ok(false) => Decision::Deny {
                reason: messages.gate_read_reason(&gate.legacy_encoding),
            },
            Err(e) => {
                tracing::debug!(path = %file_path.display(), "cannot inspect file encoding: {e}");
                Decision::Allow
            }
        },
        Some("Write") if matches_any(file_path, &gate.legacy_write_globs) => Decision::Deny {
            reason: messages.gate_write_reason(&gate.legacy_encoding),
        },
        _ => Decision::Allow,
    }
}

/// Whether the first `SAMPLE_SIZE` bytes of the file are valid UTF-8. A
/// multi-byte character cut off by the end of the sample still counts.
fn is_utf8_file(path: &Path) -> std::io::Result<bool> {
    let mut sample = Vec::new();
    File::open(path)?.take(SAMPLE_SIZE).read_to_end(&mut sample)?;
    Ok(match std::str::from_utf8(&sample) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && sample.len() as u64 == SAMPLE_SIZE,
    })
}

/// Check the path, then its file name, against each glob
fn matches_any(path: &Path, globs: &[String]) -> bool {
    let file_name = path.file_name().map(|n| n.to_string_lossy());
    globs.iter().any(|glob| match Pattern::new(glob) {
        Ok(pattern) => {
            pattern.matches_path(path)
                || file_name
                    .as_deref()
                    .is_some_and(|name| pattern.matches(name))
        }
        Err(e) => {
            tracing::warn!("invalid glob pattern '{}': {}", glob, e);
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Locale;
    use std::fs;
    use tempfile::TempDir;

    fn decide(tool: &str, path: &Path) -> Decision {
        evaluate(
            Some(tool),
            Some(path),
            &GateConfig::default(),
            Locale::En.messages(),
        )
    }

    #[test]
    fn test_read_utf8_file_allowed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        fs::write(&path, "hello 안녕하세요\n").unwrap();
        assert_eq!(decide("Read", &path), Decision::Allow);
    }

    #[test]
    fn test_read_euc_kr_file_denied() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("legacy.cpp");
        // "안녕" in EUC-KR
        fs::write(&path, [0xBE, 0xC8, 0xB3, 0xE7, b'\n']).unwrap();

        let decision = decide("Read", &path);
        assert_eq!(
            decision,
            Decision::Deny {
                reason: "File encoding is EUC-KR. Use the Read MCP server.".to_string()
            }
        );
    }

    #[test]
    fn test_read_missing_file_allowed() {
        assert_eq!(
            decide("Read", Path::new("/nonexistent/file.cpp")),
            Decision::Allow
        );
    }

    #[test]
    fn test_utf8_cut_at_sample_boundary_allowed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("big.txt");
        // 3-byte characters, so SAMPLE_SIZE (not a multiple of 3) cuts one in half
        let content = "가".repeat(SAMPLE_SIZE as usize / 3 + 10);
        fs::write(&path, content).unwrap();
        assert_eq!(decide("Read", &path), Decision::Allow);
    }

    #[test]
    fn test_truncated_utf8_at_end_of_small_file_denied() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("short.txt");
        fs::write(&path, [b'a', 0xEA, 0xB0]).unwrap();
        assert!(matches!(decide("Read", &path), Decision::Deny { .. }));
    }

    #[test]
    fn test_write_legacy_sources_denied() {
        for path in ["/src/engine/main.cpp", "include/engine.h", "widget.h"] {
            assert!(
                matches!(decide("Write", Path::new(path)), Decision::Deny { .. }),
                "{} should be denied",
                path
            );
        }
        assert_eq!(decide("Write", Path::new("/src/main.rs")), Decision::Allow);
        assert_eq!(decide("Write", Path::new("/src/header.hpp")), Decision::Allow);
    }

    #[test]
    fn test_other_tools_allowed() {
        assert_eq!(decide("Edit", Path::new("main.cpp")), Decision::Allow);
        assert_eq!(
            evaluate(None, None, &GateConfig::default(), Locale::En.messages()),
            Decision::Allow
        );
    }

    #[test]
    fn test_invalid_glob_is_ignored() {
        let gate = GateConfig {
            legacy_write_globs: vec!["[".to_string(), "*.c".to_string()],
            ..GateConfig::default()
        };
        let messages = Locale::En.messages();
        assert!(matches!(
            evaluate(Some("Write"), Some(Path::new("a.c")), &gate, messages),
            Decision::Deny { .. }
        ));
        assert_eq!(
            evaluate(Some("Write"), Some(Path::new("a.cpp")), &gate, messages),
            Decision::Allow
        );
    }

    #[test]
    fn test_deny_output_shape() {
        let output = Decision::Deny {
            reason: "nope".to_string(),
        }
        .output()
        .unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"decision": "deny", "reason": "nope", "suppressOutput": true})
        );
        assert!(Decision::Allow.output().is_none());
    }
}
