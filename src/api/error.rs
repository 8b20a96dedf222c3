//! Classification of unsuccessful responses.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::OpenfilesError;

const MAX_MESSAGE_LEN: usize = 512;

/// One entry of a request validation failure reported by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationIssue {
    /// Location of the offending input, e.g. `["body", "bag_id"]`
    pub loc: Vec<Value>,
    /// Human-readable message
    pub msg: String,
    /// Machine-readable error type
    #[serde(rename = "type")]
    pub kind: String,
}

impl ValidationIssue {
    fn describe(&self) -> String {
        let location = self
            .loc
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" -> ");
        format!("{}: {} ({})", location, self.msg, self.kind)
    }
}

/// Map a non-success status and its body onto the error taxonomy.
pub(crate) fn error_from_response(status: StatusCode, body: &[u8]) -> OpenfilesError {
    let message = error_message(status, body);
    let status = status.as_u16();
    match status {
        401 | 403 => OpenfilesError::Auth { status, message },
        404 => OpenfilesError::NotFound { status, message },
        _ => OpenfilesError::Service { status, message },
    }
}

/// Extract the service-provided message from an error body.
pub(crate) fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<Value>(body) {
        return match json.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(detail @ Value::Array(_)) => {
                match serde_json::from_value::<Vec<ValidationIssue>>(detail.clone()) {
                    Ok(issues) if !issues.is_empty() => issues
                        .iter()
                        .map(ValidationIssue::describe)
                        .collect::<Vec<_>>()
                        .join("\n"),
                    Ok(_) => "Unknown validation error".to_string(),
                    Err(_) => truncate(&json.to_string()),
                }
            }
            _ => truncate(&json.to_string()),
        };
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        truncate(text)
    }
}

fn truncate(text: &str) -> String {
    if text.len() <= MAX_MESSAGE_LEN {
        return text.to_string();
    }
    let mut end = MAX_MESSAGE_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
