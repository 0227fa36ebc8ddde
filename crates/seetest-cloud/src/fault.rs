//! Classification of HTTP responses into success bodies or transport errors.

use crate::error::TransportError;
use serde_json::Value;

/// Characters stripped from server error messages before display.
const MESSAGE_NOISE: [char; 3] = ['"', '{', '}'];

/// Turn a completed response into its body or a [`TransportError`].
///
/// Status 0 stands for "no response", which is how transports without a
/// status line report connection failures.
pub fn classify(url: &str, status: u16, body: String) -> Result<String, TransportError> {
    match status {
        0 => Err(TransportError::Unreachable {
            url: url.to_string(),
            message: body,
        }),
        401 => Err(TransportError::Unauthorized { body }),
        403 => Err(TransportError::Forbidden { body }),
        400..=599 => {
            let message = if body.trim().is_empty() {
                None
            } else {
                Some(server_message(&body))
            };
            Err(TransportError::Status {
                status,
                message,
                body,
            })
        }
        _ => Ok(body),
    }
}

/// Extract the human-readable part of an error body.
///
/// The server puts it in `data`, falling back to `message`. Bodies that are
/// not JSON, or have neither member, are shown as-is.
fn server_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    let member = ["data", "message"]
        .into_iter()
        .find_map(|name| value.get(name).filter(|v| !v.is_null()));

    match member {
        Some(Value::String(text)) => clean(text),
        Some(other) => clean(
            &serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        ),
        None => body.trim().to_string(),
    }
}

fn clean(text: &str) -> String {
    text.replace(MESSAGE_NOISE, "").trim().to_string()
}
