use serde_json::{Map, Value};
use thiserror::Error;

/// Ways a completion can fail to yield a JSON object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecoveryError {
    /// The completion contains no `{` ... `}` span at all.
    #[error("completion contains no JSON object span")]
    NoJsonObject,

    /// A candidate span exists but does not parse as a JSON object.
    #[error("completion is not parseable as a JSON object")]
    Unparsable,
}

/// Recovers a single JSON object from a model completion.
///
/// Pass 1 strips every triple-backtick fence marker (tagged ```json or bare)
/// anywhere in the text and parses what remains. Pass 2 parses the span from
/// the first `{` to the last `}` of the original text. Clean JSON survives
/// pass 1 unchanged; non-object JSON (arrays, scalars) is not accepted.
pub fn recover_json_object(text: &str) -> Result<Map<String, Value>, RecoveryError> {
    let stripped = text.replace("```json", "").replace("```", "");
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(stripped.trim()) {
        return Ok(map);
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => {
            match serde_json::from_str::<Value>(&text[start..=end]) {
                Ok(Value::Object(map)) => Ok(map),
                _ => Err(RecoveryError::Unparsable),
            }
        }
        _ => Err(RecoveryError::NoJsonObject),
    }
}
