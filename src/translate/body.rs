//! JSON body encoding for write requests.
//!
//! Objects become `-f key=value` flags. Arrays cannot be expressed as flags,
//! so they are piped to the program verbatim with `--input -`.

use serde_json::{Map, Value};

use crate::error::{TransportError, TransportResult};
use crate::translate::request::CommandSpec;

/// Shape of a decoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyShape {
    /// A JSON object; duplicate keys keep the last value.
    Fields(Map<String, Value>),
    /// A JSON array, sent as piped input.
    Items,
    /// Any other JSON value.
    Unrecognized(&'static str),
}

impl BodyShape {
    /// Decode `body` and classify it.
    pub fn parse(body: &[u8]) -> TransportResult<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| TransportError::MalformedBody(e.to_string()))?;

        Ok(match value {
            Value::Object(fields) => BodyShape::Fields(fields),
            Value::Array(_) => BodyShape::Items,
            Value::String(_) => BodyShape::Unrecognized("string"),
            Value::Number(_) => BodyShape::Unrecognized("number"),
            Value::Bool(_) => BodyShape::Unrecognized("boolean"),
            Value::Null => BodyShape::Unrecognized("null"),
        })
    }
}

/// Append the encoding of `body` to `command`.
///
/// Nothing is appended when the body is rejected.
pub fn encode_body(body: &[u8], command: &mut CommandSpec) -> TransportResult<()> {
    match BodyShape::parse(body)? {
        BodyShape::Fields(fields) => {
            let mut flags = Vec::with_capacity(fields.len() * 2);
            for (key, value) in fields {
                let Value::String(text) = value else {
                    return Err(TransportError::MalformedBody(format!(
                        "field `{key}` is not a string"
                    )));
                };
                flags.push("-f".to_string());
                flags.push(format!("{key}={text}"));
            }
            command.args.extend(flags);
            Ok(())
        }
        BodyShape::Items => {
            command.stdin = Some(body.to_vec());
            command.args.push("--input".to_string());
            command.args.push("-".to_string());
            Ok(())
        }
        BodyShape::Unrecognized(kind) => Err(TransportError::MalformedBody(format!(
            "expected an object or array, got {kind}"
        ))),
    }
}
