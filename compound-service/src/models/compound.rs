use crate::error::CompoundError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Inbound body of `POST /api/compound`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CompoundRequest {
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub compound_name: Option<String>,
}

impl CompoundRequest {
    pub fn new(compound_name: impl Into<String>) -> Self {
        Self {
            compound_name: Some(compound_name.into()),
        }
    }

    /// Reads a request out of an arbitrary JSON body.
    ///
    /// A `compound_name` that is absent or not a string counts as missing; a
    /// body that is not an object is a server error.
    pub fn from_body(body: Value) -> Result<Self, CompoundError> {
        match body {
            Value::Object(mut fields) => Ok(Self {
                compound_name: match fields.remove("compound_name") {
                    Some(Value::String(name)) => Some(name),
                    _ => None,
                },
            }),
            other => {
                tracing::error!(body = %other, "Compound request body is not a JSON object");
                Err(CompoundError::ServerError(
                    "request body is not a JSON object".to_string(),
                ))
            }
        }
    }
}

/// Generated JSON text that passed the shape check.
///
/// `raw_text` is exactly what the generator produced after fence stripping;
/// it is never re-serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructurePayload {
    pub raw_text: String,
}

/// Outcome of one generation: the payload, or one entry of the failure taxonomy.
pub type GenerationResult = Result<StructurePayload, CompoundError>;

/// Success body of `POST /api/compound`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompoundData {
    pub data: String,
}

impl From<StructurePayload> for CompoundData {
    fn from(payload: StructurePayload) -> Self {
        Self {
            data: payload.raw_text,
        }
    }
}
