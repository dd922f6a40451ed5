use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::field::{first_text, FieldValue};
use crate::models::Room;

/// Body of a successful `regenerate_dec` call
#[derive(Debug, Default, Deserialize)]
pub struct DecResponse {
    #[serde(default)]
    dec: Option<FieldValue>,
    #[serde(default, rename = "deviceEnrollmentCode")]
    device_enrollment_code: Option<FieldValue>,
    #[serde(default)]
    code: Option<FieldValue>,
}

impl DecResponse {
    /// The enrollment code, preferring `dec`, then `deviceEnrollmentCode`, then `code`.
    pub fn enrollment_code(&self) -> Option<String> {
        first_text([&self.dec, &self.device_enrollment_code, &self.code])
    }
}

/// Extract the enrollment code from a `regenerate_dec` response body.
pub fn parse_enrollment_code(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(AppError::MalformedResponse(format!(
            "expected an object, got: {}",
            value
        )));
    }

    DecResponse::deserialize(&value)?
        .enrollment_code()
        .ok_or_else(|| AppError::MalformedResponse(format!("no enrollment code in: {}", value)))
}

/// Outcome of regenerating the code for one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentResult {
    pub room_id: String,
    pub room_name: String,
    pub code: Option<String>,
    pub success: bool,
}

impl EnrollmentResult {
    pub fn from_outcome(room: &Room, code: Option<String>) -> Self {
        Self {
            room_id: room.id.clone(),
            room_name: room.name.clone(),
            success: code.is_some(),
            code,
        }
    }
}
