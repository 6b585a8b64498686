//! Wire shapes for the availability endpoints.
//!
//! Responses decode into these DTOs first and are then checked for the
//! fields the domain relies on before becoming port responses.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{AvailabilitySourceError, LookupResponse, ValidationResponse};

#[derive(Debug, Deserialize)]
pub(super) struct ValidationResponseDto {
    pub(super) code: Option<i64>,
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl ValidationResponseDto {
    pub(super) fn into_response(self) -> Result<ValidationResponse, AvailabilitySourceError> {
        let code = self
            .code
            .ok_or_else(|| AvailabilitySourceError::missing_discriminant("no numeric code field"))?;
        Ok(ValidationResponse {
            code,
            message: self.message,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupRequestDto<'a> {
    pub(super) usernames: [&'a str; 1],
    pub(super) exclude_banned_users: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct LookupResponseDto {
    pub(super) data: Option<Vec<serde_json::Value>>,
}

impl LookupResponseDto {
    pub(super) fn into_response(self) -> Result<LookupResponse, AvailabilitySourceError> {
        let data = self
            .data
            .ok_or_else(|| AvailabilitySourceError::decode("lookup response has no data array"))?;
        Ok(LookupResponse {
            matches: data.len(),
        })
    }
}
