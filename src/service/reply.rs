//! Transport envelope for service results.
//!
//! Success: `{"success": true, ...payload fields}`
//! Failure: `{"success": false, "error": "...", "code": "..."}`

use serde::Serialize;

use crate::rules::MoveErrorCode;

use super::game::ServiceError;

/// A service result ready to be sent to a client.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reply<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<MoveErrorCode>,
}

impl<T: Serialize> Reply<T> {
    #[must_use]
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
            code: None,
        }
    }

    #[must_use]
    pub fn err(error: impl Into<String>, code: Option<MoveErrorCode>) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error.into()),
            code,
        }
    }

    /// Envelope for join, leave, start and roll: failures carry only a message.
    #[must_use]
    pub fn from_result(result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(payload) => Self::ok(payload),
            Err(err) => Self::err(err.to_string(), None),
        }
    }

    /// Envelope for moves: failures always carry a rule code.
    #[must_use]
    pub fn from_move_result(result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(payload) => Self::ok(payload),
            Err(err) => Self::err(err.to_string(), Some(err.move_code())),
        }
    }
}
