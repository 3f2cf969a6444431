use axum::{extract::rejection::JsonRejection, Json};
use serde::Serialize;

use crate::error::{AppError, Result};

/// Result envelope for action-style endpoints.
///
/// Actions never fail at the HTTP level: callers always receive `200` and
/// branch on `success`. A successful action with nothing to return still
/// carries `"data": null`.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: AppError) -> Self {
        tracing::warn!("Action failed: {}", error);
        Self {
            success: false,
            data: None,
            error: Some(error.public_message()),
        }
    }
}

impl<T> From<Result<T>> for ActionResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(e),
        }
    }
}

/// Unwraps an action's JSON body. A body that does not parse becomes a
/// validation failure, so the caller still gets an envelope.
pub fn action_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_without_data_serializes_null() {
        let response: ActionResponse<Option<u32>> = ActionResponse::ok(None);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": null }));
    }

    #[test]
    fn test_failure_carries_error_only() {
        let response: ActionResponse<u32> =
            Err(AppError::NotFound("Subscription not found".into())).into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error": "Subscription not found" })
        );
    }
}
