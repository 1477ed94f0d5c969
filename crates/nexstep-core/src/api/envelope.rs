//! The `{success, data, message}` wrapper every backend response uses.

use serde::Deserialize;

use super::error::ErrorDetail;
use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    // A missing key is already `None`; `default` here would demand `T: Default`
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload. `success:false` becomes `ApiError::Rejected`
    /// carrying the backend message, or `fallback` when there is none.
    pub fn into_result(self, fallback: &str) -> Result<T, ApiError> {
        if !self.success {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .or_else(|| self.error.and_then(ErrorDetail::into_message))
                .unwrap_or_else(|| fallback.to_string());
            return Err(ApiError::Rejected {
                status: None,
                message,
            });
        }
        self.data
            .ok_or_else(|| ApiError::InvalidResponse("Response envelope has no data".to_string()))
    }
}
