use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use floatwatch_market_data::{MarketDataError, MessageResponse};
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MarketData(e) if e.is_caller_defect() => StatusCode::BAD_REQUEST,
            Self::MarketData(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors reuse the message envelope so clients parse one shape.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
        (status, Json(MessageResponse::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let defect = ApiError::from(MarketDataError::InvalidInput("x".to_string()));
        assert_eq!(defect.status(), StatusCode::BAD_REQUEST);

        let upstream = ApiError::from(MarketDataError::EmptyResult {
            provider: "STEAM".to_string(),
            item: "x".to_string(),
        });
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let internal = ApiError::from(anyhow::anyhow!("boom"));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
