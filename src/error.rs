// region:    --- Imports
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use tracing::error;

// endregion: --- Imports

// region:    --- Error
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 입력 값 누락 또는 형식 오류
    #[error("{0}")]
    Validation(String),
    /// 입찰 금액이 현재 가격 이하
    #[error("bid must exceed current price")]
    BidTooLow { current_price: Decimal },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("username already taken")]
    DuplicateUser,
    #[error("invalid username and/or password")]
    CredentialMismatch,
    #[error("passwords must match")]
    PasswordMismatch,
    #[error("login required")]
    Unauthorized,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// 응답 본문에 함께 내려가는 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION",
            AppError::BidTooLow { .. } => "LOW_BID",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DuplicateUser => "DUPLICATE_USER",
            AppError::CredentialMismatch => "INVALID_CREDENTIALS",
            AppError::PasswordMismatch => "PASSWORD_MISMATCH",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Database(_) => "DATABASE",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BidTooLow { .. } | AppError::PasswordMismatch => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateUser => StatusCode::CONFLICT,
            AppError::CredentialMismatch | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// 요청 본문 / 경로 파싱 실패도 입력 오류로 처리
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::BidTooLow { current_price } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "current_price": current_price,
            }),
            AppError::Database(_) | AppError::Internal(_) => {
                error!("{:<12} --> {}", "Error", self);
                serde_json::json!({
                    "error": "internal server error",
                    "code": self.code(),
                })
            }
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_bid_maps_to_bad_request() {
        let err = AppError::BidTooLow {
            current_price: Decimal::new(1000, 2),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "LOW_BID");
        assert_eq!(err.to_string(), "bid must exceed current price");
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = AppError::NotFound("listing");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "listing not found");
    }

    #[test]
    fn database_errors_are_internal() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "DATABASE");
    }
}
