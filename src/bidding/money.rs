/// 금액 검증
/// NUMERIC(10, 2) 컬럼에 맞춰 양수, 소수점 둘째 자리까지, 전체 10자리 이하만 허용
// region:    --- Imports
use crate::error::{AppError, Result};
use rust_decimal::Decimal;

// endregion: --- Imports

pub const SCALE: u32 = 2;
pub const MAX_DIGITS: u32 = 10;

/// 금액 검증 후 소수점 둘째 자리로 고정
pub fn validate_amount(field: &str, amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(AppError::validation(format!("{field} must be positive")));
    }

    let mut normalized = amount.normalize();
    if normalized.scale() > SCALE {
        return Err(AppError::validation(format!(
            "{field} must have at most {SCALE} decimal places"
        )));
    }
    normalized.rescale(SCALE);

    if normalized.mantissa() >= 10_i128.pow(MAX_DIGITS) {
        return Err(AppError::validation(format!(
            "{field} must have at most {MAX_DIGITS} digits"
        )));
    }

    Ok(normalized)
}
