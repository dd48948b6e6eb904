use crate::error::ForwarderError;

/// Affiliate percentages are basis points of this value.
pub const PERCENTAGE_DENOMINATOR: i128 = 10_000;

/// `floor(value * numerator / denominator)` with checked multiplication.
pub fn mul_div_floor(value: i128, numerator: i128, denominator: i128) -> Result<i128, ForwarderError> {
    if denominator <= 0 || value < 0 || numerator < 0 {
        return Err(ForwarderError::InvalidAmount);
    }
    value
        .checked_mul(numerator)
        .map(|product| product / denominator)
        .ok_or(ForwarderError::ArithmeticOverflow)
}

/// `ceil(value * numerator / denominator)` with checked multiplication.
pub fn mul_div_ceil(value: i128, numerator: i128, denominator: i128) -> Result<i128, ForwarderError> {
    if denominator <= 0 || value < 0 || numerator < 0 {
        return Err(ForwarderError::InvalidAmount);
    }
    let product = value
        .checked_mul(numerator)
        .ok_or(ForwarderError::ArithmeticOverflow)?;
    let quotient = product / denominator;
    if product % denominator == 0 {
        Ok(quotient)
    } else {
        Ok(quotient + 1)
    }
}

/// `percentage` basis points of `amount`, rounded toward the payer.
pub fn percentage_of(amount: i128, percentage: u32) -> Result<i128, ForwarderError> {
    mul_div_floor(amount, percentage as i128, PERCENTAGE_DENOMINATOR)
}

/// Largest spend `s` with `s + percentage_of(s, percentage) <= budget`.
///
/// `s + floor(s * p / D)` is `floor(s * (D + p) / D)`, which stays within
/// `budget` exactly while `s * (D + p) < (budget + 1) * D`.
pub fn spendable_with_fee(budget: i128, percentage: u32) -> Result<i128, ForwarderError> {
    let bound = mul_div_ceil(
        checked_add(budget, 1)?,
        PERCENTAGE_DENOMINATOR,
        PERCENTAGE_DENOMINATOR + percentage as i128,
    )?;
    Ok(bound - 1)
}

pub fn checked_sub(a: i128, b: i128) -> Result<i128, ForwarderError> {
    a.checked_sub(b).ok_or(ForwarderError::ArithmeticOverflow)
}

pub fn checked_add(a: i128, b: i128) -> Result<i128, ForwarderError> {
    a.checked_add(b).ok_or(ForwarderError::ArithmeticOverflow)
}
