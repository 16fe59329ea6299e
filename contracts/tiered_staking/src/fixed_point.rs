//! Exact decimal fixed-point helpers.
//!
//! Every monetary amount, rate and accumulator value is an `i128` holding a
//! non-negative quantity scaled by [`SCALE`] (18 fractional digits). Each
//! division floors, so rounding can only ever under-pay. Nothing wraps:
//! results outside `0..=i128::MAX` surface as [`ContractError::Overflow`] or
//! [`ContractError::Underflow`].
//!
//! The reward-per-weight accumulator is the one value that does not fit
//! that mould: a tiny total weight can push it far past `i128::MAX`, so it
//! is kept at full 256-bit width as a [`Wide`].

use soroban_sdk::contracttype;
use uint::construct_uint;

use crate::errors::ContractError;

construct_uint! {
    /// 256-bit unsigned integer used for intermediate products.
    pub struct U256(4);
}

/// One whole unit: 10^18.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

/// Basis-point denominator, 10_000 = 1.0×.
pub const BPS_DENOMINATOR: i128 = 10_000;

fn non_negative(value: i128) -> Result<u128, ContractError> {
    if value < 0 {
        return Err(ContractError::Underflow);
    }
    Ok(value as u128)
}

fn narrow(value: U256) -> Result<i128, ContractError> {
    if value > U256::from(i128::MAX as u128) {
        return Err(ContractError::Overflow);
    }
    Ok(value.low_u128() as i128)
}

pub fn add(a: i128, b: i128) -> Result<i128, ContractError> {
    non_negative(a)?;
    non_negative(b)?;
    a.checked_add(b).ok_or(ContractError::Overflow)
}

/// `a - b`, failing with `Underflow` when `b > a`.
pub fn sub(a: i128, b: i128) -> Result<i128, ContractError> {
    non_negative(a)?;
    non_negative(b)?;
    if b > a {
        return Err(ContractError::Underflow);
    }
    Ok(a - b)
}

/// Multiply by a whole number of units (e.g. a rate by elapsed seconds).
pub fn mul_int(a: i128, n: u64) -> Result<i128, ContractError> {
    non_negative(a)?;
    a.checked_mul(n as i128).ok_or(ContractError::Overflow)
}

/// `floor(a * b / denominator)` with a 256-bit intermediate product.
pub fn mul_div_floor(a: i128, b: i128, denominator: i128) -> Result<i128, ContractError> {
    let a = non_negative(a)?;
    let b = non_negative(b)?;
    let denominator = non_negative(denominator)?;
    if denominator == 0 {
        return Err(ContractError::DivisionByZero);
    }
    narrow(U256::from(a) * U256::from(b) / U256::from(denominator))
}

/// Unsigned 256-bit fixed-point value stored as two 128-bit halves.
///
/// Field order makes the derived ordering numeric.
#[contracttype]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
pub struct Wide {
    pub hi: u128,
    pub lo: u128,
}

impl Wide {
    pub const ZERO: Wide = Wide { hi: 0, lo: 0 };

    fn from_u256(value: U256) -> Self {
        let words = value.0;
        Wide {
            hi: (u128::from(words[3]) << 64) | u128::from(words[2]),
            lo: (u128::from(words[1]) << 64) | u128::from(words[0]),
        }
    }

    fn to_u256(self) -> U256 {
        U256([
            self.lo as u64,
            (self.lo >> 64) as u64,
            self.hi as u64,
            (self.hi >> 64) as u64,
        ])
    }
}

impl From<u128> for Wide {
    fn from(value: u128) -> Self {
        Wide { hi: 0, lo: value }
    }
}

pub fn wide_add(a: Wide, b: Wide) -> Result<Wide, ContractError> {
    a.to_u256()
        .checked_add(b.to_u256())
        .map(Wide::from_u256)
        .ok_or(ContractError::Overflow)
}

/// `a - b`, failing with `Underflow` when `b > a`.
pub fn wide_sub(a: Wide, b: Wide) -> Result<Wide, ContractError> {
    a.to_u256()
        .checked_sub(b.to_u256())
        .map(Wide::from_u256)
        .ok_or(ContractError::Underflow)
}

/// `floor(a * SCALE / b)` kept at full width.
pub fn div_scaled_wide(a: i128, b: i128) -> Result<Wide, ContractError> {
    let a = non_negative(a)?;
    let b = non_negative(b)?;
    if b == 0 {
        return Err(ContractError::DivisionByZero);
    }
    let scale = U256::from(SCALE as u128);
    Ok(Wide::from_u256(U256::from(a) * scale / U256::from(b)))
}

/// `floor(a * b / SCALE)` for an amount against a wide factor, narrowed
/// back to an amount.
pub fn mul_scaled_wide(a: i128, b: Wide) -> Result<i128, ContractError> {
    let a = non_negative(a)?;
    let product = U256::from(a)
        .checked_mul(b.to_u256())
        .ok_or(ContractError::Overflow)?;
    narrow(product / U256::from(SCALE as u128))
}

/// Fixed-point product, scaled back down: `floor(a * b / SCALE)`.
pub fn mul_scaled(a: i128, b: i128) -> Result<i128, ContractError> {
    mul_div_floor(a, b, SCALE)
}

/// Fixed-point quotient, scaled up first: `floor(a * SCALE / b)`.
pub fn div_scaled(a: i128, b: i128) -> Result<i128, ContractError> {
    mul_div_floor(a, SCALE, b)
}

/// Apply a basis-point multiplier: `floor(amount * bps / 10_000)`.
pub fn apply_bps(amount: i128, bps: u32) -> Result<i128, ContractError> {
    mul_div_floor(amount, bps as i128, BPS_DENOMINATOR)
}
