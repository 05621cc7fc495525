use cosmwasm_std::{ConversionOverflowError, Decimal256, StdError, StdResult, Uint128, Uint256};

use crate::asset::{Decimal256Ext, DECIMAL_FRACTIONAL};

/// Relative error bound of [`calculate_pow`]. [`pow_up`] and [`pow_down`] widen the raw result
/// by this factor (plus one atom) to obtain a value that is known to be above / below the exact power.
pub const MAX_POW_RELATIVE_ERROR: Decimal256 = Decimal256::raw(10_000);

/// Series terms below this size are dropped.
const DEFAULT_PRECISION: Decimal256 = Decimal256::raw(100);

const MAX_SERIES_TERMS: u128 = 256;

// The fractional power is taken on a mantissa in [0.75, 1.5) where the binomial series converges
// quickly; the remaining power of two is rebuilt from 2 = 1.25 * 1.25 * 1.28.
const MANTISSA_LOWER: Decimal256 = Decimal256::raw(750_000_000_000_000_000);
const MANTISSA_UPPER: Decimal256 = Decimal256::raw(1_500_000_000_000_000_000);
const ONE_POINT_TWO_FIVE: Decimal256 = Decimal256::raw(1_250_000_000_000_000_000);
const ONE_POINT_TWO_EIGHT: Decimal256 = Decimal256::raw(1_280_000_000_000_000_000);

fn abs_difference_with_sign(a: Decimal256, b: Decimal256) -> (Decimal256, bool) {
    if a >= b {
        (a - b, false)
    } else {
        (b - a, true)
    }
}

/// ## Description
/// Computes `base ^ exp` for a base in (0, 2) and an exponent in [0, 1) with the binomial series
///
/// `(1 + x)^a = 1 + a*x + a(a-1)/2! * x^2 + a(a-1)(a-2)/3! * x^3 + ...`
///
/// Terms are added until they fall below `precision`.
pub fn pow_approx(base: Decimal256, exp: Decimal256, precision: Decimal256) -> StdResult<Decimal256> {
    if exp.is_zero() {
        return Ok(Decimal256::one());
    }

    let (x, xneg) = abs_difference_with_sign(base, Decimal256::one());
    let mut term = Decimal256::one();
    let mut sum = Decimal256::one();
    let mut negative = false;

    // big_k holds i - 1 at the top of each iteration and i after it is reassigned
    let mut big_k = Decimal256::zero();
    let mut i = 1u128;

    while term >= precision {
        if i > MAX_SERIES_TERMS {
            return Err(StdError::generic_err(format!(
                "Power series for {}^{} did not converge",
                base, exp
            )));
        }

        let (c, cneg) = abs_difference_with_sign(exp, big_k);
        big_k = Decimal256::from_integer(i);

        term = term
            .checked_mul(c)?
            .checked_mul(x)?
            .checked_div_down(big_k)?;

        if term.is_zero() {
            break;
        }
        if xneg {
            negative = !negative;
        }
        if cneg {
            negative = !negative;
        }

        sum = if negative {
            sum.checked_sub(term)?
        } else {
            sum.checked_add(term)?
        };
        i += 1;
    }

    Ok(sum)
}

/// ## Description
/// Computes `base ^ exp` for any non negative base and exponent.
///
/// The integer part of the exponent is applied with exact repeated multiplication. For the
/// fractional part `f` the base is written as `m * 2^k` with `m` in [0.75, 1.5), so that
/// `base^f = m^f * 2^(k*f)`, each factor being evaluated with [`pow_approx`].
///
/// ## Params
/// * **precision** is the smallest series term kept. Defaults to 1e-16.
pub fn calculate_pow(
    base: Decimal256,
    exp: Decimal256,
    precision: Option<Decimal256>,
) -> StdResult<Decimal256> {
    let precision = precision.unwrap_or(DEFAULT_PRECISION);

    if exp.is_zero() {
        return Ok(Decimal256::one());
    }
    if base.is_zero() || base == Decimal256::one() {
        return Ok(base);
    }

    let (integer, fractional) = split_exponent(exp)?;
    let integer_pow = base.checked_pow(integer)?;
    if fractional.is_zero() {
        return Ok(integer_pow);
    }

    let fractional_pow = pow_fractional(base, fractional, precision)?;
    Ok(integer_pow.checked_mul(fractional_pow)?)
}

/// `base ^ exp` rounded up: the result is never below the exact power.
pub fn pow_up(base: Decimal256, exp: Decimal256) -> StdResult<Decimal256> {
    let raw = calculate_pow(base, exp, None)?;
    let max_error = raw
        .checked_mul_up(MAX_POW_RELATIVE_ERROR)?
        .checked_add(Decimal256::raw(1))?;
    Ok(raw.checked_add(max_error)?)
}

/// `base ^ exp` rounded down: the result is never above the exact power.
pub fn pow_down(base: Decimal256, exp: Decimal256) -> StdResult<Decimal256> {
    let raw = calculate_pow(base, exp, None)?;
    let max_error = raw
        .checked_mul_up(MAX_POW_RELATIVE_ERROR)?
        .checked_add(Decimal256::raw(1))?;
    Ok(raw.saturating_sub(max_error))
}

fn split_exponent(exp: Decimal256) -> StdResult<(u32, Decimal256)> {
    let one = Uint256::from(DECIMAL_FRACTIONAL);
    let integer = Uint128::try_from(exp.atomics().checked_div(one)?)?;
    let integer = u32::try_from(integer.u128())
        .map_err(|_| ConversionOverflowError::new("Uint128", "u32", integer.to_string()))?;
    let fractional = Decimal256::new(exp.atomics().checked_rem(one)?);
    Ok((integer, fractional))
}

fn pow_fractional(base: Decimal256, exp: Decimal256, precision: Decimal256) -> StdResult<Decimal256> {
    let two = Decimal256::from_integer(2u128);

    let mut mantissa = base;
    let mut k: i64 = 0;
    while mantissa >= MANTISSA_UPPER {
        mantissa = mantissa.checked_div_down(two)?;
        k += 1;
    }
    while mantissa < MANTISSA_LOWER {
        mantissa = mantissa.checked_mul(two)?;
        k -= 1;
    }

    let mantissa_pow = pow_approx(mantissa, exp, precision)?;
    if k == 0 {
        return Ok(mantissa_pow);
    }

    let scale_exp = Decimal256::from_integer(k.unsigned_abs()).checked_mul(exp)?;
    let scale = pow_of_two(scale_exp, precision)?;
    if k > 0 {
        Ok(mantissa_pow.checked_mul(scale)?)
    } else {
        mantissa_pow.checked_div_down(scale)
    }
}

/// 2^exp for a non negative exponent
fn pow_of_two(exp: Decimal256, precision: Decimal256) -> StdResult<Decimal256> {
    let (integer, fractional) = split_exponent(exp)?;
    let integer_pow = Decimal256::from_integer(2u128).checked_pow(integer)?;
    if fractional.is_zero() {
        return Ok(integer_pow);
    }

    let quarter_pow = pow_approx(ONE_POINT_TWO_FIVE, fractional, precision)?;
    let remainder_pow = pow_approx(ONE_POINT_TWO_EIGHT, fractional, precision)?;
    Ok(integer_pow
        .checked_mul(quarter_pow)?
        .checked_mul(quarter_pow)?
        .checked_mul(remainder_pow)?)
}
