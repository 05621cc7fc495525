use cosmwasm_std::{Decimal256, Uint128};
use lbp::approx_pow::{pow_down, pow_up};
use lbp::asset::Decimal256Ext;

use crate::error::ContractError;

/// A swap may not bring in more than 30% of the input balance
pub const MAX_IN_RATIO: Decimal256 = Decimal256::raw(300_000_000_000_000_000);
/// A swap may not take out more than 30% of the output balance
pub const MAX_OUT_RATIO: Decimal256 = Decimal256::raw(300_000_000_000_000_000);

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x      Weighted invariant math     x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// ## Description
/// Invariant of a weighted pool, `prod(balance_i ^ weight_i)`, rounded down.
pub fn calculate_invariant(
    weights: &[Decimal256],
    balances: &[Decimal256],
) -> Result<Decimal256, ContractError> {
    if weights.len() != balances.len() {
        return Err(ContractError::InvariantViolation {
            reason: "weights and balances differ in length".to_string(),
        });
    }

    let mut invariant = Decimal256::one();
    for (weight, balance) in weights.iter().zip(balances.iter()) {
        if balance.is_zero() {
            return Err(ContractError::InvariantViolation {
                reason: "zero balance".to_string(),
            });
        }
        invariant = invariant.checked_mul(pow_down(*balance, *weight)?)?;
    }

    if invariant.is_zero() {
        return Err(ContractError::InvariantViolation {
            reason: "invariant rounds to zero".to_string(),
        });
    }
    Ok(invariant)
}

/// ## Description
/// Amount of the output token received for exactly `amount_in` of the input token:
///
/// `amount_out = balance_out * (1 - (balance_in / (balance_in + amount_in)) ^ (weight_in / weight_out))`
///
/// The power is rounded up so that `amount_out` is rounded down.
pub fn calc_out_given_in(
    balance_in: Decimal256,
    weight_in: Decimal256,
    balance_out: Decimal256,
    weight_out: Decimal256,
    amount_in: Decimal256,
) -> Result<Decimal256, ContractError> {
    if amount_in.is_zero() {
        return Err(ContractError::InsufficientLiquidity {
            reason: "zero amount in".to_string(),
        });
    }
    if amount_in > balance_in.checked_mul(MAX_IN_RATIO)? {
        return Err(ContractError::InsufficientLiquidity {
            reason: "amount in exceeds max in ratio".to_string(),
        });
    }

    let denominator = balance_in.checked_add(amount_in)?;
    let base = balance_in.checked_div_up(denominator)?;
    let exponent = weight_in.checked_div_down(weight_out)?;
    let power = pow_up(base, exponent)?;

    let amount_out = balance_out.checked_mul(Decimal256::one().saturating_sub(power))?;
    if amount_out >= balance_out {
        return Err(ContractError::InsufficientLiquidity {
            reason: "output exceeds balance".to_string(),
        });
    }
    Ok(amount_out)
}

/// ## Description
/// Amount of the input token required to receive exactly `amount_out` of the output token:
///
/// `amount_in = balance_in * ((balance_out / (balance_out - amount_out)) ^ (weight_out / weight_in) - 1)`
///
/// Every step rounds up so that `amount_in` is rounded up.
pub fn calc_in_given_out(
    balance_in: Decimal256,
    weight_in: Decimal256,
    balance_out: Decimal256,
    weight_out: Decimal256,
    amount_out: Decimal256,
) -> Result<Decimal256, ContractError> {
    if amount_out.is_zero() {
        return Err(ContractError::InsufficientLiquidity {
            reason: "zero amount out".to_string(),
        });
    }
    if amount_out >= balance_out || amount_out > balance_out.checked_mul(MAX_OUT_RATIO)? {
        return Err(ContractError::InsufficientLiquidity {
            reason: "amount out exceeds max out ratio".to_string(),
        });
    }

    let base = balance_out.checked_div_up(balance_out.checked_sub(amount_out)?)?;
    let exponent = weight_out.checked_div_up(weight_in)?;
    let power = pow_up(base, exponent)?;

    let ratio = power.checked_sub(Decimal256::one())?;
    Ok(balance_in.checked_mul_up(ratio)?)
}

/// ## Description
/// Pool shares minted for depositing `amounts_in`.
///
/// Each leg above the proportional share of the join is treated as an implicit swap and pays the
/// swap fee on that excess, so single sided joins cost the same as swapping first.
pub fn calc_bpt_out_given_exact_tokens_in(
    balances: &[Decimal256],
    weights: &[Decimal256],
    amounts_in: &[Decimal256],
    total_supply: Decimal256,
    swap_fee: Decimal256,
) -> Result<Decimal256, ContractError> {
    let mut balance_ratios_with_fee = Vec::with_capacity(balances.len());
    let mut invariant_ratio_with_fees = Decimal256::zero();
    for ((balance, weight), amount_in) in balances.iter().zip(weights).zip(amounts_in) {
        if balance.is_zero() {
            return Err(ContractError::PoolNotFunded {});
        }
        let ratio = balance.checked_add(*amount_in)?.checked_div_down(*balance)?;
        invariant_ratio_with_fees = invariant_ratio_with_fees.checked_add(ratio.checked_mul(*weight)?)?;
        balance_ratios_with_fee.push(ratio);
    }

    let mut invariant_ratio = Decimal256::one();
    for (i, ((balance, weight), amount_in)) in
        balances.iter().zip(weights).zip(amounts_in).enumerate()
    {
        let amount_in_without_fee = if balance_ratios_with_fee[i] > invariant_ratio_with_fees {
            let non_taxable = balance
                .checked_mul(invariant_ratio_with_fees.saturating_sub(Decimal256::one()))?;
            let taxable = amount_in.saturating_sub(non_taxable);
            non_taxable.checked_add(taxable.checked_mul(Decimal256::one().saturating_sub(swap_fee))?)?
        } else {
            *amount_in
        };

        let balance_ratio = balance
            .checked_add(amount_in_without_fee)?
            .checked_div_down(*balance)?;
        invariant_ratio = invariant_ratio.checked_mul(pow_down(balance_ratio, *weight)?)?;
    }

    if invariant_ratio <= Decimal256::one() {
        return Ok(Decimal256::zero());
    }
    Ok(total_supply.checked_mul(invariant_ratio - Decimal256::one())?)
}

/// Proportional share of each balance for burning `bpt_in` out of `total_supply`, rounded down
pub fn calc_tokens_out_given_exact_bpt_in(
    balances: &[Uint128],
    bpt_in: Uint128,
    total_supply: Uint128,
) -> Result<Vec<Uint128>, ContractError> {
    if total_supply.is_zero() {
        return Err(ContractError::PoolNotFunded {});
    }
    if bpt_in > total_supply {
        return Err(ContractError::InsufficientLiquidity {
            reason: "burn amount exceeds total supply".to_string(),
        });
    }
    Ok(balances
        .iter()
        .map(|balance| balance.multiply_ratio(bpt_in, total_supply))
        .collect())
}

/// Shares minted on the very first join: `invariant * number of tokens`
pub fn calc_initial_bpt(
    weights: &[Decimal256],
    balances: &[Decimal256],
) -> Result<Decimal256, ContractError> {
    let invariant = calculate_invariant(weights, balances)?;
    Ok(invariant.checked_mul(Decimal256::from_integer(balances.len() as u128))?)
}

/// Price of one unit of the input token in output tokens, `(b_out / w_out) / (b_in / w_in)`
pub fn calc_spot_price(
    balance_in: Decimal256,
    weight_in: Decimal256,
    balance_out: Decimal256,
    weight_out: Decimal256,
) -> Result<Decimal256, ContractError> {
    if balance_in.is_zero() || balance_out.is_zero() {
        return Err(ContractError::PoolNotFunded {});
    }
    let numerator = balance_out.checked_mul(weight_in)?;
    let denominator = balance_in.checked_mul(weight_out)?;
    Ok(numerator.checked_div_down(denominator)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lbp::approx_pow::MAX_POW_RELATIVE_ERROR;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal256 {
        Decimal256::from_str(value).unwrap()
    }

    fn relative_diff(a: Decimal256, b: Decimal256) -> Decimal256 {
        let diff = if a > b { a - b } else { b - a };
        diff.checked_div_down(b).unwrap()
    }

    #[test]
    fn invariant_of_the_seed_pool() {
        let weights = [dec("0.9"), dec("0.1")];
        let invariant = calculate_invariant(&weights, &[dec("1000"), dec("1.8")]).unwrap();
        // 1000^0.9 * 1.8^0.1 = 501.18723 * 1.06054
        assert!(relative_diff(invariant, dec("531.5292")) < dec("0.0001"));

        let err = calculate_invariant(&weights, &[dec("1000"), dec("0")]).unwrap_err();
        assert!(matches!(err, ContractError::InvariantViolation { .. }));
    }

    #[test]
    fn equal_weights_behave_like_constant_product() {
        let half = dec("0.5");
        let out = calc_out_given_in(dec("100"), half, dec("100"), half, dec("10")).unwrap();
        // x * y = k gives 100 - 10000 / 110 = 9.0909...
        assert!(relative_diff(out, dec("9.090909090909090909")) < dec("0.000000000001"));
        assert!(out < dec("9.090909090909090909"));

        let amount_in = calc_in_given_out(dec("100"), half, dec("100"), half, dec("10")).unwrap();
        // 10000 / 90 - 100 = 11.111...
        assert!(relative_diff(amount_in, dec("11.111111111111111111")) < dec("0.000000000001"));
        assert!(amount_in > dec("11.111111111111111111"));
    }

    #[test]
    fn ratio_limits_and_zero_amounts() {
        let w = dec("0.5");
        assert!(matches!(
            calc_out_given_in(dec("100"), w, dec("100"), w, dec("31")),
            Err(ContractError::InsufficientLiquidity { .. })
        ));
        assert!(matches!(
            calc_out_given_in(dec("100"), w, dec("100"), w, Decimal256::zero()),
            Err(ContractError::InsufficientLiquidity { .. })
        ));
        assert!(matches!(
            calc_in_given_out(dec("100"), w, dec("100"), w, dec("30.5")),
            Err(ContractError::InsufficientLiquidity { .. })
        ));
        assert!(matches!(
            calc_in_given_out(dec("100"), w, dec("100"), w, Decimal256::zero()),
            Err(ContractError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn proportional_join_pays_no_fee() {
        let balances = [dec("1000"), dec("1.8")];
        let weights = [dec("0.9"), dec("0.1")];
        let supply = dec("1063.0592");

        // adding 10% of every balance mints ~10% of the supply
        let minted = calc_bpt_out_given_exact_tokens_in(
            &balances,
            &weights,
            &[dec("100"), dec("0.18")],
            supply,
            dec("0.01"),
        )
        .unwrap();
        assert!(relative_diff(minted, dec("106.30592")) < dec("0.000001"));
    }

    #[test]
    fn single_sided_join_is_taxed() {
        let balances = [dec("1000"), dec("1.8")];
        let weights = [dec("0.9"), dec("0.1")];
        let supply = dec("1000");
        let amounts = [Decimal256::zero(), dec("5")];

        let no_fee =
            calc_bpt_out_given_exact_tokens_in(&balances, &weights, &amounts, supply, Decimal256::zero())
                .unwrap();
        let with_fee =
            calc_bpt_out_given_exact_tokens_in(&balances, &weights, &amounts, supply, dec("0.01"))
                .unwrap();
        assert!(with_fee < no_fee);
        // (6.8 / 1.8)^0.1 - 1 = 0.14215...
        assert!(relative_diff(no_fee, dec("142.15")) < dec("0.0001"));
    }

    #[test]
    fn proportional_exit() {
        let out = calc_tokens_out_given_exact_bpt_in(
            &[Uint128::new(1_000), Uint128::new(7)],
            Uint128::new(50),
            Uint128::new(100),
        )
        .unwrap();
        assert_eq!(out, vec![Uint128::new(500), Uint128::new(3)]);

        assert!(calc_tokens_out_given_exact_bpt_in(
            &[Uint128::new(1_000)],
            Uint128::new(101),
            Uint128::new(100)
        )
        .is_err());
    }

    #[test]
    fn spot_price_follows_weights() {
        // 1000 project at 0.9 against 1.8 reserve at 0.1: 1 project = (1.8/0.1)/(1000/0.9) reserve
        let price = calc_spot_price(dec("1000"), dec("0.9"), dec("1.8"), dec("0.1")).unwrap();
        assert_eq!(price, dec("0.0162"));
        assert_eq!(
            calc_spot_price(Decimal256::zero(), dec("0.9"), dec("1.8"), dec("0.1")).unwrap_err(),
            ContractError::PoolNotFunded {}
        );
    }

    #[test]
    fn out_of_range_math_is_an_invariant_violation() {
        let huge = Decimal256::MAX;
        let err = calc_out_given_in(
            huge,
            dec("0.5"),
            Decimal256::one(),
            dec("0.5"),
            huge * Decimal256::percent(20),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvariantViolation { .. }), "{err}");
    }

    proptest! {
        #[test]
        fn swaps_never_decrease_the_invariant(
            balance_in in 1_000u64..1_000_000_000,
            balance_out in 1_000u64..1_000_000_000,
            weight_in in 2u64..=98,
            fraction_in in 1u64..=30,
        ) {
            let weight_in = Decimal256::percent(weight_in);
            let weight_out = Decimal256::one() - weight_in;
            let b_in = Decimal256::from_integer(balance_in);
            let b_out = Decimal256::from_integer(balance_out);
            let amount_in = b_in * Decimal256::percent(fraction_in);

            let before = calculate_invariant(&[weight_in, weight_out], &[b_in, b_out]).unwrap();
            let out = calc_out_given_in(b_in, weight_in, b_out, weight_out, amount_in).unwrap();
            let after = calculate_invariant(
                &[weight_in, weight_out],
                &[b_in + amount_in, b_out - out],
            ).unwrap();
            // each pow_down leg may sit up to 2 * MAX_POW_RELATIVE_ERROR below the exact power,
            // so two legs give 4x; the fifth covers the atoms lost to flooring
            let slack = MAX_POW_RELATIVE_ERROR * Decimal256::from_integer(5u128);
            prop_assert!(after * (Decimal256::one() + slack) >= before);
        }

        #[test]
        fn given_out_inverts_given_in(
            balance_in in 1_000u64..1_000_000_000,
            balance_out in 1_000u64..1_000_000_000,
            weight_in in 2u64..=98,
            fraction_in in 1u64..=25,
        ) {
            let weight_in = Decimal256::percent(weight_in);
            let weight_out = Decimal256::one() - weight_in;
            let b_in = Decimal256::from_integer(balance_in);
            let b_out = Decimal256::from_integer(balance_out);
            let amount_in = b_in * Decimal256::percent(fraction_in);

            let out = calc_out_given_in(b_in, weight_in, b_out, weight_out, amount_in).unwrap();
            prop_assume!(!out.is_zero() && out <= b_out * MAX_OUT_RATIO);
            let back = calc_in_given_out(b_in, weight_in, b_out, weight_out, out).unwrap();

            prop_assert!(relative_diff(back, amount_in) < Decimal256::from_str("0.000001").unwrap());
        }
    }
}
