use cosmwasm_std::{Decimal256, StdResult, Storage, Uint128};

use lbp::asset::{Asset, AssetInfo, Decimal256Ext, DecimalAsset};
use lbp::decimal2decimal256;
use lbp::pool::{Trade, WeightPair};
use lbp::vault::{FeeInfo, FEE_PRECISION};

use crate::error::ContractError;
use crate::math::{calc_in_given_out, calc_out_given_in, calc_spot_price};
use crate::state::{get_precision, Config};

/// One side of a swap: the pool balance, its current weight and the token decimals
pub(crate) struct SwapLeg {
    pub pool: DecimalAsset,
    pub weight: Decimal256,
    pub precision: u8,
}

/// ## Description
/// Converts [`Vec<Asset>`] to [`Vec<DecimalAsset>`] using the stored token precisions.
pub(crate) fn transform_to_decimal_asset(
    storage: &dyn Storage,
    assets: &[Asset],
) -> StdResult<Vec<DecimalAsset>> {
    assets
        .iter()
        .map(|asset| {
            let precision = get_precision(storage, &asset.info)?;
            asset.to_decimal_asset(precision)
        })
        .collect()
}

/// Weight of `asset_info` in `weights`, resolved through the pool roles
pub(crate) fn weight_of(
    config: &Config,
    weights: &WeightPair,
    asset_info: &AssetInfo,
) -> Result<Decimal256, ContractError> {
    let weight = if asset_info.eq(&config.project_asset) {
        weights.project
    } else if asset_info.eq(&config.reserve_asset) {
        weights.reserve
    } else {
        return Err(ContractError::UnknownToken {
            asset: asset_info.to_string(),
        });
    };
    Ok(decimal2decimal256(weight)?)
}

/// Weights lined up with `config.assets`
pub(crate) fn ordered_weights(
    config: &Config,
    weights: &WeightPair,
) -> Result<Vec<Decimal256>, ContractError> {
    config
        .assets
        .iter()
        .map(|asset| weight_of(config, weights, &asset.info))
        .collect()
}

pub(crate) fn swap_leg(
    storage: &dyn Storage,
    config: &Config,
    weights: &WeightPair,
    asset_info: &AssetInfo,
) -> Result<SwapLeg, ContractError> {
    let weight = weight_of(config, weights, asset_info)?;
    let asset = config
        .asset(asset_info)
        .ok_or_else(|| ContractError::UnknownToken {
            asset: asset_info.to_string(),
        })?;
    let precision = get_precision(storage, asset_info)?;
    Ok(SwapLeg {
        pool: asset.to_decimal_asset(precision)?,
        weight,
        precision,
    })
}

/// ## Description
/// Swap where the trader gives exactly `offer_amount`.
///
/// The weighted math gives the gross output. The fee is then taken from it in the ask asset:
/// `net = gross * (1 - fee)` rounded down, `fee = gross - net`.
/// Returns the [`Trade`] and the fee amount.
pub(crate) fn compute_swap(
    offer: &SwapLeg,
    ask: &SwapLeg,
    offer_amount: Uint128,
    fee_info: &FeeInfo,
) -> Result<(Trade, Uint128), ContractError> {
    let amount_in = Decimal256::with_precision(offer_amount, offer.precision)?;
    let gross_out = calc_out_given_in(
        offer.pool.amount,
        offer.weight,
        ask.pool.amount,
        ask.weight,
        amount_in,
    )?;

    let gross = gross_out.to_uint128_with_precision(ask.precision)?;
    let net = gross.multiply_ratio(FEE_PRECISION - fee_info.total_fee_bps, FEE_PRECISION);
    if net.is_zero() {
        return Err(ContractError::InsufficientLiquidity {
            reason: "swap output rounds to zero".to_string(),
        });
    }
    let fee = gross.checked_sub(net)?;
    let spread = compute_spread(offer, ask, amount_in, gross_out)?;

    Ok((
        Trade {
            amount_in: offer_amount,
            amount_out: net,
            spread,
        },
        fee,
    ))
}

/// ## Description
/// Swap where the trader receives exactly `ask_amount`.
///
/// The requested amount is grossed up by the fee, `gross = ask / (1 - fee)` rounded up, and the
/// input for the gross amount is rounded up as well.
pub(crate) fn compute_offer_amount(
    offer: &SwapLeg,
    ask: &SwapLeg,
    ask_amount: Uint128,
    fee_info: &FeeInfo,
) -> Result<(Trade, Uint128), ContractError> {
    let fee_rate = decimal2decimal256(fee_info.fee_rate())?;
    let amount_out = Decimal256::with_precision(ask_amount, ask.precision)?;
    let gross_out = amount_out.checked_div_up(Decimal256::one() - fee_rate)?;

    let amount_in = calc_in_given_out(
        offer.pool.amount,
        offer.weight,
        ask.pool.amount,
        ask.weight,
        gross_out,
    )?;

    let offer_amount = amount_in.to_uint128_with_precision_up(offer.precision)?;
    let gross = gross_out.to_uint128_with_precision_up(ask.precision)?;
    let fee = gross.saturating_sub(ask_amount);
    let spread = compute_spread(offer, ask, amount_in, gross_out)?;

    Ok((
        Trade {
            amount_in: offer_amount,
            amount_out: ask_amount,
            spread,
        },
        fee,
    ))
}

/// Output at the current spot price minus the output of the curve, in ask units, fees excluded
fn compute_spread(
    offer: &SwapLeg,
    ask: &SwapLeg,
    amount_in: Decimal256,
    gross_out: Decimal256,
) -> Result<Uint128, ContractError> {
    let spot_price = calc_spot_price(offer.pool.amount, offer.weight, ask.pool.amount, ask.weight)?;
    let expected_out = amount_in.checked_mul(spot_price)?;
    Ok(expected_out
        .saturating_sub(gross_out)
        .to_uint128_with_precision(ask.precision)?)
}
