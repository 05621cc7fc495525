use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Api, BankMsg, CheckedFromRatioError, Coin, CosmosMsg, Decimal256,
    DivideByZeroError, OverflowError, OverflowOperation, QuerierWrapper, StdError, StdResult,
    Uint128, Uint256, WasmMsg,
};
use cw20::Cw20ExecuteMsg;
use std::fmt;

/// 10^18, the atomics of one unit of [`Decimal256`]
pub(crate) const DECIMAL_FRACTIONAL: u128 = 1_000_000_000_000_000_000u128;

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x    {{AssetInfo}} struct Type    x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// This enum describes available Token types.
#[cw_serde]
#[derive(Hash, Eq)]
pub enum AssetInfo {
    /// Non-native Token
    Token { contract_addr: Addr },
    /// Native token
    NativeToken { denom: String },
}

impl PartialOrd for AssetInfo {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AssetInfo {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_string()
            .to_lowercase()
            .cmp(&other.to_string().to_lowercase())
    }
}

impl fmt::Display for AssetInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssetInfo::NativeToken { denom } => write!(f, "{}", denom),
            AssetInfo::Token { contract_addr } => write!(f, "{}", contract_addr),
        }
    }
}

impl AssetInfo {
    pub fn native_token(denom: impl Into<String>) -> Self {
        AssetInfo::NativeToken {
            denom: denom.into(),
        }
    }

    pub fn token(contract_addr: Addr) -> Self {
        AssetInfo::Token { contract_addr }
    }

    pub fn as_string(&self) -> String {
        match self {
            AssetInfo::NativeToken { denom } => denom.to_string(),
            AssetInfo::Token { contract_addr } => contract_addr.to_string().to_lowercase(),
        }
    }

    /// Returns [`Ok`] if the token of type [`AssetInfo`] is valid. Otherwise returns [`Err`].
    pub fn check(&self, api: &dyn Api) -> StdResult<()> {
        match self {
            AssetInfo::Token { contract_addr } => {
                api.addr_validate(contract_addr.as_str())?;
            }
            AssetInfo::NativeToken { denom } => {
                if !denom.starts_with("ibc/") && denom != &denom.to_lowercase() {
                    return Err(StdError::generic_err(format!(
                        "Non-IBC token denom {} should be lowercase",
                        denom
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns a message of type [`CosmosMsg`] sending `amount` of this token to `recipient`.
    /// Native tokens use [`BankMsg::Send`], CW20 tokens use [`Cw20ExecuteMsg::Transfer`].
    pub fn create_transfer_msg(&self, recipient: Addr, amount: Uint128) -> StdResult<CosmosMsg> {
        match &self {
            AssetInfo::Token { contract_addr } => Ok(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: recipient.to_string(),
                    amount,
                })?,
                funds: vec![],
            })),
            AssetInfo::NativeToken { denom } => Ok(CosmosMsg::Bank(BankMsg::Send {
                to_address: recipient.to_string(),
                amount: vec![Coin {
                    denom: denom.to_string(),
                    amount,
                }],
            })),
        }
    }

    /// Returns the number of decimals that a token has.
    /// Native denoms must be listed in `native_asset_precisions`, CW20 decimals are queried.
    pub fn decimals(
        &self,
        native_asset_precisions: &[NativeAssetPrecisionInfo],
        querier: &QuerierWrapper,
    ) -> StdResult<u8> {
        match &self {
            AssetInfo::NativeToken { denom } => native_asset_precisions
                .iter()
                .find(|p| p.denom == *denom)
                .map(|p| p.precision)
                .ok_or_else(|| {
                    StdError::generic_err(format!("Precision for denom {} not provided", denom))
                }),
            AssetInfo::Token { contract_addr } => {
                let res: cw20::TokenInfoResponse =
                    querier.query_wasm_smart(contract_addr, &cw20::Cw20QueryMsg::TokenInfo {})?;
                Ok(res.decimals)
            }
        }
    }
}

/// Precision of a native denom, which cannot be queried on chain.
#[cw_serde]
pub struct NativeAssetPrecisionInfo {
    pub denom: String,
    pub precision: u8,
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x     {{Asset}} struct Type       x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// ## Description - This struct describes an asset (native or CW20) and an amount of it.
#[cw_serde]
pub struct Asset {
    /// Information about an asset stored in a [`AssetInfo`] struct
    pub info: AssetInfo,
    /// A token amount
    pub amount: Uint128,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.info)
    }
}

impl Asset {
    pub fn new(info: AssetInfo, amount: impl Into<Uint128>) -> Self {
        Self {
            info,
            amount: amount.into(),
        }
    }

    /// Consumes the asset and returns a transfer message of `amount` to `recipient`.
    pub fn into_msg(self, recipient: Addr) -> StdResult<CosmosMsg> {
        self.info.create_transfer_msg(recipient, self.amount)
    }

    pub fn to_decimal_asset(&self, precision: impl Into<u32>) -> StdResult<DecimalAsset> {
        Ok(DecimalAsset {
            info: self.info.clone(),
            amount: Decimal256::with_precision(self.amount, precision.into())?,
        })
    }
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x {{DecimalAsset}} struct Type    x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// ## Description
/// An asset amount scaled by the token's decimals into a [`Decimal256`].
#[cw_serde]
pub struct DecimalAsset {
    pub info: AssetInfo,
    pub amount: Decimal256,
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x {{Decimal256Ext}} trait Type   x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// Conversions and directed rounding on top of [`Decimal256`].
///
/// Plain `checked_mul` / `checked_div` truncate, which rounds down. The `_up` variants round up
/// so that callers can always round in favour of the pool.
pub trait Decimal256Ext {
    fn to_uint256(&self) -> Uint256;

    /// Converts to an integer amount with `precision` decimals, rounding down.
    fn to_uint128_with_precision(&self, precision: impl Into<u32>) -> StdResult<Uint128>;

    /// Converts to an integer amount with `precision` decimals, rounding up.
    fn to_uint128_with_precision_up(&self, precision: impl Into<u32>) -> StdResult<Uint128>;

    fn from_integer(i: impl Into<Uint256>) -> Self;

    fn with_precision(
        value: impl Into<Uint256>,
        precision: impl Into<u32>,
    ) -> StdResult<Decimal256>;

    fn checked_mul_up(&self, other: Decimal256) -> StdResult<Decimal256>;

    fn checked_div_up(&self, other: Decimal256) -> StdResult<Decimal256>;

    fn checked_div_down(&self, other: Decimal256) -> StdResult<Decimal256>;
}

impl Decimal256Ext for Decimal256 {
    fn to_uint256(&self) -> Uint256 {
        self.atomics() / Uint256::from(DECIMAL_FRACTIONAL)
    }

    fn to_uint128_with_precision(&self, precision: impl Into<u32>) -> StdResult<Uint128> {
        let divisor = precision_divisor(self, precision.into())?;

        Ok(self.atomics().checked_div(divisor)?.try_into()?)
    }

    fn to_uint128_with_precision_up(&self, precision: impl Into<u32>) -> StdResult<Uint128> {
        let divisor = precision_divisor(self, precision.into())?;
        let value = self.atomics();

        let mut quotient = value.checked_div(divisor)?;
        if quotient.checked_mul(divisor)? < value {
            quotient = quotient.checked_add(Uint256::one())?;
        }

        Ok(quotient.try_into()?)
    }

    fn from_integer(i: impl Into<Uint256>) -> Self {
        Decimal256::from_ratio(i.into(), 1u8)
    }

    fn with_precision(
        value: impl Into<Uint256>,
        precision: impl Into<u32>,
    ) -> StdResult<Decimal256> {
        Decimal256::from_atomics(value, precision.into())
            .map_err(|_| StdError::generic_err("Decimal256 range exceeded"))
    }

    fn checked_mul_up(&self, other: Decimal256) -> StdResult<Decimal256> {
        let product = self.atomics().checked_mul(other.atomics())?;
        if product.is_zero() {
            return Ok(Decimal256::zero());
        }

        let one = Uint256::from(DECIMAL_FRACTIONAL);
        let rounded = (product - Uint256::one()).checked_div(one)? + Uint256::one();
        Ok(Decimal256::new(rounded))
    }

    fn checked_div_up(&self, other: Decimal256) -> StdResult<Decimal256> {
        if other.is_zero() {
            return Err(StdError::divide_by_zero(DivideByZeroError::new(self)));
        }
        if self.is_zero() {
            return Ok(Decimal256::zero());
        }

        let scaled = self
            .atomics()
            .checked_mul(Uint256::from(DECIMAL_FRACTIONAL))?;
        let rounded = (scaled - Uint256::one()).checked_div(other.atomics())? + Uint256::one();
        Ok(Decimal256::new(rounded))
    }

    fn checked_div_down(&self, other: Decimal256) -> StdResult<Decimal256> {
        self.checked_div(other).map_err(|e| match e {
            CheckedFromRatioError::DivideByZero => {
                StdError::divide_by_zero(DivideByZeroError::new(self))
            }
            CheckedFromRatioError::Overflow => {
                StdError::overflow(OverflowError::new(OverflowOperation::Mul, self, other))
            }
        })
    }
}

fn precision_divisor(value: &Decimal256, precision: u32) -> StdResult<Uint256> {
    let places = value.decimal_places();
    if precision > places {
        return Err(StdError::generic_err(format!(
            "Precision {} exceeds {} decimal places",
            precision, places
        )));
    }
    Ok(Uint256::from(10u128.pow(places - precision)))
}
