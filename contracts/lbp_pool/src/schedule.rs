use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;
use lbp::pool::{GradualWeightUpdateResponse, WeightPair};

use crate::error::ContractError;

/// Smallest weight either token may have, 1%
pub const MIN_WEIGHT: Decimal = Decimal::raw(10_000_000_000_000_000);

/// ## Description
/// Linear weight schedule of the pool.
///
/// Before `start_time` the pool trades at `start_weights`, after `end_time` at `end_weights`, and
/// in between the project weight moves linearly. The reserve weight is always derived as
/// `1 - project`, so the pair sums to exactly one at any timestamp.
#[cw_serde]
pub struct GradualWeightUpdate {
    pub start_time: u64,
    pub end_time: u64,
    pub start_weights: WeightPair,
    pub end_weights: WeightPair,
}

impl GradualWeightUpdate {
    pub fn new(
        start_time: u64,
        end_time: u64,
        start_weights: WeightPair,
        end_weights: WeightPair,
    ) -> Result<Self, ContractError> {
        if end_time < start_time {
            return Err(ContractError::InvalidSchedule {
                reason: format!("end time {} is before start time {}", end_time, start_time),
            });
        }
        validate_weights(&start_weights)?;
        validate_weights(&end_weights)?;

        Ok(GradualWeightUpdate {
            start_time,
            end_time,
            start_weights,
            end_weights,
        })
    }

    /// A schedule pinned to `weights`
    pub fn constant(weights: WeightPair, now: u64) -> Result<Self, ContractError> {
        Self::new(now, now, weights, weights)
    }

    pub fn weights_at(&self, timestamp: u64) -> WeightPair {
        let start = self.start_weights.project;
        let end = self.end_weights.project;

        let project = if timestamp >= self.end_time {
            end
        } else if timestamp <= self.start_time {
            start
        } else {
            let progress = Decimal::from_ratio(
                timestamp - self.start_time,
                self.end_time - self.start_time,
            );
            if end >= start {
                start + (end - start) * progress
            } else {
                start - (start - end) * progress
            }
        };

        WeightPair {
            project,
            reserve: Decimal::one() - project,
        }
    }

    pub fn to_response(&self) -> GradualWeightUpdateResponse {
        GradualWeightUpdateResponse {
            start_time: self.start_time,
            end_time: self.end_time,
            start_weights: self.start_weights,
            end_weights: self.end_weights,
        }
    }
}

/// Each weight must lie within [MIN_WEIGHT, 1 - MIN_WEIGHT] and the pair must sum to one
pub fn validate_weights(weights: &WeightPair) -> Result<(), ContractError> {
    let max_weight = Decimal::one() - MIN_WEIGHT;
    for weight in [weights.project, weights.reserve] {
        if weight < MIN_WEIGHT || weight > max_weight {
            return Err(ContractError::InvalidWeights {
                reason: format!("weight {} outside [{}, {}]", weight, MIN_WEIGHT, max_weight),
            });
        }
    }
    if weights.project + weights.reserve != Decimal::one() {
        return Err(ContractError::InvalidWeights {
            reason: "weights must sum to 1".to_string(),
        });
    }
    Ok(())
}
