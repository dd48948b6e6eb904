use crate::error::ForwarderError;
use crate::exchange::{self, fill_or_skip, record_skip};
use crate::math::{checked_add, checked_sub, mul_div_ceil, mul_div_floor};
use crate::types::*;
use soroban_sdk::{log, Env, Vec};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeeAcquisition {
    /// Wrapped currency sold into fee orders
    pub spent: i128,
    /// Fee asset gained, net of fee orders' own maker fees
    pub acquired: i128,
}

/// Buy at least `required` fee asset from `fee_orders`, spending no more than
/// `budget`. Running out of orders or budget is not an error here; primary
/// orders whose fees cannot be covered are skipped later.
pub fn acquire_fee_asset(
    env: &Env,
    config: &ForwarderConfig,
    fee_orders: &Vec<Order>,
    required: i128,
    budget: i128,
) -> Result<FeeAcquisition, ForwarderError> {
    let mut acquisition = FeeAcquisition::default();
    for order in fee_orders.iter() {
        let outstanding = checked_sub(required, acquisition.acquired)?;
        let budget_left = checked_sub(budget, acquisition.spent)?;
        if outstanding <= 0 || budget_left <= 0 {
            break;
        }
        let remaining = match exchange::remaining_taker_amount(env, &config.exchange, &order) {
            Ok(remaining) => remaining,
            Err(reason) => {
                record_skip(env, &order, reason);
                continue;
            }
        };
        // The order's own fee is taken out of what it pays, in the same asset.
        let net_maker_amount = order.maker_amount - order.maker_fee;
        if net_maker_amount <= 0 {
            record_skip(env, &order, SkipReason::Unprofitable);
            continue;
        }

        let needed = mul_div_ceil(outstanding, order.taker_amount, net_maker_amount)?;
        let fill = remaining.min(budget_left).min(needed);
        let fee = mul_div_floor(fill, order.maker_fee, order.taker_amount)?;

        match fill_or_skip(env, config, &order, fill, fee)? {
            FillAttempt::Filled(result) => {
                acquisition.spent = checked_add(acquisition.spent, result.taker_filled)?;
                acquisition.acquired = checked_add(
                    acquisition.acquired,
                    checked_sub(result.maker_filled, result.fee_paid)?,
                )?;
            }
            FillAttempt::Skipped(reason) => record_skip(env, &order, reason),
        }
    }
    log!(env, "fees: acquired fee asset", required, acquisition.acquired, acquisition.spent);
    Ok(acquisition)
}
