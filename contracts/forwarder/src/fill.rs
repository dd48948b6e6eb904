//! Primary fills: buy the target asset with wrapped currency.
//!
//! Orders are taken in the caller's order; price priority is the caller's
//! job. Every fill is bounded by the order's remaining taker amount, the
//! remaining currency ceiling, what the target still needs and the fee asset
//! left to pay the order's maker fee in full. Bounds round
//! down so the forwarder never spends past its ceiling; the conversion of a
//! missing asset amount into currency rounds up so a minimum-out target is
//! not missed by one unit of rounding.

use crate::error::ForwarderError;
use crate::exchange::{self, fill_or_skip, record_skip};
use crate::math::{checked_add, checked_sub, mul_div_ceil, mul_div_floor};
use crate::types::*;
use soroban_sdk::{log, Address, Env, Map, Vec};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrimaryFill {
    pub bought: i128,
    pub spent: i128,
    pub fee_paid: i128,
    /// Currency spent per order fee recipient, for creator fees
    pub spent_by_recipient: Map<Address, i128>,
}

impl PrimaryFill {
    pub fn new(env: &Env) -> Self {
        PrimaryFill {
            bought: 0,
            spent: 0,
            fee_paid: 0,
            spent_by_recipient: Map::new(env),
        }
    }

    fn record(&mut self, order: &Order, result: &FillResult) -> Result<(), ForwarderError> {
        self.bought = checked_add(self.bought, result.maker_filled)?;
        self.spent = checked_add(self.spent, result.taker_filled)?;
        self.fee_paid = checked_add(self.fee_paid, result.fee_paid)?;
        let recipient = order.fee_recipient.clone();
        let so_far = self.spent_by_recipient.get(recipient.clone()).unwrap_or(0);
        self.spent_by_recipient
            .set(recipient, checked_add(so_far, result.taker_filled)?);
        Ok(())
    }
}

pub fn target_met(target: &Target, bought: i128, spent: i128) -> bool {
    match target {
        Target::MinimumAssetOut(minimum) => bought >= *minimum,
        Target::ExactCurrencyIn(exact) => spent == *exact,
    }
}

/// Taker amount `order` would have to sell for the target to be met.
fn taker_needed(order: &Order, target: &Target, bought: i128, spent: i128) -> Result<i128, ForwarderError> {
    match target {
        Target::MinimumAssetOut(minimum) => {
            let missing = checked_sub(*minimum, bought)?;
            if missing <= 0 {
                return Ok(0);
            }
            mul_div_ceil(missing, order.taker_amount, order.maker_amount)
        }
        Target::ExactCurrencyIn(exact) => Ok(checked_sub(*exact, spent)?.max(0)),
    }
}

fn bounded_fill(
    order: &Order,
    remaining_taker: i128,
    ceiling_left: i128,
    target: &Target,
    bought: i128,
    spent: i128,
) -> Result<i128, ForwarderError> {
    let needed = taker_needed(order, target, bought, spent)?;
    Ok(remaining_taker.min(ceiling_left).min(needed).max(0))
}

/// Largest taker amount of `order` whose maker fee `fee_left` pays in full.
fn fee_bound(order: &Order, fee_left: i128) -> Result<i128, ForwarderError> {
    if order.maker_fee == 0 {
        return Ok(i128::MAX);
    }
    mul_div_floor(fee_left.max(0), order.taker_amount, order.maker_fee)
}

/// Fee asset the primary fills are expected to need, planned against current
/// order state with the same bounds the real fills use. No fee asset is held
/// yet, so the fee bound is left open: the plan asks for every fee it would
/// pay.
pub fn estimate_fee_requirement(
    env: &Env,
    config: &ForwarderConfig,
    orders: &Vec<Order>,
    target: &Target,
    ceiling: i128,
) -> Result<i128, ForwarderError> {
    let mut plan = PrimaryFill::new(env);
    for order in orders.iter() {
        if target_met(target, plan.bought, plan.spent) {
            break;
        }
        let ceiling_left = checked_sub(ceiling, plan.spent)?;
        if ceiling_left <= 0 {
            break;
        }
        let remaining = match exchange::remaining_taker_amount(env, &config.exchange, &order) {
            Ok(remaining) => remaining,
            Err(_) => continue,
        };
        let fill = bounded_fill(&order, remaining, ceiling_left, target, plan.bought, plan.spent)?;
        plan.fee_paid = checked_add(
            plan.fee_paid,
            mul_div_floor(fill, order.maker_fee, order.taker_amount)?,
        )?;
        plan.bought = checked_add(
            plan.bought,
            mul_div_floor(fill, order.maker_amount, order.taker_amount)?,
        )?;
        plan.spent = checked_add(plan.spent, fill)?;
    }
    Ok(plan.fee_paid)
}

/// Fill primary orders until the target is met, the ceiling is spent or the
/// orders run out. Whether the target was met is for the caller to judge.
pub fn fill_primary(
    env: &Env,
    config: &ForwarderConfig,
    orders: &Vec<Order>,
    target: &Target,
    ceiling: i128,
    fee_available: i128,
) -> Result<PrimaryFill, ForwarderError> {
    let mut filled = PrimaryFill::new(env);
    for order in orders.iter() {
        if target_met(target, filled.bought, filled.spent) {
            break;
        }
        let ceiling_left = checked_sub(ceiling, filled.spent)?;
        if ceiling_left <= 0 {
            break;
        }
        let remaining = match exchange::remaining_taker_amount(env, &config.exchange, &order) {
            Ok(remaining) => remaining,
            Err(reason) => {
                record_skip(env, &order, reason);
                continue;
            }
        };

        let fill = bounded_fill(&order, remaining, ceiling_left, target, filled.bought, filled.spent)?;
        // The fill shrinks to what the fee asset left pays for in full.
        let fee_left = checked_sub(fee_available, filled.fee_paid)?;
        let fee_bounded = fill.min(fee_bound(&order, fee_left)?);
        if fill > 0 && fee_bounded <= 0 {
            record_skip(env, &order, SkipReason::InsufficientFeeAsset);
            continue;
        }
        let fill = fee_bounded;
        let fee_needed = mul_div_floor(fill, order.maker_fee, order.taker_amount)?;

        match fill_or_skip(env, config, &order, fill, fee_needed)? {
            FillAttempt::Filled(result) => filled.record(&order, &result)?,
            FillAttempt::Skipped(reason) => record_skip(env, &order, reason),
        }
    }
    log!(env, "fill: primary fills done", filled.bought, filled.spent, filled.fee_paid);
    Ok(filled)
}
