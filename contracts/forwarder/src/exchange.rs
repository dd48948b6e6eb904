//! Exchange interface and the single-fill primitive.
//!
//! The exchange is a separate contract reached through a generated client.
//! It pulls the taker asset and the fee asset from the forwarder through
//! allowances that exist only for the duration of one fill call.

use crate::custody;
use crate::error::ForwarderError;
use crate::events;
use crate::math::mul_div_floor;
use crate::types::*;
use soroban_sdk::{contractclient, log, Address, Env};

#[contractclient(name = "ExchangeClient")]
pub trait Exchange {
    /// Sell up to `taker_fill_amount` of the order's taker asset, pulled from
    /// `taker` by allowance. Maker fee is pulled from `taker` in the fee asset.
    fn fill_order(env: Env, taker: Address, order: Order, taker_fill_amount: i128) -> FillResult;

    fn get_order_info(env: Env, order: Order) -> OrderInfo;
}

/// Remaining taker amount of `order`, or why it cannot be filled at all.
pub fn remaining_taker_amount(env: &Env, exchange: &Address, order: &Order) -> Result<i128, SkipReason> {
    if order.maker_amount <= 0 || order.taker_amount <= 0 || order.maker_fee < 0 {
        return Err(SkipReason::InvalidAmounts);
    }
    let info = match ExchangeClient::new(env, exchange).try_get_order_info(order) {
        Ok(Ok(info)) => info,
        _ => return Err(SkipReason::Reverted),
    };
    if info.status != OrderStatus::Fillable {
        return Err(SkipReason::Unfillable);
    }
    let remaining = order.taker_amount.saturating_sub(info.taker_filled);
    if remaining <= 0 {
        return Err(SkipReason::Unfillable);
    }
    Ok(remaining)
}

/// Ask the exchange to sell up to `taker_fill_amount` of the taker asset
/// into `order`, letting it take at most `fee_allowance` of the fee asset.
///
/// A reverted fill is a skip. A fill that went through but whose report
/// disagrees with the balances that actually moved is fatal, since the
/// exchange has already committed it.
pub fn fill_or_skip(
    env: &Env,
    config: &ForwarderConfig,
    order: &Order,
    taker_fill_amount: i128,
    fee_allowance: i128,
) -> Result<FillAttempt, ForwarderError> {
    if taker_fill_amount <= 0 {
        return Ok(FillAttempt::Skipped(SkipReason::NothingToFill));
    }

    let exchange = &config.exchange;
    let fee_asset = &config.fee_asset;
    let taker_before = custody::balance(env, &order.taker_asset);
    let maker_before = custody::balance(env, &order.maker_asset);
    let fee_before = custody::balance(env, fee_asset);

    custody::approve(env, &order.taker_asset, exchange, taker_fill_amount);
    if fee_allowance > 0 {
        custody::approve(env, fee_asset, exchange, fee_allowance);
    }

    let reply = ExchangeClient::new(env, exchange).try_fill_order(
        &env.current_contract_address(),
        order,
        &taker_fill_amount,
    );

    custody::revoke(env, &order.taker_asset, exchange);
    if fee_allowance > 0 {
        custody::revoke(env, fee_asset, exchange);
    }

    let result = match reply {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => return Err(ForwarderError::InvalidFillResult),
        Err(_) => {
            log!(env, "fill: order reverted", order.order_id.clone());
            return Ok(FillAttempt::Skipped(SkipReason::Reverted));
        }
    };

    let sold = taker_before - custody::balance(env, &order.taker_asset);
    let maker_delta = custody::balance(env, &order.maker_asset) - maker_before;
    let fee_delta = fee_before - custody::balance(env, fee_asset);

    // When the order pays out in the fee asset, its fee comes out of the proceeds.
    let moved_as_reported = if order.maker_asset == *fee_asset {
        maker_delta == result.maker_filled - result.fee_paid
    } else {
        maker_delta == result.maker_filled && fee_delta == result.fee_paid
    };
    if !moved_as_reported
        || sold != result.taker_filled
        || result.taker_filled < 0
        || result.taker_filled > taker_fill_amount
        || result.fee_paid < 0
        || result.fee_paid > fee_allowance
        || result.maker_filled < mul_div_floor(result.taker_filled, order.maker_amount, order.taker_amount)?
    {
        log!(env, "fill: exchange report does not match balances", order.order_id.clone());
        return Err(ForwarderError::InvalidFillResult);
    }

    if result.taker_filled == 0 {
        return Ok(FillAttempt::Skipped(SkipReason::NothingToFill));
    }

    events::emit_order_filled_event(env, order, &result);
    Ok(FillAttempt::Filled(result))
}

/// Resolve a skip: record it and move on.
pub fn record_skip(env: &Env, order: &Order, reason: SkipReason) {
    log!(env, "fill: skipping order", order.order_id.clone(), reason as u32);
    events::emit_order_skipped_event(env, order, reason);
}
