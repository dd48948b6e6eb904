//! Settlement orchestration.
//!
//! One call converts one inbound payment into the target asset plus a refund.
//! Any error returned from here aborts the whole invocation, and the host
//! rolls back every transfer made so far. Nothing in this module undoes work
//! by hand.

use crate::affiliate;
use crate::custody::{self, BalanceSnapshot};
use crate::error::ForwarderError;
use crate::events;
use crate::fees::{acquire_fee_asset, FeeAcquisition};
use crate::fill::{estimate_fee_requirement, fill_primary, target_met};
use crate::guard::SettlementGuard;
use crate::math::{self, checked_sub};
use crate::storage;
use crate::types::*;
use crate::wrapper;
use soroban_sdk::{log, vec, Address, Env};

/// Check the request's shape and return the target asset.
fn validate_request(config: &ForwarderConfig, request: &SettlementRequest) -> Result<Address, ForwarderError> {
    if request.inbound_amount <= 0 {
        return Err(ForwarderError::InvalidAmount);
    }
    let requested = match request.target {
        Target::MinimumAssetOut(amount) | Target::ExactCurrencyIn(amount) => amount,
    };
    if requested <= 0 {
        return Err(ForwarderError::InvalidAmount);
    }
    let affiliate_percentage = request
        .affiliate_fee
        .as_ref()
        .map(|affiliate| affiliate.percentage as u64)
        .unwrap_or(0);
    if affiliate_percentage + request.creator_fee as u64 > config.max_affiliate_fee as u64 {
        return Err(ForwarderError::FeePercentageTooHigh);
    }

    let target_asset = match request.primary_orders.first() {
        Some(order) => order.maker_asset,
        None => return Err(ForwarderError::EmptyOrderSet),
    };
    if target_asset == config.native_token
        || target_asset == config.wrapped_token
        || target_asset == config.fee_asset
    {
        return Err(ForwarderError::AssetMismatch);
    }
    for order in request.primary_orders.iter() {
        if order.maker_asset != target_asset || order.taker_asset != config.wrapped_token {
            return Err(ForwarderError::AssetMismatch);
        }
    }
    for order in request.fee_orders.iter() {
        if order.maker_asset != config.fee_asset || order.taker_asset != config.wrapped_token {
            return Err(ForwarderError::AssetMismatch);
        }
    }

    // An exact spend has to be covered up front together with its fees.
    if let Target::ExactCurrencyIn(exact) = request.target {
        if math::checked_add(exact, fees_on(request, exact)?)? > request.inbound_amount {
            return Err(ForwarderError::InvalidAmount);
        }
    }
    Ok(target_asset)
}

/// Most the affiliate and creator fees together can come to on `spent`.
/// Creator fees are split by recipient, so they never exceed their share of
/// the total.
fn fees_on(request: &SettlementRequest, spent: i128) -> Result<i128, ForwarderError> {
    math::checked_add(
        affiliate::fee_for(&request.affiliate_fee, spent)?,
        math::percentage_of(spent, request.creator_fee)?,
    )
}

/// Currency the primary fills may spend out of `available`, leaving room for
/// the fees on whatever they do spend.
fn primary_ceiling(request: &SettlementRequest, available: i128) -> Result<i128, ForwarderError> {
    match request.target {
        Target::MinimumAssetOut(_) => {
            math::spendable_with_fee(available.max(0), affiliate::combined_percentage(request))
        }
        // Validation and the fee budget already set aside the fees on `exact`.
        Target::ExactCurrencyIn(exact) => Ok(exact),
    }
}

/// Currency fee acquisition may use without eating into an exact spend.
fn fee_budget(request: &SettlementRequest) -> Result<i128, ForwarderError> {
    match request.target {
        Target::MinimumAssetOut(_) => Ok(request.inbound_amount),
        Target::ExactCurrencyIn(exact) => checked_sub(
            checked_sub(request.inbound_amount, exact)?,
            fees_on(request, exact)?,
        ),
    }
}

pub fn settle(env: &Env, payer: &Address, request: &SettlementRequest) -> Result<SettlementOutcome, ForwarderError> {
    let config = storage::get_config(env)?;
    let _guard = SettlementGuard::acquire(env)?;

    log!(env, "settle: validating request");
    let target_asset = validate_request(&config, request)?;
    let inbound = request.inbound_amount;

    let snapshot = BalanceSnapshot::capture(
        env,
        &vec![
            env,
            config.native_token.clone(),
            config.wrapped_token.clone(),
            config.fee_asset.clone(),
            target_asset.clone(),
        ],
    );

    log!(env, "settle: taking payment", inbound);
    custody::pull(env, &config.native_token, payer, inbound)?;
    wrapper::wrap(env, &config, inbound)?;

    log!(env, "settle: acquiring fee asset");
    let estimate_ceiling = primary_ceiling(request, inbound)?;
    let fee_required =
        estimate_fee_requirement(env, &config, &request.primary_orders, &request.target, estimate_ceiling)?;
    let acquisition = if fee_required > 0 {
        acquire_fee_asset(env, &config, &request.fee_orders, fee_required, fee_budget(request)?)?
    } else {
        FeeAcquisition::default()
    };

    log!(env, "settle: filling primary orders");
    let ceiling = primary_ceiling(request, checked_sub(inbound, acquisition.spent)?)?;
    let primary = fill_primary(
        env,
        &config,
        &request.primary_orders,
        &request.target,
        ceiling,
        acquisition.acquired,
    )?;
    if !target_met(&request.target, primary.bought, primary.spent) {
        log!(env, "settle: target unreachable", primary.bought, primary.spent);
        return Err(ForwarderError::UnreachableTarget);
    }

    log!(env, "settle: paying out");
    let affiliate_fee_paid = affiliate::fee_for(&request.affiliate_fee, primary.spent)?;
    let creator_fees = affiliate::creator_fees(env, &primary.spent_by_recipient, request.creator_fee)?;
    let creator_fee_paid = affiliate::total(&creator_fees)?;
    let unspent = checked_sub(checked_sub(inbound, acquisition.spent)?, primary.spent)?;
    let refunded = checked_sub(checked_sub(unspent, affiliate_fee_paid)?, creator_fee_paid)?;
    if refunded < 0 {
        return Err(ForwarderError::Overspent);
    }
    wrapper::unwrap(env, &config, unspent)?;

    custody::push(env, &target_asset, payer, primary.bought)?;
    affiliate::disburse(env, &config, &request.affiliate_fee, affiliate_fee_paid)?;
    affiliate::disburse_creator_fees(env, &config, &creator_fees)?;
    custody::push(env, &config.native_token, payer, refunded)?;

    // Fee asset bought for fills that never needed it goes back to the payer.
    let fee_asset_returned = checked_sub(
        custody::balance(env, &config.fee_asset),
        snapshot.get(&config.fee_asset),
    )?;
    if fee_asset_returned > 0 {
        custody::push(env, &config.fee_asset, payer, fee_asset_returned)?;
    }

    snapshot.verify_unchanged()?;

    let outcome = SettlementOutcome {
        asset_bought: primary.bought,
        currency_spent: primary.spent,
        fee_currency_spent: acquisition.spent,
        affiliate_fee_paid,
        creator_fee_paid,
        refunded,
        fee_asset_returned: fee_asset_returned.max(0),
    };
    events::emit_settlement_event(env, payer, &target_asset, &outcome);
    log!(env, "settle: settlement completed successfully");
    Ok(outcome)
}

/// Move a balance that arrived outside any settlement to `to`.
pub fn sweep(env: &Env, token: &Address, to: &Address) -> Result<i128, ForwarderError> {
    let _guard = SettlementGuard::acquire(env)?;
    let amount = custody::balance(env, token);
    custody::push(env, token, to, amount)?;
    events::emit_sweep_event(env, token, to, amount);
    Ok(amount)
}
