use crate::custody;
use crate::error::ForwarderError;
use crate::math::{self, checked_add};
use crate::types::*;
use soroban_sdk::{log, Address, Env, Map};

/// Affiliate cut of the currency spent on primary fills. Never of the
/// inbound amount: the unspent excess is refunded untaxed.
pub fn fee_for(affiliate: &Option<AffiliateFee>, spent: i128) -> Result<i128, ForwarderError> {
    match affiliate {
        Some(affiliate) => math::percentage_of(spent, affiliate.percentage),
        None => Ok(0),
    }
}

/// Affiliate and creator basis points together. Both are validated against
/// the deployment ceiling before this is used.
pub fn combined_percentage(request: &SettlementRequest) -> u32 {
    let affiliate = request
        .affiliate_fee
        .as_ref()
        .map(|affiliate| affiliate.percentage)
        .unwrap_or(0);
    affiliate.saturating_add(request.creator_fee)
}

/// Creator fee owed to each fee recipient, on the currency spent through
/// that recipient's orders. Recipients owed nothing are left out.
pub fn creator_fees(
    env: &Env,
    spent_by_recipient: &Map<Address, i128>,
    percentage: u32,
) -> Result<Map<Address, i128>, ForwarderError> {
    let mut fees = Map::new(env);
    for (recipient, spent) in spent_by_recipient.iter() {
        let fee = math::percentage_of(spent, percentage)?;
        if fee > 0 {
            fees.set(recipient, fee);
        }
    }
    Ok(fees)
}

pub fn total(fees: &Map<Address, i128>) -> Result<i128, ForwarderError> {
    let mut sum = 0;
    for (_, fee) in fees.iter() {
        sum = checked_add(sum, fee)?;
    }
    Ok(sum)
}

/// Pay `amount` of native currency to the affiliate. A recipient that
/// rejects the payment aborts the settlement.
pub fn disburse(
    env: &Env,
    config: &ForwarderConfig,
    affiliate: &Option<AffiliateFee>,
    amount: i128,
) -> Result<(), ForwarderError> {
    let Some(affiliate) = affiliate else {
        return Ok(());
    };
    if amount > 0 {
        log!(env, "affiliate: paying fee", affiliate.recipient.clone(), amount);
    }
    custody::push(env, &config.native_token, &affiliate.recipient, amount)
}

pub fn disburse_creator_fees(
    env: &Env,
    config: &ForwarderConfig,
    fees: &Map<Address, i128>,
) -> Result<(), ForwarderError> {
    for (recipient, fee) in fees.iter() {
        log!(env, "affiliate: paying creator fee", recipient.clone(), fee);
        custody::push(env, &config.native_token, &recipient, fee)?;
    }
    Ok(())
}
