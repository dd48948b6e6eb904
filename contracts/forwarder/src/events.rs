use crate::types::*;
use soroban_sdk::{contractevent, Address, BytesN, Env};

// Event topics for better filtering and indexing
#[contractevent(topics = ["FORWARDER", "settle"])]
#[derive(Clone, Debug)]
pub struct SettlementEvent {
    pub payer: Address,
    pub target_asset: Address,
    pub asset_bought: i128,
    pub currency_spent: i128,
    pub fee_currency_spent: i128,
    pub affiliate_fee_paid: i128,
    pub creator_fee_paid: i128,
    pub refunded: i128,
    pub fee_asset_returned: i128,
}

#[contractevent(topics = ["FORWARDER", "fill"])]
#[derive(Clone, Debug)]
pub struct OrderFilledEvent {
    pub order_id: BytesN<32>,
    pub sold: i128,
    pub bought: i128,
    pub fee_paid: i128,
}

#[contractevent(topics = ["FORWARDER", "skip"])]
#[derive(Clone, Debug)]
pub struct OrderSkippedEvent {
    pub order_id: BytesN<32>,
    pub reason: SkipReason,
}

#[contractevent(topics = ["SWEEP"])]
#[derive(Clone, Debug)]
pub struct SweepEvent {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
}

pub fn emit_settlement_event(env: &Env, payer: &Address, target_asset: &Address, outcome: &SettlementOutcome) {
    SettlementEvent {
        payer: payer.clone(),
        target_asset: target_asset.clone(),
        asset_bought: outcome.asset_bought,
        currency_spent: outcome.currency_spent,
        fee_currency_spent: outcome.fee_currency_spent,
        affiliate_fee_paid: outcome.affiliate_fee_paid,
        creator_fee_paid: outcome.creator_fee_paid,
        refunded: outcome.refunded,
        fee_asset_returned: outcome.fee_asset_returned,
    }
    .publish(env);
}

pub fn emit_order_filled_event(env: &Env, order: &Order, result: &FillResult) {
    OrderFilledEvent {
        order_id: order.order_id.clone(),
        sold: result.taker_filled,
        bought: result.maker_filled,
        fee_paid: result.fee_paid,
    }
    .publish(env);
}

pub fn emit_order_skipped_event(env: &Env, order: &Order, reason: SkipReason) {
    OrderSkippedEvent {
        order_id: order.order_id.clone(),
        reason,
    }
    .publish(env);
}

pub fn emit_sweep_event(env: &Env, token: &Address, to: &Address, amount: i128) {
    SweepEvent {
        token: token.clone(),
        to: to.clone(),
        amount,
    }
    .publish(env);
}
