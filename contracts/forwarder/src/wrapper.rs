use crate::custody;
use crate::error::ForwarderError;
use crate::types::ForwarderConfig;
use soroban_sdk::{contractclient, log, Address, Env};

#[contractclient(name = "CurrencyWrapperClient")]
pub trait CurrencyWrapper {
    /// Pull `amount` native currency from `from` and credit the same amount
    /// of the wrapped token.
    fn wrap(env: Env, from: Address, amount: i128);

    /// Pull `amount` wrapped token from `to` and pay back native currency.
    fn unwrap(env: Env, to: Address, amount: i128);
}

/// Convert `amount` of the contract's native currency into the wrapped token.
pub fn wrap(env: &Env, config: &ForwarderConfig, amount: i128) -> Result<(), ForwarderError> {
    convert(env, config, &config.native_token, &config.wrapped_token, amount, true)
}

/// Convert `amount` of the contract's wrapped token back into native currency.
pub fn unwrap(env: &Env, config: &ForwarderConfig, amount: i128) -> Result<(), ForwarderError> {
    convert(env, config, &config.wrapped_token, &config.native_token, amount, false)
}

fn convert(
    env: &Env,
    config: &ForwarderConfig,
    from_token: &Address,
    to_token: &Address,
    amount: i128,
    wrapping: bool,
) -> Result<(), ForwarderError> {
    if amount == 0 {
        return Ok(());
    }
    let me = env.current_contract_address();
    let from_before = custody::balance(env, from_token);
    let to_before = custody::balance(env, to_token);

    custody::approve(env, from_token, &config.wrapper, amount);
    let client = CurrencyWrapperClient::new(env, &config.wrapper);
    let reply = if wrapping {
        client.try_wrap(&me, &amount)
    } else {
        client.try_unwrap(&me, &amount)
    };
    custody::revoke(env, from_token, &config.wrapper);

    // Conversion is strictly 1:1.
    let converted = matches!(reply, Ok(Ok(())))
        && from_before - custody::balance(env, from_token) == amount
        && custody::balance(env, to_token) - to_before == amount;
    if !converted {
        log!(env, "wrapper: conversion failed", amount, wrapping);
        return Err(ForwarderError::WrapFailed);
    }
    Ok(())
}
