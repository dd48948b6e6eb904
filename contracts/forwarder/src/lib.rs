#![no_std]
use soroban_sdk::{contract, contractimpl, log, panic_with_error, Address, Env};

mod affiliate;
mod custody;
mod error;
mod events;
mod exchange;
mod fees;
mod fill;
mod guard;
mod math;
mod settlement;
mod storage;
mod storage_types;
mod types;
mod wrapper;

#[cfg(test)]
mod testutils;

pub use error::ForwarderError;
pub use exchange::{Exchange, ExchangeClient};
pub use math::PERCENTAGE_DENOMINATOR;
pub use types::*;
pub use wrapper::{CurrencyWrapper, CurrencyWrapperClient};

#[contract]
pub struct ForwarderContract;

fn check_config(config: &ForwarderConfig) -> Result<(), ForwarderError> {
    let distinct = config.native_token != config.wrapped_token
        && config.native_token != config.fee_asset
        && config.wrapped_token != config.fee_asset;
    if !distinct || (config.max_affiliate_fee as i128) > PERCENTAGE_DENOMINATOR {
        return Err(ForwarderError::InvalidConfig);
    }
    Ok(())
}

#[contractimpl]
impl ForwarderContract {
    /// Constructor function that runs automatically during deployment
    ///
    /// The configuration is fixed for the lifetime of the contract.
    pub fn __constructor(env: Env, config: ForwarderConfig) {
        if let Err(err) = check_config(&config) {
            panic_with_error!(&env, err);
        }
        storage::set_config(&env, &config);
    }

    /// Convert one payment into the target asset of `request.primary_orders`.
    ///
    /// Pulls `request.inbound_amount` of native currency from `payer`,
    /// delivers the bought asset, pays the optional affiliate and creator fees
    /// and refunds everything unspent to `payer`. Either all of that happens or, on any
    /// error, none of it does.
    pub fn settle(
        env: Env,
        payer: Address,
        request: SettlementRequest,
    ) -> Result<SettlementOutcome, ForwarderError> {
        payer.require_auth();
        log!(&env, "settle: starting settlement");
        settlement::settle(&env, &payer, &request)
    }

    /// Move a balance that was sent to the contract directly (never part of
    /// a settlement) to `to`. Only the configured admin can call this.
    pub fn sweep(env: Env, token: Address, to: Address) -> Result<i128, ForwarderError> {
        let config = storage::get_config(&env)?;
        config.admin.require_auth();
        settlement::sweep(&env, &token, &to)
    }

    /// Get the deployment configuration
    pub fn config(env: Env) -> Result<ForwarderConfig, ForwarderError> {
        storage::get_config(&env)
    }
}
