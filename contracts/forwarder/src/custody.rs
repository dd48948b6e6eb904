use crate::error::ForwarderError;
use soroban_sdk::{log, token::TokenClient, Address, Env, Map, Vec};

pub fn balance(env: &Env, token: &Address) -> i128 {
    TokenClient::new(env, token).balance(&env.current_contract_address())
}

/// Move `amount` of `token` from `from` into the contract. `from` must have
/// authorized the transfer.
pub fn pull(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), ForwarderError> {
    if amount == 0 {
        return Ok(());
    }
    let token_client = TokenClient::new(env, token);
    match token_client.try_transfer(from, &env.current_contract_address(), &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "custody: pull failed", token.clone(), from.clone(), amount);
            Err(ForwarderError::TransferFailed)
        }
    }
}

/// Pay `amount` of `token` out of the contract. A recipient that cannot
/// accept the transfer fails the whole settlement.
pub fn push(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), ForwarderError> {
    if amount == 0 {
        return Ok(());
    }
    let token_client = TokenClient::new(env, token);
    match token_client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "custody: push failed", token.clone(), to.clone(), amount);
            Err(ForwarderError::TransferFailed)
        }
    }
}

/// Let `spender` pull up to `amount` of `token` during the current ledger.
pub fn approve(env: &Env, token: &Address, spender: &Address, amount: i128) {
    let token_client = TokenClient::new(env, token);
    token_client.approve(
        &env.current_contract_address(),
        spender,
        &amount,
        &env.ledger().sequence(),
    );
}

pub fn revoke(env: &Env, token: &Address, spender: &Address) {
    approve(env, token, spender, 0);
}

/// Balances of a fixed set of tokens captured at settlement entry.
pub struct BalanceSnapshot {
    env: Env,
    balances: Map<Address, i128>,
}

impl BalanceSnapshot {
    pub fn capture(env: &Env, tokens: &Vec<Address>) -> Self {
        let mut balances = Map::new(env);
        for token in tokens.iter() {
            balances.set(token.clone(), balance(env, &token));
        }
        BalanceSnapshot {
            env: env.clone(),
            balances,
        }
    }

    /// Entry balance of `token`, zero for tokens not captured.
    pub fn get(&self, token: &Address) -> i128 {
        self.balances.get(token.clone()).unwrap_or(0)
    }

    /// Every captured balance must be back at its entry value.
    pub fn verify_unchanged(&self) -> Result<(), ForwarderError> {
        for (token, before) in self.balances.iter() {
            let after = balance(&self.env, &token);
            if after != before {
                log!(&self.env, "custody: residual balance", token.clone(), before, after);
                return Err(ForwarderError::ResidualBalance);
            }
        }
        Ok(())
    }
}
