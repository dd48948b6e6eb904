use crate::error::ForwarderError;
use crate::storage_types::*;
use crate::types::*;
use soroban_sdk::Env;

pub fn set_config(env: &Env, config: &ForwarderConfig) {
    let key = DataKey::Config;
    env.storage().instance().set(&key, config);
}

pub fn get_config(env: &Env) -> Result<ForwarderConfig, ForwarderError> {
    let key = DataKey::Config;
    env.storage()
        .instance()
        .get(&key)
        .ok_or(ForwarderError::InvalidConfig)
}

/// Whether a settlement (or sweep) is currently executing on this instance
pub fn is_locked(env: &Env) -> bool {
    let key = DataKey::SettlementLock;
    env.storage().instance().has(&key)
}

pub fn set_locked(env: &Env) {
    let key = DataKey::SettlementLock;
    env.storage().instance().set(&key, &true);
}

pub fn clear_locked(env: &Env) {
    let key = DataKey::SettlementLock;
    env.storage().instance().remove(&key);
}
