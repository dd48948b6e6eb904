use crate::error::ForwarderError;
use crate::storage;
use soroban_sdk::{log, Env};

/// Execution-state token for one settlement.
///
/// Acquired at entry and released when dropped, so every exit path (success
/// or an early `?` return) releases it. A second acquire while one is live
/// fails with `Reentrant` before any state is touched. The host already
/// refuses contract re-entry; this keeps the rule explicit in the contract's
/// own state.
pub struct SettlementGuard {
    env: Env,
}

impl SettlementGuard {
    pub fn acquire(env: &Env) -> Result<Self, ForwarderError> {
        if storage::is_locked(env) {
            log!(env, "guard: rejected reentrant invocation");
            return Err(ForwarderError::Reentrant);
        }
        storage::set_locked(env);
        Ok(SettlementGuard { env: env.clone() })
    }
}

impl Drop for SettlementGuard {
    fn drop(&mut self) {
        storage::clear_locked(&self.env);
    }
}
