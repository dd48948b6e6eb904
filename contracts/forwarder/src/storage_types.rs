use soroban_sdk::contracttype;

// Main storage key enum
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    SettlementLock, // present only while a settlement or sweep is running
}
