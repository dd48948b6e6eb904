use soroban_sdk::{contracttype, Address, Bytes, BytesN, Vec};

/// Immutable deployment parameters, fixed by the constructor.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForwarderConfig {
    /// May sweep balances donated to the contract outside a settlement
    pub admin: Address,
    pub exchange: Address,
    pub wrapper: Address,
    /// Settlement currency the payer pays in (and is refunded in)
    pub native_token: Address,
    /// Tradable 1:1 wrapping of `native_token`; every order's taker asset
    pub wrapped_token: Address,
    /// Asset maker fees are denominated in
    pub fee_asset: Address,
    /// Ceiling on the affiliate and creator fees together, in basis points of
    /// `PERCENTAGE_DENOMINATOR`
    pub max_affiliate_fee: u32,
}

/// Externally signed offer. The forwarder never mutates one; the exchange
/// either accepts it or the forwarder skips it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Order {
    pub order_id: BytesN<32>,
    pub maker: Address,
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub maker_amount: i128,
    pub taker_amount: i128,
    /// Paid in the fee asset by the taker, pro rata to the taker amount filled
    pub maker_fee: i128,
    pub fee_recipient: Address,
    pub expiration: u64,
    pub signature: Bytes,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum OrderStatus {
    Invalid = 0,
    Fillable = 1,
    Expired = 2,
    FullyFilled = 3,
    Cancelled = 4,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderInfo {
    pub status: OrderStatus,
    pub taker_filled: i128,
}

/// The exchange's report of a single fill.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FillResult {
    pub taker_filled: i128,
    pub maker_filled: i128,
    pub fee_paid: i128,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum SkipReason {
    Unfillable = 0,
    InvalidAmounts = 1,
    InsufficientFeeAsset = 2,
    Unprofitable = 3,
    NothingToFill = 4,
    Reverted = 5,
}

/// Outcome of one attempt to fill one order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FillAttempt {
    Filled(FillResult),
    Skipped(SkipReason),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    /// Buy at least this much of the target asset
    MinimumAssetOut(i128),
    /// Spend exactly this much currency on primary fills
    ExactCurrencyIn(i128),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AffiliateFee {
    /// Basis points of the currency spent on primary fills
    pub percentage: u32,
    pub recipient: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementRequest {
    pub primary_orders: Vec<Order>,
    pub fee_orders: Vec<Order>,
    pub target: Target,
    pub inbound_amount: i128,
    pub affiliate_fee: Option<AffiliateFee>,
    /// Basis points of the currency spent on each primary order, paid in native
    /// currency to that order's fee recipient. Zero for none.
    pub creator_fee: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementOutcome {
    pub asset_bought: i128,
    /// Currency spent on primary fills
    pub currency_spent: i128,
    /// Currency spent acquiring the fee asset
    pub fee_currency_spent: i128,
    pub affiliate_fee_paid: i128,
    /// Creator fees paid to primary orders' fee recipients, all together
    pub creator_fee_paid: i128,
    pub refunded: i128,
    /// Fee asset acquired but not consumed by primary fills, returned to the payer
    pub fee_asset_returned: i128,
}
