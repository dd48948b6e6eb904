#![cfg(test)]

use crate::{ForwarderConfig, ForwarderContract, ForwarderContractClient, FillResult, Order, OrderInfo, OrderStatus};
use crate::{AffiliateFee, SettlementRequest, Target};
use soroban_sdk::{
    contract, contractimpl, contracttype,
    testutils::{Address as _, IssuerFlags},
    token::{StellarAssetClient, TokenClient},
    vec, Address, Bytes, BytesN, Env, Vec,
};

/// One whole token at 7 decimals
pub const UNIT: i128 = 10_000_000;

pub const PAYER_FUNDS: i128 = 1_000 * UNIT;
pub const MAKER_FUNDS: i128 = 1_000 * UNIT;

// ---------------------------------------------------------------------------
// Mock exchange
// ---------------------------------------------------------------------------

#[derive(Clone)]
#[contracttype]
enum ExchangeKey {
    FeeAsset,
    Filled(BytesN<32>),
    Cancelled(BytesN<32>),
    Misreport,
    OverRequested,
    FillRequests,
}

/// Fills orders the way a real exchange would: assets move by allowance,
/// fills are pro rata and rounded down, and spent orders stop being fillable.
#[contract]
pub struct MockExchange;

#[contractimpl]
impl MockExchange {
    pub fn __constructor(env: Env, fee_asset: Address) {
        env.storage().instance().set(&ExchangeKey::FeeAsset, &fee_asset);
    }

    pub fn cancel(env: Env, order_id: BytesN<32>) {
        env.storage().instance().set(&ExchangeKey::Cancelled(order_id), &true);
    }

    /// Pretend `taker_filled` of the order was already taken by someone else
    pub fn set_filled(env: Env, order_id: BytesN<32>, taker_filled: i128) {
        env.storage().instance().set(&ExchangeKey::Filled(order_id), &taker_filled);
    }

    /// Report one unit more maker asset than was actually delivered
    pub fn set_misreport(env: Env, misreport: bool) {
        env.storage().instance().set(&ExchangeKey::Misreport, &misreport);
    }

    /// Whether any fill ever asked for more than the order had left
    pub fn over_requested(env: Env) -> bool {
        env.storage().instance().get(&ExchangeKey::OverRequested).unwrap_or(false)
    }

    /// Every `(order_id, remaining, taker_fill_amount)` asked of `fill_order`
    pub fn fill_requests(env: Env) -> Vec<(BytesN<32>, i128, i128)> {
        env.storage()
            .instance()
            .get(&ExchangeKey::FillRequests)
            .unwrap_or(Vec::new(&env))
    }

    pub fn get_order_info(env: Env, order: Order) -> OrderInfo {
        let taker_filled: i128 = env
            .storage()
            .instance()
            .get(&ExchangeKey::Filled(order.order_id.clone()))
            .unwrap_or(0);
        let cancelled = env
            .storage()
            .instance()
            .has(&ExchangeKey::Cancelled(order.order_id.clone()));
        let status = if order.signature.is_empty() {
            OrderStatus::Invalid
        } else if cancelled {
            OrderStatus::Cancelled
        } else if env.ledger().timestamp() >= order.expiration {
            OrderStatus::Expired
        } else if taker_filled >= order.taker_amount {
            OrderStatus::FullyFilled
        } else {
            OrderStatus::Fillable
        };
        OrderInfo { status, taker_filled }
    }

    pub fn fill_order(env: Env, taker: Address, order: Order, taker_fill_amount: i128) -> FillResult {
        let info = Self::get_order_info(env.clone(), order.clone());
        if info.status != OrderStatus::Fillable {
            panic!("order is not fillable");
        }
        let remaining = order.taker_amount - info.taker_filled;
        if taker_fill_amount > remaining {
            env.storage().instance().set(&ExchangeKey::OverRequested, &true);
        }
        let mut requests = Self::fill_requests(env.clone());
        requests.push_back((order.order_id.clone(), remaining, taker_fill_amount));
        env.storage().instance().set(&ExchangeKey::FillRequests, &requests);
        let fill = taker_fill_amount.min(remaining);
        if fill <= 0 {
            panic!("nothing to fill");
        }
        let maker_filled = fill * order.maker_amount / order.taker_amount;
        let fee_paid = fill * order.maker_fee / order.taker_amount;

        let me = env.current_contract_address();
        TokenClient::new(&env, &order.taker_asset).transfer_from(&me, &taker, &order.maker, &fill);
        if maker_filled > 0 {
            TokenClient::new(&env, &order.maker_asset).transfer_from(&me, &order.maker, &taker, &maker_filled);
        }
        if fee_paid > 0 {
            let fee_asset: Address = env.storage().instance().get(&ExchangeKey::FeeAsset).unwrap();
            TokenClient::new(&env, &fee_asset).transfer_from(&me, &taker, &order.fee_recipient, &fee_paid);
        }
        env.storage()
            .instance()
            .set(&ExchangeKey::Filled(order.order_id.clone()), &(info.taker_filled + fill));

        let misreport: bool = env.storage().instance().get(&ExchangeKey::Misreport).unwrap_or(false);
        FillResult {
            taker_filled: fill,
            maker_filled: if misreport { maker_filled + 1 } else { maker_filled },
            fee_paid,
        }
    }
}

// ---------------------------------------------------------------------------
// Reentrant exchange
// ---------------------------------------------------------------------------

#[derive(Clone)]
#[contracttype]
enum ReentrantKey {
    Forwarder,
}

/// Calls back into the forwarder from inside a fill.
#[contract]
pub struct ReentrantExchange;

#[contractimpl]
impl ReentrantExchange {
    pub fn set_forwarder(env: Env, forwarder: Address) {
        env.storage().instance().set(&ReentrantKey::Forwarder, &forwarder);
    }

    pub fn get_order_info(_env: Env, _order: Order) -> OrderInfo {
        OrderInfo {
            status: OrderStatus::Fillable,
            taker_filled: 0,
        }
    }

    pub fn fill_order(env: Env, taker: Address, order: Order, taker_fill_amount: i128) -> FillResult {
        let forwarder: Address = env.storage().instance().get(&ReentrantKey::Forwarder).unwrap();
        let request = SettlementRequest {
            primary_orders: vec![&env, order],
            fee_orders: Vec::new(&env),
            target: Target::ExactCurrencyIn(taker_fill_amount),
            inbound_amount: taker_fill_amount,
            affiliate_fee: None,
            creator_fee: 0,
        };
        ForwarderContractClient::new(&env, &forwarder).settle(&taker, &request);
        FillResult {
            taker_filled: 0,
            maker_filled: 0,
            fee_paid: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Mock currency wrapper
// ---------------------------------------------------------------------------

#[derive(Clone)]
#[contracttype]
enum WrapperKey {
    Native,
    Wrapped,
    Shortfall,
}

/// 1:1 wrapper; must be the admin of the wrapped token.
#[contract]
pub struct MockWrapper;

#[contractimpl]
impl MockWrapper {
    pub fn __constructor(env: Env, native: Address, wrapped: Address) {
        env.storage().instance().set(&WrapperKey::Native, &native);
        env.storage().instance().set(&WrapperKey::Wrapped, &wrapped);
    }

    /// Mint `shortfall` less wrapped token than the native currency taken
    pub fn set_shortfall(env: Env, shortfall: i128) {
        env.storage().instance().set(&WrapperKey::Shortfall, &shortfall);
    }

    pub fn wrap(env: Env, from: Address, amount: i128) {
        let me = env.current_contract_address();
        let native: Address = env.storage().instance().get(&WrapperKey::Native).unwrap();
        let wrapped: Address = env.storage().instance().get(&WrapperKey::Wrapped).unwrap();
        let shortfall: i128 = env.storage().instance().get(&WrapperKey::Shortfall).unwrap_or(0);
        TokenClient::new(&env, &native).transfer_from(&me, &from, &me, &amount);
        StellarAssetClient::new(&env, &wrapped).mint(&from, &(amount - shortfall));
    }

    pub fn unwrap(env: Env, to: Address, amount: i128) {
        let me = env.current_contract_address();
        let native: Address = env.storage().instance().get(&WrapperKey::Native).unwrap();
        let wrapped: Address = env.storage().instance().get(&WrapperKey::Wrapped).unwrap();
        TokenClient::new(&env, &wrapped).burn_from(&me, &to, &amount);
        TokenClient::new(&env, &native).transfer(&me, &to, &amount);
    }
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

pub struct TestContext {
    pub env: Env,
    pub config: ForwarderConfig,
    pub payer: Address,
    pub maker: Address,
    pub fee_recipient: Address,
    pub affiliate: Address,
    pub native: TokenClient<'static>,
    pub wrapped: TokenClient<'static>,
    pub fee_asset: TokenClient<'static>,
    pub target: TokenClient<'static>,
    pub exchange: MockExchangeClient<'static>,
    pub wrapper: MockWrapperClient<'static>,
    pub forwarder: ForwarderContractClient<'static>,
}

/// Revocable, so a test can deauthorize a recipient.
fn create_token(env: &Env, admin: &Address) -> Address {
    let asset = env.register_stellar_asset_contract_v2(admin.clone());
    asset.issuer().set_flag(IssuerFlags::RevocableFlag);
    asset.address()
}

impl TestContext {
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths_allowing_non_root_auth();

        let issuer = Address::generate(&env);
        let native = create_token(&env, &issuer);
        let wrapped = create_token(&env, &issuer);
        let fee_asset = create_token(&env, &issuer);
        let target = create_token(&env, &issuer);

        let wrapper = env.register(MockWrapper, (native.clone(), wrapped.clone()));
        StellarAssetClient::new(&env, &wrapped).set_admin(&wrapper);
        let exchange = env.register(MockExchange, (fee_asset.clone(),));

        let config = ForwarderConfig {
            admin: Address::generate(&env),
            exchange: exchange.clone(),
            wrapper: wrapper.clone(),
            native_token: native.clone(),
            wrapped_token: wrapped.clone(),
            fee_asset: fee_asset.clone(),
            max_affiliate_fee: 500,
        };
        let forwarder = env.register(ForwarderContract, (config.clone(),));

        let payer = Address::generate(&env);
        let maker = Address::generate(&env);
        StellarAssetClient::new(&env, &native).mint(&payer, &PAYER_FUNDS);
        StellarAssetClient::new(&env, &target).mint(&maker, &MAKER_FUNDS);
        StellarAssetClient::new(&env, &fee_asset).mint(&maker, &MAKER_FUNDS);

        // Makers let the exchange move their side of every order.
        let expiration = env.ledger().sequence() + 10_000;
        TokenClient::new(&env, &target).approve(&maker, &exchange, &MAKER_FUNDS, &expiration);
        TokenClient::new(&env, &fee_asset).approve(&maker, &exchange, &MAKER_FUNDS, &expiration);

        TestContext {
            config,
            payer,
            maker,
            fee_recipient: Address::generate(&env),
            affiliate: Address::generate(&env),
            native: TokenClient::new(&env, &native),
            wrapped: TokenClient::new(&env, &wrapped),
            fee_asset: TokenClient::new(&env, &fee_asset),
            target: TokenClient::new(&env, &target),
            exchange: MockExchangeClient::new(&env, &exchange),
            wrapper: MockWrapperClient::new(&env, &wrapper),
            forwarder: ForwarderContractClient::new(&env, &forwarder),
            env,
        }
    }

    pub fn order_id(&self, seed: u8) -> BytesN<32> {
        let mut bytes = [0u8; 32];
        bytes[0] = seed;
        BytesN::from_array(&self.env, &bytes)
    }

    fn order(&self, maker_asset: &Address, maker_amount: i128, taker_amount: i128, maker_fee: i128, seed: u8) -> Order {
        Order {
            order_id: self.order_id(seed),
            maker: self.maker.clone(),
            maker_asset: maker_asset.clone(),
            taker_asset: self.wrapped.address.clone(),
            maker_amount,
            taker_amount,
            maker_fee,
            fee_recipient: self.fee_recipient.clone(),
            expiration: u64::MAX,
            signature: Bytes::from_array(&self.env, &[seed; 4]),
        }
    }

    /// Order selling the target asset for wrapped currency
    pub fn primary_order(&self, maker_amount: i128, taker_amount: i128, maker_fee: i128, seed: u8) -> Order {
        self.order(&self.target.address, maker_amount, taker_amount, maker_fee, seed)
    }

    /// Order selling the fee asset for wrapped currency
    pub fn fee_order(&self, maker_amount: i128, taker_amount: i128, maker_fee: i128, seed: u8) -> Order {
        self.order(&self.fee_asset.address, maker_amount, taker_amount, maker_fee, seed)
    }

    pub fn request(
        &self,
        primary_orders: &[Order],
        fee_orders: &[Order],
        target: Target,
        inbound_amount: i128,
        affiliate_fee: Option<AffiliateFee>,
    ) -> SettlementRequest {
        SettlementRequest {
            primary_orders: Vec::from_slice(&self.env, primary_orders),
            fee_orders: Vec::from_slice(&self.env, fee_orders),
            target,
            inbound_amount,
            affiliate_fee,
            creator_fee: 0,
        }
    }

    pub fn affiliate_fee(&self, percentage: u32) -> Option<AffiliateFee> {
        Some(AffiliateFee {
            percentage,
            recipient: self.affiliate.clone(),
        })
    }

    /// Forwarder balances of every asset a settlement touches
    pub fn forwarder_balances(&self) -> [i128; 4] {
        let forwarder = &self.forwarder.address;
        [
            self.native.balance(forwarder),
            self.wrapped.balance(forwarder),
            self.fee_asset.balance(forwarder),
            self.target.balance(forwarder),
        ]
    }
}
