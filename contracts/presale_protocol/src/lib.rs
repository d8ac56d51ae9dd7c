//! # Tiered Presale Contract
//!
//! This is the root crate of the tiered allow-list presale. It exposes the
//! single Soroban contract `TieredPresale` whose entry points cover the full
//! sale lifecycle:
//!
//! | Phase         | Entry Point(s)                                      |
//! |---------------|-----------------------------------------------------|
//! | Bootstrap     | [`TieredPresale::init`]                             |
//! | Configuration | `set_rates`, `add_payment_token`, `remove_payment_token` |
//! | Lifecycle     | [`TieredPresale::start_sale`], `stop_sale`, `restart_sale` |
//! | Purchase      | [`TieredPresale::buy_tokens`], [`TieredPresale::buy_nfts`] |
//! | Queries       | `get_tier`, `has_claimed`, `get_sale_state`, `get_rates`, `required_payment`, `approved_payment_tokens` |
//!
//! ## Architecture
//!
//! Merkle verification is fully delegated to [`merkle`]. Storage access is
//! fully delegated to [`storage`]. This file contains the public entry
//! points, the purchase engine, and event emissions.
//!
//! ## Purchase engine ordering
//!
//! The engine validates in a fixed order — lifecycle, rate, tier, proof,
//! claim, discrete amount — then collects payment, records the claim, and
//! only then delivers inventory. The order is part of the contract's
//! security surface: no value moves until every check has passed, and the
//! claim is durably recorded before the delivery call leaves the contract.

#![no_std]

use soroban_sdk::{
    contract, contractclient, contracterror, contractimpl, panic_with_error, symbol_short, token,
    Address, BytesN, Env, Vec,
};

mod events;
mod merkle;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

use storage::Wiring;
pub use events::{PurchaseCompleted, RatesUpdated, SaleStarted, SaleStopped};
pub use types::{PaymentRail, PurchaseKind, Rates, SaleState, SaleStatus, Tier};

/// Fixed-point scale of [`Rates::native_rate`]: stroops per smallest
/// sale-token unit are expressed with 7 extra decimals (Stellar asset
/// precision) so unit prices below one stroop do not truncate to zero.
pub const NATIVE_RATE_SCALE: i128 = 10_000_000;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized             = 1,
    NotAuthorized                  = 2,
    SaleNotOpen                    = 3,
    SaleAlreadyStarted             = 4,
    SaleNotStopped                 = 5,
    RateNotSet                     = 6,
    InvalidRateConfig              = 7,
    InvalidTier                    = 8,
    InvalidTierConfig              = 9,
    NotWhitelisted                 = 10,
    AlreadyClaimed                 = 11,
    DiscreteViolation              = 12,
    InsufficientNativeValue        = 13,
    InsufficientBalanceOrAllowance = 14,
    UnsupportedPaymentToken        = 15,
    SupplyExhausted                = 16,
    ReserveAllowanceExhausted      = 17,
    ReentrantCall                  = 18,
    MathOverflow                   = 19,
}

/// Capability consumed from the external membership-NFT collection:
/// mint `count` NFTs to `to`. The presale never tracks collection state.
#[contractclient(name = "MembershipNftClient")]
pub trait MembershipNft {
    fn mint(env: Env, to: Address, count: u32);
}

#[contract]
pub struct TieredPresale;

#[contractimpl]
impl TieredPresale {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract wiring and set the administrator.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls panic with `Error::AlreadyInitialized`.
    ///
    /// - `sale_token` — the fungible token being sold.
    /// - `membership_nft` — collection contract implementing `mint(to, count)`.
    /// - `native_token` — wrapped native asset used for the native rail.
    /// - `reserve` — wallet holding inventory; must grant this contract an
    ///   allowance on `sale_token` before the first purchase.
    /// - `treasury` — receives all collected payments.
    pub fn init(
        env: Env,
        admin: Address,
        sale_token: Address,
        membership_nft: Address,
        native_token: Address,
        reserve: Address,
        treasury: Address,
    ) {
        admin.require_auth();
        if storage::is_initialized(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        storage::set_admin(&env, &admin);
        storage::set_wiring(
            &env,
            &Wiring {
                sale_token,
                membership_nft,
                native_token,
                reserve,
                treasury,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Administration
    // ─────────────────────────────────────────────────────────

    /// Configure the conversion rates. Callable in any lifecycle state.
    ///
    /// Zero is the "unset" sentinel and keeps the corresponding rail closed;
    /// negative values panic with `Error::InvalidRateConfig`.
    pub fn set_rates(env: Env, caller: Address, stable_rate: i128, native_rate: i128) {
        require_admin(&env, &caller);
        if stable_rate < 0 || native_rate < 0 {
            panic_with_error!(&env, Error::InvalidRateConfig);
        }
        let rates = Rates {
            stable_rate,
            native_rate,
        };
        storage::save_rates(&env, &rates);
        env.events().publish(
            (symbol_short!("rates"),),
            RatesUpdated {
                stable_rate,
                native_rate,
            },
        );
    }

    /// Add a stablecoin to the approved payment set. Idempotent.
    pub fn add_payment_token(env: Env, caller: Address, token: Address) {
        require_admin(&env, &caller);
        let mut tokens = storage::get_payment_tokens(&env);
        if !tokens.contains(&token) {
            tokens.push_back(token);
            storage::save_payment_tokens(&env, &tokens);
        }
    }

    /// Remove a stablecoin from the approved payment set. Idempotent.
    pub fn remove_payment_token(env: Env, caller: Address, token: Address) {
        require_admin(&env, &caller);
        let mut tokens = storage::get_payment_tokens(&env);
        if let Some(index) = tokens.first_index_of(&token) {
            tokens.remove(index);
            storage::save_payment_tokens(&env, &tokens);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────

    /// Open the sale with its tier set. `NotStarted → Open`, exactly once.
    ///
    /// The three sequences must have equal length; index `i` of each defines
    /// tier `i`. Tiers are immutable for the lifetime of the activation.
    /// Panics with `Error::SaleAlreadyStarted` from any other state.
    pub fn start_sale(
        env: Env,
        caller: Address,
        unit_counts: Vec<u32>,
        total_allocations: Vec<i128>,
        allow_roots: Vec<BytesN<32>>,
    ) {
        require_admin(&env, &caller);
        let state = storage::get_sale_state(&env);
        if state.status != SaleStatus::NotStarted {
            panic_with_error!(&env, Error::SaleAlreadyStarted);
        }

        let tier_count = activate_tiers(
            &env,
            state.generation,
            &unit_counts,
            &total_allocations,
            &allow_roots,
        );
        storage::save_sale_state(
            &env,
            &SaleState {
                status: SaleStatus::Open,
                generation: state.generation,
            },
        );

        env.events().publish(
            (symbol_short!("started"), state.generation),
            SaleStarted {
                generation: state.generation,
                tier_count,
            },
        );
    }

    /// Stop the sale. `Open → Stopped`; terminal in the base flow.
    pub fn stop_sale(env: Env, caller: Address) {
        require_admin(&env, &caller);
        let state = storage::get_sale_state(&env);
        if state.status != SaleStatus::Open {
            panic_with_error!(&env, Error::SaleNotOpen);
        }
        storage::save_sale_state(
            &env,
            &SaleState {
                status: SaleStatus::Stopped,
                generation: state.generation,
            },
        );
        env.events().publish(
            (symbol_short!("stopped"), state.generation),
            SaleStopped {
                generation: state.generation,
            },
        );
    }

    /// Re-open a stopped sale with a fresh tier set. `Stopped → Open`.
    ///
    /// This is deliberately a separate transition from `start_sale`: it bumps
    /// the claim generation, so every address becomes unclaimed again and the
    /// previous tier set is retired in the same atomic step.
    pub fn restart_sale(
        env: Env,
        caller: Address,
        unit_counts: Vec<u32>,
        total_allocations: Vec<i128>,
        allow_roots: Vec<BytesN<32>>,
    ) {
        require_admin(&env, &caller);
        let state = storage::get_sale_state(&env);
        if state.status != SaleStatus::Stopped {
            panic_with_error!(&env, Error::SaleNotStopped);
        }

        let generation = state.generation + 1;
        let tier_count = activate_tiers(
            &env,
            generation,
            &unit_counts,
            &total_allocations,
            &allow_roots,
        );
        storage::save_sale_state(
            &env,
            &SaleState {
                status: SaleStatus::Open,
                generation,
            },
        );

        env.events().publish(
            (symbol_short!("restarted"), generation),
            SaleStarted {
                generation,
                tier_count,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Purchases
    // ─────────────────────────────────────────────────────────

    /// Buy `amount` sale-token units under tier `tier_index`.
    ///
    /// - `proof` — merkle proof that `buyer` belongs to the tier's allow-list.
    /// - `rail` — native pulls the configured native token; stable pulls the
    ///   approved stablecoin named by `payment_token`.
    /// - `payment_token` — required on the stable rail, ignored on native.
    ///
    /// `amount` must be a multiple of the tier's unit size, at most the full
    /// allocation, and each address may purchase exactly once per activation.
    pub fn buy_tokens(
        env: Env,
        buyer: Address,
        amount: i128,
        tier_index: u32,
        proof: Vec<BytesN<32>>,
        rail: PaymentRail,
        payment_token: Option<Address>,
    ) {
        buyer.require_auth();
        purchase(
            &env,
            &buyer,
            PurchaseKind::Token,
            amount,
            tier_index,
            &proof,
            rail,
            payment_token,
        );
    }

    /// Buy `count` membership NFTs under tier `tier_index`.
    ///
    /// Same contract as [`TieredPresale::buy_tokens`] with `count`
    /// substituted for the amount in the discrete-quantity rule and in the
    /// payment computation; delivery mints on the collection contract.
    pub fn buy_nfts(
        env: Env,
        buyer: Address,
        count: u32,
        tier_index: u32,
        proof: Vec<BytesN<32>>,
        rail: PaymentRail,
        payment_token: Option<Address>,
    ) {
        buyer.require_auth();
        purchase(
            &env,
            &buyer,
            PurchaseKind::Nft,
            i128::from(count),
            tier_index,
            &proof,
            rail,
            payment_token,
        );
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Tier `index` of the current activation.
    /// Panics with `Error::InvalidTier` when out of bounds.
    pub fn get_tier(env: Env, index: u32) -> Tier {
        let state = storage::get_sale_state(&env);
        resolve_tier(&env, state.generation, index)
    }

    /// Number of tiers in the current activation (0 before `start_sale`).
    pub fn tier_count(env: Env) -> u32 {
        storage::get_tier_count(&env)
    }

    /// Whether `address` has already exercised its claim under the current
    /// activation.
    pub fn has_claimed(env: Env, address: Address) -> bool {
        let state = storage::get_sale_state(&env);
        storage::is_claimed(&env, state.generation, &address)
    }

    pub fn get_sale_state(env: Env) -> SaleState {
        storage::get_sale_state(&env)
    }

    pub fn get_rates(env: Env) -> Rates {
        storage::get_rates(&env)
    }

    pub fn approved_payment_tokens(env: Env) -> Vec<Address> {
        storage::get_payment_tokens(&env)
    }

    /// Payment required to buy `amount` units on `rail`, in payment-token
    /// units. Panics with `Error::RateNotSet` when the rail is closed.
    pub fn required_payment(env: Env, amount: i128, rail: PaymentRail) -> i128 {
        let rates = storage::get_rates(&env);
        compute_required_payment(&env, &rates, amount, rail)
    }
}

// ─────────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────────

fn require_admin(env: &Env, caller: &Address) {
    caller.require_auth();
    if *caller != storage::get_admin(env) {
        panic_with_error!(env, Error::NotAuthorized);
    }
}

/// Validate and store a tier set for `generation`. Returns the tier count.
fn activate_tiers(
    env: &Env,
    generation: u32,
    unit_counts: &Vec<u32>,
    total_allocations: &Vec<i128>,
    allow_roots: &Vec<BytesN<32>>,
) -> u32 {
    let count = unit_counts.len();
    if count == 0 || total_allocations.len() != count || allow_roots.len() != count {
        panic_with_error!(env, Error::InvalidTierConfig);
    }

    for index in 0..count {
        let unit_count = unit_counts.get(index).unwrap();
        let total_allocation = total_allocations.get(index).unwrap();
        if unit_count == 0 || total_allocation <= 0 {
            panic_with_error!(env, Error::InvalidTierConfig);
        }
        let tier = Tier {
            total_allocation,
            unit_count,
            allow_root: allow_roots.get(index).unwrap(),
        };
        storage::save_tier(env, generation, index, &tier);
    }

    storage::set_tier_count(env, count);
    count
}

fn resolve_tier(env: &Env, generation: u32, index: u32) -> Tier {
    match storage::load_tier(env, generation, index) {
        Some(tier) => tier,
        None => panic_with_error!(env, Error::InvalidTier),
    }
}

/// Discrete-quantity rule: `requested` must be a positive multiple of the
/// tier's unit size, no larger than the full allocation. Both the
/// "wrong multiple" and "over the tier maximum" cases surface as
/// `Error::DiscreteViolation`.
fn validate_discrete(env: &Env, tier: &Tier, requested: i128) {
    // unit_count >= 1 is enforced at activation, so this never divides by zero.
    let unit_size = tier.total_allocation / i128::from(tier.unit_count);
    if unit_size <= 0
        || requested <= 0
        || requested % unit_size != 0
        || requested / unit_size > i128::from(tier.unit_count)
    {
        panic_with_error!(env, Error::DiscreteViolation);
    }
}

/// Convert a requested amount into the required payment for `rail`.
///
/// Stable: direct multiply (shared decimal precision). Native: multiply by
/// the fixed-point rate first, then divide by [`NATIVE_RATE_SCALE`],
/// rounding up so the sale never undercharges.
fn compute_required_payment(env: &Env, rates: &Rates, amount: i128, rail: PaymentRail) -> i128 {
    match rail {
        PaymentRail::Stable => {
            if rates.stable_rate == 0 {
                panic_with_error!(env, Error::RateNotSet);
            }
            checked_mul(env, amount, rates.stable_rate)
        }
        PaymentRail::Native => {
            if rates.native_rate == 0 {
                panic_with_error!(env, Error::RateNotSet);
            }
            let scaled = checked_mul(env, amount, rates.native_rate);
            // Ceiling division; scaled is positive here.
            checked_add(env, scaled, NATIVE_RATE_SCALE - 1) / NATIVE_RATE_SCALE
        }
    }
}

fn checked_mul(env: &Env, a: i128, b: i128) -> i128 {
    match a.checked_mul(b) {
        Some(v) => v,
        None => panic_with_error!(env, Error::MathOverflow),
    }
}

fn checked_add(env: &Env, a: i128, b: i128) -> i128 {
    match a.checked_add(b) {
        Some(v) => v,
        None => panic_with_error!(env, Error::MathOverflow),
    }
}

/// The purchase engine. Validation order is fixed and security-relevant:
///
/// 1. sale open  2. rate set  3. tier resolves  4. proof verifies
/// 5. not yet claimed  6. discrete amount  7. compute payment
/// 8. collect payment  9. record claim  10. deliver inventory
///
/// Steps 8 and 10 call external contracts; the whole engine therefore runs
/// under the reentrancy guard, and any panic rolls back every prior write.
#[allow(clippy::too_many_arguments)]
fn purchase(
    env: &Env,
    buyer: &Address,
    kind: PurchaseKind,
    amount: i128,
    tier_index: u32,
    proof: &Vec<BytesN<32>>,
    rail: PaymentRail,
    payment_token: Option<Address>,
) {
    if storage::is_entered(env) {
        panic_with_error!(env, Error::ReentrantCall);
    }
    storage::set_entered(env);

    // 1. Lifecycle gate.
    let state = storage::get_sale_state(env);
    if state.status != SaleStatus::Open {
        panic_with_error!(env, Error::SaleNotOpen);
    }

    // 2. Rate gate (checked again inside the conversion at step 7; this
    //    ordering guarantees RateNotSet beats tier and proof failures).
    let rates = storage::get_rates(env);
    let rate_set = match rail {
        PaymentRail::Native => rates.native_rate != 0,
        PaymentRail::Stable => rates.stable_rate != 0,
    };
    if !rate_set {
        panic_with_error!(env, Error::RateNotSet);
    }

    // 3. Tier resolution.
    let tier = resolve_tier(env, state.generation, tier_index);

    // 4. Allow-list membership.
    let leaf = merkle::leaf_for(env, buyer);
    if !merkle::verify(env, &tier.allow_root, proof, &leaf) {
        panic_with_error!(env, Error::NotWhitelisted);
    }

    // 5. One-time claim.
    if storage::is_claimed(env, state.generation, buyer) {
        panic_with_error!(env, Error::AlreadyClaimed);
    }

    // 6. Discrete-quantity rule.
    validate_discrete(env, &tier, amount);

    // 7. Required payment.
    let required = compute_required_payment(env, &rates, amount, rail);

    // 8. Collect payment into the treasury.
    let wiring = storage::get_wiring(env);
    let payment_token = collect_payment(env, &wiring, buyer, rail, payment_token, required);

    // 9. Record the claim before delivery leaves the contract.
    storage::mark_claimed(env, state.generation, buyer);

    // 10. Deliver inventory.
    deliver(env, &wiring, buyer, kind, amount);

    storage::clear_entered(env);

    env.events().publish(
        (symbol_short!("purchase"), buyer.clone()),
        PurchaseCompleted {
            buyer: buyer.clone(),
            kind,
            rail,
            payment_token,
            paid: required,
            amount,
            tier_index,
        },
    );
}

/// Pull `required` payment units from the buyer to the treasury.
/// Returns the token that settled the payment.
fn collect_payment(
    env: &Env,
    wiring: &Wiring,
    buyer: &Address,
    rail: PaymentRail,
    payment_token: Option<Address>,
    required: i128,
) -> Address {
    let settle_token = match rail {
        PaymentRail::Native => wiring.native_token.clone(),
        PaymentRail::Stable => {
            let named = match payment_token {
                Some(token) => token,
                None => panic_with_error!(env, Error::UnsupportedPaymentToken),
            };
            if !storage::get_payment_tokens(env).contains(&named) {
                panic_with_error!(env, Error::UnsupportedPaymentToken);
            }
            named
        }
    };

    let client = token::Client::new(env, &settle_token);
    if client.balance(buyer) < required {
        let shortfall = match rail {
            PaymentRail::Native => Error::InsufficientNativeValue,
            PaymentRail::Stable => Error::InsufficientBalanceOrAllowance,
        };
        panic_with_error!(env, shortfall);
    }
    client.transfer(buyer, &wiring.treasury, &required);
    settle_token
}

/// Move inventory to the buyer: sale tokens under the reserve's delegated
/// allowance, or freshly minted membership NFTs.
fn deliver(env: &Env, wiring: &Wiring, buyer: &Address, kind: PurchaseKind, amount: i128) {
    match kind {
        PurchaseKind::Token => {
            let client = token::Client::new(env, &wiring.sale_token);
            let spender = env.current_contract_address();
            if client.balance(&wiring.reserve) < amount {
                panic_with_error!(env, Error::SupplyExhausted);
            }
            if client.allowance(&wiring.reserve, &spender) < amount {
                panic_with_error!(env, Error::ReserveAllowanceExhausted);
            }
            client.transfer_from(&spender, &wiring.reserve, buyer, &amount);
        }
        PurchaseKind::Nft => {
            // amount came in as u32, so the narrowing cast is lossless.
            let client = MembershipNftClient::new(env, &wiring.membership_nft);
            client.mint(buyer, &(amount as u32));
        }
    }
}
