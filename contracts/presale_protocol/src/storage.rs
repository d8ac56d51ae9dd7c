//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the presale:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key             | Type           | Description                            |
//! |-----------------|----------------|----------------------------------------|
//! | `Admin`         | `Address`      | Administrative role                    |
//! | `WiringKey`     | `Wiring`       | Token / NFT / reserve / treasury wiring|
//! | `SaleStateKey`  | `SaleState`    | Lifecycle status + claim generation    |
//! | `RatesKey`      | `Rates`        | Stable / native conversion rates       |
//! | `PaymentTokens` | `Vec<Address>` | Approved stablecoin addresses          |
//! | `TierCount`     | `u32`          | Tier count of the current activation   |
//! | `Entered`       | `bool`         | Reentrancy guard flag                  |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                   | Type   | Description                          |
//! |-----------------------|--------|--------------------------------------|
//! | `TierEntry(gen, i)`   | `Tier` | Tier `i` of activation `gen`         |
//! | `Claim(gen, address)` | `bool` | One-time claim flag for `address`    |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining.
//!
//! ## Why key tiers and claims by generation?
//!
//! `restart_sale` must atomically replace the tier set and reset every claim.
//! Iterating and deleting per-address entries is impossible on-ledger, so
//! both key spaces carry the activation generation: bumping it orphans the
//! old entries (they expire via TTL) and makes every address unclaimed again
//! in a single instance write.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{Rates, SaleState, SaleStatus, Tier};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// Immutable deployment wiring, written once by `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Wiring {
    /// The fungible sale token (external ledger).
    pub sale_token: Address,
    /// The membership-NFT collection contract.
    pub membership_nft: Address,
    /// The wrapped native asset used for the native rail.
    pub native_token: Address,
    /// Wallet holding sale inventory; grants the contract an allowance.
    pub reserve: Address,
    /// Sink for all collected payments.
    pub treasury: Address,
}

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Administrative address (Instance).
    Admin,
    /// Deployment wiring (Instance).
    WiringKey,
    /// Sale lifecycle state (Instance).
    SaleStateKey,
    /// Conversion rates (Instance).
    RatesKey,
    /// Approved stablecoins (Instance).
    PaymentTokens,
    /// Tier count of the current activation (Instance).
    TierCount,
    /// Reentrancy guard flag (Instance).
    Entered,
    /// Tier `i` of activation `gen` (Persistent).
    TierEntry(u32, u32),
    /// Claim flag for an address under activation `gen` (Persistent).
    Claim(u32, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Returns `true` once `init` has run.
pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    bump_instance(env);
}

/// Retrieve the administrative address. Panics if `init` has not run.
pub fn get_admin(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .expect("not initialized")
}

pub fn set_wiring(env: &Env, wiring: &Wiring) {
    env.storage().instance().set(&DataKey::WiringKey, wiring);
    bump_instance(env);
}

/// Retrieve the deployment wiring. Panics if `init` has not run.
pub fn get_wiring(env: &Env) -> Wiring {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::WiringKey)
        .expect("not initialized")
}

pub fn save_sale_state(env: &Env, state: &SaleState) {
    env.storage().instance().set(&DataKey::SaleStateKey, state);
    bump_instance(env);
}

/// Current sale state; defaults to `NotStarted` / generation 0.
pub fn get_sale_state(env: &Env) -> SaleState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::SaleStateKey)
        .unwrap_or(SaleState {
            status: SaleStatus::NotStarted,
            generation: 0,
        })
}

pub fn save_rates(env: &Env, rates: &Rates) {
    env.storage().instance().set(&DataKey::RatesKey, rates);
    bump_instance(env);
}

/// Current rates; both default to the zero "unset" sentinel.
pub fn get_rates(env: &Env) -> Rates {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::RatesKey)
        .unwrap_or(Rates {
            stable_rate: 0,
            native_rate: 0,
        })
}

pub fn save_payment_tokens(env: &Env, tokens: &Vec<Address>) {
    env.storage()
        .instance()
        .set(&DataKey::PaymentTokens, tokens);
    bump_instance(env);
}

/// Approved stablecoin set; empty until the admin adds entries.
pub fn get_payment_tokens(env: &Env) -> Vec<Address> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::PaymentTokens)
        .unwrap_or(Vec::new(env))
}

pub fn set_tier_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::TierCount, &count);
    bump_instance(env);
}

pub fn get_tier_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::TierCount)
        .unwrap_or(0)
}

// ── Reentrancy Guard ─────────────────────────────────────────────────
//
// The flag is only cleared on the success path. A failing purchase panics,
// and the host rolls the whole invocation back, flag included, so there is
// no exit path on which the guard stays stuck.

pub fn is_entered(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Entered)
        .unwrap_or(false)
}

pub fn set_entered(env: &Env) {
    env.storage().instance().set(&DataKey::Entered, &true);
}

pub fn clear_entered(env: &Env) {
    env.storage().instance().remove(&DataKey::Entered);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Store one tier of the given activation.
pub fn save_tier(env: &Env, generation: u32, index: u32, tier: &Tier) {
    let key = DataKey::TierEntry(generation, index);
    env.storage().persistent().set(&key, tier);
    bump_persistent(env, &key);
}

/// Load a tier of the given activation, or `None` when out of bounds.
pub fn load_tier(env: &Env, generation: u32, index: u32) -> Option<Tier> {
    let key = DataKey::TierEntry(generation, index);
    let tier: Option<Tier> = env.storage().persistent().get(&key);
    if tier.is_some() {
        bump_persistent(env, &key);
    }
    tier
}

/// Whether `address` has already claimed under the given activation.
pub fn is_claimed(env: &Env, generation: u32, address: &Address) -> bool {
    let key = DataKey::Claim(generation, address.clone());
    let claimed = env.storage().persistent().has(&key);
    if claimed {
        bump_persistent(env, &key);
    }
    claimed
}

/// Record the one-time claim for `address` under the given activation.
pub fn mark_claimed(env: &Env, generation: u32, address: &Address) {
    let key = DataKey::Claim(generation, address.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}
