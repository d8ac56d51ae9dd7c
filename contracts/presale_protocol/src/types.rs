//! # Types
//!
//! Shared data structures used across all modules of the presale contract.
//!
//! ## Design decisions
//!
//! ### Tier / claim split
//!
//! Tiers are written once per sale activation and never mutated until the
//! next activation; claims are one-bit entries created per buyer. Keeping
//! them as separate ledger entries means a purchase writes one small new
//! entry instead of rewriting the whole tier table.
//!
//! ### Status as a Finite-State Machine
//!
//! [`SaleStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! NotStarted ──► Open ──► Stopped
//!                 ▲          │
//!                 └──────────┘  (restart_sale only)
//! ```
//!
//! `start_sale` can run exactly once; re-opening a stopped sale goes through
//! the separately named `restart_sale`, which installs a fresh tier set and
//! invalidates every prior claim by advancing `SaleState::generation`.

use soroban_sdk::{contracttype, BytesN};

/// Lifecycle status of the sale.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SaleStatus {
    /// Deployed and wired but not yet accepting purchases.
    NotStarted,
    /// Accepting purchases.
    Open,
    /// Closed; only `restart_sale` can re-open.
    Stopped,
}

/// Sale lifecycle state.
///
/// `generation` starts at 0 and increments on every `restart_sale`. Claims
/// and tiers are keyed by generation, so bumping it atomically resets both
/// without iterating storage.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleState {
    pub status: SaleStatus,
    pub generation: u32,
}

/// One allow-list tier, written once per activation.
///
/// `unit_size = total_allocation / unit_count` (integer division) is the
/// smallest purchasable increment; a member of this tier may buy any
/// `k * unit_size` for `1 <= k <= unit_count`, exactly once.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tier {
    /// Total amount this tier entitles one member to purchase.
    pub total_allocation: i128,
    /// Number of discrete units the allocation is divided into (>= 1).
    pub unit_count: u32,
    /// Merkle root of the tier's allow-list (sorted-pair keccak256 tree).
    pub allow_root: BytesN<32>,
}

/// Configured conversion rates. Zero means "unset"; a purchase on a rail
/// requires that rail's rate to be strictly positive.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rates {
    /// Payment-token units per smallest sale-token unit (stablecoins share
    /// the sale token's decimal precision, so this is a plain multiplier).
    pub stable_rate: i128,
    /// Native stroops per smallest sale-token unit, fixed-point scaled by
    /// [`crate::NATIVE_RATE_SCALE`] so sub-stroop unit prices survive.
    pub native_rate: i128,
}

/// Which payment rail a purchase settles on.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PaymentRail {
    /// The configured native-asset token (exact amount pulled from buyer).
    Native,
    /// An approved stablecoin named in the purchase call.
    Stable,
}

/// What a purchase delivers.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PurchaseKind {
    /// Sale-token units moved from the reserve under delegated allowance.
    Token,
    /// Membership NFTs minted by the external collection contract.
    Nft,
}
