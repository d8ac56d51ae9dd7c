//! Event payloads published by the presale contract.
//!
//! Each event goes out under a short symbol topic plus a routing key:
//!
//! | Topic                          | Data                 |
//! |--------------------------------|----------------------|
//! | `("started", generation)`      | [`SaleStarted`]      |
//! | `("stopped", generation)`      | [`SaleStopped`]      |
//! | `("restarted", generation)`    | [`SaleStarted`]      |
//! | `("rates",)`                   | [`RatesUpdated`]     |
//! | `("purchase", buyer)`          | [`PurchaseCompleted`]|
//!
//! The off-chain indexer keys on the leading topic symbol, so renaming one
//! here requires the matching change in `backend/indexer/src/events.rs`.

use soroban_sdk::{contracttype, Address};

use crate::types::{PaymentRail, PurchaseKind};

/// A sale activation went live (emitted by `start_sale` and `restart_sale`).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleStarted {
    pub generation: u32,
    pub tier_count: u32,
}

/// The sale was stopped.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleStopped {
    pub generation: u32,
}

/// Conversion rates were (re)configured.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RatesUpdated {
    pub stable_rate: i128,
    pub native_rate: i128,
}

/// A purchase completed: payment collected, claim recorded, inventory
/// delivered.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PurchaseCompleted {
    /// Paid and received the inventory.
    pub buyer: Address,
    pub kind: PurchaseKind,
    pub rail: PaymentRail,
    /// Token that settled the payment (native token for the native rail).
    pub payment_token: Address,
    /// Payment pulled from the buyer, in `payment_token` units.
    pub paid: i128,
    /// Sale-token units or NFT count delivered.
    pub amount: i128,
    pub tier_index: u32,
}
