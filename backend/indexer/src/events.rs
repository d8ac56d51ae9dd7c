//! Canonical event types emitted by the presale contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/presale_protocol/src/events.rs`; the leading topic symbol is
//! the discriminant.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the presale contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The sale opened with its first tier set (`started` topic).
    SaleStarted,
    /// The sale was stopped (`stopped` topic).
    SaleStopped,
    /// A stopped sale re-opened under a new generation (`restarted` topic).
    SaleRestarted,
    /// Conversion rates were configured (`rates` topic).
    RatesUpdated,
    /// A buyer completed a token or NFT purchase (`purchase` topic).
    Purchase,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "started" => Self::SaleStarted,
            "stopped" => Self::SaleStopped,
            "restarted" => Self::SaleRestarted,
            "rates" => Self::RatesUpdated,
            "purchase" => Self::Purchase,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SaleStarted => "sale_started",
            Self::SaleStopped => "sale_stopped",
            Self::SaleRestarted => "sale_restarted",
            Self::RatesUpdated => "rates_updated",
            Self::Purchase => "purchase",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded presale event, ready to be stored in the database.
///
/// For `rates_updated` rows the generic columns carry the two rates:
/// `paid` holds the stable rate and `amount` holds the native rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresaleEvent {
    pub event_type: String,
    pub buyer: Option<String>,
    pub amount: Option<String>,
    pub paid: Option<String>,
    pub tier_index: Option<i64>,
    pub generation: Option<i64>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub buyer: Option<String>,
    pub amount: Option<String>,
    pub paid: Option<String>,
    pub tier_index: Option<i64>,
    pub generation: Option<i64>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
