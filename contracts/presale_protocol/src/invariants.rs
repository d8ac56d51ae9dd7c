#![allow(dead_code)]

extern crate std;

use crate::types::{SaleStatus, Tier};

/// INV-1: a tier's unit size must be positive, or every discrete check
/// against it would reject (division by the unit count is integer division,
/// so misconfigured allocations can collapse to zero).
pub fn assert_unit_size_positive(tier: &Tier) {
    let unit_size = tier.total_allocation / i128::from(tier.unit_count);
    assert!(
        unit_size > 0,
        "INV-1 violated: tier has non-positive unit size ({} / {})",
        tier.total_allocation,
        tier.unit_count
    );
}

/// INV-2: tier fields never change within one activation.
pub fn assert_tier_immutable(original: &Tier, current: &Tier) {
    assert_eq!(
        original, current,
        "INV-2 violated: tier mutated within an activation"
    );
}

/// INV-3: a claim flag never resets within one activation. It may only go
/// from unclaimed to claimed.
pub fn assert_claim_monotonic(claimed_before: bool, claimed_after: bool) {
    assert!(
        claimed_after || !claimed_before,
        "INV-3 violated: claim flag reset from claimed to unclaimed"
    );
}

/// INV-4: lifecycle transition validity. Only forward transitions are
/// allowed, plus the explicit restart edge:
///   NotStarted -> Open
///   Open       -> Stopped
///   Stopped    -> Open (restart_sale only)
pub fn assert_valid_status_transition(from: &SaleStatus, to: &SaleStatus) {
    let valid = matches!(
        (from, to),
        (SaleStatus::NotStarted, SaleStatus::Open)
            | (SaleStatus::Open, SaleStatus::Stopped)
            | (SaleStatus::Stopped, SaleStatus::Open)
    );
    assert!(
        valid,
        "INV-4 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-5: payment conservation — whatever left the buyer arrived at the
/// treasury, exactly.
pub fn assert_payment_conserved(
    buyer_before: i128,
    buyer_after: i128,
    treasury_before: i128,
    treasury_after: i128,
) {
    assert_eq!(
        buyer_before - buyer_after,
        treasury_after - treasury_before,
        "INV-5 violated: buyer paid {} but treasury received {}",
        buyer_before - buyer_after,
        treasury_after - treasury_before
    );
}

/// INV-6: delivery conservation — tokens delivered to the buyer came out of
/// the reserve, exactly.
pub fn assert_delivery_conserved(
    reserve_before: i128,
    reserve_after: i128,
    buyer_before: i128,
    buyer_after: i128,
) {
    assert_eq!(
        reserve_before - reserve_after,
        buyer_after - buyer_before,
        "INV-6 violated: reserve released {} but buyer received {}",
        reserve_before - reserve_after,
        buyer_after - buyer_before
    );
}
