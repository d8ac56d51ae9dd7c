//! Deterministic Merkle proof verification.
//!
//! Notes on construction:
//! - Pairs are hashed in sorted order (lexicographically by 32-byte value),
//!   so when folding the proof we place the lower digest on the left before
//!   concatenation. Proofs therefore carry no left/right direction bits.
//! - Leaves are `keccak256(xdr(address))`. The off-chain tree builder must
//!   use the exact same encoding or no proof will ever verify.

use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env, Vec};

/// Canonical leaf digest for a claiming address.
pub fn leaf_for(env: &Env, address: &Address) -> BytesN<32> {
    let encoded = address.clone().to_xdr(env);
    env.crypto().keccak256(&encoded).to_bytes()
}

/// keccak256 of the two digests concatenated in sorted order.
pub(crate) fn hash_pair(env: &Env, a: &BytesN<32>, b: &BytesN<32>) -> BytesN<32> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut data = Bytes::new(env);
    data.append(&Bytes::from(lo.clone()));
    data.append(&Bytes::from(hi.clone()));
    env.crypto().keccak256(&data).to_bytes()
}

/// Recompute the root from `leaf` along `proof` and compare it to `root`.
///
/// Failure is a plain `false`; interpreting it is the caller's job.
pub fn verify(env: &Env, root: &BytesN<32>, proof: &Vec<BytesN<32>>, leaf: &BytesN<32>) -> bool {
    let mut acc = leaf.clone();
    for sibling in proof.iter() {
        acc = hash_pair(env, &acc, &sibling);
    }
    acc == *root
}
