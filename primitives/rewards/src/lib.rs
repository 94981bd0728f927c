// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

#![cfg_attr(not(feature = "std"), no_std)]

//! Pure reward arithmetic shared by the content pallet and its read-side.
//!
//! Two rules hold everywhere in this crate:
//!
//! 1. Multiplication always precedes division, with 256-bit intermediates
//!    where a product can exceed 128 bits.
//! 2. Division truncates toward zero; callers reclaim the rounding slack
//!    explicitly.
//!
//! Every replica must agree on the exact 64-bit outcome of each payout, so
//! there is no floating point anywhere near this code.

use sp_arithmetic::traits::IntegerSquareRoot;
use sp_core::U256;

use ap_protocol::{CurationCurve, CONTENT_CONSTANT};

/// Type of a single vote's curation weight.
pub type VoteWeight = u64;

/// Type of per-comment weight accumulators.
pub type WeightSum = u128;

/// Type of curve-transformed rshares.
pub type RewardShares = u128;

/// Applies a resolved curation curve to a comment's net rshares.
///
/// Non-positive rshares always map to zero vshares. `Detect` must be
/// resolved to the chain default before calling.
pub fn evaluate_curve(curve: CurationCurve, net_rshares: i64) -> RewardShares {
    if net_rshares <= 0 {
        return 0;
    }
    let rshares = net_rshares as u128;
    match curve {
        CurationCurve::Detect | CurationCurve::Linear => rshares,
        CurationCurve::SquareRoot => rshares.integer_sqrt(),
        CurationCurve::Bounded => {
            (rshares + CONTENT_CONSTANT) * (rshares + CONTENT_CONSTANT)
                - CONTENT_CONSTANT * CONTENT_CONSTANT
        }
    }
}

/// The comment's claim on the reward fund:
/// `vshares * fund_amount / total_shares2`, truncating.
///
/// Zero when the fund is empty, the comment has no vshares, or nothing is
/// outstanding globally.
pub fn compute_claim(vshares: RewardShares, fund_amount: i64, total_shares2: u128) -> i64 {
    if vshares == 0 || fund_amount <= 0 || total_shares2 == 0 {
        return 0;
    }
    let vshares = vshares.min(total_shares2);
    let claim = U256::from(vshares) * U256::from(fund_amount as u64) / U256::from(total_shares2);
    // claim <= fund_amount because vshares <= total_shares2.
    claim.low_u64() as i64
}

/// One weight's truncated share of an amount: `amount * weight / total`.
pub fn weight_share(amount: i64, weight: WeightSum, total: WeightSum) -> i64 {
    if amount <= 0 || weight == 0 || total == 0 {
        return 0;
    }
    let weight = weight.min(total);
    let share = U256::from(amount as u64) * U256::from(weight) / U256::from(total);
    share.low_u64() as i64
}

/// Splits a positive vote's rshares into curation weight and the withheld
/// auction-window part.
///
/// A vote cast `elapsed` seconds into an auction window of `window` seconds
/// keeps `rshares * elapsed / window` as its weight; the withheld remainder
/// accrues to the window itself. Votes at or past the window's end (or with
/// no window configured) keep full weight.
pub fn auction_window_split(rshares: i64, elapsed: u64, window: u32) -> (VoteWeight, u64) {
    if rshares <= 0 {
        return (0, 0);
    }
    let full = rshares as u64;
    if window == 0 || elapsed >= u64::from(window) {
        return (full, 0);
    }
    let kept = ((full as u128) * (elapsed as u128) / (u128::from(window))) as u64;
    (kept, full - kept)
}
