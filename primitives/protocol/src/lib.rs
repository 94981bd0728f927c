// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! Consensus-level protocol details of the Agora chain.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

mod asset;
mod types;

pub use self::asset::*;
pub use self::types::*;

/// One hundred percent expressed in basis points.
pub const PERCENT_100: u16 = 10_000;

/// The size of the witness schedule.
pub const MAX_WITNESSES: u32 = 19;

/// Scheduled witnesses required to collectively approve a techspec.
pub const MAJOR_VOTED_WITNESSES: u32 = 11;

/// Scheduled witnesses required to accept or reject a worker result.
pub const SUPER_MAJOR_VOTED_WITNESSES: u32 = 15;

/// The maximum nesting depth of a comment.
pub const MAX_COMMENT_DEPTH: u16 = 6;

/// The maximum byte length of a permlink.
pub const MAX_PERMLINK_LENGTH: usize = 256;

/// The maximum number of beneficiary routes on a single comment.
pub const MAX_COMMENT_BENEFICIARIES: usize = 8;

/// How many times a vote can be changed before it is frozen.
pub const MAX_VOTE_CHANGES: i8 = 5;

/// Seconds between a comment's creation and its cashout.
pub const CASHOUT_WINDOW_SECONDS: u64 = 60 * 60 * 24 * 7;

/// Default length of the reverse-auction window, in seconds.
pub const REVERSE_AUCTION_WINDOW_SECONDS: u32 = 30 * 60;

/// Cashout-time sentinel for comments that never cash out again.
pub const CASHOUT_NEVER: u64 = u64::MAX;

/// Annual inflation in basis points at the start of emission.
pub const INFLATION_RATE_START_PERCENT: i64 = 1515;

/// Blocks per year with the 3-second block interval.
pub const BLOCKS_PER_YEAR: i64 = 10_512_000;

/// Share of each block's emission that funds content rewards, in bp.
pub const CONTENT_REWARD_PERCENT: u16 = 6667;

/// Share of each block's emission that funds the vesting pool, in bp.
pub const VESTING_FUND_PERCENT: u16 = 2667;

/// Share of the content bucket redirected to the worker fund, in bp.
pub const WORKER_FROM_CONTENT_FUND_PERCENT: u16 = 1000;

/// Share of the vesting bucket redirected to the worker fund, in bp.
pub const WORKER_FROM_VESTING_FUND_PERCENT: u16 = 1000;

/// Share of the witness bucket redirected to the worker fund, in bp.
pub const WORKER_FROM_WITNESS_FUND_PERCENT: u16 = 1000;

/// Normalizer applied to the witness share of each block's emission:
/// `witness_reward * MAX_WITNESSES / WITNESS_REWARD_NORMALIZE`.
pub const WITNESS_REWARD_NORMALIZE: i64 = 25;

/// Lower bound of a comment's curation-rewards percent, in bp.
pub const MIN_CURATION_PERCENT: u16 = 2500;

/// Upper bound of a comment's curation-rewards percent, in bp.
pub const MAX_CURATION_PERCENT: u16 = PERCENT_100;

/// Constant `s` of the bounded curation curve `(r + s)^2 - s^2`.
pub const CONTENT_CONSTANT: u128 = 2_000_000_000_000;

/// Upper bound of a vesting delegation's interest rate, in bp.
pub const MAX_DELEGATED_VESTING_INTEREST_RATE: u16 = 8000;

/// Chain hardforks relevant to the content and worker subsystems.
pub mod hardfork {
    /// Delegated-vesting interest on curation rewards.
    pub const DELEGATED_VESTING_INTEREST: u16 = 19;
    /// The worker-proposal subsystem.
    pub const WORKER_PROPOSALS: u16 = 20;
    /// Worker-fund carve-outs from the block emission.
    pub const WORKER_FUND_EMISSION: u16 = 21;
    /// The newest hardfork known to this build.
    pub const LATEST: u16 = WORKER_FUND_EMISSION;
}

/// Checks that a permlink is non-empty, bounded and lowercase ASCII.
pub fn is_valid_permlink(permlink: &[u8]) -> bool {
    if permlink.is_empty() || permlink.len() > MAX_PERMLINK_LENGTH {
        return false;
    }
    permlink
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}
