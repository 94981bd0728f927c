// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

use codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use sp_runtime::RuntimeDebug;
use sp_std::vec::Vec;

use ap_protocol::{
    Asset, AuctionWindowDestination, BeneficiaryRoute, CurationCurve, DelegatorPayoutStrategy,
    Permlink,
};
use ap_rewards::{VoteWeight, WeightSum};

/// Opaque 64-bit comment handle; all cross-entity references are id-valued.
pub type CommentId = u64;

/// Payout phase of a comment.
#[derive(PartialEq, Eq, Clone, Copy, Encode, Decode, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum CommentMode {
    /// Not yet scheduled.
    NotSet,
    /// Waiting for its first cashout.
    FirstPayout,
    /// Waiting for a second cashout.
    SecondPayout,
    /// Paid out; frozen for consensus.
    Archived,
}

impl Default for CommentMode {
    fn default() -> Self {
        Self::FirstPayout
    }
}

/// A post or a reply.
///
/// A root post has no `parent_author`; its `parent_permlink` doubles as the
/// category. `root_comment` equals the comment's own id exactly for roots.
#[derive(PartialEq, Eq, Clone, Encode, Decode, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct Comment<AccountId> {
    pub id: CommentId,
    pub parent_author: Option<AccountId>,
    pub parent_permlink: Permlink,
    pub author: AccountId,
    pub permlink: Permlink,

    pub created: u64,
    pub last_payout: u64,

    /// Nesting depth; zero for root posts.
    pub depth: u16,
    /// Total number of children, grandchildren and so on.
    pub children: u32,

    /// Sum of curve-transformed rshares across the whole subtree.
    pub children_rshares2: u128,

    /// Sum of all vote rshares, positive and negative.
    pub net_rshares: i64,
    /// Sum of the absolute rshares of every vote ever applied.
    pub abs_rshares: i64,
    /// Positive rshares only; needed to settle vote edits and removals.
    pub vote_rshares: i64,
    /// Absolute rshares accumulated across the subtree.
    pub children_abs_rshares: i64,

    pub cashout_time: u64,
    pub max_cashout_time: u64,

    /// Sum of every vote's curation weight.
    pub total_vote_weight: WeightSum,
    /// Curation weight withheld from votes inside the auction window.
    pub auction_window_weight: WeightSum,
    /// Combined weight of the votes cast after the window closed.
    pub votes_after_auction_window_weight: WeightSum,

    pub net_votes: i32,
    pub total_votes: u32,

    pub root_comment: CommentId,
    pub mode: CommentMode,

    pub curation_reward_curve: CurationCurve,
    pub auction_window_reward_destination: AuctionWindowDestination,
    pub auction_window_size: u32,

    /// SBD value of the maximum payout this comment will receive.
    pub max_accepted_payout: Asset,
    /// The percent of the author fund paid as SBD, the rest is vested.
    pub percent_steem_dollars: u16,
    pub allow_replies: bool,
    pub allow_votes: bool,
    pub allow_curation_rewards: bool,
    pub curation_rewards_percent: u16,

    pub beneficiaries: Vec<BeneficiaryRoute<AccountId>>,
}

/// A delegator's claim on part of a voter's curation reward, frozen into
/// the vote at cast time.
#[derive(PartialEq, Eq, Clone, Encode, Decode, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct DelegatorVoteInterestRate<AccountId> {
    pub account: AccountId,
    /// The rate the payout math uses, capped by the chain maximum.
    pub interest_rate: u16,
    /// The delegation's raw rate at cast time, before capping.
    pub bad_interest_rate: u16,
    pub payout_strategy: DelegatorPayoutStrategy,
}

/// One vote on one comment. Votes live in the comment's insertion-ordered
/// list; a voter appears at most once per comment.
#[derive(PartialEq, Eq, Clone, Encode, Decode, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct CommentVote<AccountId> {
    pub voter: AccountId,
    /// The rshares at first cast.
    pub orig_rshares: i64,
    /// The rshares this vote is currently responsible for.
    pub rshares: i64,
    pub vote_percent: i16,
    /// Curation weight fixed at cast time; forfeited on edits.
    pub weight: VoteWeight,
    /// Seconds into the auction window, zero at or after its end.
    pub auction_time: u16,
    pub last_update: u64,
    /// Edit counter; `-1` marks the vote archived with its comment.
    pub num_changes: i8,
    pub delegator_vote_interest_rates: Vec<DelegatorVoteInterestRate<AccountId>>,
}
