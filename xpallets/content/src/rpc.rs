// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! Read-side projection of stored comments into API records.
//!
//! Everything here is pure state reading; nothing mutates the store. Body
//! text, URL assembly and metadata parsing live in the client-side RPC
//! crate, which feeds from these records.

#![allow(clippy::type_complexity)]

use codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use sp_runtime::RuntimeDebug;
use sp_std::vec::Vec;

use ap_chain::{FeedPrice, PromotedValue, ReputationOf};
use ap_protocol::{
    Asset, AuctionWindowDestination, BeneficiaryRoute, CurationCurve, Permlink,
};
use ap_rewards::{compute_claim, evaluate_curve};

use crate::{
    Comment, CommentId, CommentMode, Comments, Config, Pallet, TotalRewardFund,
    TotalRewardShares2, Votes,
};

/// One vote as the API reports it.
#[derive(PartialEq, Eq, Clone, Encode, Decode, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct VoteState<AccountId> {
    pub voter: AccountId,
    pub weight: u64,
    pub rshares: i64,
    pub percent: i16,
    pub time: u64,
    pub reputation: Option<i64>,
}

/// A comment projected for API consumers, with derived fields filled in.
#[derive(PartialEq, Eq, Clone, Encode, Decode, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct Discussion<AccountId> {
    pub id: CommentId,
    pub author: AccountId,
    pub permlink: Permlink,
    pub parent_author: Option<AccountId>,
    pub parent_permlink: Permlink,
    /// The root post's category; for a root post, its own
    /// `parent_permlink`.
    pub category: Permlink,
    pub root_comment: CommentId,
    pub root_author: AccountId,
    pub root_permlink: Permlink,

    pub created: u64,
    pub last_payout: u64,
    pub depth: u16,
    pub children: u32,
    pub children_rshares2: u128,
    pub net_rshares: i64,
    pub abs_rshares: i64,
    pub vote_rshares: i64,
    pub cashout_time: u64,
    pub max_cashout_time: u64,
    pub net_votes: i32,
    pub total_votes: u32,
    pub mode: CommentMode,

    pub curation_reward_curve: CurationCurve,
    pub auction_window_reward_destination: AuctionWindowDestination,
    pub auction_window_size: u32,
    pub max_accepted_payout: Asset,
    pub percent_steem_dollars: u16,
    pub allow_replies: bool,
    pub allow_votes: bool,
    pub allow_curation_rewards: bool,
    pub curation_rewards_percent: u16,
    pub beneficiaries: Vec<BeneficiaryRoute<AccountId>>,

    /// What this comment would earn if cashed out right now.
    pub pending_payout_value: Asset,
    /// The same estimate over the whole subtree.
    pub total_pending_payout_value: Asset,
    pub author_reputation: Option<i64>,
    pub promoted: Asset,

    pub active_votes: Vec<VoteState<AccountId>>,
    /// Total vote count, regardless of the requested limit.
    pub active_votes_count: u32,
}

impl<T: Config> Pallet<T> {
    /// Projects `(author, permlink)` into a [`Discussion`], with votes
    /// limited to `vote_limit` entries.
    pub fn get_discussion(
        author: T::AccountId,
        permlink: Permlink,
        vote_limit: u32,
    ) -> Option<Discussion<T::AccountId>> {
        let comment = Self::find_comment(&author, &permlink)?;
        let root = Comments::<T>::get(comment.root_comment)?;
        let (active_votes, active_votes_count) = Self::select_active_votes(comment.id, vote_limit);
        let (pending_payout_value, total_pending_payout_value) = Self::pending_payout(&comment);

        // A reply inherits the cashout moment of its root post.
        let cashout_time = if comment.parent_author.is_some() {
            root.cashout_time
        } else {
            comment.cashout_time
        };

        Some(Discussion {
            id: comment.id,
            author: comment.author.clone(),
            permlink: comment.permlink.clone(),
            parent_author: comment.parent_author.clone(),
            parent_permlink: comment.parent_permlink.clone(),
            category: root.parent_permlink.clone(),
            root_comment: comment.root_comment,
            root_author: root.author,
            root_permlink: root.permlink,
            created: comment.created,
            last_payout: comment.last_payout,
            depth: comment.depth,
            children: comment.children,
            children_rshares2: comment.children_rshares2,
            net_rshares: comment.net_rshares,
            abs_rshares: comment.abs_rshares,
            vote_rshares: comment.vote_rshares,
            cashout_time,
            max_cashout_time: comment.max_cashout_time,
            net_votes: comment.net_votes,
            total_votes: comment.total_votes,
            mode: comment.mode,
            curation_reward_curve: comment.curation_reward_curve,
            auction_window_reward_destination: comment.auction_window_reward_destination,
            auction_window_size: comment.auction_window_size,
            max_accepted_payout: comment.max_accepted_payout,
            percent_steem_dollars: comment.percent_steem_dollars,
            allow_replies: comment.allow_replies,
            allow_votes: comment.allow_votes,
            allow_curation_rewards: comment.allow_curation_rewards,
            curation_rewards_percent: comment.curation_rewards_percent,
            beneficiaries: comment.beneficiaries.clone(),
            pending_payout_value,
            total_pending_payout_value,
            author_reputation: T::Reputation::reputation_of(&comment.author),
            promoted: T::Promoted::promoted_value(&comment.author, &comment.permlink),
            active_votes,
            active_votes_count,
        })
    }

    /// The votes on `(author, permlink)` up to `limit`, plus the total
    /// count.
    pub fn get_active_votes(
        author: T::AccountId,
        permlink: Permlink,
        limit: u32,
    ) -> Option<(Vec<VoteState<T::AccountId>>, u32)> {
        let comment = Self::find_comment(&author, &permlink)?;
        Some(Self::select_active_votes(comment.id, limit))
    }

    fn select_active_votes(id: CommentId, limit: u32) -> (Vec<VoteState<T::AccountId>>, u32) {
        let votes = Votes::<T>::get(id);
        let total = votes.len() as u32;
        let selected = votes
            .into_iter()
            .take(limit as usize)
            .map(|vote| VoteState {
                reputation: T::Reputation::reputation_of(&vote.voter),
                voter: vote.voter,
                weight: vote.weight,
                rshares: vote.rshares,
                percent: vote.vote_percent,
                time: vote.last_update,
            })
            .collect();
        (selected, total)
    }

    /// The reward pot as the API prices it: the fund converted through the
    /// median feed when one exists.
    fn pending_pot() -> Asset {
        let fund = Asset::steem(TotalRewardFund::<T>::get());
        match T::FeedPrice::median() {
            Some(price) => fund.convert(&price).unwrap_or(fund),
            None => fund,
        }
    }

    /// Runs the claim math without mutating anything: the comment's own
    /// estimate and the subtree estimate from `children_rshares2`.
    pub fn pending_payout(comment: &Comment<T::AccountId>) -> (Asset, Asset) {
        let shares2 = TotalRewardShares2::<T>::get();
        let pot = Self::pending_pot();
        if shares2 == 0 {
            return (Asset::zero(pot.symbol), Asset::zero(pot.symbol));
        }

        let curve = Self::resolved_curve(comment);
        let vshares = evaluate_curve(curve, comment.net_rshares);
        let own = compute_claim(vshares, pot.amount, shares2);
        let subtree = compute_claim(comment.children_rshares2, pot.amount, shares2);

        (Asset::new(own, pot.symbol), Asset::new(subtree, pot.symbol))
    }
}
