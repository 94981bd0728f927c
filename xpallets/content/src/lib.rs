// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! # Content Module
//!
//! The comment-and-vote store and the reward distribution engine.
//!
//! ## Overview
//!
//! Posts, replies and votes are consensus objects held behind ordered
//! companion indices: a `(author, permlink)` map, a cashout queue sorted by
//! `(cashout_time, id)` and one insertion-ordered vote list per comment. At
//! the end of every block the engine drains the due part of the queue and
//! converts each comment's accumulated votes into payouts for the author,
//! its curators, their delegators and the configured beneficiaries.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
mod mock;
mod reward;
pub mod rpc;
#[cfg(test)]
mod tests;
mod types;

pub use types::*;

use frame_support::{ensure, traits::UnixTime};
use sp_runtime::{DispatchError, DispatchResult};
use sp_std::vec::Vec;

use ap_chain::{
    AssetCurrency, FeedPrice, FundPool, Hardforks, PostInfo, PromotedValue, ReputationOf,
    Vesting, VestingDelegations,
};
use ap_protocol::{
    hardfork, is_valid_beneficiary_set, is_valid_permlink, Amount, Asset, AssetSymbol,
    AuctionWindowDestination, BeneficiaryRoute, CurationCurve, Permlink, CASHOUT_NEVER,
    CASHOUT_WINDOW_SECONDS, MAX_COMMENT_DEPTH, MAX_CURATION_PERCENT, MAX_VOTE_CHANGES,
    MIN_CURATION_PERCENT, PERCENT_100, REVERSE_AUCTION_WINDOW_SECONDS,
};
use ap_rewards::auction_window_split;

pub use pallet::*;

#[frame_support::pallet]
pub mod pallet {
    use super::*;
    use frame_support::pallet_prelude::*;
    use frame_system::pallet_prelude::*;

    #[pallet::pallet]
    #[pallet::without_storage_info]
    pub struct Pallet<T>(_);

    #[pallet::config]
    pub trait Config: frame_system::Config {
        /// The overarching event type.
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// The consensus clock, in seconds.
        type UnixTime: UnixTime;

        /// Account balances for SBD payouts.
        type Currency: AssetCurrency<Self::AccountId>;

        /// The vesting pool every non-SBD payout converts through.
        type Vesting: Vesting<Self::AccountId>;

        /// Vesting delegations, snapshotted into votes at cast time.
        type Delegations: VestingDelegations<Self::AccountId>;

        /// The median STEEM/SBD feed.
        type FeedPrice: FeedPrice;

        /// The hardfork schedule.
        type Hardforks: Hardforks;

        /// Reputation scores for the projection layer.
        type Reputation: ReputationOf<Self::AccountId>;

        /// Promoted values for the projection layer.
        type Promoted: PromotedValue<Self::AccountId>;
    }

    /// Id to assign to the next created comment.
    #[pallet::storage]
    #[pallet::getter(fn next_comment_id)]
    pub type NextCommentId<T: Config> = StorageValue<_, CommentId, ValueQuery>;

    /// All comments by id.
    #[pallet::storage]
    #[pallet::getter(fn comments)]
    pub type Comments<T: Config> =
        StorageMap<_, Twox64Concat, CommentId, Comment<T::AccountId>, OptionQuery>;

    /// The `(author, permlink)` unique index.
    #[pallet::storage]
    #[pallet::getter(fn permlink_of)]
    pub type PermlinkOf<T: Config> = StorageDoubleMap<
        _,
        Twox64Concat,
        T::AccountId,
        Blake2_128Concat,
        Permlink,
        CommentId,
        OptionQuery,
    >;

    /// Every comment's votes, in insertion order.
    #[pallet::storage]
    #[pallet::getter(fn votes)]
    pub type Votes<T: Config> =
        StorageMap<_, Twox64Concat, CommentId, Vec<CommentVote<T::AccountId>>, ValueQuery>;

    /// Pending cashouts, sorted ascending by `(cashout_time, id)`.
    #[pallet::storage]
    #[pallet::getter(fn cashout_queue)]
    pub type CashoutQueue<T: Config> = StorageValue<_, Vec<(u64, CommentId)>, ValueQuery>;

    /// Core coin backing pending content rewards.
    #[pallet::storage]
    #[pallet::getter(fn total_reward_fund)]
    pub type TotalRewardFund<T: Config> = StorageValue<_, Amount, ValueQuery>;

    /// Sum of curve-transformed rshares over all pending comments.
    #[pallet::storage]
    #[pallet::getter(fn total_reward_shares2)]
    pub type TotalRewardShares2<T: Config> = StorageValue<_, u128, ValueQuery>;

    #[pallet::type_value]
    pub fn DefaultCurve() -> CurationCurve {
        CurationCurve::Bounded
    }

    /// The curve a comment's `Detect` setting resolves to.
    #[pallet::storage]
    #[pallet::getter(fn default_curation_curve)]
    pub type DefaultCurationCurve<T: Config> = StorageValue<_, CurationCurve, ValueQuery, DefaultCurve>;

    #[pallet::genesis_config]
    pub struct GenesisConfig<T: Config> {
        /// Core coin seeding the content reward fund.
        pub reward_fund: Amount,
        /// The chain-default curation curve.
        pub default_curve: CurationCurve,
        #[serde(skip)]
        pub _phantom: sp_std::marker::PhantomData<T>,
    }

    impl<T: Config> Default for GenesisConfig<T> {
        fn default() -> Self {
            Self {
                reward_fund: 0,
                default_curve: CurationCurve::Bounded,
                _phantom: Default::default(),
            }
        }
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            TotalRewardFund::<T>::put(self.reward_fund);
            DefaultCurationCurve::<T>::put(self.default_curve);
        }
    }

    #[pallet::event]
    #[pallet::generate_deposit(pub(crate) fn deposit_event)]
    pub enum Event<T: Config> {
        /// (author, permlink, id)
        Posted(T::AccountId, Permlink, CommentId),
        /// (author, permlink)
        CommentOptionsUpdated(T::AccountId, Permlink),
        /// (voter, author, permlink, percent, rshares)
        Voted(T::AccountId, T::AccountId, Permlink, i16, i64),
        /// (author, permlink)
        CommentDeleted(T::AccountId, Permlink),
        /// A comment cashed out. (author, permlink, sbd_payout, vesting_payout)
        AuthorReward(T::AccountId, Permlink, Asset, Asset),
        /// (curator, reward, comment_author, comment_permlink)
        CurationReward(T::AccountId, Asset, T::AccountId, Permlink),
        /// (benefactor, comment_author, comment_permlink, reward)
        BenefactorReward(T::AccountId, T::AccountId, Permlink, Asset),
        /// A delegator's cut of a curation reward.
        /// (delegator, voter, comment_author, comment_permlink, reward)
        DelegatorReward(T::AccountId, T::AccountId, T::AccountId, Permlink, Asset),
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Permlinks are non-empty, bounded, lowercase ASCII.
        InvalidPermlink,
        /// No comment under the referenced `(author, permlink)`.
        CommentNotFound,
        /// The `(author, permlink)` pair is already taken.
        DuplicateComment,
        /// The parent comment has replies disabled.
        RepliesNotAllowed,
        /// The reply would exceed the maximum nesting depth.
        MaxCommentDepthExceeded,
        /// The comment has votes disabled.
        VotesNotAllowed,
        /// The comment is archived and frozen for consensus.
        CommentIsArchived,
        /// Vote percent must lie in `[-10000, 10000]`.
        VotePercentOutOfRange,
        /// The vote was changed too many times.
        TooManyVoteChanges,
        /// Re-voting with the identical percent.
        AlreadyVotedThisWay,
        /// Comment options cannot change after votes were cast.
        CannotUpdateOptionsAfterVotes,
        /// The maximum accepted payout only ever decreases.
        CannotIncreaseMaxAcceptedPayout,
        /// The maximum accepted payout is denominated in SBD.
        MaxAcceptedPayoutMustBeSbd,
        /// A percent field exceeds 100%.
        PercentOutOfRange,
        /// The curation percent lies outside the chain bounds.
        CurationPercentOutOfBounds,
        /// Malformed beneficiary list.
        InvalidBeneficiaries,
        /// Deleting a comment that has replies.
        CannotDeleteCommentWithReplies,
        /// Deleting a comment with net positive votes.
        CannotDeleteCommentWithPositiveVotes,
        /// The content reward fund cannot cover the requested amount.
        InsufficientRewardFund,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn on_finalize(_n: BlockNumberFor<T>) {
            Self::process_cashouts(Self::head_block_time());
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Creates a post (no parent author) or a reply.
        ///
        /// For a root post `parent_permlink` names the category.
        #[pallet::call_index(0)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn post(
            origin: OriginFor<T>,
            parent_author: Option<T::AccountId>,
            parent_permlink: Permlink,
            permlink: Permlink,
        ) -> DispatchResult {
            let author = ensure_signed(origin)?;
            ensure!(is_valid_permlink(&permlink), Error::<T>::InvalidPermlink);
            ensure!(is_valid_permlink(&parent_permlink), Error::<T>::InvalidPermlink);
            ensure!(
                PermlinkOf::<T>::get(&author, &permlink).is_none(),
                Error::<T>::DuplicateComment
            );

            let now = Self::head_block_time();
            let (depth, root_comment, parent_id) = match parent_author.as_ref() {
                None => (0, None, None),
                Some(pa) => {
                    let parent = Self::try_comment(pa, &parent_permlink)?;
                    ensure!(parent.allow_replies, Error::<T>::RepliesNotAllowed);
                    ensure!(
                        parent.depth < MAX_COMMENT_DEPTH,
                        Error::<T>::MaxCommentDepthExceeded
                    );
                    (parent.depth + 1, Some(parent.root_comment), Some(parent.id))
                }
            };

            let id = NextCommentId::<T>::mutate(|next| {
                let id = *next;
                *next += 1;
                id
            });

            let comment = Comment {
                id,
                parent_author,
                parent_permlink,
                author: author.clone(),
                permlink: permlink.clone(),
                created: now,
                last_payout: 0,
                depth,
                children: 0,
                children_rshares2: 0,
                net_rshares: 0,
                abs_rshares: 0,
                vote_rshares: 0,
                children_abs_rshares: 0,
                cashout_time: now + CASHOUT_WINDOW_SECONDS,
                max_cashout_time: CASHOUT_NEVER,
                total_vote_weight: 0,
                auction_window_weight: 0,
                votes_after_auction_window_weight: 0,
                net_votes: 0,
                total_votes: 0,
                root_comment: root_comment.unwrap_or(id),
                mode: CommentMode::FirstPayout,
                curation_reward_curve: CurationCurve::Detect,
                auction_window_reward_destination: AuctionWindowDestination::ToAuthor,
                auction_window_size: REVERSE_AUCTION_WINDOW_SECONDS,
                max_accepted_payout: Asset::sbd(1_000_000_000),
                percent_steem_dollars: PERCENT_100,
                allow_replies: true,
                allow_votes: true,
                allow_curation_rewards: true,
                curation_rewards_percent: MIN_CURATION_PERCENT,
                beneficiaries: Vec::new(),
            };

            Comments::<T>::insert(id, comment);
            PermlinkOf::<T>::insert(&author, &permlink, id);
            Self::queue_cashout(now + CASHOUT_WINDOW_SECONDS, id);

            if let Some(parent_id) = parent_id {
                Self::for_each_ancestor(parent_id, |ancestor| ancestor.children += 1);
            }

            Self::deposit_event(Event::Posted(author, permlink, id));
            Ok(())
        }

        /// Adjusts a comment's payout terms before any vote arrives.
        #[pallet::call_index(1)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        #[allow(clippy::too_many_arguments)]
        pub fn set_comment_options(
            origin: OriginFor<T>,
            permlink: Permlink,
            max_accepted_payout: Asset,
            percent_steem_dollars: u16,
            allow_votes: bool,
            allow_curation_rewards: bool,
            curation_rewards_percent: u16,
            auction_window_destination: AuctionWindowDestination,
            auction_window_size: u32,
            curation_reward_curve: CurationCurve,
            beneficiaries: Vec<BeneficiaryRoute<T::AccountId>>,
        ) -> DispatchResult {
            let author = ensure_signed(origin)?;
            let comment = Self::try_comment(&author, &permlink)?;

            ensure!(comment.mode != CommentMode::Archived, Error::<T>::CommentIsArchived);
            ensure!(comment.abs_rshares == 0, Error::<T>::CannotUpdateOptionsAfterVotes);
            ensure!(
                max_accepted_payout.symbol == AssetSymbol::Sbd,
                Error::<T>::MaxAcceptedPayoutMustBeSbd
            );
            ensure!(
                max_accepted_payout.amount <= comment.max_accepted_payout.amount,
                Error::<T>::CannotIncreaseMaxAcceptedPayout
            );
            ensure!(percent_steem_dollars <= PERCENT_100, Error::<T>::PercentOutOfRange);
            ensure!(
                (MIN_CURATION_PERCENT..=MAX_CURATION_PERCENT).contains(&curation_rewards_percent),
                Error::<T>::CurationPercentOutOfBounds
            );
            ensure!(
                is_valid_beneficiary_set(&beneficiaries),
                Error::<T>::InvalidBeneficiaries
            );

            Comments::<T>::mutate(comment.id, |maybe| {
                if let Some(c) = maybe {
                    c.max_accepted_payout = max_accepted_payout;
                    c.percent_steem_dollars = percent_steem_dollars;
                    c.allow_votes = allow_votes;
                    c.allow_curation_rewards = allow_curation_rewards;
                    c.curation_rewards_percent = curation_rewards_percent;
                    c.auction_window_reward_destination = auction_window_destination;
                    c.auction_window_size = auction_window_size;
                    c.curation_reward_curve = curation_reward_curve;
                    c.beneficiaries = beneficiaries;
                }
            });

            Self::deposit_event(Event::CommentOptionsUpdated(author, permlink));
            Ok(())
        }

        /// Casts or changes a vote.
        ///
        /// The rshares follow the voter's effective vesting shares scaled by
        /// `percent`; a changed vote forfeits its curation weight.
        #[pallet::call_index(2)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn vote(
            origin: OriginFor<T>,
            author: T::AccountId,
            permlink: Permlink,
            percent: i16,
        ) -> DispatchResult {
            let voter = ensure_signed(origin)?;
            ensure!(percent.unsigned_abs() <= PERCENT_100, Error::<T>::VotePercentOutOfRange);

            let comment = Self::try_comment(&author, &permlink)?;
            ensure!(comment.allow_votes, Error::<T>::VotesNotAllowed);
            ensure!(comment.mode != CommentMode::Archived, Error::<T>::CommentIsArchived);

            let now = Self::head_block_time();
            let power = T::Vesting::effective_vesting_shares(&voter).amount;
            let rshares =
                ((power as i128) * (percent as i128) / (PERCENT_100 as i128)) as i64;

            let position = Votes::<T>::get(comment.id)
                .iter()
                .position(|v| v.voter == voter);
            match position {
                None => Self::apply_new_vote(&comment, voter.clone(), percent, rshares, now)?,
                Some(index) => {
                    Self::apply_vote_change(&comment, index, percent, rshares, now)?
                }
            }

            Self::deposit_event(Event::Voted(voter, author, permlink, percent, rshares));
            Ok(())
        }

        /// Removes a comment that never earned anything and has no replies.
        #[pallet::call_index(3)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn delete_comment(origin: OriginFor<T>, permlink: Permlink) -> DispatchResult {
            let author = ensure_signed(origin)?;
            let comment = Self::try_comment(&author, &permlink)?;

            ensure!(comment.mode != CommentMode::Archived, Error::<T>::CommentIsArchived);
            ensure!(comment.children == 0, Error::<T>::CannotDeleteCommentWithReplies);
            ensure!(
                comment.net_rshares <= 0,
                Error::<T>::CannotDeleteCommentWithPositiveVotes
            );

            if let Some(parent) = Self::parent_id(&comment) {
                Self::for_each_ancestor(parent, |ancestor| {
                    ancestor.children = ancestor.children.saturating_sub(1)
                });
            }

            Votes::<T>::remove(comment.id);
            PermlinkOf::<T>::remove(&author, &permlink);
            Comments::<T>::remove(comment.id);
            CashoutQueue::<T>::mutate(|queue| {
                queue.retain(|(_, id)| *id != comment.id);
            });

            Self::deposit_event(Event::CommentDeleted(author, permlink));
            Ok(())
        }
    }
}

impl<T: Config> Pallet<T> {
    /// The consensus clock, in seconds since the epoch.
    pub fn head_block_time() -> u64 {
        T::UnixTime::now().as_secs()
    }

    /// Looks a comment up by its unique `(author, permlink)` key.
    pub fn find_comment(author: &T::AccountId, permlink: &Permlink) -> Option<Comment<T::AccountId>> {
        PermlinkOf::<T>::get(author, permlink).and_then(|id| Comments::<T>::get(id))
    }

    fn try_comment(
        author: &T::AccountId,
        permlink: &Permlink,
    ) -> Result<Comment<T::AccountId>, DispatchError> {
        Self::find_comment(author, permlink).ok_or_else(|| Error::<T>::CommentNotFound.into())
    }

    /// The comment's curve with `Detect` resolved to the chain default.
    pub fn resolved_curve(comment: &Comment<T::AccountId>) -> CurationCurve {
        match comment.curation_reward_curve {
            CurationCurve::Detect => DefaultCurationCurve::<T>::get(),
            other => other,
        }
    }

    fn parent_id(comment: &Comment<T::AccountId>) -> Option<CommentId> {
        comment
            .parent_author
            .as_ref()
            .and_then(|pa| PermlinkOf::<T>::get(pa, &comment.parent_permlink))
    }

    /// Applies `f` to every ancestor of `start`, including `start` itself.
    fn for_each_ancestor(start: CommentId, mut f: impl FnMut(&mut Comment<T::AccountId>)) {
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            cursor = Comments::<T>::mutate(id, |maybe| {
                maybe.as_mut().map(|comment| {
                    f(comment);
                    Self::parent_id(comment)
                })
            })
            .flatten();
        }
    }

    /// Inserts into the cashout queue, keeping `(time, id)` order.
    fn queue_cashout(time: u64, id: CommentId) {
        CashoutQueue::<T>::mutate(|queue| {
            let at = queue
                .binary_search(&(time, id))
                .unwrap_or_else(|insert_at| insert_at);
            queue.insert(at, (time, id));
        });
    }

    /// Settles the subtree squared-shares delta on the comment and every
    /// ancestor, plus the global counter the pot divides by.
    fn adjust_rshares2(comment_id: CommentId, old: u128, new: u128) {
        if old == new {
            return;
        }
        Self::for_each_ancestor(comment_id, |comment| {
            comment.children_rshares2 = comment.children_rshares2 + new - old;
        });
        TotalRewardShares2::<T>::mutate(|total| *total = *total + new - old);
    }

    fn apply_new_vote(
        comment: &Comment<T::AccountId>,
        voter: T::AccountId,
        percent: i16,
        rshares: i64,
        now: u64,
    ) -> DispatchResult {
        let curve = Self::resolved_curve(comment);
        let old_vshares = ap_rewards::evaluate_curve(curve, comment.net_rshares);

        let elapsed = now.saturating_sub(comment.created);
        let window = comment.auction_window_size;
        let (weight, withheld) = auction_window_split(rshares, elapsed, window);
        let in_window = window > 0 && elapsed < u64::from(window);
        let auction_time = if in_window {
            elapsed.min(u64::from(u16::MAX)) as u16
        } else {
            0
        };

        let delegator_vote_interest_rates =
            if T::Hardforks::is_active(hardfork::DELEGATED_VESTING_INTEREST) {
                T::Delegations::interest_rates(&voter)
                    .into_iter()
                    .map(|(account, rate, payout_strategy)| DelegatorVoteInterestRate {
                        account,
                        interest_rate: rate.min(ap_protocol::MAX_DELEGATED_VESTING_INTEREST_RATE),
                        bad_interest_rate: rate,
                        payout_strategy,
                    })
                    .collect()
            } else {
                Vec::new()
            };

        Votes::<T>::mutate(comment.id, |votes| {
            votes.push(CommentVote {
                voter,
                orig_rshares: rshares,
                rshares,
                vote_percent: percent,
                weight,
                auction_time,
                last_update: now,
                num_changes: 0,
                delegator_vote_interest_rates,
            })
        });

        Comments::<T>::mutate(comment.id, |maybe| {
            if let Some(c) = maybe {
                c.net_rshares += rshares;
                c.abs_rshares += rshares.abs();
                c.vote_rshares += rshares.max(0);
                c.net_votes += if rshares >= 0 { 1 } else { -1 };
                c.total_votes += 1;
                c.total_vote_weight += u128::from(weight);
                c.auction_window_weight += u128::from(withheld);
                if !in_window {
                    c.votes_after_auction_window_weight += u128::from(weight);
                }
            }
        });
        Self::for_each_ancestor(comment.id, |c| c.children_abs_rshares += rshares.abs());

        let new_vshares = ap_rewards::evaluate_curve(curve, comment.net_rshares + rshares);
        Self::adjust_rshares2(comment.id, old_vshares, new_vshares);
        Ok(())
    }

    fn apply_vote_change(
        comment: &Comment<T::AccountId>,
        index: usize,
        percent: i16,
        rshares: i64,
        now: u64,
    ) -> DispatchResult {
        let votes = Votes::<T>::get(comment.id);
        let vote = &votes[index];
        ensure!(vote.num_changes >= 0, Error::<T>::CommentIsArchived);
        ensure!(vote.num_changes < MAX_VOTE_CHANGES, Error::<T>::TooManyVoteChanges);
        ensure!(vote.vote_percent != percent, Error::<T>::AlreadyVotedThisWay);

        let old_rshares = vote.rshares;
        let old_weight = vote.weight;
        let was_in_window =
            vote.auction_time > 0 && u32::from(vote.auction_time) < comment.auction_window_size;
        let old_withheld = if was_in_window {
            (vote.orig_rshares.max(0) as u64).saturating_sub(old_weight)
        } else {
            0
        };

        let curve = Self::resolved_curve(comment);
        let old_vshares = ap_rewards::evaluate_curve(curve, comment.net_rshares);

        Votes::<T>::mutate(comment.id, |votes| {
            let vote = &mut votes[index];
            vote.rshares = rshares;
            vote.vote_percent = percent;
            vote.last_update = now;
            vote.num_changes += 1;
            // An edited vote no longer takes part in curation.
            vote.weight = 0;
        });

        Comments::<T>::mutate(comment.id, |maybe| {
            if let Some(c) = maybe {
                c.net_rshares = c.net_rshares - old_rshares + rshares;
                c.abs_rshares += rshares.abs();
                c.vote_rshares = c.vote_rshares - old_rshares.max(0) + rshares.max(0);
                c.net_votes += match (old_rshares >= 0, rshares >= 0) {
                    (true, false) => -2,
                    (false, true) => 2,
                    _ => 0,
                };
                c.total_vote_weight -= u128::from(old_weight);
                c.auction_window_weight -= u128::from(old_withheld);
                if !was_in_window {
                    c.votes_after_auction_window_weight =
                        c.votes_after_auction_window_weight.saturating_sub(u128::from(old_weight));
                }
            }
        });
        Self::for_each_ancestor(comment.id, |c| c.children_abs_rshares += rshares.abs());

        let new_vshares =
            ap_rewards::evaluate_curve(curve, comment.net_rshares - old_rshares + rshares);
        Self::adjust_rshares2(comment.id, old_vshares, new_vshares);
        Ok(())
    }
}

impl<T: Config> FundPool for Pallet<T> {
    fn balance() -> Asset {
        Asset::steem(TotalRewardFund::<T>::get())
    }

    fn deposit(value: Asset) {
        if value.symbol == AssetSymbol::Steem && value.amount > 0 {
            TotalRewardFund::<T>::mutate(|fund| *fund += value.amount);
        }
    }

    fn withdraw(value: Asset) -> DispatchResult {
        TotalRewardFund::<T>::try_mutate(|fund| {
            ensure!(
                value.symbol == AssetSymbol::Steem && *fund >= value.amount,
                Error::<T>::InsufficientRewardFund
            );
            *fund -= value.amount;
            Ok(())
        })
    }
}

impl<T: Config> PostInfo<T::AccountId> for Pallet<T> {
    fn is_root_post(author: &T::AccountId, permlink: &Permlink) -> Option<bool> {
        Self::find_comment(author, permlink).map(|c| c.parent_author.is_none())
    }
}
