// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! The cashout engine: converts a due comment's votes into payouts.
//!
//! All divisions truncate; every truncation remainder is reclaimed in the
//! residual step, so the sum of payouts equals the claim exactly.

use super::*;

use ap_protocol::DelegatorPayoutStrategy;
use ap_rewards::{compute_claim, evaluate_curve, weight_share, WeightSum};

impl<T: Config> Pallet<T> {
    /// Drains every queue entry due at `now`, in `(cashout_time, id)` order.
    pub(crate) fn process_cashouts(now: u64) {
        loop {
            let due = CashoutQueue::<T>::mutate(|queue| {
                if queue.first().map_or(false, |(time, _)| *time <= now) {
                    Some(queue.remove(0))
                } else {
                    None
                }
            });
            let Some((_, id)) = due else { break };
            if let Some(comment) = Comments::<T>::get(id) {
                Self::cashout_comment(&comment, now);
            }
        }
    }

    /// Steps 1-7 of the distribution for a single comment.
    fn cashout_comment(comment: &Comment<T::AccountId>, now: u64) {
        // Step 1: claim the comment's share of the reward fund.
        let curve = Self::resolved_curve(comment);
        let vshares = evaluate_curve(curve, comment.net_rshares);
        let fund = TotalRewardFund::<T>::get();
        let shares2 = TotalRewardShares2::<T>::get();
        let vshares = vshares.min(shares2);

        let mut claim = compute_claim(vshares, fund, shares2);
        let cap = T::FeedPrice::to_steem(comment.max_accepted_payout).amount;
        claim = claim.min(cap);

        TotalRewardShares2::<T>::mutate(|total| *total -= vshares);
        TotalRewardFund::<T>::mutate(|total| *total -= claim);
        // The archived comment leaves the subtree accumulators.
        Self::adjust_rshares2_down(comment, vshares);

        if claim > 0 {
            let (curator_fund, spent, sentinel) = Self::pay_curators(comment, claim);
            let unclaimed = curator_fund - spent;
            let mut author_fund = claim - curator_fund;

            // Step 4: beneficiary routes, in listed order.
            let mut benefactor_total = 0;
            for route in &comment.beneficiaries {
                let reward = ((author_fund as i128) * (route.weight as i128)
                    / (PERCENT_100 as i128)) as i64;
                benefactor_total += reward;
                let payout = Self::vest_reward(&route.account, reward);
                Self::deposit_event(Event::BenefactorReward(
                    route.account.clone(),
                    comment.author.clone(),
                    comment.permlink.clone(),
                    payout,
                ));
            }
            author_fund -= benefactor_total;

            // Step 5: residual handling, on the post-beneficiary author
            // fund.
            match (comment.auction_window_reward_destination, sentinel) {
                (AuctionWindowDestination::ToCurators, Some(voter)) => {
                    let payout = Self::vest_reward(&voter, unclaimed);
                    Self::deposit_event(Event::CurationReward(
                        voter,
                        payout,
                        comment.author.clone(),
                        comment.permlink.clone(),
                    ));
                }
                (AuctionWindowDestination::ToRewardFund, _) => {
                    TotalRewardFund::<T>::mutate(|total| *total += unclaimed);
                }
                // `ToAuthor`, and `ToCurators` with nobody eligible: the
                // remainder stays with the author.
                _ => author_fund += unclaimed,
            }

            // Step 6: the author's SBD/vesting split.
            let sbd_amount = ((author_fund as i128) * (comment.percent_steem_dollars as i128)
                / (2 * PERCENT_100 as i128)) as i64;
            let vesting_amount = author_fund - sbd_amount;

            let sbd_payout = T::FeedPrice::to_sbd(Asset::steem(sbd_amount));
            let _ = T::Currency::add_balance(&comment.author, sbd_payout);
            let vesting_payout = Self::vest_reward(&comment.author, vesting_amount);

            Self::deposit_event(Event::AuthorReward(
                comment.author.clone(),
                comment.permlink.clone(),
                sbd_payout,
                vesting_payout,
            ));

            log::debug!(
                target: "runtime::content",
                "[cashout] id:{} claim:{} curators:{} author_sbd:{} author_vests:{}",
                comment.id, claim, curator_fund, sbd_payout.amount, vesting_payout.amount
            );
        }

        // Step 7: post-cashout bookkeeping.
        Comments::<T>::mutate(comment.id, |maybe| {
            if let Some(c) = maybe {
                c.mode = CommentMode::Archived;
                c.last_payout = now;
                c.cashout_time = CASHOUT_NEVER;
            }
        });
        Votes::<T>::mutate(comment.id, |votes| {
            for vote in votes.iter_mut() {
                vote.num_changes = -1;
            }
        });
    }

    /// Step 3: splits the curator fund across the votes by weight.
    ///
    /// Returns `(curator_fund, amount_spent, sentinel_voter)`. The first
    /// auction-bonus-eligible vote is remembered and skipped; its share is
    /// part of the unclaimed remainder the caller settles.
    fn pay_curators(
        comment: &Comment<T::AccountId>,
        claim: i64,
    ) -> (i64, i64, Option<T::AccountId>) {
        let curator_fund = if comment.allow_curation_rewards {
            ((claim as i128) * (comment.curation_rewards_percent as i128)
                / (PERCENT_100 as i128)) as i64
        } else {
            0
        };

        let total_weight: WeightSum = comment.total_vote_weight + comment.auction_window_weight;
        if curator_fund == 0 || total_weight == 0 {
            return (curator_fund, 0, None);
        }

        let auction_window_reward =
            weight_share(curator_fund, comment.auction_window_weight, total_weight);
        let auction_window_end = comment.created + u64::from(comment.auction_window_size);
        let delegators_active = T::Hardforks::is_active(hardfork::DELEGATED_VESTING_INTEREST);

        let mut spent = 0;
        let mut sentinel: Option<T::AccountId> = None;

        for vote in Votes::<T>::get(comment.id) {
            let mut vote_claim = weight_share(curator_fund, u128::from(vote.weight), total_weight);

            if comment.auction_window_reward_destination == AuctionWindowDestination::ToCurators
                && (vote.last_update >= auction_window_end || vote.voter == comment.author)
            {
                if sentinel.is_none() {
                    sentinel = Some(vote.voter.clone());
                    continue;
                }
                vote_claim += weight_share(
                    auction_window_reward,
                    u128::from(vote.weight),
                    comment.votes_after_auction_window_weight,
                );
            }

            spent += vote_claim;
            let mut reward = vote_claim;

            if delegators_active {
                for dvir in &vote.delegator_vote_interest_rates {
                    let delegator_reward = ((vote_claim as i128)
                        * (dvir.interest_rate as i128)
                        / (PERCENT_100 as i128)) as i64;
                    reward -= delegator_reward;

                    let payout = Self::vest_reward(&dvir.account, delegator_reward);
                    if dvir.payout_strategy == DelegatorPayoutStrategy::ToDelegatedVesting {
                        let _ = T::Delegations::add_to_delegation(
                            &dvir.account,
                            &vote.voter,
                            payout,
                        );
                    }
                    Self::deposit_event(Event::DelegatorReward(
                        dvir.account.clone(),
                        vote.voter.clone(),
                        comment.author.clone(),
                        comment.permlink.clone(),
                        payout,
                    ));
                }
            }

            let payout = Self::vest_reward(&vote.voter, reward);
            Self::deposit_event(Event::CurationReward(
                vote.voter.clone(),
                payout,
                comment.author.clone(),
                comment.permlink.clone(),
            ));
        }

        (curator_fund, spent, sentinel)
    }

    /// Vests a core-coin reward, tolerating the zero case.
    fn vest_reward(who: &T::AccountId, amount: i64) -> Asset {
        if amount <= 0 {
            return Asset::vests(0);
        }
        T::Vesting::create_vesting(who, Asset::steem(amount)).unwrap_or(Asset::vests(0))
    }

    /// Removes the comment's own vshares from its subtree accumulators and
    /// those of its ancestors.
    fn adjust_rshares2_down(comment: &Comment<T::AccountId>, vshares: u128) {
        if vshares == 0 {
            return;
        }
        Self::for_each_ancestor(comment.id, |c| {
            c.children_rshares2 = c.children_rshares2.saturating_sub(vshares);
        });
    }
}
