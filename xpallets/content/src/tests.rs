// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

use crate::mock::*;
use crate::{
    CashoutQueue, CommentMode, Comments, PermlinkOf, TotalRewardFund, TotalRewardShares2, Votes,
};

use frame_support::{assert_noop, assert_ok, storage::with_transaction};
use sp_runtime::{DispatchError, TransactionOutcome};

use ap_protocol::{
    Asset, AuctionWindowDestination, BeneficiaryRoute, CurationCurve, DelegatorPayoutStrategy,
    CASHOUT_NEVER, CASHOUT_WINDOW_SECONDS, PERCENT_100,
};

fn default_options(
    author: u64,
    permlink: &[u8],
    curation_percent: u16,
    destination: AuctionWindowDestination,
    window: u32,
) {
    assert_ok!(AgoraContent::set_comment_options(
        RuntimeOrigin::signed(author),
        permlink.to_vec(),
        Asset::sbd(1_000_000_000),
        PERCENT_100,
        true,
        true,
        curation_percent,
        destination,
        window,
        CurationCurve::Detect,
        vec![],
    ));
}

fn vote(voter: u64, author: u64, permlink: &[u8], percent: i16) {
    assert_ok!(AgoraContent::vote(
        RuntimeOrigin::signed(voter),
        author,
        permlink.to_vec(),
        percent
    ));
}

#[test]
fn post_creates_indexed_comment() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"first");
        let id = PermlinkOf::<Test>::get(AUTHOR, b"first".to_vec()).unwrap();
        let comment = Comments::<Test>::get(id).unwrap();

        assert_eq!(comment.depth, 0);
        assert_eq!(comment.root_comment, id);
        assert_eq!(comment.parent_author, None);
        assert_eq!(comment.parent_permlink, b"test".to_vec());
        assert_eq!(comment.mode, CommentMode::FirstPayout);
        assert_eq!(comment.cashout_time, START + CASHOUT_WINDOW_SECONDS);
        assert_eq!(comment.max_cashout_time, CASHOUT_NEVER);
        assert_eq!(
            CashoutQueue::<Test>::get(),
            vec![(START + CASHOUT_WINDOW_SECONDS, id)]
        );

        assert_noop!(
            AgoraContent::post(
                RuntimeOrigin::signed(AUTHOR),
                None,
                b"test".to_vec(),
                b"first".to_vec()
            ),
            Error::<Test>::DuplicateComment
        );
        assert_noop!(
            AgoraContent::post(
                RuntimeOrigin::signed(AUTHOR),
                None,
                b"test".to_vec(),
                b"Not A Permlink".to_vec()
            ),
            Error::<Test>::InvalidPermlink
        );
    })
}

#[test]
fn replies_link_to_the_root_and_bump_ancestors() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"root");
        let root_id = PermlinkOf::<Test>::get(AUTHOR, b"root".to_vec()).unwrap();

        assert_ok!(AgoraContent::post(
            RuntimeOrigin::signed(VOTER_1),
            Some(AUTHOR),
            b"root".to_vec(),
            b"re-root".to_vec()
        ));
        assert_ok!(AgoraContent::post(
            RuntimeOrigin::signed(VOTER_2),
            Some(VOTER_1),
            b"re-root".to_vec(),
            b"re-re-root".to_vec()
        ));

        let reply = AgoraContent::find_comment(&VOTER_2, &b"re-re-root".to_vec()).unwrap();
        assert_eq!(reply.depth, 2);
        assert_eq!(reply.root_comment, root_id);

        // children counts the whole subtree.
        assert_eq!(Comments::<Test>::get(root_id).unwrap().children, 2);
        let mid = AgoraContent::find_comment(&VOTER_1, &b"re-root".to_vec()).unwrap();
        assert_eq!(mid.children, 1);

        assert_noop!(
            AgoraContent::post(
                RuntimeOrigin::signed(AUTHOR),
                Some(AUTHOR),
                b"nothing".to_vec(),
                b"re-nothing".to_vec()
            ),
            Error::<Test>::CommentNotFound
        );
    })
}

#[test]
fn reply_depth_is_bounded() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"d0");
        for depth in 1..=6u16 {
            let parent = format!("d{}", depth - 1).into_bytes();
            let permlink = format!("d{}", depth).into_bytes();
            assert_ok!(AgoraContent::post(
                RuntimeOrigin::signed(AUTHOR),
                Some(AUTHOR),
                parent,
                permlink
            ));
        }
        assert_noop!(
            AgoraContent::post(
                RuntimeOrigin::signed(AUTHOR),
                Some(AUTHOR),
                b"d6".to_vec(),
                b"d7".to_vec()
            ),
            Error::<Test>::MaxCommentDepthExceeded
        );
    })
}

#[test]
fn net_rshares_is_the_vote_sum() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"post");
        default_options(AUTHOR, b"post", 2500, AuctionWindowDestination::ToAuthor, 0);

        vote(VOTER_1, AUTHOR, b"post", 10_000);
        vote(VOTER_2, AUTHOR, b"post", 10_000);
        vote(VOTER_3, AUTHOR, b"post", -10_000);

        let comment = AgoraContent::find_comment(&AUTHOR, &b"post".to_vec()).unwrap();
        let votes = Votes::<Test>::get(comment.id);
        assert_eq!(votes.iter().map(|v| v.rshares).sum::<i64>(), comment.net_rshares);
        assert_eq!(comment.net_rshares, 200);
        assert_eq!(comment.abs_rshares, 400);
        assert_eq!(comment.vote_rshares, 300);
        assert_eq!(comment.net_votes, 1);
        assert_eq!(comment.total_votes, 3);

        // Linear curve: the global counter carries curve(net).
        assert_eq!(TotalRewardShares2::<Test>::get(), 200);
        assert_eq!(comment.children_rshares2, 200);
    })
}

#[test]
fn vote_changes_forfeit_weight_and_are_limited() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"post");
        default_options(AUTHOR, b"post", 2500, AuctionWindowDestination::ToAuthor, 0);

        vote(VOTER_1, AUTHOR, b"post", 10_000);
        let id = PermlinkOf::<Test>::get(AUTHOR, b"post".to_vec()).unwrap();
        assert_eq!(Votes::<Test>::get(id)[0].weight, 100);

        assert_noop!(
            AgoraContent::vote(RuntimeOrigin::signed(VOTER_1), AUTHOR, b"post".to_vec(), 10_000),
            Error::<Test>::AlreadyVotedThisWay
        );

        vote(VOTER_1, AUTHOR, b"post", -10_000);
        let comment = Comments::<Test>::get(id).unwrap();
        let changed = &Votes::<Test>::get(id)[0];
        assert_eq!(changed.rshares, -100);
        assert_eq!(changed.weight, 0);
        assert_eq!(changed.num_changes, 1);
        assert_eq!(comment.net_rshares, -100);
        assert_eq!(comment.total_vote_weight, 0);
        assert_eq!(TotalRewardShares2::<Test>::get(), 0);

        for (step, percent) in [(2, 5000i16), (3, -5000), (4, 5000), (5, -5000)] {
            vote(VOTER_1, AUTHOR, b"post", percent);
            assert_eq!(Votes::<Test>::get(id)[0].num_changes, step);
        }
        assert_noop!(
            AgoraContent::vote(RuntimeOrigin::signed(VOTER_1), AUTHOR, b"post".to_vec(), 100),
            Error::<Test>::TooManyVoteChanges
        );
    })
}

#[test]
fn comment_options_are_validated() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"post");

        assert_noop!(
            AgoraContent::set_comment_options(
                RuntimeOrigin::signed(AUTHOR),
                b"post".to_vec(),
                Asset::sbd(2_000_000_000),
                PERCENT_100,
                true,
                true,
                2500,
                AuctionWindowDestination::ToAuthor,
                0,
                CurationCurve::Detect,
                vec![],
            ),
            Error::<Test>::CannotIncreaseMaxAcceptedPayout
        );
        assert_noop!(
            AgoraContent::set_comment_options(
                RuntimeOrigin::signed(AUTHOR),
                b"post".to_vec(),
                Asset::steem(1000),
                PERCENT_100,
                true,
                true,
                2500,
                AuctionWindowDestination::ToAuthor,
                0,
                CurationCurve::Detect,
                vec![],
            ),
            Error::<Test>::MaxAcceptedPayoutMustBeSbd
        );
        assert_noop!(
            AgoraContent::set_comment_options(
                RuntimeOrigin::signed(AUTHOR),
                b"post".to_vec(),
                Asset::sbd(1_000_000_000),
                PERCENT_100,
                true,
                true,
                100,
                AuctionWindowDestination::ToAuthor,
                0,
                CurationCurve::Detect,
                vec![],
            ),
            Error::<Test>::CurationPercentOutOfBounds
        );
        assert_noop!(
            AgoraContent::set_comment_options(
                RuntimeOrigin::signed(AUTHOR),
                b"post".to_vec(),
                Asset::sbd(1_000_000_000),
                PERCENT_100,
                true,
                true,
                2500,
                AuctionWindowDestination::ToAuthor,
                0,
                CurationCurve::Detect,
                vec![
                    BeneficiaryRoute { account: BENEFICIARY_2, weight: 100 },
                    BeneficiaryRoute { account: BENEFICIARY_1, weight: 100 },
                ],
            ),
            Error::<Test>::InvalidBeneficiaries
        );

        // Options freeze once the first vote lands.
        vote(VOTER_1, AUTHOR, b"post", 10_000);
        assert_noop!(
            AgoraContent::set_comment_options(
                RuntimeOrigin::signed(AUTHOR),
                b"post".to_vec(),
                Asset::sbd(1_000_000_000),
                PERCENT_100,
                true,
                true,
                2500,
                AuctionWindowDestination::ToAuthor,
                0,
                CurationCurve::Detect,
                vec![],
            ),
            Error::<Test>::CannotUpdateOptionsAfterVotes
        );
    })
}

#[test]
fn linear_curation_without_auction_window() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"post");
        default_options(AUTHOR, b"post", 2500, AuctionWindowDestination::ToAuthor, 0);

        vote(VOTER_1, AUTHOR, b"post", 10_000);
        vote(VOTER_2, AUTHOR, b"post", 10_000);
        vote(VOTER_3, AUTHOR, b"post", 10_000);

        let now = START + CASHOUT_WINDOW_SECONDS + 1;
        set_now(now);
        AgoraContent::process_cashouts(now);

        // claim 1000; curator fund 250; weights 100/200/100; the rounding
        // remainder of 1 goes back to the author.
        assert_eq!(vests_of(VOTER_1), 100 + 62);
        assert_eq!(vests_of(VOTER_2), 200 + 125);
        assert_eq!(vests_of(VOTER_3), 100 + 62);
        assert_eq!(sbd_of(AUTHOR), 375);
        assert_eq!(vests_of(AUTHOR), 376);

        // Nothing created, nothing destroyed.
        assert_eq!(62 + 125 + 62 + 375 + 376, 1000);
        assert_eq!(TotalRewardFund::<Test>::get(), 0);
        assert_eq!(TotalRewardShares2::<Test>::get(), 0);

        let comment = AgoraContent::find_comment(&AUTHOR, &b"post".to_vec()).unwrap();
        assert_eq!(comment.mode, CommentMode::Archived);
        assert_eq!(comment.cashout_time, CASHOUT_NEVER);
        assert_eq!(comment.last_payout, now);
        assert!(Votes::<Test>::get(comment.id).iter().all(|v| v.num_changes == -1));
        assert!(CashoutQueue::<Test>::get().is_empty());

        expect_event(AgoraContentEvent::AuthorReward(
            AUTHOR,
            b"post".to_vec(),
            Asset::sbd(375),
            Asset::vests(376),
        ));

        // Archived comments reject further votes and never re-enter the
        // queue.
        assert_noop!(
            AgoraContent::vote(RuntimeOrigin::signed(VOTER_1), AUTHOR, b"post".to_vec(), 1),
            Error::<Test>::CommentIsArchived
        );
    })
}

#[test]
fn auction_window_reward_goes_to_curators() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"post");
        default_options(AUTHOR, b"post", 2500, AuctionWindowDestination::ToCurators, 1800);

        // One vote inside the window, two after it.
        set_now(START + 900);
        vote(VOTER_2, AUTHOR, b"post", 10_000);
        set_now(START + 1800);
        vote(VOTER_1, AUTHOR, b"post", 10_000);
        vote(VOTER_3, AUTHOR, b"post", 10_000);

        let comment = AgoraContent::find_comment(&AUTHOR, &b"post".to_vec()).unwrap();
        assert_eq!(comment.total_vote_weight, 300);
        assert_eq!(comment.auction_window_weight, 100);
        assert_eq!(comment.votes_after_auction_window_weight, 200);
        assert_eq!(Votes::<Test>::get(comment.id)[0].auction_time, 900);

        let now = START + CASHOUT_WINDOW_SECONDS + 1;
        set_now(now);
        AgoraContent::process_cashouts(now);

        // claim 1000, curator fund 250, auction share 62. The first vote
        // past the window (V1) is the sentinel: skipped in the loop, paid
        // the whole unclaimed remainder at the end.
        assert_eq!(vests_of(VOTER_2), 200 + 62);
        assert_eq!(vests_of(VOTER_3), 100 + 93);
        assert_eq!(vests_of(VOTER_1), 100 + 95);
        assert_eq!(sbd_of(AUTHOR), 375);
        assert_eq!(vests_of(AUTHOR), 375);
        assert_eq!(62 + 93 + 95 + 375 + 375, 1000);
    })
}

#[test]
fn delegator_interest_splits_the_curation_reward() {
    ExtBuilder {
        vests: vec![(VOTER_1, 50), (DELEGATOR, 50)],
        reward_fund: 400,
        default_curve: CurationCurve::Linear,
    }
    .build()
    .execute_with(|| {
        assert_ok!(AgoraChain::delegate_vesting_shares(
            RuntimeOrigin::signed(DELEGATOR),
            VOTER_1,
            Asset::vests(50),
            3000,
            DelegatorPayoutStrategy::ToDelegator,
        ));

        post_root(AUTHOR, b"post");
        default_options(AUTHOR, b"post", 2500, AuctionWindowDestination::ToAuthor, 0);

        // Delegated shares count toward the vote's rshares.
        vote(VOTER_1, AUTHOR, b"post", 10_000);
        let id = PermlinkOf::<Test>::get(AUTHOR, b"post".to_vec()).unwrap();
        assert_eq!(Votes::<Test>::get(id)[0].rshares, 100);
        assert_eq!(
            Votes::<Test>::get(id)[0].delegator_vote_interest_rates[0].account,
            DELEGATOR
        );

        let now = START + CASHOUT_WINDOW_SECONDS + 1;
        set_now(now);
        AgoraContent::process_cashouts(now);

        // claim 400, curator fund 100: 30% to the delegator, the rest to
        // the voter.
        assert_eq!(vests_of(DELEGATOR), 50 + 30);
        assert_eq!(vests_of(VOTER_1), 50 + 70);
        assert_eq!(sbd_of(AUTHOR), 150);
        assert_eq!(vests_of(AUTHOR), 150);

        expect_event(AgoraContentEvent::DelegatorReward(
            DELEGATOR,
            VOTER_1,
            AUTHOR,
            b"post".to_vec(),
            Asset::vests(30),
        ));
    })
}

#[test]
fn delegator_payout_can_grow_the_delegation() {
    ExtBuilder {
        vests: vec![(VOTER_1, 50), (DELEGATOR, 50)],
        reward_fund: 400,
        default_curve: CurationCurve::Linear,
    }
    .build()
    .execute_with(|| {
        assert_ok!(AgoraChain::delegate_vesting_shares(
            RuntimeOrigin::signed(DELEGATOR),
            VOTER_1,
            Asset::vests(50),
            3000,
            DelegatorPayoutStrategy::ToDelegatedVesting,
        ));

        post_root(AUTHOR, b"post");
        default_options(AUTHOR, b"post", 2500, AuctionWindowDestination::ToAuthor, 0);
        vote(VOTER_1, AUTHOR, b"post", 10_000);

        let now = START + CASHOUT_WINDOW_SECONDS + 1;
        set_now(now);
        AgoraContent::process_cashouts(now);

        // The delegator's 30 vests immediately re-delegate to the voter.
        assert_eq!(vests_of(DELEGATOR), 80);
        let delegation = apallet_chain::Delegations::<Test>::get(VOTER_1, DELEGATOR).unwrap();
        assert_eq!(delegation.vesting_shares, 80);
        assert_eq!(
            apallet_chain::Accounts::<Test>::get(DELEGATOR).delegated_vesting_shares,
            80
        );
        assert_eq!(
            apallet_chain::Accounts::<Test>::get(VOTER_1).received_vesting_shares,
            80
        );
    })
}

#[test]
fn beneficiaries_can_take_the_whole_author_fund() {
    ExtBuilder {
        vests: vec![(VOTER_1, 100)],
        reward_fund: 1000,
        default_curve: CurationCurve::Linear,
    }
    .build()
    .execute_with(|| {
        post_root(AUTHOR, b"post");
        assert_ok!(AgoraContent::set_comment_options(
            RuntimeOrigin::signed(AUTHOR),
            b"post".to_vec(),
            Asset::sbd(1_000_000_000),
            PERCENT_100,
            true,
            true,
            2500,
            AuctionWindowDestination::ToAuthor,
            0,
            CurationCurve::Detect,
            vec![BeneficiaryRoute { account: BENEFICIARY_1, weight: PERCENT_100 }],
        ));
        vote(VOTER_1, AUTHOR, b"post", 10_000);

        let now = START + CASHOUT_WINDOW_SECONDS + 1;
        set_now(now);
        AgoraContent::process_cashouts(now);

        // claim 1000, curator fund 250, author fund 750 routed entirely to
        // the beneficiary; the author keeps exactly nothing.
        assert_eq!(vests_of(BENEFICIARY_1), 750);
        assert_eq!(sbd_of(AUTHOR), 0);
        assert_eq!(vests_of(AUTHOR), 0);
        expect_event(AgoraContentEvent::BenefactorReward(
            BENEFICIARY_1,
            AUTHOR,
            b"post".to_vec(),
            Asset::vests(750),
        ));
    })
}

#[test]
fn rounding_residual_bypasses_beneficiaries() {
    ExtBuilder {
        vests: vec![(VOTER_1, 100), (VOTER_2, 100), (VOTER_3, 100), (VOTER_4, 100)],
        reward_fund: 1000,
        default_curve: CurationCurve::Linear,
    }
    .build()
    .execute_with(|| {
        post_root(AUTHOR, b"post");
        assert_ok!(AgoraContent::set_comment_options(
            RuntimeOrigin::signed(AUTHOR),
            b"post".to_vec(),
            Asset::sbd(1_000_000_000),
            PERCENT_100,
            true,
            true,
            2500,
            AuctionWindowDestination::ToAuthor,
            0,
            CurationCurve::Detect,
            vec![BeneficiaryRoute { account: BENEFICIARY_1, weight: 5000 }],
        ));
        for voter in [VOTER_1, VOTER_2, VOTER_3, VOTER_4] {
            vote(voter, AUTHOR, b"post", 10_000);
        }

        let now = START + CASHOUT_WINDOW_SECONDS + 1;
        set_now(now);
        AgoraContent::process_cashouts(now);

        // claim 1000, curator fund 250, four equal weights: 62 each leaves
        // a remainder of 2. The beneficiary takes half of the 750 author
        // fund before the remainder returns, so the remainder reaches the
        // author alone.
        for voter in [VOTER_1, VOTER_2, VOTER_3, VOTER_4] {
            assert_eq!(vests_of(voter), 100 + 62);
        }
        assert_eq!(vests_of(BENEFICIARY_1), 375);
        assert_eq!(sbd_of(AUTHOR), 188);
        assert_eq!(vests_of(AUTHOR), 189);
        assert_eq!(4 * 62 + 375 + 188 + 189, 1000);
        assert_eq!(TotalRewardFund::<Test>::get(), 0);
    })
}

#[test]
fn zero_weight_votes_earn_nothing() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"post");
        default_options(AUTHOR, b"post", 2500, AuctionWindowDestination::ToAuthor, 1800);

        // At the very start of the window the whole weight is withheld.
        vote(VOTER_1, AUTHOR, b"post", 10_000);
        set_now(START + 1800);
        vote(VOTER_2, AUTHOR, b"post", 10_000);

        let comment = AgoraContent::find_comment(&AUTHOR, &b"post".to_vec()).unwrap();
        assert_eq!(Votes::<Test>::get(comment.id)[0].weight, 0);

        let now = START + CASHOUT_WINDOW_SECONDS + 1;
        set_now(now);
        AgoraContent::process_cashouts(now);

        // net 300 vs fund 1000: claim 1000, curator fund 250 over total
        // weight 300 (200 after-window + 100 withheld). The zero-weight
        // vote earns zero; the withheld share returns to the author.
        assert_eq!(vests_of(VOTER_1), 100);
        assert_eq!(vests_of(VOTER_2), 200 + 166);
        assert_eq!(sbd_of(AUTHOR), 417);
        assert_eq!(vests_of(AUTHOR), 417);
        assert_eq!(166 + 417 + 417, 1000);
    })
}

#[test]
fn downvoted_comments_cash_out_to_nothing() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"post");
        default_options(AUTHOR, b"post", 2500, AuctionWindowDestination::ToAuthor, 0);
        vote(VOTER_3, AUTHOR, b"post", -10_000);

        let comment = AgoraContent::find_comment(&AUTHOR, &b"post".to_vec()).unwrap();
        let (pending, _) = AgoraContent::pending_payout(&comment);
        assert!(pending.is_zero());

        let now = START + CASHOUT_WINDOW_SECONDS + 1;
        set_now(now);
        AgoraContent::process_cashouts(now);

        assert_eq!(sbd_of(AUTHOR), 0);
        assert_eq!(vests_of(AUTHOR), 0);
        assert_eq!(TotalRewardFund::<Test>::get(), 1000);
        let comment = AgoraContent::find_comment(&AUTHOR, &b"post".to_vec()).unwrap();
        assert_eq!(comment.mode, CommentMode::Archived);
    })
}

#[test]
fn aborted_session_leaves_no_trace() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"kept");
        let root_before = sp_io::storage::root(sp_runtime::StateVersion::V1);

        let result: Result<(), DispatchError> = with_transaction(|| {
            post_root(AUTHOR, b"discarded");
            vote(VOTER_1, AUTHOR, b"discarded", 10_000);
            TransactionOutcome::Rollback(Ok(()))
        });
        assert_ok!(result);

        assert_eq!(
            sp_io::storage::root(sp_runtime::StateVersion::V1),
            root_before
        );
        assert!(AgoraContent::find_comment(&AUTHOR, &b"discarded".to_vec()).is_none());
    })
}

#[test]
fn delete_comment_rules() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"root");
        assert_ok!(AgoraContent::post(
            RuntimeOrigin::signed(VOTER_1),
            Some(AUTHOR),
            b"root".to_vec(),
            b"reply".to_vec()
        ));

        assert_noop!(
            AgoraContent::delete_comment(RuntimeOrigin::signed(AUTHOR), b"root".to_vec()),
            Error::<Test>::CannotDeleteCommentWithReplies
        );

        vote(VOTER_2, VOTER_1, b"reply", 10_000);
        assert_noop!(
            AgoraContent::delete_comment(RuntimeOrigin::signed(VOTER_1), b"reply".to_vec()),
            Error::<Test>::CannotDeleteCommentWithPositiveVotes
        );

        vote(VOTER_2, VOTER_1, b"reply", -10_000);
        assert_ok!(AgoraContent::delete_comment(
            RuntimeOrigin::signed(VOTER_1),
            b"reply".to_vec()
        ));
        assert!(AgoraContent::find_comment(&VOTER_1, &b"reply".to_vec()).is_none());

        // The root is childless again and deletable.
        let root = AgoraContent::find_comment(&AUTHOR, &b"root".to_vec()).unwrap();
        assert_eq!(root.children, 0);
        assert!(!CashoutQueue::<Test>::get().iter().any(|(_, id)| *id != root.id));
        assert_ok!(AgoraContent::delete_comment(RuntimeOrigin::signed(AUTHOR), b"root".to_vec()));
        assert!(CashoutQueue::<Test>::get().is_empty());
    })
}

#[test]
fn cashouts_run_in_queue_order_from_the_hook() {
    new_test_ext().execute_with(|| {
        use frame_support::traits::Hooks;

        post_root(AUTHOR, b"early");
        set_now(START + 10);
        post_root(AUTHOR, b"late");
        vote(VOTER_1, AUTHOR, b"early", 10_000);
        vote(VOTER_2, AUTHOR, b"late", 10_000);

        // Only the first post is due.
        set_now(START + CASHOUT_WINDOW_SECONDS + 5);
        AgoraContent::on_finalize(1);

        assert_eq!(
            AgoraContent::find_comment(&AUTHOR, &b"early".to_vec()).unwrap().mode,
            CommentMode::Archived
        );
        assert_eq!(
            AgoraContent::find_comment(&AUTHOR, &b"late".to_vec()).unwrap().mode,
            CommentMode::FirstPayout
        );
        assert_eq!(CashoutQueue::<Test>::get().len(), 1);

        set_now(START + CASHOUT_WINDOW_SECONDS + 10);
        AgoraContent::on_finalize(2);
        assert!(CashoutQueue::<Test>::get().is_empty());
    })
}

#[test]
fn shares2_only_decreases_during_cashout() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"one");
        set_now(START + 5);
        post_root(AUTHOR, b"two");
        default_options(AUTHOR, b"one", 2500, AuctionWindowDestination::ToAuthor, 0);
        default_options(AUTHOR, b"two", 2500, AuctionWindowDestination::ToAuthor, 0);
        vote(VOTER_1, AUTHOR, b"one", 10_000);
        vote(VOTER_2, AUTHOR, b"two", 10_000);

        let before = TotalRewardShares2::<Test>::get();
        assert_eq!(before, 300);

        let now = START + CASHOUT_WINDOW_SECONDS + 10;
        set_now(now);
        AgoraContent::process_cashouts(now);
        assert_eq!(TotalRewardShares2::<Test>::get(), 0);
    })
}

#[test]
fn pending_payout_projection_matches_the_engine() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"post");
        default_options(AUTHOR, b"post", 2500, AuctionWindowDestination::ToAuthor, 0);
        vote(VOTER_1, AUTHOR, b"post", 10_000);
        vote(VOTER_2, AUTHOR, b"post", 10_000);

        // Without a feed the pot stays in STEEM.
        let comment = AgoraContent::find_comment(&AUTHOR, &b"post".to_vec()).unwrap();
        let (own, subtree) = AgoraContent::pending_payout(&comment);
        assert_eq!(own, Asset::steem(1000));
        assert_eq!(subtree, Asset::steem(1000));

        // With a 1 STEEM = 2 SBD median the estimate is SBD-denominated.
        assert_ok!(AgoraChain::set_feed_price(
            RuntimeOrigin::root(),
            Asset::steem(1000),
            Asset::sbd(2000)
        ));
        let (own, _) = AgoraContent::pending_payout(&comment);
        assert_eq!(own, Asset::sbd(2000));
    })
}

#[test]
fn discussions_project_roots_and_replies() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"root");
        assert_ok!(AgoraContent::post(
            RuntimeOrigin::signed(VOTER_1),
            Some(AUTHOR),
            b"root".to_vec(),
            b"reply".to_vec()
        ));
        vote(VOTER_2, AUTHOR, b"root", 10_000);
        vote(VOTER_3, AUTHOR, b"root", 5_000);

        let root = AgoraContent::get_discussion(AUTHOR, b"root".to_vec(), 1).unwrap();
        assert_eq!(root.category, b"test".to_vec());
        assert_eq!(root.root_author, AUTHOR);
        assert_eq!(root.root_permlink, b"root".to_vec());
        assert_eq!(root.active_votes.len(), 1);
        assert_eq!(root.active_votes_count, 2);
        assert_eq!(root.active_votes[0].voter, VOTER_2);

        let reply = AgoraContent::get_discussion(VOTER_1, b"reply".to_vec(), 10).unwrap();
        assert_eq!(reply.category, b"test".to_vec());
        assert_eq!(reply.root_author, AUTHOR);
        assert_eq!(reply.root_permlink, b"root".to_vec());
        assert_eq!(reply.parent_author, Some(AUTHOR));
        // Replies display the root's cashout moment.
        assert_eq!(reply.cashout_time, root.cashout_time);

        assert!(AgoraContent::get_discussion(AUTHOR, b"missing".to_vec(), 0).is_none());

        let (votes, total) = AgoraContent::get_active_votes(AUTHOR, b"root".to_vec(), 10).unwrap();
        assert_eq!(total, 2);
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[1].voter, VOTER_3);
        assert_eq!(votes[1].percent, 5_000);
    })
}

#[test]
fn operation_records_round_trip_through_scale() {
    use codec::{Decode, Encode};

    let calls = vec![
        RuntimeCall::AgoraContent(crate::Call::post {
            parent_author: Some(AUTHOR),
            parent_permlink: b"test".to_vec(),
            permlink: b"reply-post".to_vec(),
        }),
        RuntimeCall::AgoraContent(crate::Call::vote {
            author: AUTHOR,
            permlink: b"post".to_vec(),
            percent: -10_000,
        }),
        RuntimeCall::AgoraContent(crate::Call::set_comment_options {
            permlink: b"post".to_vec(),
            max_accepted_payout: Asset::sbd(5000),
            percent_steem_dollars: 5000,
            allow_votes: false,
            allow_curation_rewards: true,
            curation_rewards_percent: 3000,
            auction_window_destination: AuctionWindowDestination::ToCurators,
            auction_window_size: 600,
            curation_reward_curve: CurationCurve::SquareRoot,
            beneficiaries: vec![BeneficiaryRoute { account: BENEFICIARY_1, weight: 100 }],
        }),
    ];

    for call in calls {
        let encoded = call.encode();
        let decoded = RuntimeCall::decode(&mut &encoded[..]).unwrap();
        assert_eq!(decoded, call);
        assert_eq!(decoded.encode(), encoded);
    }
}

#[test]
fn max_accepted_payout_caps_the_claim() {
    new_test_ext().execute_with(|| {
        post_root(AUTHOR, b"post");
        assert_ok!(AgoraContent::set_comment_options(
            RuntimeOrigin::signed(AUTHOR),
            b"post".to_vec(),
            Asset::sbd(100),
            PERCENT_100,
            true,
            true,
            2500,
            AuctionWindowDestination::ToAuthor,
            0,
            CurationCurve::Detect,
            vec![],
        ));
        vote(VOTER_1, AUTHOR, b"post", 10_000);

        let now = START + CASHOUT_WINDOW_SECONDS + 1;
        set_now(now);
        AgoraContent::process_cashouts(now);

        // The uncapped claim would be 1000; the cap holds it to 100 and the
        // rest stays in the fund.
        assert_eq!(TotalRewardFund::<Test>::get(), 900);
        // curator fund 25, author 75.
        assert_eq!(vests_of(VOTER_1), 100 + 25);
        assert_eq!(sbd_of(AUTHOR), 37);
        assert_eq!(vests_of(AUTHOR), 38);
    })
}
