// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! The narrow interfaces the content and worker subsystems consume from the
//! rest of the chain.
//!
//! Concrete implementations live in `apallet-chain`; every trait also has a
//! no-op impl for `()` so mocks can opt out of pieces they do not exercise.

#![cfg_attr(not(feature = "std"), no_std)]

use sp_runtime::{DispatchError, DispatchResult};
use sp_std::vec::Vec;

use ap_protocol::{Asset, AssetSymbol, DelegatorPayoutStrategy, Permlink, Price};

/// Account balances in the three consensus assets.
pub trait AssetCurrency<AccountId> {
    /// Current balance of `who` in `symbol`.
    fn balance(who: &AccountId, symbol: AssetSymbol) -> Asset;

    /// Credits `who` with `value`.
    fn add_balance(who: &AccountId, value: Asset) -> DispatchResult;

    /// Debits `value` from `who`, failing on insufficient funds.
    fn sub_balance(who: &AccountId, value: Asset) -> DispatchResult;
}

impl<AccountId> AssetCurrency<AccountId> for () {
    fn balance(_: &AccountId, symbol: AssetSymbol) -> Asset {
        Asset::zero(symbol)
    }
    fn add_balance(_: &AccountId, _: Asset) -> DispatchResult {
        Ok(())
    }
    fn sub_balance(_: &AccountId, _: Asset) -> DispatchResult {
        Ok(())
    }
}

/// The vesting pool: converting the core coin into vested shares.
pub trait Vesting<AccountId> {
    /// Converts `value` (core coin) at the current vesting price, credits
    /// the resulting shares to `who` and grows the pool. Returns the shares
    /// created.
    fn create_vesting(who: &AccountId, value: Asset) -> Result<Asset, DispatchError>;

    /// `who`'s effective vesting shares: own holdings plus received
    /// delegations minus shares delegated away.
    fn effective_vesting_shares(who: &AccountId) -> Asset;
}

impl<AccountId> Vesting<AccountId> for () {
    fn create_vesting(_: &AccountId, _: Asset) -> Result<Asset, DispatchError> {
        Ok(Asset::vests(0))
    }
    fn effective_vesting_shares(_: &AccountId) -> Asset {
        Asset::vests(0)
    }
}

/// Read/adjust access to vesting delegations, as the vote path needs it.
pub trait VestingDelegations<AccountId> {
    /// Interest-rate records of every active delegation to `delegatee`:
    /// `(delegator, interest_rate_bp, payout_strategy)`.
    fn interest_rates(delegatee: &AccountId) -> Vec<(AccountId, u16, DelegatorPayoutStrategy)>;

    /// Grows the principal of the `delegator -> delegatee` delegation.
    fn add_to_delegation(
        delegator: &AccountId,
        delegatee: &AccountId,
        shares: Asset,
    ) -> DispatchResult;
}

impl<AccountId> VestingDelegations<AccountId> for () {
    fn interest_rates(_: &AccountId) -> Vec<(AccountId, u16, DelegatorPayoutStrategy)> {
        Vec::new()
    }
    fn add_to_delegation(_: &AccountId, _: &AccountId, _: Asset) -> DispatchResult {
        Ok(())
    }
}

/// A global fund that can be topped up and drawn down.
pub trait FundPool {
    /// The fund's current balance.
    fn balance() -> Asset;

    /// Adds `value` to the fund.
    fn deposit(value: Asset);

    /// Draws `value` from the fund, failing when it would go negative.
    fn withdraw(value: Asset) -> DispatchResult;
}

impl FundPool for () {
    fn balance() -> Asset {
        Asset::steem(0)
    }
    fn deposit(_: Asset) {}
    fn withdraw(_: Asset) -> DispatchResult {
        Ok(())
    }
}

/// Identifies the witness that authored the block being applied.
pub trait BlockAuthor<AccountId> {
    /// The current block's author, when the host exposes one.
    fn block_author() -> Option<AccountId>;
}

impl<AccountId> BlockAuthor<AccountId> for () {
    fn block_author() -> Option<AccountId> {
        None
    }
}

/// The current witness schedule.
pub trait TopWitnesses<AccountId> {
    /// True iff `who` is in the top-N schedule right now.
    fn is_scheduled(who: &AccountId) -> bool;
}

impl<AccountId> TopWitnesses<AccountId> for () {
    fn is_scheduled(_: &AccountId) -> bool {
        false
    }
}

/// The hardfork schedule threaded through every evaluator.
pub trait Hardforks {
    /// True iff hardfork `version` has activated.
    fn is_active(version: u16) -> bool;
}

impl Hardforks for () {
    fn is_active(_: u16) -> bool {
        true
    }
}

/// The median feed price between the core coin and the stable token.
pub trait FeedPrice {
    /// The current median, if any feed has been published.
    fn median() -> Option<Price>;

    /// Converts a core-coin amount into SBD; identity amounts when no
    /// median is published.
    fn to_sbd(value: Asset) -> Asset;

    /// Converts an SBD amount into the core coin; identity amounts when no
    /// median is published.
    fn to_steem(value: Asset) -> Asset;
}

impl FeedPrice for () {
    fn median() -> Option<Price> {
        None
    }
    fn to_sbd(value: Asset) -> Asset {
        Asset::sbd(value.amount)
    }
    fn to_steem(value: Asset) -> Asset {
        Asset::steem(value.amount)
    }
}

/// What the worker subsystem needs to know about stored comments.
pub trait PostInfo<AccountId> {
    /// `Some(true)` iff `(author, permlink)` exists and is a root post.
    fn is_root_post(author: &AccountId, permlink: &Permlink) -> Option<bool>;
}

impl<AccountId> PostInfo<AccountId> for () {
    fn is_root_post(_: &AccountId, _: &Permlink) -> Option<bool> {
        None
    }
}

/// Reputation lookup for the projection layer.
pub trait ReputationOf<AccountId> {
    /// `who`'s reputation, if the social-graph module tracks one.
    fn reputation_of(who: &AccountId) -> Option<i64>;
}

impl<AccountId> ReputationOf<AccountId> for () {
    fn reputation_of(_: &AccountId) -> Option<i64> {
        None
    }
}

/// Promoted-value lookup for the projection layer.
pub trait PromotedValue<AccountId> {
    /// How much was paid to promote the post, in SBD.
    fn promoted_value(author: &AccountId, permlink: &Permlink) -> Asset;
}

impl<AccountId> PromotedValue<AccountId> for () {
    fn promoted_value(_: &AccountId, _: &Permlink) -> Asset {
        Asset::sbd(0)
    }
}
