// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use sp_runtime::RuntimeDebug;

use ap_protocol::{Amount, Asset, AssetSymbol, DelegatorPayoutStrategy};

/// Balances of one account across the three consensus assets.
///
/// Vesting shares split into own holdings plus the delegation in/out flows;
/// the voting-relevant figure is [`Self::effective_vesting_shares`].
#[derive(
    PartialEq, Eq, Clone, Default, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct AccountAssets {
    /// Liquid core-coin balance.
    pub balance: Amount,
    /// Stable-token balance.
    pub sbd_balance: Amount,
    /// Own vested shares.
    pub vesting_shares: Amount,
    /// Shares delegated away to other accounts.
    pub delegated_vesting_shares: Amount,
    /// Shares received through delegations.
    pub received_vesting_shares: Amount,
}

impl AccountAssets {
    /// Balance in the requested asset.
    pub fn of(&self, symbol: AssetSymbol) -> Asset {
        let amount = match symbol {
            AssetSymbol::Steem => self.balance,
            AssetSymbol::Sbd => self.sbd_balance,
            AssetSymbol::Vests => self.vesting_shares,
        };
        Asset::new(amount, symbol)
    }

    /// Mutable slot for the requested asset.
    pub fn slot_mut(&mut self, symbol: AssetSymbol) -> &mut Amount {
        match symbol {
            AssetSymbol::Steem => &mut self.balance,
            AssetSymbol::Sbd => &mut self.sbd_balance,
            AssetSymbol::Vests => &mut self.vesting_shares,
        }
    }

    /// Vesting power counting delegations in and out.
    pub fn effective_vesting_shares(&self) -> Amount {
        self.vesting_shares - self.delegated_vesting_shares + self.received_vesting_shares
    }
}

/// One vesting delegation from a delegator to a delegatee.
#[derive(PartialEq, Eq, Clone, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct VestingDelegation {
    /// Delegated shares.
    pub vesting_shares: Amount,
    /// The delegator's cut of the delegatee's curation rewards, in bp.
    pub interest_rate: u16,
    /// How that cut is paid out.
    pub payout_strategy: DelegatorPayoutStrategy,
}

/// Chain-level knobs surfaced to API consumers.
#[derive(PartialEq, Eq, Clone, Encode, Decode, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct ChainProperties {
    /// Default reverse-auction window length, seconds.
    pub auction_window_size: u32,
    /// Bounds of a comment's curation-rewards percent, bp.
    pub min_curation_percent: u16,
    /// Upper bound of a comment's curation-rewards percent, bp.
    pub max_curation_percent: u16,
    /// Cap on vesting-delegation interest rates, bp.
    pub max_delegated_vesting_interest_rate: u16,
    /// Worker carve-out from the content bucket, bp.
    pub worker_from_content_fund_percent: u16,
    /// Worker carve-out from the vesting bucket, bp.
    pub worker_from_vesting_fund_percent: u16,
    /// Worker carve-out from the witness bucket, bp.
    pub worker_from_witness_fund_percent: u16,
}
