// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! Protocol-level enums and small records shared by the content and worker
//! subsystems.

use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use sp_runtime::RuntimeDebug;
use sp_std::vec::Vec;

use crate::{MAX_COMMENT_BENEFICIARIES, PERCENT_100};

/// The curve applied to a comment's net rshares before pot division.
#[derive(PartialEq, Eq, Clone, Copy, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum CurationCurve {
    /// Resolve to the chain-wide default at cashout.
    Detect,
    /// `vshares = rshares`.
    Linear,
    /// `vshares = isqrt(rshares)`.
    SquareRoot,
    /// `vshares = (rshares + s)^2 - s^2`.
    Bounded,
}

impl Default for CurationCurve {
    fn default() -> Self {
        Self::Detect
    }
}

/// Where the withheld auction-window share of the curator fund goes.
#[derive(PartialEq, Eq, Clone, Copy, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum AuctionWindowDestination {
    /// Merge into the author fund.
    ToAuthor,
    /// Pay to the heaviest vote cast after the window.
    ToCurators,
    /// Return to the global reward fund.
    ToRewardFund,
}

impl Default for AuctionWindowDestination {
    fn default() -> Self {
        Self::ToAuthor
    }
}

/// How a delegator's interest share of a curation reward is paid out.
#[derive(PartialEq, Eq, Clone, Copy, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum DelegatorPayoutStrategy {
    /// Vest straight to the delegator.
    ToDelegator,
    /// Vest to the delegator and grow the delegation principal.
    ToDelegatedVesting,
}

/// A fraction of the author fund routed away from the author.
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Clone, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct BeneficiaryRoute<AccountId> {
    /// Recipient of the share.
    pub account: AccountId,
    /// Share of the author fund, in basis points.
    pub weight: u16,
}

/// Checks a beneficiary list: bounded, ordered by account, no duplicates,
/// weights positive and summing to at most 100%.
pub fn is_valid_beneficiary_set<AccountId: Ord>(routes: &[BeneficiaryRoute<AccountId>]) -> bool {
    if routes.len() > MAX_COMMENT_BENEFICIARIES {
        return false;
    }
    let mut total: u32 = 0;
    for (i, route) in routes.iter().enumerate() {
        if route.weight == 0 || route.weight > PERCENT_100 {
            return false;
        }
        if i > 0 && routes[i - 1].account >= route.account {
            return false;
        }
        total += u32::from(route.weight);
    }
    total <= u32::from(PERCENT_100)
}

/// The kind of work a proposal asks for.
#[derive(PartialEq, Eq, Clone, Copy, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum WorkerProposalType {
    /// Work yet to be done.
    Task,
    /// Already-completed work offered for funding.
    PremadeWork,
}

/// A witness's stance on a techspec or a worker result.
#[derive(PartialEq, Eq, Clone, Copy, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum ApproveState {
    /// Withdraw any previously recorded stance.
    Abstain,
    /// Count toward the approval tally.
    Approve,
    /// Count toward the disapproval tally.
    Disapprove,
}

/// A permlink as it travels through operations and storage.
pub type Permlink = Vec<u8>;

#[cfg(test)]
mod tests {
    use super::*;

    fn route(account: u64, weight: u16) -> BeneficiaryRoute<u64> {
        BeneficiaryRoute { account, weight }
    }

    #[test]
    fn beneficiary_set_rules() {
        assert!(is_valid_beneficiary_set::<u64>(&[]));
        assert!(is_valid_beneficiary_set(&[route(1, 5000), route(2, 5000)]));
        // unordered
        assert!(!is_valid_beneficiary_set(&[route(2, 100), route(1, 100)]));
        // duplicate account
        assert!(!is_valid_beneficiary_set(&[route(1, 100), route(1, 100)]));
        // over 100% in total
        assert!(!is_valid_beneficiary_set(&[route(1, 6000), route(2, 6000)]));
        // zero-weight route
        assert!(!is_valid_beneficiary_set(&[route(1, 0)]));
        // too many routes
        let many: Vec<_> = (0..9u64).map(|i| route(i, 100)).collect();
        assert!(!is_valid_beneficiary_set(&many));
    }
}
