// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

use codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use sp_runtime::RuntimeDebug;

use ap_protocol::{Asset, Permlink, WorkerProposalType};

/// The stages a worker proposal moves through.
///
/// The ordering is part of consensus: several preconditions are phrased as
/// `state < Payment`.
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Encode, Decode, RuntimeDebug, TypeInfo,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum WorkerProposalState {
    /// Open for techspecs and funding.
    Created,
    /// A techspec won the witness vote.
    Techspec,
    /// The work is underway.
    Work,
    /// A result was posted and awaits the witness verdict.
    WitnessesReview,
    /// Approved; development-cost installments are being paid.
    Payment,
    /// Finished or rejected.
    Closed,
}

/// A funding proposal rooted on a post.
#[derive(PartialEq, Eq, Clone, Encode, Decode, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct WorkerProposal<AccountId> {
    pub proposal_type: WorkerProposalType,
    pub state: WorkerProposalState,
    /// Funds set aside for this proposal.
    pub deposit: Asset,
    /// The techspec the witnesses chose, once one won the vote.
    pub approved_techspec: Option<(AccountId, Permlink)>,
    pub created: u64,
    pub modified: u64,
    /// When the next development installment is due, in `Payment`.
    pub next_cashout_time: u64,
    /// When the first installment was scheduled.
    pub payment_beginning_time: u64,
}

/// A technical specification competing to implement a proposal.
#[derive(PartialEq, Eq, Clone, Encode, Decode, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct WorkerTechspec<AccountId> {
    pub worker_proposal_author: AccountId,
    pub worker_proposal_permlink: Permlink,
    pub created: u64,
    pub modified: u64,

    /// Paid to the techspec author when the result is accepted.
    pub specification_cost: Asset,
    /// Seconds the specification work is expected to take.
    pub specification_eta: u32,
    /// Paid out in installments once the proposal enters `Payment`.
    pub development_cost: Asset,
    /// Seconds the development work is expected to take.
    pub development_eta: u32,

    /// How many installments the development cost splits into.
    pub payments_count: u16,
    /// Seconds between installments.
    pub payments_interval: u32,
    /// Installments paid so far.
    pub payments_completed: u16,

    /// The root post presenting the finished work.
    pub worker_result_permlink: Option<Permlink>,
    /// When the work was declared complete; zero while unset.
    pub completion_date: u64,
}
