// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! # Worker Module
//!
//! The worker-proposal subsystem: a funding proposal rooted on a post moves
//! through `created -> techspec -> work -> witnesses_review -> payment ->
//! closed`, driven by collective witness approvals. Funds flow out of the
//! worker fund into a per-proposal deposit and from there to the techspec
//! author.
//!
//! Approval tallies are never cached: every approval event recounts the
//! table against the current witness schedule, which keeps the thresholds
//! correct across schedule churn.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
mod mock;
mod types;

pub use types::*;

use frame_support::{ensure, traits::UnixTime};
use sp_runtime::{DispatchError, DispatchResult};
use sp_std::vec::Vec;

use ap_chain::{AssetCurrency, FundPool, Hardforks, PostInfo, TopWitnesses};
use ap_protocol::{
    hardfork, Amount, ApproveState, Asset, AssetSymbol, Permlink, WorkerProposalType,
    MAJOR_VOTED_WITNESSES, SUPER_MAJOR_VOTED_WITNESSES,
};

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

        /// Account balances for deposits and payouts.
        type Currency: AssetCurrency<Self::AccountId>;

        /// Lookup of stored comments; proposals, techspecs and results all
        /// root on posts.
        type Posts: PostInfo<Self::AccountId>;

        /// The current witness schedule; only scheduled witnesses count.
        type Witnesses: TopWitnesses<Self::AccountId>;

        /// The hardfork schedule.
        type Hardforks: Hardforks;
    }

    /// All proposals, by the founding post.
    #[pallet::storage]
    #[pallet::getter(fn worker_proposals)]
    pub type WorkerProposals<T: Config> = StorageDoubleMap<
        _,
        Twox64Concat,
        T::AccountId,
        Blake2_128Concat,
        Permlink,
        WorkerProposal<T::AccountId>,
        OptionQuery,
    >;

    /// All techspecs, by the post presenting them.
    #[pallet::storage]
    #[pallet::getter(fn worker_techspecs)]
    pub type WorkerTechspecs<T: Config> = StorageDoubleMap<
        _,
        Twox64Concat,
        T::AccountId,
        Blake2_128Concat,
        Permlink,
        WorkerTechspec<T::AccountId>,
        OptionQuery,
    >;

    /// The techspecs competing for each proposal.
    #[pallet::storage]
    #[pallet::getter(fn techspecs_of_proposal)]
    pub type TechspecsOfProposal<T: Config> = StorageDoubleMap<
        _,
        Twox64Concat,
        T::AccountId,
        Blake2_128Concat,
        Permlink,
        Vec<(T::AccountId, Permlink)>,
        ValueQuery,
    >;

    /// Result post -> the techspec it concludes. A post serves as the
    /// result of at most one techspec.
    #[pallet::storage]
    #[pallet::getter(fn worker_results)]
    pub type WorkerResults<T: Config> = StorageDoubleMap<
        _,
        Twox64Concat,
        T::AccountId,
        Blake2_128Concat,
        Permlink,
        Permlink,
        OptionQuery,
    >;

    /// Witness stances on techspecs, keyed `(author, permlink, approver)`.
    #[pallet::storage]
    pub type TechspecApprovals<T: Config> = StorageNMap<
        _,
        (
            NMapKey<Twox64Concat, T::AccountId>,
            NMapKey<Blake2_128Concat, Permlink>,
            NMapKey<Twox64Concat, T::AccountId>,
        ),
        ApproveState,
        OptionQuery,
    >;

    /// Witness stances on results, keyed `(author, result_permlink,
    /// approver)`.
    #[pallet::storage]
    pub type ResultApprovals<T: Config> = StorageNMap<
        _,
        (
            NMapKey<Twox64Concat, T::AccountId>,
            NMapKey<Blake2_128Concat, Permlink>,
            NMapKey<Twox64Concat, T::AccountId>,
        ),
        ApproveState,
        OptionQuery,
    >;

    /// The chain-wide fund worker deposits draw from.
    #[pallet::storage]
    #[pallet::getter(fn total_worker_fund)]
    pub type TotalWorkerFund<T: Config> = StorageValue<_, Amount, ValueQuery>;

    /// Proposals in `Payment` waiting for their next installment, sorted by
    /// due time.
    #[pallet::storage]
    #[pallet::getter(fn payment_schedule)]
    pub type PaymentSchedule<T: Config> =
        StorageValue<_, Vec<(u64, T::AccountId, Permlink)>, ValueQuery>;

    #[pallet::genesis_config]
    pub struct GenesisConfig<T: Config> {
        /// Core coin seeding the worker fund.
        pub worker_fund: Amount,
        #[serde(skip)]
        pub _phantom: sp_std::marker::PhantomData<T>,
    }

    impl<T: Config> Default for GenesisConfig<T> {
        fn default() -> Self {
            Self { worker_fund: 0, _phantom: Default::default() }
        }
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            TotalWorkerFund::<T>::put(self.worker_fund);
        }
    }

    #[pallet::event]
    #[pallet::generate_deposit(pub(crate) fn deposit_event)]
    pub enum Event<T: Config> {
        /// (author, permlink)
        ProposalCreated(T::AccountId, Permlink),
        /// (author, permlink)
        ProposalDeleted(T::AccountId, Permlink),
        /// (funder, author, permlink, amount)
        ProposalFunded(T::AccountId, T::AccountId, Permlink, Asset),
        /// (author, permlink, proposal_author, proposal_permlink)
        TechspecCreated(T::AccountId, Permlink, T::AccountId, Permlink),
        /// (author, permlink)
        TechspecDeleted(T::AccountId, Permlink),
        /// (approver, author, permlink, state)
        TechspecApproved(T::AccountId, T::AccountId, Permlink, ApproveState),
        /// A techspec won the witness vote and work begins.
        /// (proposal_author, proposal_permlink, techspec_author,
        /// techspec_permlink)
        TechspecChosen(T::AccountId, Permlink, T::AccountId, Permlink),
        /// (author, result_permlink, techspec_permlink)
        ResultFilled(T::AccountId, Permlink, Permlink),
        /// (author, result_permlink)
        ResultCleared(T::AccountId, Permlink),
        /// (approver, author, result_permlink, state)
        ResultApproved(T::AccountId, T::AccountId, Permlink, ApproveState),
        /// The specification reward paid on result acceptance.
        /// (author, techspec_permlink, amount)
        TechspecReward(T::AccountId, Permlink, Asset),
        /// One development installment. (worker, proposal_author,
        /// proposal_permlink, amount)
        WorkerReward(T::AccountId, T::AccountId, Permlink, Asset),
        /// (proposal_author, proposal_permlink)
        ProposalClosed(T::AccountId, Permlink),
    }

    #[pallet::error]
    pub enum Error<T> {
        /// The worker subsystem is not active yet.
        HardforkRequired,
        /// The referenced post does not exist.
        PostNotFound,
        /// No proposal under the referenced post.
        ProposalNotFound,
        /// No techspec under the referenced post.
        TechspecNotFound,
        /// No worker result under the referenced post.
        ResultNotFound,
        /// Worker proposals root on posts, not replies.
        WorkerProposalCanBeCreatedOnlyOnPost,
        /// Worker techspecs root on posts, not replies.
        WorkerTechspecCanBeCreatedOnlyOnPost,
        /// Worker results root on posts, not replies.
        WorkerResultCanBeCreatedOnlyOnPost,
        /// The proposal already moved past deletion.
        CannotDeleteWorkerProposalWithApprovedTechspec,
        /// Techspecs reference this proposal.
        CannotDeleteWorkerProposalWithTechspecs,
        /// Funding is only open before a techspec is approved.
        CannotFundWorkerProposalWithApprovedTechspec,
        /// Funding is one-shot.
        ProposalIsAlreadyFunded,
        /// Techspecs attach to existing proposals only.
        WorkerTechspecCanBeCreatedOnlyForExistingProposal,
        /// The proposal already chose its techspec.
        ThisWorkerProposalAlreadyHasApprovedTechspec,
        /// Cost symbols are frozen across techspec edits.
        CannotChangeCostSymbol,
        /// A techspec cannot move between proposals.
        CannotChangeWorkerProposal,
        /// The proposal is paying out already.
        CannotDeleteWorkerTechspecForPayingProposal,
        /// The proposal is paying out already.
        CannotDeleteWorkerResultForPayingProposal,
        /// Techspec approvals come from scheduled witnesses only.
        ApproverOfTechspecShouldBeInTopWitnesses,
        /// Result approvals come from scheduled witnesses only.
        ApproverOfResultShouldBeInTopWitnesses,
        /// The winning techspec is already fixed.
        TechspecIsAlreadyApproved,
        /// The worker fund cannot cover the deposit top-up.
        InsufficientFundsInWorkerFund,
        /// Completion dates do not lie in the future.
        WorkCompletionDateCannotBeInFuture,
        /// A post concludes at most one techspec.
        ThisPostAlreadyUsedAsWorkerResult,
        /// Results attach to the approved techspec of a proposal in work.
        WorkerResultCanBeCreatedOnlyForTechspecInWork,
        /// Disapproval is only meaningful while the work is open.
        WorkerProposalShouldBeInWorkOrReviewStateToDisapprove,
        /// Approval is only meaningful during the review.
        WorkerProposalShouldBeInReviewStateToApprove,
        /// Costs and deposits are positive core-coin amounts.
        InvalidCostAsset,
        /// The payment plan needs at least one installment.
        InvalidPaymentsPlan,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn on_finalize(_n: BlockNumberFor<T>) {
            Self::process_worker_payments(Self::head_block_time());
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Opens a worker proposal on one of the author's root posts, or
        /// changes the type of an existing one.
        #[pallet::call_index(0)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn create_proposal(
            origin: OriginFor<T>,
            permlink: Permlink,
            proposal_type: WorkerProposalType,
        ) -> DispatchResult {
            let author = ensure_signed(origin)?;
            Self::ensure_worker_hardfork()?;
            Self::ensure_root_post(&author, &permlink, Error::<T>::WorkerProposalCanBeCreatedOnlyOnPost)?;

            let now = Self::head_block_time();

            if WorkerProposals::<T>::contains_key(&author, &permlink) {
                WorkerProposals::<T>::mutate(&author, &permlink, |maybe| {
                    if let Some(proposal) = maybe {
                        proposal.proposal_type = proposal_type;
                        proposal.modified = now;
                    }
                });
                return Ok(());
            }

            WorkerProposals::<T>::insert(
                &author,
                &permlink,
                WorkerProposal {
                    proposal_type,
                    state: WorkerProposalState::Created,
                    deposit: Asset::steem(0),
                    approved_techspec: None,
                    created: now,
                    modified: 0,
                    next_cashout_time: 0,
                    payment_beginning_time: 0,
                },
            );

            Self::deposit_event(Event::ProposalCreated(author, permlink));
            Ok(())
        }

        /// Deletes a proposal nothing references yet.
        #[pallet::call_index(1)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn delete_proposal(origin: OriginFor<T>, permlink: Permlink) -> DispatchResult {
            let author = ensure_signed(origin)?;
            Self::ensure_worker_hardfork()?;

            let proposal = Self::try_proposal(&author, &permlink)?;
            ensure!(
                proposal.state == WorkerProposalState::Created,
                Error::<T>::CannotDeleteWorkerProposalWithApprovedTechspec
            );
            ensure!(
                TechspecsOfProposal::<T>::get(&author, &permlink).is_empty(),
                Error::<T>::CannotDeleteWorkerProposalWithTechspecs
            );

            // The deposit of an unstarted proposal flows back to the fund.
            TotalWorkerFund::<T>::mutate(|fund| *fund += proposal.deposit.amount);
            WorkerProposals::<T>::remove(&author, &permlink);

            Self::deposit_event(Event::ProposalDeleted(author, permlink));
            Ok(())
        }

        /// Seeds a proposal's deposit from the funder's balance. One-shot:
        /// topping an already funded proposal up is rejected.
        #[pallet::call_index(2)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn fund_proposal(
            origin: OriginFor<T>,
            author: T::AccountId,
            permlink: Permlink,
            amount: Asset,
        ) -> DispatchResult {
            let funder = ensure_signed(origin)?;
            Self::ensure_worker_hardfork()?;
            ensure!(
                amount.symbol == AssetSymbol::Steem && amount.amount > 0,
                Error::<T>::InvalidCostAsset
            );

            let proposal = Self::try_proposal(&author, &permlink)?;
            ensure!(
                proposal.state == WorkerProposalState::Created,
                Error::<T>::CannotFundWorkerProposalWithApprovedTechspec
            );
            // TODO: allow to add funds
            ensure!(proposal.deposit.amount == 0, Error::<T>::ProposalIsAlreadyFunded);

            T::Currency::sub_balance(&funder, amount)?;
            WorkerProposals::<T>::mutate(&author, &permlink, |maybe| {
                if let Some(proposal) = maybe {
                    proposal.deposit = amount;
                }
            });

            Self::deposit_event(Event::ProposalFunded(funder, author, permlink, amount));
            Ok(())
        }

        /// Submits or edits a techspec for an open proposal.
        #[pallet::call_index(3)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        #[allow(clippy::too_many_arguments)]
        pub fn create_techspec(
            origin: OriginFor<T>,
            permlink: Permlink,
            worker_proposal_author: T::AccountId,
            worker_proposal_permlink: Permlink,
            specification_cost: Asset,
            specification_eta: u32,
            development_cost: Asset,
            development_eta: u32,
            payments_count: u16,
            payments_interval: u32,
        ) -> DispatchResult {
            let author = ensure_signed(origin)?;
            Self::ensure_worker_hardfork()?;
            Self::ensure_root_post(&author, &permlink, Error::<T>::WorkerTechspecCanBeCreatedOnlyOnPost)?;
            ensure!(
                specification_cost.symbol == AssetSymbol::Steem
                    && specification_cost.amount >= 0
                    && development_cost.symbol == AssetSymbol::Steem
                    && development_cost.amount >= 0,
                Error::<T>::InvalidCostAsset
            );
            ensure!(
                payments_count > 0 && payments_interval > 0,
                Error::<T>::InvalidPaymentsPlan
            );

            let proposal = WorkerProposals::<T>::get(&worker_proposal_author, &worker_proposal_permlink)
                .ok_or(Error::<T>::WorkerTechspecCanBeCreatedOnlyForExistingProposal)?;
            ensure!(
                proposal.state == WorkerProposalState::Created,
                Error::<T>::ThisWorkerProposalAlreadyHasApprovedTechspec
            );

            let now = Self::head_block_time();

            if let Some(existing) = WorkerTechspecs::<T>::get(&author, &permlink) {
                ensure!(
                    existing.specification_cost.symbol == specification_cost.symbol
                        && existing.development_cost.symbol == development_cost.symbol,
                    Error::<T>::CannotChangeCostSymbol
                );
                ensure!(
                    existing.worker_proposal_author == worker_proposal_author
                        && existing.worker_proposal_permlink == worker_proposal_permlink,
                    Error::<T>::CannotChangeWorkerProposal
                );

                WorkerTechspecs::<T>::mutate(&author, &permlink, |maybe| {
                    if let Some(techspec) = maybe {
                        techspec.modified = now;
                        techspec.specification_cost = specification_cost;
                        techspec.specification_eta = specification_eta;
                        techspec.development_cost = development_cost;
                        techspec.development_eta = development_eta;
                        techspec.payments_count = payments_count;
                        techspec.payments_interval = payments_interval;
                    }
                });
                return Ok(());
            }

            WorkerTechspecs::<T>::insert(
                &author,
                &permlink,
                WorkerTechspec {
                    worker_proposal_author: worker_proposal_author.clone(),
                    worker_proposal_permlink: worker_proposal_permlink.clone(),
                    created: now,
                    modified: 0,
                    specification_cost,
                    specification_eta,
                    development_cost,
                    development_eta,
                    payments_count,
                    payments_interval,
                    payments_completed: 0,
                    worker_result_permlink: None,
                    completion_date: 0,
                },
            );
            TechspecsOfProposal::<T>::mutate(&worker_proposal_author, &worker_proposal_permlink, |list| {
                list.push((author.clone(), permlink.clone()))
            });

            Self::deposit_event(Event::TechspecCreated(
                author,
                permlink,
                worker_proposal_author,
                worker_proposal_permlink,
            ));
            Ok(())
        }

        /// Withdraws a techspec. If it was the approved one, the proposal
        /// falls back to `Created`.
        #[pallet::call_index(4)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn delete_techspec(origin: OriginFor<T>, permlink: Permlink) -> DispatchResult {
            let author = ensure_signed(origin)?;
            Self::ensure_worker_hardfork()?;

            let techspec = Self::try_techspec(&author, &permlink)?;
            let proposal = Self::try_proposal(
                &techspec.worker_proposal_author,
                &techspec.worker_proposal_permlink,
            )?;
            ensure!(
                proposal.state < WorkerProposalState::Payment,
                Error::<T>::CannotDeleteWorkerTechspecForPayingProposal
            );

            if proposal.approved_techspec.as_ref() == Some(&(author.clone(), permlink.clone())) {
                WorkerProposals::<T>::mutate(
                    &techspec.worker_proposal_author,
                    &techspec.worker_proposal_permlink,
                    |maybe| {
                        if let Some(proposal) = maybe {
                            proposal.state = WorkerProposalState::Created;
                            proposal.approved_techspec = None;
                        }
                    },
                );
            }

            if let Some(result_permlink) = techspec.worker_result_permlink.as_ref() {
                WorkerResults::<T>::remove(&author, result_permlink);
            }
            WorkerTechspecs::<T>::remove(&author, &permlink);
            TechspecsOfProposal::<T>::mutate(
                &techspec.worker_proposal_author,
                &techspec.worker_proposal_permlink,
                |list| list.retain(|(a, p)| !(*a == author && *p == permlink)),
            );
            let _ = TechspecApprovals::<T>::clear_prefix(
                (author.clone(), permlink.clone()),
                u32::MAX,
                None,
            );

            Self::deposit_event(Event::TechspecDeleted(author, permlink));
            Ok(())
        }

        /// Records a witness stance on a techspec; crossing the majority
        /// locks the techspec in and starts the work.
        #[pallet::call_index(5)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn approve_techspec(
            origin: OriginFor<T>,
            author: T::AccountId,
            permlink: Permlink,
            state: ApproveState,
        ) -> DispatchResult {
            let approver = ensure_signed(origin)?;
            Self::ensure_worker_hardfork()?;
            ensure!(
                T::Witnesses::is_scheduled(&approver),
                Error::<T>::ApproverOfTechspecShouldBeInTopWitnesses
            );

            let techspec = Self::try_techspec(&author, &permlink)?;
            let proposal = Self::try_proposal(
                &techspec.worker_proposal_author,
                &techspec.worker_proposal_permlink,
            )?;
            ensure!(
                proposal.approved_techspec.is_none(),
                Error::<T>::TechspecIsAlreadyApproved
            );

            if state == ApproveState::Abstain {
                TechspecApprovals::<T>::remove((author.clone(), permlink.clone(), approver.clone()));
                Self::deposit_event(Event::TechspecApproved(approver, author, permlink, state));
                return Ok(());
            }

            TechspecApprovals::<T>::insert(
                (author.clone(), permlink.clone(), approver.clone()),
                state,
            );
            Self::deposit_event(Event::TechspecApproved(
                approver,
                author.clone(),
                permlink.clone(),
                state,
            ));

            if state != ApproveState::Approve {
                return Ok(());
            }

            // Recounted from scratch on every event so witness schedule
            // churn cannot leave a stale tally behind.
            let approvers = Self::count_techspec_approvals(&author, &permlink, ApproveState::Approve);
            if approvers < MAJOR_VOTED_WITNESSES {
                return Ok(());
            }

            Self::choose_techspec(&techspec, &author, &permlink)
        }

        /// Publishes the finished work: one of the techspec author's root
        /// posts becomes the result, and the proposal enters review.
        #[pallet::call_index(6)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn fill_result(
            origin: OriginFor<T>,
            permlink: Permlink,
            worker_techspec_permlink: Permlink,
            completion_date: Option<u64>,
        ) -> DispatchResult {
            let author = ensure_signed(origin)?;
            Self::ensure_worker_hardfork()?;

            let now = Self::head_block_time();
            if let Some(date) = completion_date {
                ensure!(date <= now, Error::<T>::WorkCompletionDateCannotBeInFuture);
            }
            Self::ensure_root_post(&author, &permlink, Error::<T>::WorkerResultCanBeCreatedOnlyOnPost)?;

            let techspec = Self::try_techspec(&author, &worker_techspec_permlink)?;
            ensure!(
                WorkerResults::<T>::get(&author, &permlink).is_none(),
                Error::<T>::ThisPostAlreadyUsedAsWorkerResult
            );

            let proposal = Self::try_proposal(
                &techspec.worker_proposal_author,
                &techspec.worker_proposal_permlink,
            )?;
            let in_work = proposal.state == WorkerProposalState::Work
                || proposal.state == WorkerProposalState::WitnessesReview;
            ensure!(
                proposal.approved_techspec
                    == Some((author.clone(), worker_techspec_permlink.clone()))
                    && in_work,
                Error::<T>::WorkerResultCanBeCreatedOnlyForTechspecInWork
            );

            // Re-filling during review replaces the pending result.
            if let Some(previous) = techspec.worker_result_permlink.as_ref() {
                WorkerResults::<T>::remove(&author, previous);
            }

            WorkerTechspecs::<T>::mutate(&author, &worker_techspec_permlink, |maybe| {
                if let Some(techspec) = maybe {
                    techspec.worker_result_permlink = Some(permlink.clone());
                    techspec.completion_date = completion_date.unwrap_or(now);
                }
            });
            WorkerResults::<T>::insert(&author, &permlink, worker_techspec_permlink.clone());
            WorkerProposals::<T>::mutate(
                &techspec.worker_proposal_author,
                &techspec.worker_proposal_permlink,
                |maybe| {
                    if let Some(proposal) = maybe {
                        proposal.state = WorkerProposalState::WitnessesReview;
                    }
                },
            );

            Self::deposit_event(Event::ResultFilled(author, permlink, worker_techspec_permlink));
            Ok(())
        }

        /// Retracts a pending result; the proposal falls back to `Work`.
        #[pallet::call_index(7)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn clear_result(origin: OriginFor<T>, permlink: Permlink) -> DispatchResult {
            let author = ensure_signed(origin)?;
            Self::ensure_worker_hardfork()?;

            let techspec_permlink = WorkerResults::<T>::get(&author, &permlink)
                .ok_or(Error::<T>::ResultNotFound)?;
            let techspec = Self::try_techspec(&author, &techspec_permlink)?;
            let proposal = Self::try_proposal(
                &techspec.worker_proposal_author,
                &techspec.worker_proposal_permlink,
            )?;
            ensure!(
                proposal.state < WorkerProposalState::Payment,
                Error::<T>::CannotDeleteWorkerResultForPayingProposal
            );

            WorkerProposals::<T>::mutate(
                &techspec.worker_proposal_author,
                &techspec.worker_proposal_permlink,
                |maybe| {
                    if let Some(proposal) = maybe {
                        proposal.state = WorkerProposalState::Work;
                    }
                },
            );
            WorkerTechspecs::<T>::mutate(&author, &techspec_permlink, |maybe| {
                if let Some(techspec) = maybe {
                    techspec.worker_result_permlink = None;
                    techspec.completion_date = 0;
                }
            });
            WorkerResults::<T>::remove(&author, &permlink);

            Self::deposit_event(Event::ResultCleared(author, permlink));
            Ok(())
        }

        /// Records a witness verdict on a result. A super-majority of
        /// approvals starts the payments; a super-majority of
        /// disapprovals closes the proposal.
        #[pallet::call_index(8)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn approve_result(
            origin: OriginFor<T>,
            author: T::AccountId,
            permlink: Permlink,
            state: ApproveState,
        ) -> DispatchResult {
            let approver = ensure_signed(origin)?;
            Self::ensure_worker_hardfork()?;
            ensure!(
                T::Witnesses::is_scheduled(&approver),
                Error::<T>::ApproverOfResultShouldBeInTopWitnesses
            );

            let techspec_permlink = WorkerResults::<T>::get(&author, &permlink)
                .ok_or(Error::<T>::ResultNotFound)?;
            let techspec = Self::try_techspec(&author, &techspec_permlink)?;
            let proposal = Self::try_proposal(
                &techspec.worker_proposal_author,
                &techspec.worker_proposal_permlink,
            )?;

            match state {
                ApproveState::Disapprove => ensure!(
                    proposal.state == WorkerProposalState::Work
                        || proposal.state == WorkerProposalState::WitnessesReview,
                    Error::<T>::WorkerProposalShouldBeInWorkOrReviewStateToDisapprove
                ),
                ApproveState::Approve => ensure!(
                    proposal.state == WorkerProposalState::WitnessesReview,
                    Error::<T>::WorkerProposalShouldBeInReviewStateToApprove
                ),
                ApproveState::Abstain => {
                    ResultApprovals::<T>::remove((
                        author.clone(),
                        permlink.clone(),
                        approver.clone(),
                    ));
                    Self::deposit_event(Event::ResultApproved(approver, author, permlink, state));
                    return Ok(());
                }
            }

            ResultApprovals::<T>::insert(
                (author.clone(), permlink.clone(), approver.clone()),
                state,
            );
            Self::deposit_event(Event::ResultApproved(
                approver,
                author.clone(),
                permlink.clone(),
                state,
            ));

            let tally = Self::count_result_approvals(&author, &permlink, state);

            if state == ApproveState::Disapprove && tally >= SUPER_MAJOR_VOTED_WITNESSES {
                WorkerProposals::<T>::mutate(
                    &techspec.worker_proposal_author,
                    &techspec.worker_proposal_permlink,
                    |maybe| {
                        if let Some(proposal) = maybe {
                            proposal.state = WorkerProposalState::Closed;
                        }
                    },
                );
                Self::deposit_event(Event::ProposalClosed(
                    techspec.worker_proposal_author.clone(),
                    techspec.worker_proposal_permlink.clone(),
                ));
            } else if state == ApproveState::Approve && tally >= SUPER_MAJOR_VOTED_WITNESSES {
                Self::accept_result(&techspec, &author, &techspec_permlink)?;
            }

            Ok(())
        }
    }
}

impl<T: Config> Pallet<T> {
    /// The consensus clock, in seconds since the epoch.
    pub fn head_block_time() -> u64 {
        T::UnixTime::now().as_secs()
    }

    fn ensure_worker_hardfork() -> DispatchResult {
        ensure!(
            T::Hardforks::is_active(hardfork::WORKER_PROPOSALS),
            Error::<T>::HardforkRequired
        );
        Ok(())
    }

    fn ensure_root_post(
        author: &T::AccountId,
        permlink: &Permlink,
        or_else: Error<T>,
    ) -> DispatchResult {
        match T::Posts::is_root_post(author, permlink) {
            None => Err(Error::<T>::PostNotFound.into()),
            Some(false) => Err(or_else.into()),
            Some(true) => Ok(()),
        }
    }

    fn try_proposal(
        author: &T::AccountId,
        permlink: &Permlink,
    ) -> Result<WorkerProposal<T::AccountId>, DispatchError> {
        WorkerProposals::<T>::get(author, permlink)
            .ok_or_else(|| Error::<T>::ProposalNotFound.into())
    }

    fn try_techspec(
        author: &T::AccountId,
        permlink: &Permlink,
    ) -> Result<WorkerTechspec<T::AccountId>, DispatchError> {
        WorkerTechspecs::<T>::get(author, permlink)
            .ok_or_else(|| Error::<T>::TechspecNotFound.into())
    }

    fn count_techspec_approvals(
        author: &T::AccountId,
        permlink: &Permlink,
        wanted: ApproveState,
    ) -> u32 {
        TechspecApprovals::<T>::iter_prefix((author.clone(), permlink.clone()))
            .filter(|(approver, state)| *state == wanted && T::Witnesses::is_scheduled(approver))
            .count() as u32
    }

    fn count_result_approvals(
        author: &T::AccountId,
        permlink: &Permlink,
        wanted: ApproveState,
    ) -> u32 {
        ResultApprovals::<T>::iter_prefix((author.clone(), permlink.clone()))
            .filter(|(approver, state)| *state == wanted && T::Witnesses::is_scheduled(approver))
            .count() as u32
    }

    /// Locks the winning techspec in, tops the deposit up to the full
    /// budget from the worker fund and starts the work.
    fn choose_techspec(
        techspec: &WorkerTechspec<T::AccountId>,
        author: &T::AccountId,
        permlink: &Permlink,
    ) -> DispatchResult {
        let budget = techspec.development_cost.amount + techspec.specification_cost.amount;
        let proposal = Self::try_proposal(
            &techspec.worker_proposal_author,
            &techspec.worker_proposal_permlink,
        )?;
        let append = budget - proposal.deposit.amount;

        if append > 0 {
            TotalWorkerFund::<T>::try_mutate(|fund| -> DispatchResult {
                ensure!(*fund >= append, Error::<T>::InsufficientFundsInWorkerFund);
                *fund -= append;
                Ok(())
            })?;
        }

        WorkerProposals::<T>::mutate(
            &techspec.worker_proposal_author,
            &techspec.worker_proposal_permlink,
            |maybe| {
                if let Some(proposal) = maybe {
                    proposal.approved_techspec = Some((author.clone(), permlink.clone()));
                    proposal.state = WorkerProposalState::Work;
                    if append > 0 {
                        proposal.deposit.amount += append;
                    }
                }
            },
        );

        log::debug!(
            target: "runtime::worker",
            "[choose_techspec] proposal:{:?} techspec:{:?} deposit_top_up:{}",
            techspec.worker_proposal_permlink, permlink, append.max(0)
        );

        Self::deposit_event(Event::TechspecChosen(
            techspec.worker_proposal_author.clone(),
            techspec.worker_proposal_permlink.clone(),
            author.clone(),
            permlink.clone(),
        ));
        Ok(())
    }

    /// The super-majority accepted the result: pay the specification cost
    /// and schedule the development installments.
    fn accept_result(
        techspec: &WorkerTechspec<T::AccountId>,
        author: &T::AccountId,
        techspec_permlink: &Permlink,
    ) -> DispatchResult {
        let now = Self::head_block_time();
        let next_cashout = now + u64::from(techspec.payments_interval);

        WorkerProposals::<T>::mutate(
            &techspec.worker_proposal_author,
            &techspec.worker_proposal_permlink,
            |maybe| {
                if let Some(proposal) = maybe {
                    proposal.state = WorkerProposalState::Payment;
                    proposal.deposit.amount -= techspec.specification_cost.amount;
                    proposal.next_cashout_time = next_cashout;
                    proposal.payment_beginning_time = next_cashout;
                }
            },
        );

        T::Currency::add_balance(author, techspec.specification_cost)?;
        Self::deposit_event(Event::TechspecReward(
            author.clone(),
            techspec_permlink.clone(),
            techspec.specification_cost,
        ));

        Self::schedule_payment(
            next_cashout,
            techspec.worker_proposal_author.clone(),
            techspec.worker_proposal_permlink.clone(),
        );
        Ok(())
    }

    fn schedule_payment(time: u64, author: T::AccountId, permlink: Permlink) {
        PaymentSchedule::<T>::mutate(|schedule| {
            let at = schedule
                .partition_point(|(due, _, _)| *due <= time);
            schedule.insert(at, (time, author, permlink));
        });
    }

    /// Pays every due development installment; the last one closes the
    /// proposal and returns any residual deposit to the fund.
    pub(crate) fn process_worker_payments(now: u64) {
        loop {
            let due = PaymentSchedule::<T>::mutate(|schedule| {
                if schedule.first().map_or(false, |(time, _, _)| *time <= now) {
                    Some(schedule.remove(0))
                } else {
                    None
                }
            });
            let Some((_, author, permlink)) = due else { break };

            let Some(proposal) = WorkerProposals::<T>::get(&author, &permlink) else {
                continue;
            };
            if proposal.state != WorkerProposalState::Payment {
                continue;
            }
            let Some((techspec_author, techspec_permlink)) = proposal.approved_techspec.clone()
            else {
                continue;
            };
            let Some(techspec) = WorkerTechspecs::<T>::get(&techspec_author, &techspec_permlink)
            else {
                continue;
            };

            let base = techspec.development_cost.amount / i64::from(techspec.payments_count);
            let is_last = techspec.payments_completed + 1 >= techspec.payments_count;
            let mut amount = if is_last {
                techspec.development_cost.amount
                    - base * i64::from(techspec.payments_count - 1)
            } else {
                base
            };
            amount = amount.min(proposal.deposit.amount).max(0);

            let _ = T::Currency::add_balance(&techspec_author, Asset::steem(amount));
            WorkerTechspecs::<T>::mutate(&techspec_author, &techspec_permlink, |maybe| {
                if let Some(techspec) = maybe {
                    techspec.payments_completed += 1;
                }
            });

            Self::deposit_event(Event::WorkerReward(
                techspec_author.clone(),
                author.clone(),
                permlink.clone(),
                Asset::steem(amount),
            ));

            WorkerProposals::<T>::mutate(&author, &permlink, |maybe| {
                if let Some(proposal) = maybe {
                    proposal.deposit.amount -= amount;
                    if is_last {
                        proposal.state = WorkerProposalState::Closed;
                        TotalWorkerFund::<T>::mutate(|fund| *fund += proposal.deposit.amount);
                        proposal.deposit.amount = 0;
                    } else {
                        proposal.next_cashout_time = now + u64::from(techspec.payments_interval);
                    }
                }
            });

            if is_last {
                Self::deposit_event(Event::ProposalClosed(author.clone(), permlink.clone()));
            } else {
                Self::schedule_payment(
                    now + u64::from(techspec.payments_interval),
                    author,
                    permlink,
                );
            }
        }
    }
}

impl<T: Config> FundPool for Pallet<T> {
    fn balance() -> Asset {
        Asset::steem(TotalWorkerFund::<T>::get())
    }

    fn deposit(value: Asset) {
        if value.symbol == AssetSymbol::Steem && value.amount > 0 {
            TotalWorkerFund::<T>::mutate(|fund| *fund += value.amount);
        }
    }

    fn withdraw(value: Asset) -> DispatchResult {
        TotalWorkerFund::<T>::try_mutate(|fund| {
            ensure!(
                value.symbol == AssetSymbol::Steem && *fund >= value.amount,
                Error::<T>::InsufficientFundsInWorkerFund
            );
            *fund -= value.amount;
            Ok(())
        })
    }
}
