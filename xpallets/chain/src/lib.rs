// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! # Chain Module
//!
//! The account-and-funds substrate of the content and worker subsystems:
//! balances in the three consensus assets, the vesting pool, vesting
//! delegations, the witness schedule, the median feed price, the hardfork
//! schedule and the per-block emission that feeds every reward fund.

#![cfg_attr(not(feature = "std"), no_std)]

mod emission;
#[cfg(test)]
mod mock;
mod types;

pub use types::*;

use frame_support::{ensure, traits::UnixTime};
use sp_runtime::{DispatchError, DispatchResult};
use sp_std::vec::Vec;

use ap_chain::{
    AssetCurrency, BlockAuthor, FeedPrice, FundPool, Hardforks, ReputationOf, TopWitnesses,
    Vesting, VestingDelegations,
};
use ap_protocol::{
    hardfork, Amount, Asset, AssetSymbol, DelegatorPayoutStrategy, Price,
    MAX_CURATION_PERCENT, MAX_DELEGATED_VESTING_INTEREST_RATE, MIN_CURATION_PERCENT,
    REVERSE_AUCTION_WINDOW_SECONDS, WORKER_FROM_CONTENT_FUND_PERCENT,
    WORKER_FROM_VESTING_FUND_PERCENT, WORKER_FROM_WITNESS_FUND_PERCENT,
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

        /// Where the content share of each block's emission goes.
        type ContentFund: FundPool;

        /// Where the worker carve-outs of each block's emission go.
        type WorkerFund: FundPool;

        /// The witness that authored the current block, if the host tracks
        /// one; with `None` the witness share stays in the vesting pool.
        type BlockAuthor: BlockAuthor<Self::AccountId>;
    }

    /// Balances of every account.
    #[pallet::storage]
    #[pallet::getter(fn accounts)]
    pub type Accounts<T: Config> =
        StorageMap<_, Twox64Concat, T::AccountId, AccountAssets, ValueQuery>;

    /// Total vested shares outstanding.
    #[pallet::storage]
    #[pallet::getter(fn total_vesting_shares)]
    pub type TotalVestingShares<T: Config> = StorageValue<_, Amount, ValueQuery>;

    /// Core coin backing the vesting pool.
    #[pallet::storage]
    #[pallet::getter(fn total_vesting_fund)]
    pub type TotalVestingFund<T: Config> = StorageValue<_, Amount, ValueQuery>;

    /// Supply counter the emission schedule runs on.
    #[pallet::storage]
    #[pallet::getter(fn virtual_supply)]
    pub type VirtualSupply<T: Config> = StorageValue<_, Amount, ValueQuery>;

    /// The current median of the published STEEM/SBD feed.
    #[pallet::storage]
    #[pallet::getter(fn median_feed_price)]
    pub type MedianFeedPrice<T: Config> = StorageValue<_, Price, OptionQuery>;

    /// The top-N witness schedule, as elected for the current round.
    #[pallet::storage]
    #[pallet::getter(fn witness_schedule)]
    pub type WitnessSchedule<T: Config> = StorageValue<_, Vec<T::AccountId>, ValueQuery>;

    /// The newest activated hardfork.
    #[pallet::storage]
    #[pallet::getter(fn activated_hardfork)]
    pub type ActivatedHardfork<T: Config> = StorageValue<_, u16, ValueQuery>;

    /// Reputation scores maintained by the social-graph module.
    #[pallet::storage]
    #[pallet::getter(fn reputations)]
    pub type Reputations<T: Config> = StorageMap<_, Twox64Concat, T::AccountId, i64, ValueQuery>;

    /// Active vesting delegations, keyed by `(delegatee, delegator)` so the
    /// vote path can scan everything delegated to one account.
    #[pallet::storage]
    #[pallet::getter(fn delegations)]
    pub type Delegations<T: Config> = StorageDoubleMap<
        _,
        Twox64Concat,
        T::AccountId,
        Twox64Concat,
        T::AccountId,
        VestingDelegation,
        OptionQuery,
    >;

    #[pallet::genesis_config]
    pub struct GenesisConfig<T: Config> {
        /// `(account, steem, sbd, vests)` opening balances.
        pub balances: Vec<(T::AccountId, Amount, Amount, Amount)>,
        /// The initial witness schedule.
        pub witnesses: Vec<T::AccountId>,
        /// The hardfork the chain starts at.
        pub hardfork: u16,
        /// Core coin backing the genesis vesting shares.
        pub total_vesting_fund: Amount,
        /// Opening supply counter.
        pub virtual_supply: Amount,
    }

    impl<T: Config> Default for GenesisConfig<T> {
        fn default() -> Self {
            Self {
                balances: Vec::new(),
                witnesses: Vec::new(),
                hardfork: hardfork::LATEST,
                total_vesting_fund: 0,
                virtual_supply: 0,
            }
        }
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            let mut total_vests: Amount = 0;
            for (who, steem, sbd, vests) in &self.balances {
                Accounts::<T>::insert(
                    who,
                    AccountAssets {
                        balance: *steem,
                        sbd_balance: *sbd,
                        vesting_shares: *vests,
                        ..Default::default()
                    },
                );
                total_vests += vests;
            }
            TotalVestingShares::<T>::put(total_vests);
            TotalVestingFund::<T>::put(self.total_vesting_fund);
            VirtualSupply::<T>::put(self.virtual_supply);
            WitnessSchedule::<T>::put(self.witnesses.clone());
            ActivatedHardfork::<T>::put(self.hardfork);
        }
    }

    #[pallet::event]
    #[pallet::generate_deposit(pub(crate) fn deposit_event)]
    pub enum Event<T: Config> {
        /// (from, to, value)
        Transferred(T::AccountId, T::AccountId, Asset),
        /// Core coin was vested. (who, value, shares_created)
        VestingCreated(T::AccountId, Asset, Asset),
        /// (delegator, delegatee, shares, interest_rate)
        VestingDelegated(T::AccountId, T::AccountId, Asset, u16),
        /// (delegator, delegatee)
        DelegationRemoved(T::AccountId, T::AccountId),
        /// A new witness schedule took effect.
        WitnessScheduleUpdated(Vec<T::AccountId>),
        /// A new median feed price was published.
        FeedPricePublished(Price),
        /// (version)
        HardforkActivated(u16),
        /// (who, reputation)
        ReputationSet(T::AccountId, i64),
        /// Block emission settled. (content, vesting, witness, worker)
        FundsEmitted(Asset, Asset, Asset, Asset),
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Not enough balance in the debited asset.
        InsufficientBalance,
        /// Vested shares only move through delegation or powering down.
        VestsAreNotTransferable,
        /// The operation expects a different asset symbol.
        SymbolMismatch,
        /// Amounts flowing through operations must be positive.
        AmountNotPositive,
        /// A balance counter would overflow.
        BalanceOverflow,
        /// Delegating to oneself.
        CannotDelegateToSelf,
        /// The delegation interest rate exceeds the chain cap.
        TooHighInterestRate,
        /// Not enough undelegated vesting shares.
        InsufficientVestingShares,
        /// The feed price pair must be positive STEEM/SBD.
        InvalidFeedPrice,
        /// Hardforks activate in ascending order.
        HardforkNotSequential,
        /// This build does not know the requested hardfork.
        UnknownHardfork,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn on_finalize(_n: BlockNumberFor<T>) {
            Self::process_funds();
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Moves liquid STEEM or SBD between accounts.
        #[pallet::call_index(0)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn transfer(
            origin: OriginFor<T>,
            dest: T::AccountId,
            value: Asset,
        ) -> DispatchResult {
            let from = ensure_signed(origin)?;
            ensure!(value.symbol != AssetSymbol::Vests, Error::<T>::VestsAreNotTransferable);
            ensure!(value.amount > 0, Error::<T>::AmountNotPositive);

            Self::sub_balance(&from, value)?;
            Self::add_balance(&dest, value)?;

            Self::deposit_event(Event::Transferred(from, dest, value));
            Ok(())
        }

        /// Converts liquid STEEM into vested shares for `dest`.
        #[pallet::call_index(1)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn transfer_to_vesting(
            origin: OriginFor<T>,
            dest: T::AccountId,
            value: Asset,
        ) -> DispatchResult {
            let from = ensure_signed(origin)?;
            ensure!(value.symbol == AssetSymbol::Steem, Error::<T>::SymbolMismatch);
            ensure!(value.amount > 0, Error::<T>::AmountNotPositive);

            Self::sub_balance(&from, value)?;
            Self::create_vesting(&dest, value)?;
            Ok(())
        }

        /// Delegates vested shares to `delegatee` at an interest rate the
        /// delegator will earn on the delegatee's curation rewards.
        ///
        /// Zero shares removes the delegation.
        #[pallet::call_index(2)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn delegate_vesting_shares(
            origin: OriginFor<T>,
            delegatee: T::AccountId,
            shares: Asset,
            interest_rate: u16,
            payout_strategy: DelegatorPayoutStrategy,
        ) -> DispatchResult {
            let delegator = ensure_signed(origin)?;
            ensure!(delegator != delegatee, Error::<T>::CannotDelegateToSelf);
            ensure!(shares.symbol == AssetSymbol::Vests, Error::<T>::SymbolMismatch);
            ensure!(shares.amount >= 0, Error::<T>::AmountNotPositive);
            ensure!(
                interest_rate <= MAX_DELEGATED_VESTING_INTEREST_RATE,
                Error::<T>::TooHighInterestRate
            );

            let previous = Delegations::<T>::get(&delegatee, &delegator)
                .map(|d| d.vesting_shares)
                .unwrap_or(0);
            let delta = shares.amount - previous;

            Accounts::<T>::try_mutate(&delegator, |a| -> DispatchResult {
                ensure!(
                    a.vesting_shares - a.delegated_vesting_shares - delta >= 0,
                    Error::<T>::InsufficientVestingShares
                );
                a.delegated_vesting_shares += delta;
                Ok(())
            })?;
            Accounts::<T>::mutate(&delegatee, |a| a.received_vesting_shares += delta);

            if shares.amount == 0 {
                Delegations::<T>::remove(&delegatee, &delegator);
                Self::deposit_event(Event::DelegationRemoved(delegator, delegatee));
            } else {
                Delegations::<T>::insert(
                    &delegatee,
                    &delegator,
                    VestingDelegation {
                        vesting_shares: shares.amount,
                        interest_rate,
                        payout_strategy,
                    },
                );
                Self::deposit_event(Event::VestingDelegated(
                    delegator,
                    delegatee,
                    shares,
                    interest_rate,
                ));
            }
            Ok(())
        }

        /// Installs a new witness schedule.
        ///
        /// The election itself lives outside this subsystem; consensus only
        /// consumes the resulting top-N set.
        #[pallet::call_index(3)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn set_witness_schedule(
            origin: OriginFor<T>,
            witnesses: Vec<T::AccountId>,
        ) -> DispatchResult {
            ensure_root(origin)?;
            WitnessSchedule::<T>::put(witnesses.clone());
            Self::deposit_event(Event::WitnessScheduleUpdated(witnesses));
            Ok(())
        }

        /// Publishes the median STEEM/SBD feed price.
        #[pallet::call_index(4)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn set_feed_price(origin: OriginFor<T>, base: Asset, quote: Asset) -> DispatchResult {
            ensure_root(origin)?;
            ensure!(
                base.symbol == AssetSymbol::Steem && quote.symbol == AssetSymbol::Sbd,
                Error::<T>::InvalidFeedPrice
            );
            let price = Price::new(base, quote).ok_or(Error::<T>::InvalidFeedPrice)?;
            MedianFeedPrice::<T>::put(price);
            Self::deposit_event(Event::FeedPricePublished(price));
            Ok(())
        }

        /// Activates the next hardfork.
        #[pallet::call_index(5)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn activate_hardfork(origin: OriginFor<T>, version: u16) -> DispatchResult {
            ensure_root(origin)?;
            ensure!(version <= hardfork::LATEST, Error::<T>::UnknownHardfork);
            ensure!(
                version > ActivatedHardfork::<T>::get(),
                Error::<T>::HardforkNotSequential
            );
            ActivatedHardfork::<T>::put(version);
            Self::deposit_event(Event::HardforkActivated(version));
            Ok(())
        }

        /// Overwrites an account's reputation on behalf of the social-graph
        /// module.
        #[pallet::call_index(6)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn set_reputation(
            origin: OriginFor<T>,
            who: T::AccountId,
            reputation: i64,
        ) -> DispatchResult {
            ensure_root(origin)?;
            Reputations::<T>::insert(&who, reputation);
            Self::deposit_event(Event::ReputationSet(who, reputation));
            Ok(())
        }
    }
}

impl<T: Config> Pallet<T> {
    /// The consensus clock, in seconds since the epoch.
    pub fn head_block_time() -> u64 {
        T::UnixTime::now().as_secs()
    }

    /// Chain-level knobs surfaced to API consumers.
    pub fn chain_properties() -> ChainProperties {
        ChainProperties {
            auction_window_size: REVERSE_AUCTION_WINDOW_SECONDS,
            min_curation_percent: MIN_CURATION_PERCENT,
            max_curation_percent: MAX_CURATION_PERCENT,
            max_delegated_vesting_interest_rate: MAX_DELEGATED_VESTING_INTEREST_RATE,
            worker_from_content_fund_percent: WORKER_FROM_CONTENT_FUND_PERCENT,
            worker_from_vesting_fund_percent: WORKER_FROM_VESTING_FUND_PERCENT,
            worker_from_witness_fund_percent: WORKER_FROM_WITNESS_FUND_PERCENT,
        }
    }

    /// The current vesting price as a share-per-coin pair, or `None` while
    /// the pool is empty.
    pub fn vesting_share_price() -> Option<(Amount, Amount)> {
        let shares = TotalVestingShares::<T>::get();
        let fund = TotalVestingFund::<T>::get();
        (shares > 0 && fund > 0).then_some((shares, fund))
    }

    /// Converts `value` of STEEM into new vesting shares at the current
    /// pool price, without touching any account.
    fn shares_for(value: Amount) -> Amount {
        match Self::vesting_share_price() {
            Some((shares, fund)) => ((value as i128) * (shares as i128) / (fund as i128)) as i64,
            None => value,
        }
    }

    fn do_create_vesting(who: &T::AccountId, value: Asset) -> Asset {
        let new_shares = Self::shares_for(value.amount);
        Accounts::<T>::mutate(who, |a| a.vesting_shares += new_shares);
        TotalVestingShares::<T>::mutate(|s| *s += new_shares);
        TotalVestingFund::<T>::mutate(|f| *f += value.amount);
        let created = Asset::vests(new_shares);
        Self::deposit_event(Event::VestingCreated(who.clone(), value, created));
        created
    }

    /// Grows the vesting pool without assigning the new shares to anyone.
    pub(crate) fn vest_to_pool(value: Amount) {
        let new_shares = Self::shares_for(value);
        TotalVestingShares::<T>::mutate(|s| *s += new_shares);
        TotalVestingFund::<T>::mutate(|f| *f += value);
    }
}

impl<T: Config> AssetCurrency<T::AccountId> for Pallet<T> {
    fn balance(who: &T::AccountId, symbol: AssetSymbol) -> Asset {
        Accounts::<T>::get(who).of(symbol)
    }

    fn add_balance(who: &T::AccountId, value: Asset) -> DispatchResult {
        Accounts::<T>::try_mutate(who, |a| {
            let slot = a.slot_mut(value.symbol);
            *slot = slot.checked_add(value.amount).ok_or(Error::<T>::BalanceOverflow)?;
            Ok(())
        })
    }

    fn sub_balance(who: &T::AccountId, value: Asset) -> DispatchResult {
        Accounts::<T>::try_mutate(who, |a| {
            let slot = a.slot_mut(value.symbol);
            ensure!(*slot >= value.amount, Error::<T>::InsufficientBalance);
            *slot -= value.amount;
            Ok(())
        })
    }
}

impl<T: Config> Vesting<T::AccountId> for Pallet<T> {
    fn create_vesting(
        who: &T::AccountId,
        value: Asset,
    ) -> Result<Asset, DispatchError> {
        ensure!(value.symbol == AssetSymbol::Steem, Error::<T>::SymbolMismatch);
        ensure!(value.amount >= 0, Error::<T>::AmountNotPositive);
        Ok(Self::do_create_vesting(who, value))
    }

    fn effective_vesting_shares(who: &T::AccountId) -> Asset {
        Asset::vests(Accounts::<T>::get(who).effective_vesting_shares())
    }
}

impl<T: Config> VestingDelegations<T::AccountId> for Pallet<T> {
    fn interest_rates(
        delegatee: &T::AccountId,
    ) -> Vec<(T::AccountId, u16, DelegatorPayoutStrategy)> {
        let mut rates: Vec<_> = Delegations::<T>::iter_prefix(delegatee)
            .filter(|(_, d)| d.interest_rate > 0)
            .map(|(delegator, d)| (delegator, d.interest_rate, d.payout_strategy))
            .collect();
        rates.sort_by(|a, b| a.0.cmp(&b.0));
        rates
    }

    fn add_to_delegation(
        delegator: &T::AccountId,
        delegatee: &T::AccountId,
        shares: Asset,
    ) -> DispatchResult {
        Delegations::<T>::try_mutate(delegatee, delegator, |maybe| -> DispatchResult {
            if let Some(delegation) = maybe {
                delegation.vesting_shares += shares.amount;
                Accounts::<T>::mutate(delegator, |a| a.delegated_vesting_shares += shares.amount);
                Accounts::<T>::mutate(delegatee, |a| a.received_vesting_shares += shares.amount);
            }
            Ok(())
        })
    }
}

impl<T: Config> TopWitnesses<T::AccountId> for Pallet<T> {
    fn is_scheduled(who: &T::AccountId) -> bool {
        WitnessSchedule::<T>::get().contains(who)
    }
}

impl<T: Config> Hardforks for Pallet<T> {
    fn is_active(version: u16) -> bool {
        ActivatedHardfork::<T>::get() >= version
    }
}

impl<T: Config> FeedPrice for Pallet<T> {
    fn median() -> Option<Price> {
        MedianFeedPrice::<T>::get()
    }

    fn to_sbd(value: Asset) -> Asset {
        match MedianFeedPrice::<T>::get().and_then(|p| value.convert(&p)) {
            Some(converted) => converted,
            None => Asset::sbd(value.amount),
        }
    }

    fn to_steem(value: Asset) -> Asset {
        match MedianFeedPrice::<T>::get().and_then(|p| value.convert(&p)) {
            Some(converted) => converted,
            None => Asset::steem(value.amount),
        }
    }
}

impl<T: Config> ReputationOf<T::AccountId> for Pallet<T> {
    fn reputation_of(who: &T::AccountId) -> Option<i64> {
        Reputations::<T>::contains_key(who).then(|| Reputations::<T>::get(who))
    }
}
