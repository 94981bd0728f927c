// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! Per-block emission: inflation split across the content, vesting, witness
//! and worker funds.

use super::*;

use ap_protocol::{
    BLOCKS_PER_YEAR, CONTENT_REWARD_PERCENT, INFLATION_RATE_START_PERCENT, MAX_WITNESSES,
    PERCENT_100, VESTING_FUND_PERCENT, WITNESS_REWARD_NORMALIZE,
};

fn percent_of(value: Amount, percent: u16) -> Amount {
    ((value as i128) * (percent as i128) / (PERCENT_100 as i128)) as i64
}

impl<T: Config> Pallet<T> {
    /// Settles one block's emission.
    ///
    /// The total mint is `virtual_supply * inflation / blocks_per_year`,
    /// split into the content, vesting and witness buckets; after the
    /// worker-fund hardfork every bucket cedes its carve-out to the worker
    /// fund. The witness bucket is scaled by
    /// `MAX_WITNESSES / WITNESS_REWARD_NORMALIZE` before it is vested.
    pub(crate) fn process_funds() {
        let supply = VirtualSupply::<T>::get();
        let total_reward = ((supply as i128) * (INFLATION_RATE_START_PERCENT as i128)
            / ((PERCENT_100 as i128) * (BLOCKS_PER_YEAR as i128))) as i64;
        if total_reward <= 0 {
            return;
        }

        let mut content_reward = percent_of(total_reward, CONTENT_REWARD_PERCENT);
        let mut vesting_reward = percent_of(total_reward, VESTING_FUND_PERCENT);
        let mut witness_reward = total_reward - content_reward - vesting_reward;
        let mut worker_reward: Amount = 0;

        if <Self as Hardforks>::is_active(hardfork::WORKER_FUND_EMISSION) {
            let content_to_worker = percent_of(content_reward, WORKER_FROM_CONTENT_FUND_PERCENT);
            content_reward -= content_to_worker;

            let vesting_to_worker = percent_of(vesting_reward, WORKER_FROM_VESTING_FUND_PERCENT);
            vesting_reward -= vesting_to_worker;

            let witness_to_worker = percent_of(witness_reward, WORKER_FROM_WITNESS_FUND_PERCENT);
            witness_reward -= witness_to_worker;

            worker_reward = content_to_worker + vesting_to_worker + witness_to_worker;
        }

        witness_reward =
            ((witness_reward as i128) * (MAX_WITNESSES as i128) / (WITNESS_REWARD_NORMALIZE as i128)) as i64;

        TotalVestingFund::<T>::mutate(|f| *f += vesting_reward);
        T::ContentFund::deposit(Asset::steem(content_reward));
        if worker_reward > 0 {
            T::WorkerFund::deposit(Asset::steem(worker_reward));
        }

        match T::BlockAuthor::block_author() {
            Some(author) => {
                Self::do_create_vesting(&author, Asset::steem(witness_reward));
            }
            None => Self::vest_to_pool(witness_reward),
        }

        VirtualSupply::<T>::mutate(|s| {
            *s += content_reward + vesting_reward + witness_reward + worker_reward
        });

        log::debug!(
            target: "runtime::chain",
            "[process_funds] content:{} vesting:{} witness:{} worker:{}",
            content_reward, vesting_reward, witness_reward, worker_reward
        );

        Self::deposit_event(Event::FundsEmitted(
            Asset::steem(content_reward),
            Asset::steem(vesting_reward),
            Asset::steem(witness_reward),
            Asset::steem(worker_reward),
        ));
    }
}
