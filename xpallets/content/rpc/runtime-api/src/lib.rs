// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! Runtime API definition for the content projection layer.

#![cfg_attr(not(feature = "std"), no_std)]

use codec::Codec;
use sp_std::vec::Vec;

pub use apallet_chain::ChainProperties;
pub use apallet_content::rpc::{Discussion, VoteState};

sp_api::decl_runtime_apis! {
    pub trait ContentApi<AccountId>
    where
        AccountId: Codec,
    {
        fn discussion(
            author: AccountId,
            permlink: Vec<u8>,
            vote_limit: u32,
        ) -> Option<Discussion<AccountId>>;

        fn active_votes(
            author: AccountId,
            permlink: Vec<u8>,
            limit: u32,
        ) -> Option<(Vec<VoteState<AccountId>>, u32)>;

        fn chain_properties() -> ChainProperties;
    }
}
