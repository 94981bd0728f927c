// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

pub use crate as apallet_content;
pub use apallet_content::{Config, Error, Event as AgoraContentEvent};

use frame_support::traits::{ConstU32, ConstU64, Everything};
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

use ap_protocol::{hardfork, CurationCurve};

type Block = frame_system::mocking::MockBlock<Test>;

frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Timestamp: pallet_timestamp,
        AgoraChain: apallet_chain,
        AgoraContent: apallet_content,
    }
);

impl frame_system::Config for Test {
    type BaseCallFilter = Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Nonce = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = ();
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

impl pallet_timestamp::Config for Test {
    type Moment = u64;
    type OnTimestampSet = ();
    type MinimumPeriod = ConstU64<3000>;
    type WeightInfo = ();
}

impl apallet_chain::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type UnixTime = Timestamp;
    type ContentFund = AgoraContent;
    type WorkerFund = ();
    type BlockAuthor = ();
}

impl apallet_content::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type UnixTime = Timestamp;
    type Currency = AgoraChain;
    type Vesting = AgoraChain;
    type Delegations = AgoraChain;
    type FeedPrice = AgoraChain;
    type Hardforks = AgoraChain;
    type Reputation = AgoraChain;
    type Promoted = ();
}

pub const AUTHOR: u64 = 1;
pub const BENEFICIARY_1: u64 = 31;
pub const BENEFICIARY_2: u64 = 32;
pub const VOTER_1: u64 = 11;
pub const VOTER_2: u64 = 12;
pub const VOTER_3: u64 = 13;
pub const VOTER_4: u64 = 14;
pub const DELEGATOR: u64 = 21;

/// Genesis wall-clock, seconds.
pub const START: u64 = 1_600_000_000;

pub struct ExtBuilder {
    /// `(account, vests)` opening vesting balances; the pool starts 1:1.
    pub vests: Vec<(u64, i64)>,
    pub reward_fund: i64,
    pub default_curve: CurationCurve,
}

impl Default for ExtBuilder {
    fn default() -> Self {
        Self {
            vests: vec![(VOTER_1, 100), (VOTER_2, 200), (VOTER_3, 100)],
            reward_fund: 1000,
            default_curve: CurationCurve::Linear,
        }
    }
}

impl ExtBuilder {
    pub fn build(self) -> sp_io::TestExternalities {
        let mut t = frame_system::GenesisConfig::<Test>::default()
            .build_storage()
            .unwrap();

        let total_vests: i64 = self.vests.iter().map(|(_, v)| v).sum();
        let mut balances: Vec<(u64, i64, i64, i64)> = self
            .vests
            .into_iter()
            .map(|(who, vests)| (who, 0, 0, vests))
            .collect();
        balances.push((AUTHOR, 100_000, 0, 0));

        apallet_chain::GenesisConfig::<Test> {
            balances,
            witnesses: vec![],
            hardfork: hardfork::LATEST,
            // A 1:1 vesting pool keeps STEEM and VESTS amounts equal in
            // expectations.
            total_vesting_fund: total_vests,
            virtual_supply: 0,
        }
        .assimilate_storage(&mut t)
        .unwrap();

        apallet_content::GenesisConfig::<Test> {
            reward_fund: self.reward_fund,
            default_curve: self.default_curve,
            _phantom: Default::default(),
        }
        .assimilate_storage(&mut t)
        .unwrap();

        let mut ext = sp_io::TestExternalities::new(t);
        ext.execute_with(|| {
            System::set_block_number(1);
            Timestamp::set_timestamp(START * 1000);
        });
        ext
    }
}

pub fn new_test_ext() -> sp_io::TestExternalities {
    ExtBuilder::default().build()
}

/// Moves the consensus clock to `now` seconds.
pub fn set_now(now: u64) {
    Timestamp::set_timestamp(now * 1000);
}

pub fn post_root(author: u64, permlink: &[u8]) {
    frame_support::assert_ok!(AgoraContent::post(
        RuntimeOrigin::signed(author),
        None,
        b"test".to_vec(),
        permlink.to_vec(),
    ));
}

pub fn vests_of(who: u64) -> i64 {
    apallet_chain::Accounts::<Test>::get(who).vesting_shares
}

pub fn sbd_of(who: u64) -> i64 {
    apallet_chain::Accounts::<Test>::get(who).sbd_balance
}

pub(crate) fn expect_event<E: Into<RuntimeEvent>>(e: E) {
    let e = e.into();
    assert!(
        frame_system::Pallet::<Test>::events()
            .into_iter()
            .any(|record| record.event == e),
        "expected event {:?}",
        e
    );
}
