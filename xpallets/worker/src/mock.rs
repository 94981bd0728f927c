// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

pub use crate as apallet_worker;
pub use apallet_worker::{Config, Error, Event as AgoraWorkerEvent};

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
        AgoraWorker: apallet_worker,
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
    type WorkerFund = AgoraWorker;
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

impl apallet_worker::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type UnixTime = Timestamp;
    type Currency = AgoraChain;
    type Posts = AgoraContent;
    type Witnesses = AgoraChain;
    type Hardforks = AgoraChain;
}

pub const PROPOSER: u64 = 1;
pub const WORKER: u64 = 2;
pub const FUNDER: u64 = 3;
pub const OUTSIDER: u64 = 4;

/// The 19 scheduled witnesses.
pub const WITNESSES: std::ops::Range<u64> = 100..119;

/// Genesis wall-clock, seconds.
pub const START: u64 = 1_600_000_000;

pub fn new_test_ext() -> sp_io::TestExternalities {
    new_test_ext_at(hardfork::LATEST)
}

pub fn new_test_ext_at(hardfork: u16) -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default()
        .build_storage()
        .unwrap();

    apallet_chain::GenesisConfig::<Test> {
        balances: vec![(PROPOSER, 100_000, 0, 0), (WORKER, 0, 0, 0), (FUNDER, 50_000, 0, 0)],
        witnesses: WITNESSES.collect(),
        hardfork,
        total_vesting_fund: 0,
        virtual_supply: 0,
    }
    .assimilate_storage(&mut t)
    .unwrap();

    apallet_content::GenesisConfig::<Test> {
        reward_fund: 0,
        default_curve: CurationCurve::Linear,
        _phantom: Default::default(),
    }
    .assimilate_storage(&mut t)
    .unwrap();

    apallet_worker::GenesisConfig::<Test> {
        worker_fund: 100_000,
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

/// Moves the consensus clock to `now` seconds.
pub fn set_now(now: u64) {
    Timestamp::set_timestamp(now * 1000);
}

pub fn post_root(author: u64, permlink: &[u8]) {
    frame_support::assert_ok!(AgoraContent::post(
        RuntimeOrigin::signed(author),
        None,
        b"work".to_vec(),
        permlink.to_vec(),
    ));
}

pub fn steem_of(who: u64) -> i64 {
    apallet_chain::Accounts::<Test>::get(who).balance
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
